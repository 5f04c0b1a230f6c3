// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Evaluation contexts from the host's context maps.
//!
//! The host sends a list of maps, one per context kind. `kind` and `key` sit
//! next to the other attributes at the same level, and `_meta` carries
//! `privateAttributes`.
//!
//! The native client needs a key even for anonymous contexts. When the host
//! omits one, a placeholder is used and the context is marked anonymous so
//! the client generates a stable per-device key in its place.

use loom_flags_bridge_core::{Context, MultiContext, StructuredValue};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{BridgeError, Result};

/// Key used for contexts the host sent without one.
///
/// Host code and cached anonymous contexts match on this exact sentinel.
pub const PLACEHOLDER_KEY: &str = "__LD_PLACEHOLDER_KEY__";

const KEY: &str = "key";
const META: &str = "_meta";
const PRIVATE_ATTRIBUTES: &str = "privateAttributes";

/// Builds a single context from one host map. Never fails.
///
/// A `key` that is missing, null or not a string takes the placeholder path.
pub fn context_from_wire(attributes: &Map<String, Value>) -> Context {
	let (key, needs_placeholder) = match attributes.get(KEY) {
		Some(Value::String(key)) => (key.as_str(), false),
		_ => (PLACEHOLDER_KEY, true),
	};

	let mut builder = Context::builder(key);
	for (name, value) in attributes {
		if name == META || name == KEY {
			continue;
		}
		builder = builder.set(name, StructuredValue::from_wire(value));
	}

	if needs_placeholder {
		debug!("context has no key, using placeholder and marking anonymous");
		builder = builder.anonymous(true);
	}

	let private = attributes
		.get(META)
		.and_then(|meta| meta.get(PRIVATE_ATTRIBUTES))
		.and_then(Value::as_array)
		.map(|names| names.iter().filter_map(Value::as_str).collect::<Vec<_>>())
		.unwrap_or_default();

	builder.private_attributes(private).build()
}

/// Builds a multi-context from the host's list of context maps.
///
/// A single map still produces a multi-context with one member.
pub fn multi_context_from_wire(list: &[Value]) -> Result<MultiContext> {
	if list.is_empty() {
		return Err(BridgeError::malformed("context", "expected at least one context"));
	}

	let mut multi = MultiContext::builder();
	for (index, entry) in list.iter().enumerate() {
		let attributes = entry.as_object().ok_or_else(|| {
			BridgeError::malformed("context", format!("entry {index} is not a map"))
		})?;
		multi = multi.add(context_from_wire(attributes));
	}

	Ok(multi.build())
}
