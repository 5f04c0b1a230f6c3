// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed client results into wire-safe maps.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use loom_flags_bridge_core::{
	ConnectionFailure, ConnectionInformation, EvaluationDetail, EvaluationReason, StructuredValue,
};
use serde_json::{json, Map, Value};
use tracing::warn;

/// `{value, variationIndex, reason}` for a detail call.
pub fn detail_to_wire(
	value: Value,
	variation_index: Option<u32>,
	reason: Option<&EvaluationReason>,
) -> Value {
	json!({
		"value": value,
		"variationIndex": variation_index,
		"reason": reason_to_wire(reason),
	})
}

/// Same as [`detail_to_wire`], encoding the value with `encode`.
pub fn evaluation_detail_to_wire<T>(detail: EvaluationDetail<T>, encode: impl FnOnce(T) -> Value) -> Value {
	let detail = detail.map(encode);
	detail_to_wire(detail.value, detail.variation_index, detail.reason.as_ref())
}

/// `{kind, ...}` with only the fields of that kind, or `null`.
pub fn reason_to_wire(reason: Option<&EvaluationReason>) -> Value {
	let Some(reason) = reason else {
		return Value::Null;
	};
	serde_json::to_value(reason).unwrap_or_else(|e| {
		warn!(kind = reason.kind(), error = %e, "failed to encode evaluation reason");
		json!({ "kind": reason.kind() })
	})
}

/// `{message, failureType}` or `null`.
pub fn failure_to_wire(failure: Option<&ConnectionFailure>) -> Value {
	match failure {
		Some(failure) => json!({
			"message": failure.message,
			"failureType": failure.failure_type.as_str(),
		}),
		None => Value::Null,
	}
}

/// `{connectionState, lastFailure, lastSuccessfulConnection, lastFailedConnection}` or `null`.
pub fn connection_information_to_wire(info: Option<&ConnectionInformation>) -> Value {
	match info {
		Some(info) => json!({
			"connectionState": info.connection_mode.as_str(),
			"lastFailure": failure_to_wire(info.last_failure.as_ref()),
			"lastSuccessfulConnection": millis(info.last_successful_connection.as_ref()),
			"lastFailedConnection": millis(info.last_failed_connection.as_ref()),
		}),
		None => Value::Null,
	}
}

/// Flag key to encoded value.
pub fn all_flags_to_wire(flags: &BTreeMap<String, StructuredValue>) -> Value {
	Value::Object(
		flags
			.iter()
			.map(|(key, value)| (key.clone(), value.to_wire()))
			.collect::<Map<String, Value>>(),
	)
}

fn millis(timestamp: Option<&DateTime<Utc>>) -> Value {
	timestamp.map_or(Value::Null, |t| Value::from(t.timestamp_millis()))
}
