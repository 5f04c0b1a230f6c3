// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outbound calls from the bridge to the host.
//!
//! Native listeners fire on whatever thread the client uses. Every outbound
//! message goes through [`HostCaller`], which re-posts itself onto the main
//! thread when invoked anywhere else.

use std::collections::BTreeMap;
use std::sync::Arc;

use loom_flags_bridge_core::StructuredValue;
use serde_json::Value;
use tracing::{debug, trace};

use crate::client::{AllFlagsListener, FlagChangeListener};
use crate::looper::MainExecutor;
use crate::protocol::{EVENT_HANDLE_FLAGS_RECEIVED, EVENT_HANDLE_FLAG_UPDATE};
use crate::translate::all_flags_to_wire;

/// The host side of the message channel.
///
/// Only ever called on the main thread.
pub trait HostChannel: Send + Sync {
	fn invoke_method(&self, method: &str, arguments: Value);
}

/// Delivers one-way calls to the host on the main thread.
#[derive(Clone)]
pub struct HostCaller {
	channel: Arc<dyn HostChannel>,
	executor: Arc<dyn MainExecutor>,
}

impl HostCaller {
	pub fn new(channel: Arc<dyn HostChannel>, executor: Arc<dyn MainExecutor>) -> Self {
		Self { channel, executor }
	}

	pub fn call(&self, method: &'static str, arguments: Value) {
		if self.executor.is_main_thread() {
			trace!(method, "invoking host method");
			self.channel.invoke_method(method, arguments);
		} else {
			let this = self.clone();
			self.executor.post(Box::new(move || this.call(method, arguments)));
		}
	}
}

/// Emits a one-way signal exactly once.
///
/// Fires on [`fire`](Self::fire) or, failing that, when dropped, so a task
/// that is cancelled or unwinds still acknowledges.
pub struct CompletionSignal {
	host: Option<HostCaller>,
	method: &'static str,
}

impl CompletionSignal {
	pub fn new(host: HostCaller, method: &'static str) -> Self {
		Self {
			host: Some(host),
			method,
		}
	}

	pub fn fire(mut self) {
		self.emit();
	}

	fn emit(&mut self) {
		if let Some(host) = self.host.take() {
			debug!(method = self.method, "signalling completion");
			host.call(self.method, Value::Null);
		}
	}
}

impl Drop for CompletionSignal {
	fn drop(&mut self) {
		self.emit();
	}
}

/// Forwards per-flag change notifications as `handleFlagUpdate`.
pub struct FlagUpdateForwarder {
	host: HostCaller,
}

impl FlagUpdateForwarder {
	pub fn new(host: HostCaller) -> Self {
		Self { host }
	}
}

impl FlagChangeListener for FlagUpdateForwarder {
	fn on_flag_changed(&self, flag_key: &str) {
		self
			.host
			.call(EVENT_HANDLE_FLAG_UPDATE, Value::String(flag_key.to_string()));
	}
}

/// Forwards flag snapshots as `handleFlagsReceived`.
pub struct FlagsReceivedForwarder {
	host: HostCaller,
}

impl FlagsReceivedForwarder {
	pub fn new(host: HostCaller) -> Self {
		Self { host }
	}
}

impl AllFlagsListener for FlagsReceivedForwarder {
	fn on_flags_received(&self, flags: &BTreeMap<String, StructuredValue>) {
		self
			.host
			.call(EVENT_HANDLE_FLAGS_RECEIVED, all_flags_to_wire(flags));
	}
}
