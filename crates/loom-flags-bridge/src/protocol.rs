// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Payload shapes carried over the host message channel.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BridgeError, Result};

/// Default channel name registered with the host.
pub const CHANNEL_NAME: &str = "loom_flags_bridge";

// Error codes
pub const MALFORMED_ARGUMENT: &str = "malformed_argument";
pub const CONFIGURATION_ERROR: &str = "configuration_error";
pub const CLIENT_NOT_READY: &str = "client_not_ready";
pub const CLIENT_CLOSED: &str = "client_closed";
pub const NOT_IMPLEMENTED: &str = "not_implemented";

// Method names
pub const METHOD_START: &str = "start";
pub const METHOD_IDENTIFY: &str = "identify";
pub const METHOD_TRACK: &str = "track";
pub const METHOD_BOOL_VARIATION: &str = "boolVariation";
pub const METHOD_BOOL_VARIATION_DETAIL: &str = "boolVariationDetail";
pub const METHOD_INT_VARIATION: &str = "intVariation";
pub const METHOD_INT_VARIATION_DETAIL: &str = "intVariationDetail";
pub const METHOD_DOUBLE_VARIATION: &str = "doubleVariation";
pub const METHOD_DOUBLE_VARIATION_DETAIL: &str = "doubleVariationDetail";
pub const METHOD_STRING_VARIATION: &str = "stringVariation";
pub const METHOD_STRING_VARIATION_DETAIL: &str = "stringVariationDetail";
pub const METHOD_JSON_VARIATION: &str = "jsonVariation";
pub const METHOD_JSON_VARIATION_DETAIL: &str = "jsonVariationDetail";
pub const METHOD_ALL_FLAGS: &str = "allFlags";
pub const METHOD_FLUSH: &str = "flush";
pub const METHOD_SET_ONLINE: &str = "setOnline";
pub const METHOD_IS_OFFLINE: &str = "isOffline";
pub const METHOD_GET_CONNECTION_INFORMATION: &str = "getConnectionInformation";
pub const METHOD_START_FLAG_LISTENING: &str = "startFlagListening";
pub const METHOD_STOP_FLAG_LISTENING: &str = "stopFlagListening";
pub const METHOD_CLOSE: &str = "close";

// Event names (bridge → host, one-way)
pub const EVENT_COMPLETE_START: &str = "completeStart";
pub const EVENT_HANDLE_FLAG_UPDATE: &str = "handleFlagUpdate";
pub const EVENT_HANDLE_FLAGS_RECEIVED: &str = "handleFlagsReceived";

/// A named call from the host.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodCall {
	pub method: String,
	#[serde(default)]
	pub arguments: Value,
}

impl MethodCall {
	pub fn new(method: impl Into<String>, arguments: Value) -> Self {
		Self {
			method: method.into(),
			arguments,
		}
	}

	/// Looks up a named argument. Absent when the arguments are not a map.
	pub fn argument(&self, name: &str) -> Option<&Value> {
		self.arguments.as_object().and_then(|args| args.get(name))
	}

	pub fn required_str(&self, name: &str) -> Result<&str> {
		match self.argument(name) {
			Some(Value::String(s)) => Ok(s),
			Some(_) => Err(BridgeError::malformed(name, "expected a string")),
			None => Err(BridgeError::malformed(name, "missing")),
		}
	}

	pub fn optional_str(&self, name: &str) -> Result<Option<&str>> {
		match self.argument(name) {
			Some(Value::String(s)) => Ok(Some(s)),
			Some(Value::Null) | None => Ok(None),
			Some(_) => Err(BridgeError::malformed(name, "expected a string or null")),
		}
	}

	pub fn required_bool(&self, name: &str) -> Result<bool> {
		match self.argument(name) {
			Some(Value::Bool(b)) => Ok(*b),
			Some(_) => Err(BridgeError::malformed(name, "expected a boolean")),
			None => Err(BridgeError::malformed(name, "missing")),
		}
	}

	pub fn required_i32(&self, name: &str) -> Result<i32> {
		match self.argument(name) {
			Some(Value::Number(n)) => n
				.as_i64()
				.and_then(|n| i32::try_from(n).ok())
				.ok_or_else(|| BridgeError::malformed(name, "expected a 32-bit integer")),
			Some(_) => Err(BridgeError::malformed(name, "expected an integer")),
			None => Err(BridgeError::malformed(name, "missing")),
		}
	}

	pub fn required_f64(&self, name: &str) -> Result<f64> {
		self.optional_f64(name)?
			.ok_or_else(|| BridgeError::malformed(name, "missing"))
	}

	pub fn optional_f64(&self, name: &str) -> Result<Option<f64>> {
		match self.argument(name) {
			Some(Value::Number(n)) => n
				.as_f64()
				.map(Some)
				.ok_or_else(|| BridgeError::malformed(name, "number out of range")),
			Some(Value::Null) | None => Ok(None),
			Some(_) => Err(BridgeError::malformed(name, "expected a number")),
		}
	}

	pub fn required_object(&self, name: &str) -> Result<&Map<String, Value>> {
		match self.argument(name) {
			Some(Value::Object(map)) => Ok(map),
			Some(_) => Err(BridgeError::malformed(name, "expected a map")),
			None => Err(BridgeError::malformed(name, "missing")),
		}
	}

	pub fn required_list(&self, name: &str) -> Result<&[Value]> {
		match self.argument(name) {
			Some(Value::Array(items)) => Ok(items),
			Some(_) => Err(BridgeError::malformed(name, "expected a list")),
			None => Err(BridgeError::malformed(name, "missing")),
		}
	}

	/// The whole argument payload as a string, for calls that take a bare flag key.
	pub fn bare_str(&self, name: &str) -> Result<&str> {
		self
			.arguments
			.as_str()
			.ok_or_else(|| BridgeError::malformed(name, "expected the argument to be a string"))
	}
}

/// Outcome of a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResponse {
	Success { result: Value },
	Error { code: String, message: String },
	NotImplemented,
}

impl MethodResponse {
	pub fn success(result: Value) -> Self {
		MethodResponse::Success { result }
	}

	pub fn is_success(&self) -> bool {
		matches!(self, MethodResponse::Success { .. })
	}

	/// The success payload, if any.
	pub fn result(&self) -> Option<&Value> {
		match self {
			MethodResponse::Success { result } => Some(result),
			_ => None,
		}
	}

	/// The error code, if any.
	pub fn error_code(&self) -> Option<&str> {
		match self {
			MethodResponse::Error { code, .. } => Some(code),
			MethodResponse::NotImplemented => Some(NOT_IMPLEMENTED),
			MethodResponse::Success { .. } => None,
		}
	}
}

impl From<BridgeError> for MethodResponse {
	fn from(err: BridgeError) -> Self {
		match err {
			BridgeError::NotImplemented(_) => MethodResponse::NotImplemented,
			other => MethodResponse::Error {
				code: other.code().to_string(),
				message: other.to_string(),
			},
		}
	}
}
