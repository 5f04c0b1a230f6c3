// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the flags bridge.

use thiserror::Error;

use crate::protocol::{
	CLIENT_CLOSED, CLIENT_NOT_READY, CONFIGURATION_ERROR, MALFORMED_ARGUMENT, NOT_IMPLEMENTED,
};

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors surfaced to the host as channel-level failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
	/// A per-call argument was missing or of the wrong type.
	#[error("malformed argument `{name}`: {reason}")]
	MalformedArgument { name: String, reason: String },

	/// The native client rejected the assembled options.
	#[error("client rejected configuration: {0}")]
	Configuration(String),

	/// A call arrived before `start` created a client.
	#[error("client not ready: call start first")]
	UninitializedClient,

	/// A call arrived after `close`.
	#[error("client has been closed")]
	ClientClosed,

	#[error("method not implemented: {0}")]
	NotImplemented(String),
}

impl BridgeError {
	pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
		BridgeError::MalformedArgument {
			name: name.into(),
			reason: reason.into(),
		}
	}

	/// Stable code reported to the host.
	pub fn code(&self) -> &'static str {
		match self {
			BridgeError::MalformedArgument { .. } => MALFORMED_ARGUMENT,
			BridgeError::Configuration(_) => CONFIGURATION_ERROR,
			BridgeError::UninitializedClient => CLIENT_NOT_READY,
			BridgeError::ClientClosed => CLIENT_CLOSED,
			BridgeError::NotImplemented(_) => NOT_IMPLEMENTED,
		}
	}
}

/// Failures reported by the native client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
	/// The client refused to start with the given options.
	#[error("configuration rejected: {0}")]
	Rejected(String),

	/// An asynchronous operation settled unsuccessfully.
	#[error("operation failed: {0}")]
	Failed(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_codes_are_distinct() {
		let errors = [
			BridgeError::malformed("flagKey", "missing"),
			BridgeError::Configuration("no mobile key".to_string()),
			BridgeError::UninitializedClient,
			BridgeError::ClientClosed,
			BridgeError::NotImplemented("frobnicate".to_string()),
		];

		let mut codes: Vec<_> = errors.iter().map(BridgeError::code).collect();
		codes.sort_unstable();
		codes.dedup();
		assert_eq!(codes.len(), errors.len());
	}

	#[test]
	fn test_malformed_message_names_argument() {
		let err = BridgeError::malformed("eventName", "expected a string");
		assert_eq!(
			err.to_string(),
			"malformed argument `eventName`: expected a string"
		);
	}
}
