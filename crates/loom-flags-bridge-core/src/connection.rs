// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Connection status reported by the native client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the client is currently receiving updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionMode {
	Streaming,
	Polling,
	BackgroundPolling,
	BackgroundDisabled,
	Offline,
	SetOffline,
	Shutdown,
}

impl ConnectionMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			ConnectionMode::Streaming => "STREAMING",
			ConnectionMode::Polling => "POLLING",
			ConnectionMode::BackgroundPolling => "BACKGROUND_POLLING",
			ConnectionMode::BackgroundDisabled => "BACKGROUND_DISABLED",
			ConnectionMode::Offline => "OFFLINE",
			ConnectionMode::SetOffline => "SET_OFFLINE",
			ConnectionMode::Shutdown => "SHUTDOWN",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureType {
	InvalidResponseBody,
	NetworkFailure,
	UnexpectedStreamElementType,
	UnexpectedResponseCode,
	UnknownError,
}

impl FailureType {
	pub fn as_str(&self) -> &'static str {
		match self {
			FailureType::InvalidResponseBody => "INVALID_RESPONSE_BODY",
			FailureType::NetworkFailure => "NETWORK_FAILURE",
			FailureType::UnexpectedStreamElementType => "UNEXPECTED_STREAM_ELEMENT_TYPE",
			FailureType::UnexpectedResponseCode => "UNEXPECTED_RESPONSE_CODE",
			FailureType::UnknownError => "UNKNOWN_ERROR",
		}
	}
}

/// The most recent connection failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionFailure {
	pub message: Option<String>,
	pub failure_type: FailureType,
}

impl ConnectionFailure {
	pub fn new(failure_type: FailureType, message: impl Into<String>) -> Self {
		Self {
			message: Some(message.into()),
			failure_type,
		}
	}
}

/// Snapshot of the client's connection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInformation {
	pub connection_mode: ConnectionMode,
	pub last_failure: Option<ConnectionFailure>,
	pub last_successful_connection: Option<DateTime<Utc>>,
	pub last_failed_connection: Option<DateTime<Utc>>,
}

impl ConnectionInformation {
	pub fn new(connection_mode: ConnectionMode) -> Self {
		Self {
			connection_mode,
			last_failure: None,
			last_successful_connection: None,
			last_failed_connection: None,
		}
	}
}
