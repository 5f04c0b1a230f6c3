// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Evaluation results returned by the native client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an evaluation ended in an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
	ClientNotReady,
	FlagNotFound,
	MalformedFlag,
	UserNotSpecified,
	WrongType,
	Exception,
}

impl ErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::ClientNotReady => "CLIENT_NOT_READY",
			ErrorKind::FlagNotFound => "FLAG_NOT_FOUND",
			ErrorKind::MalformedFlag => "MALFORMED_FLAG",
			ErrorKind::UserNotSpecified => "USER_NOT_SPECIFIED",
			ErrorKind::WrongType => "WRONG_TYPE",
			ErrorKind::Exception => "EXCEPTION",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Explanation of why a variation was served.
///
/// Serializes as an object tagged by `kind` carrying only the fields of that
/// kind, e.g. `{"kind":"RULE_MATCH","ruleIndex":0,"ruleId":"r1","inExperiment":false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationReason {
	Off,
	#[serde(rename_all = "camelCase")]
	Fallthrough {
		in_experiment: bool,
	},
	TargetMatch,
	#[serde(rename_all = "camelCase")]
	RuleMatch {
		rule_index: u32,
		rule_id: Option<String>,
		in_experiment: bool,
	},
	#[serde(rename_all = "camelCase")]
	PrerequisiteFailed {
		prerequisite_key: String,
	},
	#[serde(rename_all = "camelCase")]
	Error {
		error_kind: ErrorKind,
	},
}

impl EvaluationReason {
	pub fn kind(&self) -> &'static str {
		match self {
			EvaluationReason::Off => "OFF",
			EvaluationReason::Fallthrough { .. } => "FALLTHROUGH",
			EvaluationReason::TargetMatch => "TARGET_MATCH",
			EvaluationReason::RuleMatch { .. } => "RULE_MATCH",
			EvaluationReason::PrerequisiteFailed { .. } => "PREREQUISITE_FAILED",
			EvaluationReason::Error { .. } => "ERROR",
		}
	}

	pub fn error(error_kind: ErrorKind) -> Self {
		EvaluationReason::Error { error_kind }
	}

	pub fn rule_match(rule_index: u32, rule_id: impl Into<String>, in_experiment: bool) -> Self {
		EvaluationReason::RuleMatch {
			rule_index,
			rule_id: Some(rule_id.into()),
			in_experiment,
		}
	}
}

/// A variation plus the index and reason that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationDetail<T> {
	pub value: T,
	pub variation_index: Option<u32>,
	/// Only populated when the client was configured with evaluation reasons.
	pub reason: Option<EvaluationReason>,
}

impl<T> EvaluationDetail<T> {
	pub fn new(value: T, variation_index: Option<u32>, reason: Option<EvaluationReason>) -> Self {
		Self {
			value,
			variation_index,
			reason,
		}
	}

	/// Converts the value, keeping index and reason.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> EvaluationDetail<U> {
		EvaluationDetail {
			value: f(self.value),
			variation_index: self.variation_index,
			reason: self.reason,
		}
	}
}
