// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client configuration from the host's options map.
//!
//! Options are forgiving: every recognised key that is present and of the
//! expected type is applied, anything else is skipped without an error.
//! This is the opposite of per-call arguments, which are strict.
//!
//! | Key | Type |
//! |-----|------|
//! | `mobileKey` | string |
//! | `autoEnvAttributes` | bool |
//! | `maxCachedContexts` | integer |
//! | `offline`, `disableBackgroundUpdating`, `evaluationReasons`, `diagnosticOptOut` | bool |
//! | `applicationId`, `applicationName`, `applicationVersion`, `applicationVersionName` | string |
//! | `pollUri`, `eventsUri`, `streamUri` | string |
//! | `stream` | bool |
//! | `pollingIntervalMillis`, `backgroundPollingIntervalMillis` | integer |
//! | `eventsCapacity`, `eventsFlushIntervalMillis`, `diagnosticRecordingIntervalMillis` | integer |
//! | `allAttributesPrivate` | bool |
//! | `privateAttributes` | list of string |
//! | `connectionTimeoutMillis` | integer |
//! | `useReport` | bool |
//! | `wrapperName` | string |

use loom_flags_bridge_core::{ClientOptions, ClientOptionsBuilder};
use serde_json::{Map, Value};
use tracing::debug;

use crate::protocol::CHANNEL_NAME;

type Builder = ClientOptionsBuilder;

/// Setter for one option, keyed by the value type it accepts.
enum Setter {
	Bool(fn(Builder, bool) -> Builder),
	/// Integers in `0..=u32::MAX`. Counts and intervals are unsigned, so a
	/// negative value is skipped instead of being handed to the client.
	UInt(fn(Builder, u32) -> Builder),
	Str(fn(Builder, String) -> Builder),
	/// Non-string entries are dropped.
	StrList(fn(Builder, Vec<String>) -> Builder),
}

impl Setter {
	fn expected(&self) -> &'static str {
		match self {
			Setter::Bool(_) => "bool",
			Setter::UInt(_) => "unsigned 32-bit integer",
			Setter::Str(_) => "string",
			Setter::StrList(_) => "list",
		}
	}

	/// Applies `value` when it has the expected type; otherwise hands the
	/// builder back untouched.
	fn apply(&self, builder: Builder, value: &Value) -> Result<Builder, Builder> {
		match (self, value) {
			(Setter::Bool(set), Value::Bool(b)) => Ok(set(builder, *b)),
			(Setter::UInt(set), Value::Number(n)) => match n.as_u64().and_then(|n| u32::try_from(n).ok()) {
				Some(n) => Ok(set(builder, n)),
				None => Err(builder),
			},
			(Setter::Str(set), Value::String(s)) => Ok(set(builder, s.clone())),
			(Setter::StrList(set), Value::Array(items)) => {
				let names = items
					.iter()
					.filter_map(Value::as_str)
					.map(str::to_string)
					.collect();
				Ok(set(builder, names))
			}
			_ => Err(builder),
		}
	}
}

struct OptionRule {
	key: &'static str,
	setter: Setter,
}

// Every `UInt` rule skips negative values.
static OPTION_RULES: &[OptionRule] = &[
	OptionRule { key: "mobileKey", setter: Setter::Str(|b, v| b.mobile_key(v)) },
	OptionRule { key: "autoEnvAttributes", setter: Setter::Bool(|b, v| b.auto_env_attributes(v)) },
	OptionRule { key: "maxCachedContexts", setter: Setter::UInt(|b, v| b.max_cached_contexts(v)) },
	OptionRule { key: "offline", setter: Setter::Bool(|b, v| b.offline(v)) },
	OptionRule {
		key: "disableBackgroundUpdating",
		setter: Setter::Bool(|b, v| b.disable_background_updating(v)),
	},
	OptionRule { key: "evaluationReasons", setter: Setter::Bool(|b, v| b.evaluation_reasons(v)) },
	OptionRule { key: "diagnosticOptOut", setter: Setter::Bool(|b, v| b.diagnostic_opt_out(v)) },
	OptionRule { key: "applicationId", setter: Setter::Str(|b, v| b.application_id(v)) },
	OptionRule { key: "applicationName", setter: Setter::Str(|b, v| b.application_name(v)) },
	OptionRule { key: "applicationVersion", setter: Setter::Str(|b, v| b.application_version(v)) },
	OptionRule {
		key: "applicationVersionName",
		setter: Setter::Str(|b, v| b.application_version_name(v)),
	},
	OptionRule { key: "pollUri", setter: Setter::Str(|b, v| b.polling_uri(v)) },
	OptionRule { key: "eventsUri", setter: Setter::Str(|b, v| b.events_uri(v)) },
	OptionRule { key: "streamUri", setter: Setter::Str(|b, v| b.streaming_uri(v)) },
	OptionRule { key: "stream", setter: Setter::Bool(|b, v| b.stream(v)) },
	OptionRule {
		key: "pollingIntervalMillis",
		setter: Setter::UInt(|b, v| b.poll_interval_millis(v)),
	},
	OptionRule {
		key: "backgroundPollingIntervalMillis",
		setter: Setter::UInt(|b, v| b.background_poll_interval_millis(v)),
	},
	OptionRule { key: "eventsCapacity", setter: Setter::UInt(|b, v| b.events_capacity(v)) },
	OptionRule {
		key: "eventsFlushIntervalMillis",
		setter: Setter::UInt(|b, v| b.events_flush_interval_millis(v)),
	},
	OptionRule {
		key: "diagnosticRecordingIntervalMillis",
		setter: Setter::UInt(|b, v| b.diagnostic_recording_interval_millis(v)),
	},
	OptionRule {
		key: "allAttributesPrivate",
		setter: Setter::Bool(|b, v| b.all_attributes_private(v)),
	},
	OptionRule { key: "privateAttributes", setter: Setter::StrList(|b, v| b.private_attributes(v)) },
	OptionRule {
		key: "connectionTimeoutMillis",
		setter: Setter::UInt(|b, v| b.connect_timeout_millis(v)),
	},
	OptionRule { key: "useReport", setter: Setter::Bool(|b, v| b.use_report(v)) },
	// The host only sends one string; it becomes both wrapper name and version.
	OptionRule { key: "wrapperName", setter: Setter::Str(|b, v| b.wrapper(v.clone(), v)) },
];

/// Builds [`ClientOptions`] from the host's options map. Never fails.
pub fn options_from_wire(map: &Map<String, Value>) -> ClientOptions {
	// Anonymous contexts arrive with a placeholder key the client must replace.
	let mut builder = ClientOptions::builder().generate_anonymous_keys(true);

	for rule in OPTION_RULES {
		let Some(value) = map.get(rule.key) else {
			continue;
		};
		builder = match rule.setter.apply(builder, value) {
			Ok(applied) => applied,
			Err(unchanged) => {
				debug!(
					key = rule.key,
					expected = rule.setter.expected(),
					"ignoring option with unexpected type"
				);
				unchanged
			}
		};
	}

	builder.build()
}

/// Settings for the bridge itself, as opposed to the wrapped client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
	/// Name under which the host registers the method channel.
	pub channel_name: String,
}

impl Default for BridgeConfig {
	fn default() -> Self {
		Self {
			channel_name: CHANNEL_NAME.to_string(),
		}
	}
}
