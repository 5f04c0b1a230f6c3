// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The contract the bridge expects from a native flags client.
//!
//! The bridge never evaluates flags itself. Everything below is implemented
//! by the wrapped SDK: storage, streaming or polling, caching and event
//! upload all live behind [`FlagClient`].

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use loom_flags_bridge_core::{
	ClientOptions, ConnectionInformation, EvaluationDetail, MultiContext, StructuredValue,
};

use crate::error::ClientError;

/// A pending initialization or identity switch.
///
/// Resolves once the client has settled, successfully or not.
pub type Completion = BoxFuture<'static, std::result::Result<(), ClientError>>;

/// Notified when a single observed flag changes.
pub trait FlagChangeListener: Send + Sync {
	fn on_flag_changed(&self, flag_key: &str);
}

/// Notified with every flag value whenever the client receives new flag data.
pub trait AllFlagsListener: Send + Sync {
	fn on_flags_received(&self, flags: &BTreeMap<String, StructuredValue>);
}

pub type SharedFlagChangeListener = Arc<dyn FlagChangeListener>;
pub type SharedAllFlagsListener = Arc<dyn AllFlagsListener>;

/// An initialized native client.
///
/// Implementations must be safe to call from several threads at once.
pub trait FlagClient: Send + Sync {
	/// Switches the evaluation context.
	fn identify(&self, context: MultiContext) -> Completion;

	fn bool_variation(&self, flag_key: &str, default: bool) -> bool;
	fn bool_variation_detail(&self, flag_key: &str, default: bool) -> EvaluationDetail<bool>;

	fn int_variation(&self, flag_key: &str, default: i32) -> i32;
	fn int_variation_detail(&self, flag_key: &str, default: i32) -> EvaluationDetail<i32>;

	fn double_variation(&self, flag_key: &str, default: f64) -> f64;
	fn double_variation_detail(&self, flag_key: &str, default: f64) -> EvaluationDetail<f64>;

	fn string_variation(&self, flag_key: &str, default: Option<&str>) -> Option<String>;
	fn string_variation_detail(
		&self,
		flag_key: &str,
		default: Option<&str>,
	) -> EvaluationDetail<Option<String>>;

	fn json_variation(&self, flag_key: &str, default: StructuredValue) -> StructuredValue;
	fn json_variation_detail(
		&self,
		flag_key: &str,
		default: StructuredValue,
	) -> EvaluationDetail<StructuredValue>;

	/// Current value of every flag for the active context.
	fn all_flags(&self) -> BTreeMap<String, StructuredValue>;

	fn track_data(&self, event_name: &str, data: StructuredValue);
	fn track_metric(&self, event_name: &str, data: StructuredValue, metric_value: f64);

	fn flush(&self);

	fn set_online(&self);
	fn set_offline(&self);
	fn is_offline(&self) -> bool;

	fn connection_information(&self) -> Option<ConnectionInformation>;

	fn register_feature_flag_listener(&self, flag_key: &str, listener: SharedFlagChangeListener);
	fn unregister_feature_flag_listener(&self, flag_key: &str, listener: &SharedFlagChangeListener);
	fn register_all_flags_listener(&self, listener: SharedAllFlagsListener);

	/// Releases the client. No further calls are made on it.
	fn close(&self);
}

/// Result of a successful [`ClientConnector::init`].
pub struct Initialized {
	pub client: Arc<dyn FlagClient>,
	/// Settles when the client has its first flag data (or gave up).
	pub completion: Completion,
}

/// Creates native clients.
pub trait ClientConnector: Send + Sync {
	/// Builds and starts a client.
	///
	/// Returns [`ClientError::Rejected`] when the options are unusable, for
	/// example when no mobile key was supplied.
	fn init(
		&self,
		options: ClientOptions,
		context: MultiContext,
	) -> std::result::Result<Initialized, ClientError>;
}
