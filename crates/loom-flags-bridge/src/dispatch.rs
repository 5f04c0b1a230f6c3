// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Routes host method calls onto the native client.

use std::sync::Arc;
use std::time::Instant;

use loom_flags_bridge_core::StructuredValue;
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::client::{ClientConnector, SharedAllFlagsListener, SharedFlagChangeListener};
use crate::config::{options_from_wire, BridgeConfig};
use crate::context::multi_context_from_wire;
use crate::error::{BridgeError, Result};
use crate::host::{
	CompletionSignal, FlagUpdateForwarder, FlagsReceivedForwarder, HostCaller, HostChannel,
};
use crate::looper::MainExecutor;
use crate::protocol::*;
use crate::slot::{ClientSlot, Lifecycle, Started};
use crate::translate::{
	all_flags_to_wire, connection_information_to_wire, evaluation_detail_to_wire,
};

const FLAG_KEY: &str = "flagKey";
const DEFAULT_VALUE: &str = "defaultValue";

/// The bridge between one host channel and the native client.
///
/// Calls are expected one at a time from the host's dispatch context, but
/// the bridge is safe to share.
pub struct FlagsBridge {
	config: BridgeConfig,
	connector: Arc<dyn ClientConnector>,
	slot: ClientSlot,
	host: HostCaller,
	runtime: Handle,
	flag_listener: SharedFlagChangeListener,
	all_flags_listener: SharedAllFlagsListener,
}

impl FlagsBridge {
	/// Attaches the bridge to a host channel.
	///
	/// `runtime` runs the background waits behind `start`. The forwarding
	/// listeners are created once here and live as long as the bridge.
	pub fn attach(
		config: BridgeConfig,
		connector: Arc<dyn ClientConnector>,
		channel: Arc<dyn HostChannel>,
		executor: Arc<dyn MainExecutor>,
		runtime: Handle,
	) -> Self {
		let host = HostCaller::new(channel, executor);
		info!(channel = %config.channel_name, "flags bridge attached");
		Self {
			flag_listener: Arc::new(FlagUpdateForwarder::new(host.clone())),
			all_flags_listener: Arc::new(FlagsReceivedForwarder::new(host.clone())),
			config,
			connector,
			slot: ClientSlot::new(),
			host,
			runtime,
		}
	}

	pub fn channel_name(&self) -> &str {
		&self.config.channel_name
	}

	pub async fn lifecycle(&self) -> Lifecycle {
		self.slot.lifecycle().await
	}

	/// Handles one call from the host.
	pub async fn handle(&self, call: &MethodCall) -> MethodResponse {
		let start = Instant::now();
		let method = call.method.as_str();

		debug!(method, "[dispatch] →");

		let response = match self.route(call).await {
			Ok(result) => MethodResponse::success(result),
			Err(e) => {
				if !matches!(e, BridgeError::NotImplemented(_)) {
					info!(method, code = e.code(), error = %e, "call failed");
				}
				MethodResponse::from(e)
			}
		};

		let elapsed = start.elapsed();
		if response.is_success() {
			debug!(method, ?elapsed, "[dispatch] ← ok");
		} else {
			info!(method, ?elapsed, "[dispatch] ← error");
		}

		response
	}

	async fn route(&self, call: &MethodCall) -> Result<Value> {
		match call.method.as_str() {
			METHOD_START => self.start(call).await,
			METHOD_IDENTIFY => self.identify(call).await,
			METHOD_TRACK => self.track(call).await,

			METHOD_BOOL_VARIATION => {
				let client = self.slot.client().await?;
				let default = call.required_bool(DEFAULT_VALUE)?;
				Ok(Value::Bool(client.bool_variation(call.required_str(FLAG_KEY)?, default)))
			}
			METHOD_BOOL_VARIATION_DETAIL => {
				let client = self.slot.client().await?;
				let default = call.required_bool(DEFAULT_VALUE)?;
				let detail = client.bool_variation_detail(call.required_str(FLAG_KEY)?, default);
				Ok(evaluation_detail_to_wire(detail, Value::from))
			}
			METHOD_INT_VARIATION => {
				let client = self.slot.client().await?;
				let default = call.required_i32(DEFAULT_VALUE)?;
				Ok(Value::from(client.int_variation(call.required_str(FLAG_KEY)?, default)))
			}
			METHOD_INT_VARIATION_DETAIL => {
				let client = self.slot.client().await?;
				let default = call.required_i32(DEFAULT_VALUE)?;
				let detail = client.int_variation_detail(call.required_str(FLAG_KEY)?, default);
				Ok(evaluation_detail_to_wire(detail, Value::from))
			}
			METHOD_DOUBLE_VARIATION => {
				let client = self.slot.client().await?;
				let default = call.required_f64(DEFAULT_VALUE)?;
				Ok(Value::from(client.double_variation(call.required_str(FLAG_KEY)?, default)))
			}
			METHOD_DOUBLE_VARIATION_DETAIL => {
				let client = self.slot.client().await?;
				let default = call.required_f64(DEFAULT_VALUE)?;
				let detail = client.double_variation_detail(call.required_str(FLAG_KEY)?, default);
				Ok(evaluation_detail_to_wire(detail, Value::from))
			}
			METHOD_STRING_VARIATION => {
				let client = self.slot.client().await?;
				let default = call.optional_str(DEFAULT_VALUE)?;
				Ok(Value::from(client.string_variation(call.required_str(FLAG_KEY)?, default)))
			}
			METHOD_STRING_VARIATION_DETAIL => {
				let client = self.slot.client().await?;
				let default = call.optional_str(DEFAULT_VALUE)?;
				let detail = client.string_variation_detail(call.required_str(FLAG_KEY)?, default);
				Ok(evaluation_detail_to_wire(detail, Value::from))
			}
			METHOD_JSON_VARIATION => {
				let client = self.slot.client().await?;
				let default = StructuredValue::from_optional_wire(call.argument(DEFAULT_VALUE));
				Ok(client.json_variation(call.required_str(FLAG_KEY)?, default).to_wire())
			}
			METHOD_JSON_VARIATION_DETAIL => {
				let client = self.slot.client().await?;
				let default = StructuredValue::from_optional_wire(call.argument(DEFAULT_VALUE));
				let detail = client.json_variation_detail(call.required_str(FLAG_KEY)?, default);
				Ok(evaluation_detail_to_wire(detail, |v| v.to_wire()))
			}

			METHOD_ALL_FLAGS => {
				let client = self.slot.client().await?;
				Ok(all_flags_to_wire(&client.all_flags()))
			}
			METHOD_FLUSH => {
				self.slot.client().await?.flush();
				Ok(Value::Null)
			}
			METHOD_SET_ONLINE => self.set_online(call).await,
			METHOD_IS_OFFLINE => Ok(Value::Bool(self.slot.client().await?.is_offline())),
			METHOD_GET_CONNECTION_INFORMATION => {
				let info = self.slot.client().await?.connection_information();
				Ok(connection_information_to_wire(info.as_ref()))
			}
			METHOD_START_FLAG_LISTENING => {
				let client = self.slot.client().await?;
				let flag_key = call.bare_str(FLAG_KEY)?;
				debug!(flag_key, "observing flag");
				client.register_feature_flag_listener(flag_key, Arc::clone(&self.flag_listener));
				Ok(Value::Null)
			}
			METHOD_STOP_FLAG_LISTENING => {
				let client = self.slot.client().await?;
				let flag_key = call.bare_str(FLAG_KEY)?;
				debug!(flag_key, "no longer observing flag");
				client.unregister_feature_flag_listener(flag_key, &self.flag_listener);
				Ok(Value::Null)
			}
			METHOD_CLOSE => {
				self.slot.close().await?;
				Ok(Value::Null)
			}

			other => {
				warn!(method = other, "[dispatch] unknown method");
				Err(BridgeError::NotImplemented(other.to_string()))
			}
		}
	}

	/// Returns as soon as the client is created or asked to switch context.
	/// `completeStart` follows once that settles, however it settles.
	async fn start(&self, call: &MethodCall) -> Result<Value> {
		// Dropping the signal on any early return below still emits it.
		let signal = CompletionSignal::new(self.host.clone(), EVENT_COMPLETE_START);

		let options = options_from_wire(call.required_object("config")?);
		let context = multi_context_from_wire(call.required_list("context")?)?;

		let started = self.slot.start(self.connector.as_ref(), options, context).await?;
		if let Started::Initialized { client, .. } = &started {
			client.register_all_flags_listener(Arc::clone(&self.all_flags_listener));
		}

		let completion = started.into_completion();
		self.runtime.spawn(async move {
			if let Err(e) = completion.await {
				warn!(error = %e, "client start settled with a failure");
			}
			signal.fire();
		});

		Ok(Value::Null)
	}

	async fn identify(&self, call: &MethodCall) -> Result<Value> {
		let client = self.slot.client().await?;
		let context = multi_context_from_wire(call.required_list("context")?)?;

		if let Err(e) = client.identify(context).await {
			warn!(error = %e, "identify settled with a failure");
		}
		Ok(Value::Null)
	}

	async fn track(&self, call: &MethodCall) -> Result<Value> {
		let client = self.slot.client().await?;
		let event_name = call.required_str("eventName")?;
		let data = StructuredValue::from_optional_wire(call.argument("data"));

		match call.optional_f64("metricValue")? {
			Some(metric_value) => client.track_metric(event_name, data, metric_value),
			None => client.track_data(event_name, data),
		}
		Ok(Value::Null)
	}

	async fn set_online(&self, call: &MethodCall) -> Result<Value> {
		let client = self.slot.client().await?;
		match call.argument("online") {
			Some(Value::Bool(true)) => client.set_online(),
			Some(Value::Bool(false)) => client.set_offline(),
			_ => debug!("setOnline without a boolean, leaving connection as is"),
		}
		Ok(Value::Null)
	}
}
