// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process-wide handle to the native client.

use std::sync::Arc;

use loom_flags_bridge_core::{ClientOptions, MultiContext};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::client::{ClientConnector, Completion, FlagClient, Initialized};
use crate::error::{BridgeError, Result};

/// Where the slot is in its `Uninitialized → Initialized → Closed` lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
	Uninitialized,
	Initialized,
	Closed,
}

enum SlotState {
	Uninitialized,
	Initialized(Arc<dyn FlagClient>),
	Closed,
}

/// What a `start` call turned into.
pub enum Started {
	/// A new client was created.
	Initialized {
		client: Arc<dyn FlagClient>,
		completion: Completion,
	},
	/// A client already existed, so the context was switched instead.
	Identified { completion: Completion },
}

impl Started {
	pub fn into_completion(self) -> Completion {
		match self {
			Started::Initialized { completion, .. } | Started::Identified { completion } => completion,
		}
	}
}

/// Owns the single native client instance.
pub struct ClientSlot {
	state: RwLock<SlotState>,
}

impl Default for ClientSlot {
	fn default() -> Self {
		Self::new()
	}
}

impl ClientSlot {
	pub fn new() -> Self {
		Self {
			state: RwLock::new(SlotState::Uninitialized),
		}
	}

	pub async fn lifecycle(&self) -> Lifecycle {
		match &*self.state.read().await {
			SlotState::Uninitialized => Lifecycle::Uninitialized,
			SlotState::Initialized(_) => Lifecycle::Initialized,
			SlotState::Closed => Lifecycle::Closed,
		}
	}

	/// The live client, or why there isn't one.
	pub async fn client(&self) -> Result<Arc<dyn FlagClient>> {
		match &*self.state.read().await {
			SlotState::Initialized(client) => Ok(Arc::clone(client)),
			SlotState::Uninitialized => Err(BridgeError::UninitializedClient),
			SlotState::Closed => Err(BridgeError::ClientClosed),
		}
	}

	/// Initializes a client, or switches context when one already exists.
	///
	/// The write lock is held across `init` so two concurrent starts cannot
	/// both create a client.
	pub async fn start(
		&self,
		connector: &dyn ClientConnector,
		options: ClientOptions,
		context: MultiContext,
	) -> Result<Started> {
		let mut state = self.state.write().await;

		if let SlotState::Initialized(client) = &*state {
			debug!(contexts = context.len(), "client exists, treating start as identify");
			return Ok(Started::Identified {
				completion: client.identify(context),
			});
		}

		let Initialized { client, completion } = connector.init(options, context).map_err(|e| {
			error!(error = %e, "native client rejected configuration");
			BridgeError::Configuration(e.to_string())
		})?;

		info!("native client initialized");
		*state = SlotState::Initialized(Arc::clone(&client));
		Ok(Started::Initialized { client, completion })
	}

	/// Closes the client and moves the slot to `Closed`.
	pub async fn close(&self) -> Result<()> {
		let mut state = self.state.write().await;
		match std::mem::replace(&mut *state, SlotState::Closed) {
			SlotState::Initialized(client) => {
				client.close();
				info!("native client closed");
				Ok(())
			}
			SlotState::Uninitialized => {
				*state = SlotState::Uninitialized;
				Err(BridgeError::UninitializedClient)
			}
			SlotState::Closed => Err(BridgeError::ClientClosed),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::client::{SharedAllFlagsListener, SharedFlagChangeListener};
	use crate::error::ClientError;
	use futures::future::FutureExt;
	use loom_flags_bridge_core::{
		ConnectionInformation, Context, EvaluationDetail, StructuredValue,
	};
	use std::collections::BTreeMap;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Default)]
	struct CountingClient {
		identifies: AtomicUsize,
		closes: AtomicUsize,
	}

	impl FlagClient for CountingClient {
		fn identify(&self, _context: MultiContext) -> Completion {
			self.identifies.fetch_add(1, Ordering::SeqCst);
			futures::future::ready(Ok(())).boxed()
		}
		fn bool_variation(&self, _: &str, default: bool) -> bool {
			default
		}
		fn bool_variation_detail(&self, _: &str, default: bool) -> EvaluationDetail<bool> {
			EvaluationDetail::new(default, None, None)
		}
		fn int_variation(&self, _: &str, default: i32) -> i32 {
			default
		}
		fn int_variation_detail(&self, _: &str, default: i32) -> EvaluationDetail<i32> {
			EvaluationDetail::new(default, None, None)
		}
		fn double_variation(&self, _: &str, default: f64) -> f64 {
			default
		}
		fn double_variation_detail(&self, _: &str, default: f64) -> EvaluationDetail<f64> {
			EvaluationDetail::new(default, None, None)
		}
		fn string_variation(&self, _: &str, default: Option<&str>) -> Option<String> {
			default.map(str::to_string)
		}
		fn string_variation_detail(
			&self,
			_: &str,
			default: Option<&str>,
		) -> EvaluationDetail<Option<String>> {
			EvaluationDetail::new(default.map(str::to_string), None, None)
		}
		fn json_variation(&self, _: &str, default: StructuredValue) -> StructuredValue {
			default
		}
		fn json_variation_detail(
			&self,
			_: &str,
			default: StructuredValue,
		) -> EvaluationDetail<StructuredValue> {
			EvaluationDetail::new(default, None, None)
		}
		fn all_flags(&self) -> BTreeMap<String, StructuredValue> {
			BTreeMap::new()
		}
		fn track_data(&self, _: &str, _: StructuredValue) {}
		fn track_metric(&self, _: &str, _: StructuredValue, _: f64) {}
		fn flush(&self) {}
		fn set_online(&self) {}
		fn set_offline(&self) {}
		fn is_offline(&self) -> bool {
			false
		}
		fn connection_information(&self) -> Option<ConnectionInformation> {
			None
		}
		fn register_feature_flag_listener(&self, _: &str, _: SharedFlagChangeListener) {}
		fn unregister_feature_flag_listener(&self, _: &str, _: &SharedFlagChangeListener) {}
		fn register_all_flags_listener(&self, _: SharedAllFlagsListener) {}
		fn close(&self) {
			self.closes.fetch_add(1, Ordering::SeqCst);
		}
	}

	struct Connector {
		client: Arc<CountingClient>,
		inits: AtomicUsize,
		reject: bool,
	}

	impl Connector {
		fn new(reject: bool) -> Self {
			Self {
				client: Arc::new(CountingClient::default()),
				inits: AtomicUsize::new(0),
				reject,
			}
		}
	}

	impl ClientConnector for Connector {
		fn init(
			&self,
			_options: ClientOptions,
			_context: MultiContext,
		) -> std::result::Result<Initialized, ClientError> {
			self.inits.fetch_add(1, Ordering::SeqCst);
			if self.reject {
				return Err(ClientError::Rejected("mobile key required".to_string()));
			}
			Ok(Initialized {
				client: self.client.clone(),
				completion: futures::future::ready(Ok(())).boxed(),
			})
		}
	}

	fn context() -> MultiContext {
		MultiContext::builder().add(Context::builder("u1").build()).build()
	}

	#[test]
	fn test_client_before_start_is_not_ready() {
		tokio_test::block_on(async {
			let slot = ClientSlot::new();
			assert_eq!(slot.lifecycle().await, Lifecycle::Uninitialized);
			assert_eq!(slot.client().await.err(), Some(BridgeError::UninitializedClient));
			assert_eq!(slot.close().await, Err(BridgeError::UninitializedClient));
			assert_eq!(slot.lifecycle().await, Lifecycle::Uninitialized);
		});
	}

	#[test]
	fn test_second_start_identifies() {
		tokio_test::block_on(async {
			let slot = ClientSlot::new();
			let connector = Connector::new(false);

			let first = slot
				.start(&connector, ClientOptions::default(), context())
				.await
				.unwrap();
			assert!(matches!(first, Started::Initialized { .. }));

			let second = slot
				.start(&connector, ClientOptions::default(), context())
				.await
				.unwrap();
			assert!(matches!(second, Started::Identified { .. }));
			second.into_completion().await.unwrap();

			assert_eq!(connector.inits.load(Ordering::SeqCst), 1);
			assert_eq!(connector.client.identifies.load(Ordering::SeqCst), 1);
			assert_eq!(slot.lifecycle().await, Lifecycle::Initialized);
		});
	}

	#[test]
	fn test_rejected_config_leaves_slot_uninitialized() {
		tokio_test::block_on(async {
			let slot = ClientSlot::new();
			let connector = Connector::new(true);

			let err = slot
				.start(&connector, ClientOptions::default(), context())
				.await
				.err()
				.unwrap();
			assert!(matches!(err, BridgeError::Configuration(_)));
			assert_eq!(slot.lifecycle().await, Lifecycle::Uninitialized);
		});
	}

	#[test]
	fn test_close_then_restart() {
		tokio_test::block_on(async {
			let slot = ClientSlot::new();
			let connector = Connector::new(false);
			slot.start(&connector, ClientOptions::default(), context()).await.unwrap();

			slot.close().await.unwrap();
			assert_eq!(connector.client.closes.load(Ordering::SeqCst), 1);
			assert_eq!(slot.client().await.err(), Some(BridgeError::ClientClosed));
			assert_eq!(slot.close().await, Err(BridgeError::ClientClosed));

			let restarted = slot
				.start(&connector, ClientOptions::default(), context())
				.await
				.unwrap();
			assert!(matches!(restarted, Started::Initialized { .. }));
			assert_eq!(connector.inits.load(Ordering::SeqCst), 2);
		});
	}
}
