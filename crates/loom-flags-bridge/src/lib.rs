// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Message-channel bridge between a host runtime and a native feature flags
//! client.
//!
//! The host sends named calls with loosely typed arguments ([`MethodCall`]).
//! [`FlagsBridge`] turns them into typed calls on a [`FlagClient`] and
//! translates the results back. Flag change notifications and start
//! completions travel the other way as one-way calls on a [`HostChannel`],
//! always delivered on the host's main thread.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use loom_flags_bridge::{BridgeConfig, FlagsBridge, MainLooper, MethodCall};
//! use serde_json::json;
//!
//! let (looper, queue) = MainLooper::attach();
//! let bridge = FlagsBridge::attach(
//!     BridgeConfig::default(),
//!     connector,
//!     channel,
//!     looper,
//!     tokio::runtime::Handle::current(),
//! );
//!
//! let call = MethodCall::new("boolVariation", json!({ "flagKey": "dark-mode", "defaultValue": false }));
//! let response = bridge.handle(&call).await;
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod looper;
pub mod protocol;
pub mod slot;
pub mod translate;

pub use client::{
	AllFlagsListener, ClientConnector, Completion, FlagChangeListener, FlagClient, Initialized,
	SharedAllFlagsListener, SharedFlagChangeListener,
};
pub use config::{options_from_wire, BridgeConfig};
pub use context::{context_from_wire, multi_context_from_wire, PLACEHOLDER_KEY};
pub use dispatch::FlagsBridge;
pub use error::{BridgeError, ClientError, Result};
pub use host::{CompletionSignal, HostCaller, HostChannel};
pub use looper::{LooperQueue, MainExecutor, MainLooper, Task};
pub use protocol::{MethodCall, MethodResponse, CHANNEL_NAME};
pub use slot::{ClientSlot, Lifecycle, Started};

pub use loom_flags_bridge_core as core;
