// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom flags bridge.
//!
//! This crate holds the typed model that sits between an untyped host message
//! channel and a native feature-flag client. It is used by `loom-flags-bridge`,
//! which does the argument parsing and dispatch.
//!
//! # Overview
//!
//! - [`StructuredValue`] and the wire codec ([`decode`] / [`encode`])
//! - Evaluation contexts: [`Context`], [`MultiContext`]
//! - Client configuration: [`ClientOptions`]
//! - Evaluation results: [`EvaluationDetail`], [`EvaluationReason`]
//! - Connection status: [`ConnectionInformation`]
//!
//! # Example
//!
//! ```
//! use loom_flags_bridge_core::{Context, MultiContext, StructuredValue};
//! use serde_json::json;
//!
//! let plan = StructuredValue::from_wire(&json!("enterprise"));
//!
//! let context = MultiContext::builder()
//!     .add(Context::builder("user-123").set("plan", plan).build())
//!     .build();
//!
//! assert_eq!(context.len(), 1);
//! ```

pub mod connection;
pub mod context;
pub mod evaluation;
pub mod options;
pub mod value;

pub use connection::{ConnectionFailure, ConnectionInformation, ConnectionMode, FailureType};
pub use context::{Context, ContextBuilder, MultiContext, MultiContextBuilder, DEFAULT_KIND};
pub use evaluation::{ErrorKind, EvaluationDetail, EvaluationReason};
pub use options::{
	ApplicationInfo, ClientOptions, ClientOptionsBuilder, DataSource, EventsOptions, HttpOptions,
	ServiceEndpoints, WrapperInfo,
};
pub use value::{decode, encode, StructuredValue};
