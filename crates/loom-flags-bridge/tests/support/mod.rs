// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::thread::{self, ThreadId};

use futures::future::FutureExt;
use loom_flags_bridge::core::{
	ClientOptions, ConnectionInformation, ErrorKind, EvaluationDetail, EvaluationReason,
	MultiContext, StructuredValue,
};
use loom_flags_bridge::{
	ClientConnector, ClientError, Completion, FlagClient, HostChannel, Initialized,
	SharedAllFlagsListener, SharedFlagChangeListener,
};
use serde_json::Value;
use tokio::sync::oneshot;

pub fn init_tracing() {
	static INIT: Once = Once::new();
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_max_level(tracing::Level::DEBUG)
			.with_test_writer()
			.try_init();
	});
}

/// Holds a completion open until the paired sender fires or is dropped.
fn gated(gate: Option<oneshot::Receiver<()>>, outcome: Result<(), ClientError>) -> Completion {
	async move {
		if let Some(gate) = gate {
			let _ = gate.await;
		}
		outcome
	}
	.boxed()
}

/// What the bridge asked the client to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
	Identify(Vec<String>),
	TrackData(String, StructuredValue),
	TrackMetric(String, StructuredValue, f64),
	Flush,
	SetOnline,
	SetOffline,
	Listen(String),
	Unlisten(String),
	Close,
}

pub struct MockFlagClient {
	calls: Mutex<Vec<Call>>,
	flags: Mutex<BTreeMap<String, StructuredValue>>,
	reason: Mutex<Option<EvaluationReason>>,
	connection: Mutex<Option<ConnectionInformation>>,
	identify_outcome: Mutex<Result<(), ClientError>>,
	identify_gate: Mutex<Option<oneshot::Receiver<()>>>,
	offline: AtomicBool,
	flag_listeners: Mutex<Vec<(String, SharedFlagChangeListener)>>,
	all_flags_listeners: Mutex<Vec<SharedAllFlagsListener>>,
}

impl MockFlagClient {
	pub fn new() -> Self {
		Self {
			calls: Mutex::new(Vec::new()),
			flags: Mutex::new(BTreeMap::new()),
			reason: Mutex::new(None),
			connection: Mutex::new(None),
			identify_outcome: Mutex::new(Ok(())),
			identify_gate: Mutex::new(None),
			offline: AtomicBool::new(false),
			flag_listeners: Mutex::new(Vec::new()),
			all_flags_listeners: Mutex::new(Vec::new()),
		}
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().unwrap().clone()
	}

	pub fn set_flag(&self, key: &str, value: impl Into<StructuredValue>) {
		self.flags.lock().unwrap().insert(key.to_string(), value.into());
	}

	pub fn set_reason(&self, reason: EvaluationReason) {
		*self.reason.lock().unwrap() = Some(reason);
	}

	pub fn set_connection(&self, info: ConnectionInformation) {
		*self.connection.lock().unwrap() = Some(info);
	}

	pub fn fail_identify(&self, message: &str) {
		*self.identify_outcome.lock().unwrap() = Err(ClientError::Failed(message.to_string()));
	}

	/// Keeps the next identify pending until the returned sender fires.
	pub fn gate_identify(&self) -> oneshot::Sender<()> {
		let (tx, rx) = oneshot::channel();
		*self.identify_gate.lock().unwrap() = Some(rx);
		tx
	}

	pub fn listened_flags(&self) -> Vec<String> {
		self
			.flag_listeners
			.lock()
			.unwrap()
			.iter()
			.map(|(key, _)| key.clone())
			.collect()
	}

	pub fn all_flags_listener_count(&self) -> usize {
		self.all_flags_listeners.lock().unwrap().len()
	}

	/// Notifies every listener registered for `flag_key`.
	pub fn change_flag(&self, flag_key: &str) {
		let listeners: Vec<_> = self
			.flag_listeners
			.lock()
			.unwrap()
			.iter()
			.filter(|(key, _)| key == flag_key)
			.map(|(_, listener)| Arc::clone(listener))
			.collect();
		for listener in listeners {
			listener.on_flag_changed(flag_key);
		}
	}

	/// Hands every all-flags listener the current snapshot.
	pub fn publish_flags(&self) {
		let snapshot = self.flags.lock().unwrap().clone();
		let listeners = self.all_flags_listeners.lock().unwrap().clone();
		for listener in listeners {
			listener.on_flags_received(&snapshot);
		}
	}

	fn record(&self, call: Call) {
		self.calls.lock().unwrap().push(call);
	}

	fn flag(&self, key: &str) -> Option<StructuredValue> {
		self.flags.lock().unwrap().get(key).cloned()
	}

	fn detail<T>(&self, key: &str, value: Option<T>, default: T) -> EvaluationDetail<T> {
		match value {
			Some(value) => EvaluationDetail::new(value, Some(0), self.reason.lock().unwrap().clone()),
			None => EvaluationDetail::new(
				default,
				None,
				Some(EvaluationReason::error(if self.flag(key).is_some() {
					ErrorKind::WrongType
				} else {
					ErrorKind::FlagNotFound
				})),
			),
		}
	}
}

impl FlagClient for MockFlagClient {
	fn identify(&self, context: MultiContext) -> Completion {
		self.record(Call::Identify(
			context.iter().map(|c| c.key().to_string()).collect(),
		));
		let gate = self.identify_gate.lock().unwrap().take();
		gated(gate, self.identify_outcome.lock().unwrap().clone())
	}

	fn bool_variation(&self, flag_key: &str, default: bool) -> bool {
		self.bool_variation_detail(flag_key, default).value
	}

	fn bool_variation_detail(&self, flag_key: &str, default: bool) -> EvaluationDetail<bool> {
		let value = self.flag(flag_key).and_then(|v| v.as_bool());
		self.detail(flag_key, value, default)
	}

	fn int_variation(&self, flag_key: &str, default: i32) -> i32 {
		self.int_variation_detail(flag_key, default).value
	}

	fn int_variation_detail(&self, flag_key: &str, default: i32) -> EvaluationDetail<i32> {
		let value = self.flag(flag_key).and_then(|v| v.as_f64()).map(|n| n as i32);
		self.detail(flag_key, value, default)
	}

	fn double_variation(&self, flag_key: &str, default: f64) -> f64 {
		self.double_variation_detail(flag_key, default).value
	}

	fn double_variation_detail(&self, flag_key: &str, default: f64) -> EvaluationDetail<f64> {
		let value = self.flag(flag_key).and_then(|v| v.as_f64());
		self.detail(flag_key, value, default)
	}

	fn string_variation(&self, flag_key: &str, default: Option<&str>) -> Option<String> {
		self.string_variation_detail(flag_key, default).value
	}

	fn string_variation_detail(
		&self,
		flag_key: &str,
		default: Option<&str>,
	) -> EvaluationDetail<Option<String>> {
		let value = self
			.flag(flag_key)
			.and_then(|v| v.as_str().map(|s| Some(s.to_string())));
		self.detail(flag_key, value, default.map(str::to_string))
	}

	fn json_variation(&self, flag_key: &str, default: StructuredValue) -> StructuredValue {
		self.json_variation_detail(flag_key, default).value
	}

	fn json_variation_detail(
		&self,
		flag_key: &str,
		default: StructuredValue,
	) -> EvaluationDetail<StructuredValue> {
		let value = self.flag(flag_key);
		self.detail(flag_key, value, default)
	}

	fn all_flags(&self) -> BTreeMap<String, StructuredValue> {
		self.flags.lock().unwrap().clone()
	}

	fn track_data(&self, event_name: &str, data: StructuredValue) {
		self.record(Call::TrackData(event_name.to_string(), data));
	}

	fn track_metric(&self, event_name: &str, data: StructuredValue, metric_value: f64) {
		self.record(Call::TrackMetric(event_name.to_string(), data, metric_value));
	}

	fn flush(&self) {
		self.record(Call::Flush);
	}

	fn set_online(&self) {
		self.offline.store(false, Ordering::SeqCst);
		self.record(Call::SetOnline);
	}

	fn set_offline(&self) {
		self.offline.store(true, Ordering::SeqCst);
		self.record(Call::SetOffline);
	}

	fn is_offline(&self) -> bool {
		self.offline.load(Ordering::SeqCst)
	}

	fn connection_information(&self) -> Option<ConnectionInformation> {
		self.connection.lock().unwrap().clone()
	}

	fn register_feature_flag_listener(&self, flag_key: &str, listener: SharedFlagChangeListener) {
		self.record(Call::Listen(flag_key.to_string()));
		self
			.flag_listeners
			.lock()
			.unwrap()
			.push((flag_key.to_string(), listener));
	}

	fn unregister_feature_flag_listener(&self, flag_key: &str, listener: &SharedFlagChangeListener) {
		self.record(Call::Unlisten(flag_key.to_string()));
		self
			.flag_listeners
			.lock()
			.unwrap()
			.retain(|(key, l)| !(key == flag_key && Arc::ptr_eq(l, listener)));
	}

	fn register_all_flags_listener(&self, listener: SharedAllFlagsListener) {
		self.all_flags_listeners.lock().unwrap().push(listener);
	}

	fn close(&self) {
		self.record(Call::Close);
	}
}

/// Hands out the same [`MockFlagClient`] on every init.
///
/// Rejects options without a mobile key, like a real client would.
pub struct MockConnector {
	pub client: Arc<MockFlagClient>,
	inits: AtomicUsize,
	init_outcome: Mutex<Result<(), ClientError>>,
	init_gate: Mutex<Option<oneshot::Receiver<()>>>,
	last_options: Mutex<Option<ClientOptions>>,
	last_context: Mutex<Option<MultiContext>>,
}

impl MockConnector {
	pub fn new() -> Self {
		Self {
			client: Arc::new(MockFlagClient::new()),
			inits: AtomicUsize::new(0),
			init_outcome: Mutex::new(Ok(())),
			init_gate: Mutex::new(None),
			last_options: Mutex::new(None),
			last_context: Mutex::new(None),
		}
	}

	pub fn inits(&self) -> usize {
		self.inits.load(Ordering::SeqCst)
	}

	/// Makes the first-flags completion settle with a failure.
	pub fn fail_first_flags(&self, message: &str) {
		*self.init_outcome.lock().unwrap() = Err(ClientError::Failed(message.to_string()));
	}

	/// Keeps the next first-flags completion pending until the returned
	/// sender fires.
	pub fn gate_first_flags(&self) -> oneshot::Sender<()> {
		let (tx, rx) = oneshot::channel();
		*self.init_gate.lock().unwrap() = Some(rx);
		tx
	}

	pub fn last_options(&self) -> Option<ClientOptions> {
		self.last_options.lock().unwrap().clone()
	}

	pub fn last_context(&self) -> Option<MultiContext> {
		self.last_context.lock().unwrap().clone()
	}
}

impl ClientConnector for MockConnector {
	fn init(
		&self,
		options: ClientOptions,
		context: MultiContext,
	) -> Result<Initialized, ClientError> {
		if options.mobile_key.is_none() {
			return Err(ClientError::Rejected("mobile key is required".to_string()));
		}
		self.inits.fetch_add(1, Ordering::SeqCst);
		*self.last_options.lock().unwrap() = Some(options);
		*self.last_context.lock().unwrap() = Some(context);

		let outcome = self.init_outcome.lock().unwrap().clone();
		let gate = self.init_gate.lock().unwrap().take();
		Ok(Initialized {
			client: self.client.clone(),
			completion: gated(gate, outcome),
		})
	}
}

/// Records every host call along with the thread it arrived on.
#[derive(Default)]
pub struct RecordingChannel {
	calls: Mutex<Vec<(String, Value, ThreadId)>>,
}

impl RecordingChannel {
	pub fn calls(&self) -> Vec<(String, Value, ThreadId)> {
		self.calls.lock().unwrap().clone()
	}

	pub fn count(&self, method: &str) -> usize {
		self
			.calls
			.lock()
			.unwrap()
			.iter()
			.filter(|(m, _, _)| m == method)
			.count()
	}
}

impl HostChannel for RecordingChannel {
	fn invoke_method(&self, method: &str, arguments: Value) {
		self
			.calls
			.lock()
			.unwrap()
			.push((method.to_string(), arguments, thread::current().id()));
	}
}
