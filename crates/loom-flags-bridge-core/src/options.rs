// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed configuration for the native flags client.
//!
//! [`ClientOptions`] is assembled once per client lifetime through
//! [`ClientOptionsBuilder`] and is not modified afterwards. Fields left as
//! `None` defer to the native client's own defaults.

/// Application metadata reported by the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationInfo {
	pub id: Option<String>,
	pub name: Option<String>,
	pub version: Option<String>,
	pub version_name: Option<String>,
}

/// Base URIs overriding the client's default service endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceEndpoints {
	pub polling: Option<String>,
	pub events: Option<String>,
	pub streaming: Option<String>,
}

/// How the client receives flag updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
	Streaming {
		background_poll_interval_millis: Option<u32>,
	},
	Polling {
		poll_interval_millis: Option<u32>,
		background_poll_interval_millis: Option<u32>,
	},
}

impl DataSource {
	pub fn is_streaming(&self) -> bool {
		matches!(self, DataSource::Streaming { .. })
	}
}

impl Default for DataSource {
	fn default() -> Self {
		DataSource::Streaming {
			background_poll_interval_millis: None,
		}
	}
}

/// Analytics event pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventsOptions {
	pub capacity: Option<u32>,
	pub flush_interval_millis: Option<u32>,
	pub diagnostic_recording_interval_millis: Option<u32>,
	pub all_attributes_private: bool,
	pub private_attributes: Vec<String>,
}

/// Identifies a wrapper SDK to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperInfo {
	pub name: String,
	pub version: String,
}

/// HTTP behaviour of the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpOptions {
	pub connect_timeout_millis: Option<u32>,
	/// Use REPORT instead of GET when requesting flag evaluations.
	pub use_report: bool,
	pub wrapper: Option<WrapperInfo>,
}

/// Complete configuration handed to the native client on initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
	pub mobile_key: Option<String>,
	pub auto_env_attributes: bool,
	/// Lets the client replace placeholder keys on anonymous contexts.
	pub generate_anonymous_keys: bool,
	pub max_cached_contexts: Option<u32>,
	pub offline: bool,
	pub disable_background_updating: bool,
	pub evaluation_reasons: bool,
	pub diagnostic_opt_out: bool,
	/// `None` unless at least one application field was supplied.
	pub application_info: Option<ApplicationInfo>,
	pub service_endpoints: ServiceEndpoints,
	pub data_source: DataSource,
	pub events: EventsOptions,
	pub http: HttpOptions,
}

impl ClientOptions {
	pub fn builder() -> ClientOptionsBuilder {
		ClientOptionsBuilder::new()
	}
}

impl Default for ClientOptions {
	fn default() -> Self {
		ClientOptionsBuilder::new().build()
	}
}

/// Builder for [`ClientOptions`].
#[derive(Debug, Clone)]
pub struct ClientOptionsBuilder {
	mobile_key: Option<String>,
	auto_env_attributes: bool,
	generate_anonymous_keys: bool,
	max_cached_contexts: Option<u32>,
	offline: bool,
	disable_background_updating: bool,
	evaluation_reasons: bool,
	diagnostic_opt_out: bool,
	application_info: Option<ApplicationInfo>,
	service_endpoints: ServiceEndpoints,
	stream: bool,
	poll_interval_millis: Option<u32>,
	background_poll_interval_millis: Option<u32>,
	events: EventsOptions,
	http: HttpOptions,
}

impl ClientOptionsBuilder {
	pub fn new() -> Self {
		Self {
			mobile_key: None,
			auto_env_attributes: false,
			generate_anonymous_keys: false,
			max_cached_contexts: None,
			offline: false,
			disable_background_updating: false,
			evaluation_reasons: false,
			diagnostic_opt_out: false,
			application_info: None,
			service_endpoints: ServiceEndpoints::default(),
			stream: true,
			poll_interval_millis: None,
			background_poll_interval_millis: None,
			events: EventsOptions::default(),
			http: HttpOptions::default(),
		}
	}

	pub fn mobile_key(mut self, key: impl Into<String>) -> Self {
		self.mobile_key = Some(key.into());
		self
	}

	pub fn auto_env_attributes(mut self, enabled: bool) -> Self {
		self.auto_env_attributes = enabled;
		self
	}

	pub fn generate_anonymous_keys(mut self, enabled: bool) -> Self {
		self.generate_anonymous_keys = enabled;
		self
	}

	pub fn max_cached_contexts(mut self, max: u32) -> Self {
		self.max_cached_contexts = Some(max);
		self
	}

	pub fn offline(mut self, offline: bool) -> Self {
		self.offline = offline;
		self
	}

	pub fn disable_background_updating(mut self, disabled: bool) -> Self {
		self.disable_background_updating = disabled;
		self
	}

	pub fn evaluation_reasons(mut self, enabled: bool) -> Self {
		self.evaluation_reasons = enabled;
		self
	}

	pub fn diagnostic_opt_out(mut self, opt_out: bool) -> Self {
		self.diagnostic_opt_out = opt_out;
		self
	}

	fn application_info_mut(&mut self) -> &mut ApplicationInfo {
		self.application_info.get_or_insert_with(ApplicationInfo::default)
	}

	pub fn application_id(mut self, id: impl Into<String>) -> Self {
		self.application_info_mut().id = Some(id.into());
		self
	}

	pub fn application_name(mut self, name: impl Into<String>) -> Self {
		self.application_info_mut().name = Some(name.into());
		self
	}

	pub fn application_version(mut self, version: impl Into<String>) -> Self {
		self.application_info_mut().version = Some(version.into());
		self
	}

	pub fn application_version_name(mut self, version_name: impl Into<String>) -> Self {
		self.application_info_mut().version_name = Some(version_name.into());
		self
	}

	pub fn polling_uri(mut self, uri: impl Into<String>) -> Self {
		self.service_endpoints.polling = Some(uri.into());
		self
	}

	pub fn events_uri(mut self, uri: impl Into<String>) -> Self {
		self.service_endpoints.events = Some(uri.into());
		self
	}

	pub fn streaming_uri(mut self, uri: impl Into<String>) -> Self {
		self.service_endpoints.streaming = Some(uri.into());
		self
	}

	/// `false` selects the polling data source.
	pub fn stream(mut self, stream: bool) -> Self {
		self.stream = stream;
		self
	}

	/// Only honoured by the polling data source.
	pub fn poll_interval_millis(mut self, millis: u32) -> Self {
		self.poll_interval_millis = Some(millis);
		self
	}

	pub fn background_poll_interval_millis(mut self, millis: u32) -> Self {
		self.background_poll_interval_millis = Some(millis);
		self
	}

	pub fn events_capacity(mut self, capacity: u32) -> Self {
		self.events.capacity = Some(capacity);
		self
	}

	pub fn events_flush_interval_millis(mut self, millis: u32) -> Self {
		self.events.flush_interval_millis = Some(millis);
		self
	}

	pub fn diagnostic_recording_interval_millis(mut self, millis: u32) -> Self {
		self.events.diagnostic_recording_interval_millis = Some(millis);
		self
	}

	pub fn all_attributes_private(mut self, all_private: bool) -> Self {
		self.events.all_attributes_private = all_private;
		self
	}

	pub fn private_attributes<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.events.private_attributes = names.into_iter().map(Into::into).collect();
		self
	}

	pub fn connect_timeout_millis(mut self, millis: u32) -> Self {
		self.http.connect_timeout_millis = Some(millis);
		self
	}

	pub fn use_report(mut self, use_report: bool) -> Self {
		self.http.use_report = use_report;
		self
	}

	pub fn wrapper(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
		self.http.wrapper = Some(WrapperInfo {
			name: name.into(),
			version: version.into(),
		});
		self
	}

	pub fn build(self) -> ClientOptions {
		let data_source = if self.stream {
			DataSource::Streaming {
				background_poll_interval_millis: self.background_poll_interval_millis,
			}
		} else {
			DataSource::Polling {
				poll_interval_millis: self.poll_interval_millis,
				background_poll_interval_millis: self.background_poll_interval_millis,
			}
		};

		ClientOptions {
			mobile_key: self.mobile_key,
			auto_env_attributes: self.auto_env_attributes,
			generate_anonymous_keys: self.generate_anonymous_keys,
			max_cached_contexts: self.max_cached_contexts,
			offline: self.offline,
			disable_background_updating: self.disable_background_updating,
			evaluation_reasons: self.evaluation_reasons,
			diagnostic_opt_out: self.diagnostic_opt_out,
			application_info: self.application_info,
			service_endpoints: self.service_endpoints,
			data_source,
			events: self.events,
			http: self.http,
		}
	}
}

impl Default for ClientOptionsBuilder {
	fn default() -> Self {
		Self::new()
	}
}
