// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Evaluation contexts.
//!
//! A [`Context`] is a single identity of some kind (`user`, `device`, ...).
//! A [`MultiContext`] groups one or more of them and is what the native
//! client evaluates against. Contexts are built fresh for every `start` or
//! `identify` call and handed to the client by value.

use std::collections::BTreeMap;

use crate::value::StructuredValue;

/// Kind assigned to contexts that do not name one.
pub const DEFAULT_KIND: &str = "user";

/// Built-in attribute names handled by [`ContextBuilder::set`].
const ATTR_KIND: &str = "kind";
const ATTR_KEY: &str = "key";
const ATTR_NAME: &str = "name";
const ATTR_ANONYMOUS: &str = "anonymous";

/// A single evaluation context.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
	kind: String,
	key: String,
	name: Option<String>,
	anonymous: bool,
	attributes: BTreeMap<String, StructuredValue>,
	private_attributes: Vec<String>,
}

impl Context {
	pub fn builder(key: impl Into<String>) -> ContextBuilder {
		ContextBuilder::new(key)
	}

	pub fn kind(&self) -> &str {
		&self.kind
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn is_anonymous(&self) -> bool {
		self.anonymous
	}

	/// Returns a custom attribute. Built-in attributes have their own accessors.
	pub fn attribute(&self, name: &str) -> Option<&StructuredValue> {
		self.attributes.get(name)
	}

	pub fn attributes(&self) -> &BTreeMap<String, StructuredValue> {
		&self.attributes
	}

	/// Attribute names to redact from anything the client reports.
	pub fn private_attributes(&self) -> &[String] {
		&self.private_attributes
	}

	pub fn is_private(&self, name: &str) -> bool {
		self.private_attributes.iter().any(|a| a == name)
	}
}

/// Builder for a single [`Context`].
#[derive(Debug, Clone)]
pub struct ContextBuilder {
	kind: String,
	key: String,
	name: Option<String>,
	anonymous: bool,
	attributes: BTreeMap<String, StructuredValue>,
	private_attributes: Vec<String>,
}

impl ContextBuilder {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			kind: DEFAULT_KIND.to_string(),
			key: key.into(),
			name: None,
			anonymous: false,
			attributes: BTreeMap::new(),
			private_attributes: Vec::new(),
		}
	}

	pub fn anonymous(mut self, anonymous: bool) -> Self {
		self.anonymous = anonymous;
		self
	}

	/// Sets an attribute by name.
	///
	/// `kind`, `key`, `name` and `anonymous` are built-in and only accept
	/// values of their own type; anything else for those names is ignored.
	/// For custom attributes a `null` value removes the attribute.
	pub fn set(mut self, name: &str, value: StructuredValue) -> Self {
		match (name, value) {
			(ATTR_KIND, StructuredValue::String(kind)) => self.kind = kind,
			(ATTR_KEY, StructuredValue::String(key)) => self.key = key,
			(ATTR_NAME, StructuredValue::String(n)) => self.name = Some(n),
			(ATTR_NAME, StructuredValue::Null) => self.name = None,
			(ATTR_ANONYMOUS, StructuredValue::Bool(anonymous)) => self.anonymous = anonymous,
			(ATTR_KIND | ATTR_KEY | ATTR_NAME | ATTR_ANONYMOUS, _) => {}
			(_, StructuredValue::Null) => {
				self.attributes.remove(name);
			}
			(_, value) => {
				self.attributes.insert(name.to_string(), value);
			}
		}
		self
	}

	/// Marks attributes private. Repeated names are kept once.
	pub fn private_attributes<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for name in names {
			let name = name.into();
			if !self.private_attributes.contains(&name) {
				self.private_attributes.push(name);
			}
		}
		self
	}

	pub fn build(self) -> Context {
		Context {
			kind: self.kind,
			key: self.key,
			name: self.name,
			anonymous: self.anonymous,
			attributes: self.attributes,
			private_attributes: self.private_attributes,
		}
	}
}

/// One or more contexts evaluated together.
///
/// A multi-context with a single member is valid and is how the bridge hands
/// every identity to the client.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiContext {
	contexts: Vec<Context>,
}

impl MultiContext {
	pub fn builder() -> MultiContextBuilder {
		MultiContextBuilder::default()
	}

	pub fn contexts(&self) -> &[Context] {
		&self.contexts
	}

	pub fn len(&self) -> usize {
		self.contexts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.contexts.is_empty()
	}

	/// Returns the first member of the given kind.
	pub fn get(&self, kind: &str) -> Option<&Context> {
		self.contexts.iter().find(|c| c.kind == kind)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Context> {
		self.contexts.iter()
	}
}

/// Accumulates contexts into a [`MultiContext`].
#[derive(Debug, Clone, Default)]
pub struct MultiContextBuilder {
	contexts: Vec<Context>,
}

impl MultiContextBuilder {
	pub fn add(mut self, context: Context) -> Self {
		self.contexts.push(context);
		self
	}

	pub fn build(self) -> MultiContext {
		MultiContext {
			contexts: self.contexts,
		}
	}
}
