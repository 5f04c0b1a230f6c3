// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Structured flag values and the wire codec.
//!
//! The host channel speaks untyped JSON-shaped values. Flag values, context
//! attributes and tracking payloads are carried internally as
//! [`StructuredValue`], a closed sum type over null, bool, number, string,
//! array and object.
//!
//! Numbers are always widened to `f64` on the way in, so an integer sent by
//! the host comes back as a float. A missing entry and an explicit `null`
//! both decode to [`StructuredValue::Null`].

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

/// A typed flag or attribute value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StructuredValue {
	#[default]
	Null,
	Bool(bool),
	Number(f64),
	String(String),
	Array(Vec<StructuredValue>),
	Object(BTreeMap<String, StructuredValue>),
}

impl StructuredValue {
	/// Decodes a wire value. Never fails.
	pub fn from_wire(value: &Value) -> Self {
		match value {
			Value::Null => StructuredValue::Null,
			Value::Bool(b) => StructuredValue::Bool(*b),
			Value::Number(n) => StructuredValue::Number(widen(n)),
			Value::String(s) => StructuredValue::String(s.clone()),
			Value::Array(items) => StructuredValue::Array(items.iter().map(Self::from_wire).collect()),
			Value::Object(entries) => StructuredValue::Object(
				entries
					.iter()
					.map(|(k, v)| (k.clone(), Self::from_wire(v)))
					.collect(),
			),
		}
	}

	/// Decodes an entry that may be missing from its enclosing map.
	pub fn from_optional_wire(value: Option<&Value>) -> Self {
		value.map(Self::from_wire).unwrap_or_default()
	}

	/// Encodes back into a wire value.
	///
	/// Non-finite numbers have no JSON representation and encode as `null`.
	pub fn to_wire(&self) -> Value {
		match self {
			StructuredValue::Null => Value::Null,
			StructuredValue::Bool(b) => Value::Bool(*b),
			StructuredValue::Number(n) => Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
			StructuredValue::String(s) => Value::String(s.clone()),
			StructuredValue::Array(items) => Value::Array(items.iter().map(Self::to_wire).collect()),
			StructuredValue::Object(entries) => Value::Object(
				entries
					.iter()
					.map(|(k, v)| (k.clone(), v.to_wire()))
					.collect::<Map<String, Value>>(),
			),
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			StructuredValue::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			StructuredValue::Number(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			StructuredValue::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the entry for `key` when this is an object.
	pub fn get(&self, key: &str) -> Option<&StructuredValue> {
		match self {
			StructuredValue::Object(entries) => entries.get(key),
			_ => None,
		}
	}
}

fn widen(n: &Number) -> f64 {
	// as_f64 only returns None under arbitrary_precision for out-of-range values
	n.as_f64().unwrap_or(f64::NAN)
}

/// Decodes a possibly-absent wire value.
pub fn decode(value: Option<&Value>) -> StructuredValue {
	StructuredValue::from_optional_wire(value)
}

/// Encodes a structured value for the wire.
pub fn encode(value: &StructuredValue) -> Value {
	value.to_wire()
}

impl From<bool> for StructuredValue {
	fn from(b: bool) -> Self {
		StructuredValue::Bool(b)
	}
}

impl From<f64> for StructuredValue {
	fn from(n: f64) -> Self {
		StructuredValue::Number(n)
	}
}

impl From<i32> for StructuredValue {
	fn from(n: i32) -> Self {
		StructuredValue::Number(f64::from(n))
	}
}

impl From<&str> for StructuredValue {
	fn from(s: &str) -> Self {
		StructuredValue::String(s.to_string())
	}
}

impl From<String> for StructuredValue {
	fn from(s: String) -> Self {
		StructuredValue::String(s)
	}
}

impl From<Vec<StructuredValue>> for StructuredValue {
	fn from(items: Vec<StructuredValue>) -> Self {
		StructuredValue::Array(items)
	}
}

impl From<BTreeMap<String, StructuredValue>> for StructuredValue {
	fn from(entries: BTreeMap<String, StructuredValue>) -> Self {
		StructuredValue::Object(entries)
	}
}
