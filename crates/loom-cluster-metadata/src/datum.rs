// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tagged query values.
//!
//! A [`Datum`] is the interchange format between system tables and the query
//! layer. Equality is structural, and `Display` prints the canonical compact
//! JSON form used in error messages.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A query value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Datum {
	#[default]
	Null,
	Bool(bool),
	Number(f64),
	String(String),
	Array(Vec<Datum>),
	Object(BTreeMap<String, Datum>),
}

/// The type tag of a [`Datum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatumType {
	Null,
	Bool,
	Number,
	String,
	Array,
	Object,
}

impl DatumType {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Null => "NULL",
			Self::Bool => "BOOL",
			Self::Number => "NUMBER",
			Self::String => "STRING",
			Self::Array => "ARRAY",
			Self::Object => "OBJECT",
		}
	}
}

impl fmt::Display for DatumType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl Datum {
	pub fn null() -> Self {
		Self::Null
	}

	pub fn boolean(value: bool) -> Self {
		Self::Bool(value)
	}

	pub fn string(value: impl Into<String>) -> Self {
		Self::String(value.into())
	}

	pub fn datum_type(&self) -> DatumType {
		match self {
			Self::Null => DatumType::Null,
			Self::Bool(_) => DatumType::Bool,
			Self::Number(_) => DatumType::Number,
			Self::String(_) => DatumType::String,
			Self::Array(_) => DatumType::Array,
			Self::Object(_) => DatumType::Object,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&BTreeMap<String, Datum>> {
		match self {
			Self::Object(fields) => Some(fields),
			_ => None,
		}
	}

	/// Field lookup; `None` for missing fields and for non-objects.
	pub fn get_field(&self, key: &str) -> Option<&Datum> {
		self.as_object().and_then(|fields| fields.get(key))
	}
}

impl From<bool> for Datum {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for Datum {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<&str> for Datum {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for Datum {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<serde_json::Value> for Datum {
	fn from(value: serde_json::Value) -> Self {
		use serde_json::Value;

		match value {
			Value::Null => Self::Null,
			Value::Bool(b) => Self::Bool(b),
			Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
			Value::String(s) => Self::String(s),
			Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
			Value::Object(fields) => {
				Self::Object(fields.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
			}
		}
	}
}

impl From<&Datum> for serde_json::Value {
	fn from(datum: &Datum) -> Self {
		use serde_json::Value;

		match datum {
			Datum::Null => Value::Null,
			Datum::Bool(b) => Value::Bool(*b),
			Datum::Number(n) => number_to_json(*n),
			Datum::String(s) => Value::String(s.clone()),
			Datum::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
			Datum::Object(fields) => Value::Object(
				fields
					.iter()
					.map(|(k, v)| (k.clone(), Value::from(v)))
					.collect(),
			),
		}
	}
}

// Integral values print without a trailing `.0`.
fn number_to_json(n: f64) -> serde_json::Value {
	if n.fract() == 0.0 && n.abs() < (i64::MAX as f64) {
		serde_json::Value::from(n as i64)
	} else {
		serde_json::Number::from_f64(n)
			.map(serde_json::Value::Number)
			.unwrap_or(serde_json::Value::Null)
	}
}

impl fmt::Display for Datum {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", serde_json::Value::from(self))
	}
}

impl Serialize for Datum {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serde_json::Value::from(self).serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for Datum {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		serde_json::Value::deserialize(deserializer).map(Self::from)
	}
}

/// Incrementally builds an object datum.
#[derive(Debug, Clone, Default)]
pub struct DatumObjectBuilder {
	fields: BTreeMap<String, Datum>,
}

impl DatumObjectBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `key`, returning the value it replaced.
	pub fn overwrite(&mut self, key: impl Into<String>, value: Datum) -> Option<Datum> {
		self.fields.insert(key.into(), value)
	}

	pub fn into_datum(self) -> Datum {
		Datum::Object(self.fields)
	}
}
