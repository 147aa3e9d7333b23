// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field-by-field extraction from object datums.

use std::collections::{BTreeMap, BTreeSet};

use crate::datum::Datum;
use crate::error::ConvertError;

/// Reads the fields of an object datum and tracks which were never read.
///
/// Call [`get`](Self::get) for every field the row format allows, then
/// [`check_no_extra_keys`](Self::check_no_extra_keys) to reject anything else.
#[derive(Debug, Clone)]
pub struct DatumObjectConverter {
	fields: BTreeMap<String, Datum>,
	extra_keys: BTreeSet<String>,
}

impl DatumObjectConverter {
	pub fn new(datum: &Datum) -> Result<Self, ConvertError> {
		let fields = datum.as_object().ok_or_else(|| ConvertError::NotAnObject {
			found: datum.datum_type(),
			got: datum.to_string(),
		})?;

		Ok(Self {
			extra_keys: fields.keys().cloned().collect(),
			fields: fields.clone(),
		})
	}

	/// Returns the value of `key` and marks it as consumed.
	pub fn get(&mut self, key: &str) -> Result<Datum, ConvertError> {
		self.extra_keys.remove(key);
		self.fields
			.get(key)
			.cloned()
			.ok_or_else(|| ConvertError::MissingField {
				field: key.to_string(),
			})
	}

	pub fn check_no_extra_keys(&self) -> Result<(), ConvertError> {
		if self.extra_keys.is_empty() {
			return Ok(());
		}
		Err(ConvertError::UnexpectedKeys {
			keys: self.extra_keys.iter().cloned().collect(),
		})
	}
}
