// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conversion between [`AuthKey`] and the `auth_key` column.
//!
//! Reads never produce the key itself: a configured key reads back as the
//! `{hidden: true}` placeholder.

use loom_cluster_metadata::{AuthKey, AuthKeyError, Datum, DatumObjectBuilder};

use crate::error::ClusterConfigError;

/// The placeholder returned in place of a configured auth key.
pub fn hidden_auth_key_datum() -> Datum {
	let mut builder = DatumObjectBuilder::new();
	builder.overwrite("hidden", Datum::boolean(true));
	builder.into_datum()
}

/// `null` when no key is set, the hidden placeholder otherwise.
pub fn auth_key_to_datum(key: &AuthKey) -> Datum {
	if key.is_empty() {
		Datum::null()
	} else {
		hidden_auth_key_datum()
	}
}

/// Parses a written `auth_key` value; `table` is only used in error messages.
pub fn auth_key_from_datum(datum: &Datum, table: &str) -> Result<AuthKey, ClusterConfigError> {
	match datum {
		Datum::Null => Ok(AuthKey::unset()),
		Datum::String(value) => AuthKey::new(value.as_str()).map_err(|err| match err {
			AuthKeyError::TooLong { max, actual } => ClusterConfigError::AuthKeyTooLong { max, actual },
		}),
		_ if *datum == hidden_auth_key_datum() => Err(ClusterConfigError::HiddenPlaceholder {
			table: table.to_string(),
		}),
		_ => Err(ClusterConfigError::UnexpectedValue {
			got: datum.to_string(),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	const TABLE: &str = "rethinkdb.cluster_config";

	#[test]
	fn test_unset_key_reads_as_null() {
		assert!(auth_key_to_datum(&AuthKey::unset()).is_null());
	}

	#[test]
	fn test_set_key_reads_as_hidden() {
		let key = AuthKey::new("s3cret").unwrap();
		let datum = auth_key_to_datum(&key);
		assert_eq!(datum, Datum::from(json!({"hidden": true})));
		assert!(!datum.to_string().contains("s3cret"));
	}

	#[test]
	fn test_null_clears_key() {
		let key = auth_key_from_datum(&Datum::null(), TABLE).unwrap();
		assert!(key.is_empty());
	}

	#[test]
	fn test_string_sets_key() {
		let key = auth_key_from_datum(&Datum::string("s3cret"), TABLE).unwrap();
		assert_eq!(key.expose(), "s3cret");
	}

	#[test]
	fn test_too_long_string() {
		let datum = Datum::string("x".repeat(AuthKey::MAX_LENGTH + 1));
		let err = auth_key_from_datum(&datum, TABLE).unwrap_err();
		assert!(matches!(
			err,
			ClusterConfigError::AuthKeyTooLong {
				max: 2048,
				actual: 2049
			}
		));
	}

	#[test]
	fn test_hidden_placeholder_rejected() {
		let err = auth_key_from_datum(&hidden_auth_key_datum(), TABLE).unwrap_err();
		assert!(matches!(err, ClusterConfigError::HiddenPlaceholder { .. }));
	}

	#[test]
	fn test_placeholder_lookalikes_are_plain_type_errors() {
		for value in [
			json!({"hidden": false}),
			json!({"hidden": true, "key": "x"}),
			json!({"hidden": "true"}),
		] {
			let err = auth_key_from_datum(&Datum::from(value), TABLE).unwrap_err();
			assert!(
				matches!(err, ClusterConfigError::UnexpectedValue { .. }),
				"unexpected error: {err:?}"
			);
		}
	}

	#[test]
	fn test_other_types_print_offending_value() {
		let err = auth_key_from_datum(&Datum::from(json!(42)), TABLE).unwrap_err();
		assert_eq!(err.to_string(), "Expected a string or null; got 42");

		let err = auth_key_from_datum(&Datum::from(json!(["a"])), TABLE).unwrap_err();
		assert_eq!(err.to_string(), "Expected a string or null; got [\"a\"]");

		let err = auth_key_from_datum(&Datum::boolean(true), TABLE).unwrap_err();
		assert_eq!(err.to_string(), "Expected a string or null; got true");
	}

	proptest! {
		#[test]
		fn redacted_datum_never_contains_key(value in "[a-z0-9]{1,64}") {
			let key = auth_key_from_datum(&Datum::string(value.clone()), TABLE).unwrap();
			let out = auth_key_to_datum(&key).to_string();
			prop_assert_eq!(out, "{\"hidden\":true}");
		}
	}
}
