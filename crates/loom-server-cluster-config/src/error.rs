// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Errors returned to clients of the cluster config table.
//!
//! The `Display` form of each variant is the message shown to the user.
//! Broken guarantees from the table dispatch layer are not represented here;
//! they panic.

use loom_cluster_metadata::error::quote_keys;
use loom_cluster_metadata::HomeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterConfigError {
	#[error("It's illegal to delete rows from the `{table}` table.")]
	DeleteIllegal { table: String },

	#[error("It's illegal to insert new rows into the `{table}` table.")]
	InsertIllegal { table: String },

	#[error("Expected a field named `{field}`.")]
	MissingField { field: String },

	#[error("The auth key should be at most {max} bytes long, but your given key is {actual} bytes.")]
	AuthKeyTooLong { max: usize, actual: usize },

	/// The read-only `{hidden: true}` placeholder was written back.
	#[error(
		"You're trying to set the `auth_key` field in the `auth` document of `{table}` to \
		 {{hidden: true}}. The `auth_key` field can be set to a string, or `null` for no auth \
		 key. {{hidden: true}} is a special place-holder value that is returned if you try to \
		 read the auth key; the real auth key is never shown for security reasons. Setting the \
		 auth key to {{hidden: true}} is not allowed."
	)]
	HiddenPlaceholder { table: String },

	#[error("Expected a string or null; got {got}")]
	UnexpectedValue { got: String },

	#[error("Unexpected key(s) {} in a row of the `{table}` table.", quote_keys(.keys))]
	UnexpectedKeys { keys: Vec<String>, table: String },

	#[error("The operation was interrupted.")]
	Interrupted,

	#[error("Cluster metadata is unavailable: {0}")]
	MetadataUnavailable(String),
}

impl From<HomeError> for ClusterConfigError {
	fn from(err: HomeError) -> Self {
		match err {
			HomeError::Interrupted => Self::Interrupted,
			other => Self::MetadataUnavailable(other.to_string()),
		}
	}
}
