// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for cluster metadata primitives.

use thiserror::Error;

use crate::datum::DatumType;

/// Errors from handing work off to a [`HomeContext`](crate::HomeContext).
#[derive(Debug, Error)]
pub enum HomeError {
	/// The interruptor fired before the work completed.
	#[error("interrupted while waiting on home context")]
	Interrupted,

	/// The home thread has stopped and no longer accepts work.
	#[error("home context `{name}` is no longer running")]
	Unavailable { name: String },

	#[error("home context queue capacity must be greater than zero")]
	ZeroCapacity,

	#[error("failed to spawn home context `{name}`: {source}")]
	Spawn {
		name: String,
		#[source]
		source: std::io::Error,
	},
}

/// Errors from reading fields out of an object datum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
	#[error("Expected type OBJECT but found {found}: {got}")]
	NotAnObject { found: DatumType, got: String },

	#[error("Expected a field named `{field}`.")]
	MissingField { field: String },

	/// Keys left over after every expected field was read, sorted.
	#[error("Unexpected key(s) {}.", quote_keys(.keys))]
	UnexpectedKeys { keys: Vec<String> },
}

/// Errors from building an [`AuthKey`](crate::AuthKey).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthKeyError {
	#[error("auth key is {actual} bytes, at most {max} bytes are allowed")]
	TooLong { max: usize, actual: usize },
}

/// Formats keys as "`a`, `b`".
pub fn quote_keys(keys: &[String]) -> String {
	keys.iter()
		.map(|k| format!("`{k}`"))
		.collect::<Vec<_>>()
		.join(", ")
}
