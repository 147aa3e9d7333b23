// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cluster authentication metadata.

use std::fmt;

use loom_common_secret::SecretString;

use crate::error::AuthKeyError;
use crate::semilattice::{Semilattice, Versioned};

/// Shared secret clients must present to connect. Empty means no key is set.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthKey {
	key: SecretString,
}

impl AuthKey {
	/// Maximum key length in bytes.
	pub const MAX_LENGTH: usize = 2048;

	pub fn new(key: impl Into<String>) -> Result<Self, AuthKeyError> {
		let key = SecretString::new(key.into());
		let actual = key.expose().len();
		if actual > Self::MAX_LENGTH {
			return Err(AuthKeyError::TooLong {
				max: Self::MAX_LENGTH,
				actual,
			});
		}
		Ok(Self { key })
	}

	/// No key configured.
	pub fn unset() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.key.expose().is_empty()
	}

	/// Length in bytes.
	pub fn len(&self) -> usize {
		self.key.expose().len()
	}

	pub fn expose(&self) -> &str {
		self.key.expose()
	}
}

impl fmt::Debug for AuthKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			f.write_str("AuthKey(unset)")
		} else {
			f.debug_tuple("AuthKey").field(&self.key).finish()
		}
	}
}

/// Authentication section of the replicated cluster metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthMetadata {
	pub auth_key: Versioned<AuthKey>,
}

impl Semilattice for AuthMetadata {
	fn join(&mut self, other: &Self) {
		self.auth_key.join(&other.auth_key);
	}
}
