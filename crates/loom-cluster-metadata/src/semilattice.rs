// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mergeable metadata values.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// A value that replicas converge on by joining.
///
/// `join` must be commutative, associative and idempotent.
pub trait Semilattice: Clone + Send + Sync + 'static {
	fn join(&mut self, other: &Self);
}

/// A last-writer-wins register.
///
/// Each `set` stamps the value with a timestamp that is strictly later than
/// the previous one and a fresh random tag. `join` keeps whichever side has
/// the greater `(timestamp, tag)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
	value: T,
	timestamp: DateTime<Utc>,
	tag: Uuid,
}

impl<T> Versioned<T> {
	/// A value that loses to any later `set`.
	pub fn new(value: T) -> Self {
		Self {
			value,
			timestamp: DateTime::<Utc>::MIN_UTC,
			tag: Uuid::nil(),
		}
	}

	/// Rebuilds a register from stored parts.
	pub fn from_parts(value: T, timestamp: DateTime<Utc>, tag: Uuid) -> Self {
		Self {
			value,
			timestamp,
			tag,
		}
	}

	pub fn get_ref(&self) -> &T {
		&self.value
	}

	pub fn timestamp(&self) -> DateTime<Utc> {
		self.timestamp
	}

	pub fn tag(&self) -> Uuid {
		self.tag
	}

	pub fn set(&mut self, value: T) {
		let floor = self.timestamp + Duration::microseconds(1);
		self.timestamp = Utc::now().max(floor);
		self.tag = Uuid::new_v4();
		self.value = value;
	}

	fn version(&self) -> (DateTime<Utc>, Uuid) {
		(self.timestamp, self.tag)
	}
}

impl<T: Default> Default for Versioned<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: Clone + Send + Sync + 'static> Semilattice for Versioned<T> {
	fn join(&mut self, other: &Self) {
		if other.version() > self.version() {
			*self = other.clone();
		}
	}
}
