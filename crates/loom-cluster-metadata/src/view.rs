// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Views onto replicated semilattice metadata.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;
use tracing::trace;

use crate::home::HomeContext;
use crate::semilattice::Semilattice;

/// Read/join access to a piece of replicated metadata.
///
/// `get` and `join` may only be called on [`home`](Self::home); use
/// [`HomeContext::run`] to get there. Implementations panic otherwise.
pub trait SemilatticeView<M: Semilattice>: Send + Sync {
	fn home(&self) -> &HomeContext;

	/// Snapshot of the current value.
	fn get(&self) -> M;

	/// Merges `value` into the replicated state.
	fn join(&self, value: M);
}

/// A single-replica view that keeps the value in memory.
pub struct InMemoryView<M: Semilattice> {
	home: HomeContext,
	value: Mutex<M>,
	changes: watch::Sender<M>,
}

impl<M: Semilattice> InMemoryView<M> {
	pub fn new(home: HomeContext, initial: M) -> Self {
		let (changes, _) = watch::channel(initial.clone());
		Self {
			home,
			value: Mutex::new(initial),
			changes,
		}
	}

	/// Receives the joined value after every `join`.
	pub fn subscribe(&self) -> watch::Receiver<M> {
		self.changes.subscribe()
	}

	fn assert_home(&self, op: &str) {
		assert!(
			self.home.is_current(),
			"semilattice view `{op}` called off home context `{}`",
			self.home.name()
		);
	}
}

impl<M: Semilattice> SemilatticeView<M> for InMemoryView<M> {
	fn home(&self) -> &HomeContext {
		&self.home
	}

	fn get(&self) -> M {
		self.assert_home("get");
		self.value
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	fn join(&self, value: M) {
		self.assert_home("join");
		let mut current = self.value.lock().unwrap_or_else(PoisonError::into_inner);
		current.join(&value);
		self.changes.send_replace(current.clone());
		trace!(home = %self.home.name(), "joined metadata");
	}
}
