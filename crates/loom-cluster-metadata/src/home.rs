// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Home execution contexts.
//!
//! Shared replicated metadata is owned by exactly one thread, its home. Other
//! tasks never touch the value directly: they submit a closure with
//! [`HomeContext::run`] and suspend until the home thread has executed it.
//! Jobs run one at a time in submission order.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::HomeError;

type Job = Box<dyn FnOnce() + Send + 'static>;

static NEXT_HOME_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
	static CURRENT_HOME: Cell<Option<HomeId>> = const { Cell::new(None) };
}

/// Identifies a home context for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HomeId(u64);

impl std::fmt::Display for HomeId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "home-{}", self.0)
	}
}

/// Handle to a home thread. Cloning is cheap; the thread exits once every
/// handle has been dropped and its queue has drained.
#[derive(Debug, Clone)]
pub struct HomeContext {
	id: HomeId,
	name: Arc<str>,
	tx: mpsc::Sender<Job>,
}

impl HomeContext {
	/// Spawns a named home thread with a bounded job queue.
	pub fn spawn(name: impl Into<String>, queue_capacity: usize) -> Result<Self, HomeError> {
		if queue_capacity == 0 {
			return Err(HomeError::ZeroCapacity);
		}

		let name: String = name.into();
		let id = HomeId(NEXT_HOME_ID.fetch_add(1, Ordering::Relaxed));
		let (tx, mut rx) = mpsc::channel::<Job>(queue_capacity);

		let thread_name = name.clone();
		std::thread::Builder::new()
			.name(name.clone())
			.spawn(move || {
				CURRENT_HOME.with(|current| current.set(Some(id)));
				debug!(home = %thread_name, %id, "home context started");
				while let Some(job) = rx.blocking_recv() {
					job();
				}
				debug!(home = %thread_name, %id, "home context stopped");
			})
			.map_err(|source| HomeError::Spawn {
				name: name.clone(),
				source,
			})?;

		Ok(Self {
			id,
			name: name.into(),
			tx,
		})
	}

	pub fn id(&self) -> HomeId {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Whether the calling thread is this context's home thread.
	pub fn is_current(&self) -> bool {
		CURRENT_HOME.with(|current| current.get()) == Some(self.id)
	}

	/// Runs `f` on the home thread and returns its result.
	///
	/// If `interruptor` fires before the home thread picks the job up, the job
	/// is skipped and the caller gets [`HomeError::Interrupted`]. A job the
	/// home thread has already started always completes and its result is
	/// returned, so `Interrupted` means `f` never ran.
	pub async fn run<F, R>(&self, interruptor: &CancellationToken, f: F) -> Result<R, HomeError>
	where
		F: FnOnce() -> R + Send + 'static,
		R: Send + 'static,
	{
		if interruptor.is_cancelled() {
			return Err(HomeError::Interrupted);
		}
		if self.is_current() {
			return Ok(f());
		}

		let (reply_tx, reply_rx) = oneshot::channel();
		let token = interruptor.clone();
		let job: Job = Box::new(move || {
			if token.is_cancelled() {
				return;
			}
			let _ = reply_tx.send(f());
		});

		trace!(home = %self.name, "handing off to home context");
		tokio::select! {
			biased;
			_ = interruptor.cancelled() => return Err(HomeError::Interrupted),
			sent = self.tx.send(job) => {
				if sent.is_err() {
					return Err(self.unavailable());
				}
			}
		}

		// Once queued, the job decides: it either runs to completion and
		// replies, or sees the token and drops the reply sender unsent.
		match reply_rx.await {
			Ok(value) => Ok(value),
			Err(_) if interruptor.is_cancelled() => Err(HomeError::Interrupted),
			Err(_) => Err(self.unavailable()),
		}
	}

	fn unavailable(&self) -> HomeError {
		HomeError::Unavailable {
			name: self.name.to_string(),
		}
	}
}
