// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The contract between the system table dispatcher and a table backend.

use async_trait::async_trait;
use loom_cluster_metadata::Datum;
use tokio_util::sync::CancellationToken;

use crate::error::ClusterConfigError;

/// A table whose rows are computed from cluster state rather than stored.
///
/// The dispatcher guarantees that a `new_value` passed to
/// [`write_row`](Self::write_row) is an object containing the primary key of
/// the row being written. `None` means the row is being deleted.
#[async_trait]
pub trait ArtificialTableBackend: Send + Sync {
	fn primary_key_name(&self) -> &str;

	async fn read_all_primary_keys(
		&self,
		interruptor: &CancellationToken,
	) -> Result<Vec<Datum>, ClusterConfigError>;

	/// `Ok(None)` when no row has this key.
	async fn read_row(
		&self,
		primary_key: &Datum,
		interruptor: &CancellationToken,
	) -> Result<Option<Datum>, ClusterConfigError>;

	async fn write_row(
		&self,
		primary_key: &Datum,
		new_value: Option<Datum>,
		interruptor: &CancellationToken,
	) -> Result<(), ClusterConfigError>;
}
