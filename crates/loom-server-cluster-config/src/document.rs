// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use loom_cluster_metadata::Datum;
use tokio_util::sync::CancellationToken;

use crate::error::ClusterConfigError;

/// One fixed row of the cluster config table.
///
/// The table has already resolved the row by name and rejected inserts and
/// deletes; documents only validate their own fields.
#[async_trait]
pub trait ConfigDocument: Send + Sync {
	async fn read(&self, interruptor: &CancellationToken) -> Result<Datum, ClusterConfigError>;

	async fn write(
		&self,
		row: &Datum,
		interruptor: &CancellationToken,
	) -> Result<(), ClusterConfigError>;
}
