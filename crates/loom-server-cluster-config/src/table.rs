// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The cluster config table: a fixed set of documents keyed by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use loom_cluster_metadata::{
	AuthMetadata, Datum, HomeContext, HomeError, InMemoryView, SemilatticeView,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::auth_doc::{AuthDoc, AUTH_DOC_ID};
use crate::backend::ArtificialTableBackend;
use crate::config::ClusterConfig;
use crate::document::ConfigDocument;
use crate::error::ClusterConfigError;

const PRIMARY_KEY_NAME: &str = "id";

/// Backend for the cluster config system table.
///
/// The set of rows is fixed when the backend is built: rows can be read and
/// updated, never inserted or deleted.
pub struct ClusterConfigBackend {
	docs: BTreeMap<&'static str, Box<dyn ConfigDocument>>,
	table: Arc<str>,
}

impl ClusterConfigBackend {
	pub fn new(view: Arc<dyn SemilatticeView<AuthMetadata>>, table: impl Into<Arc<str>>) -> Self {
		let table = table.into();
		let mut docs: BTreeMap<&'static str, Box<dyn ConfigDocument>> = BTreeMap::new();
		docs.insert(AUTH_DOC_ID, Box::new(AuthDoc::new(view, Arc::clone(&table))));
		Self { docs, table }
	}

	pub fn from_config(view: Arc<dyn SemilatticeView<AuthMetadata>>, config: &ClusterConfig) -> Self {
		Self::new(view, config.table_name.as_str())
	}

	/// Fully qualified table name used in error messages.
	pub fn table_name(&self) -> &str {
		&self.table
	}

	fn doc(&self, primary_key: &Datum) -> Option<&dyn ConfigDocument> {
		let name = primary_key.as_str()?;
		self.docs.get(name).map(|doc| doc.as_ref())
	}
}

#[async_trait]
impl ArtificialTableBackend for ClusterConfigBackend {
	fn primary_key_name(&self) -> &str {
		PRIMARY_KEY_NAME
	}

	async fn read_all_primary_keys(
		&self,
		_interruptor: &CancellationToken,
	) -> Result<Vec<Datum>, ClusterConfigError> {
		Ok(self.docs.keys().map(|name| Datum::string(*name)).collect())
	}

	#[instrument(skip_all, fields(key = %primary_key))]
	async fn read_row(
		&self,
		primary_key: &Datum,
		interruptor: &CancellationToken,
	) -> Result<Option<Datum>, ClusterConfigError> {
		match self.doc(primary_key) {
			Some(doc) => doc.read(interruptor).await.map(Some),
			None => {
				debug!(table = %self.table, "no such row");
				Ok(None)
			}
		}
	}

	#[instrument(skip_all, fields(key = %primary_key))]
	async fn write_row(
		&self,
		primary_key: &Datum,
		new_value: Option<Datum>,
		interruptor: &CancellationToken,
	) -> Result<(), ClusterConfigError> {
		let Some(new_value) = new_value else {
			warn!(table = %self.table, "rejected delete");
			return Err(ClusterConfigError::DeleteIllegal {
				table: self.table.to_string(),
			});
		};

		let Some(doc) = self.doc(primary_key) else {
			warn!(table = %self.table, "rejected insert");
			return Err(ClusterConfigError::InsertIllegal {
				table: self.table.to_string(),
			});
		};

		doc.write(&new_value, interruptor).await
	}
}

/// Spawns a home context and an in-memory auth metadata view bound to it.
pub fn spawn_auth_view(config: &ClusterConfig) -> Result<Arc<InMemoryView<AuthMetadata>>, HomeError> {
	let home = HomeContext::spawn("cluster-metadata", config.home_queue_capacity)?;
	Ok(Arc::new(InMemoryView::new(home, AuthMetadata::default())))
}
