// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The `auth` row of the cluster config table.

use std::sync::Arc;

use async_trait::async_trait;
use loom_cluster_metadata::{
	AuthMetadata, ConvertError, Datum, DatumObjectBuilder, DatumObjectConverter, SemilatticeView,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::auth_key_datum::{auth_key_from_datum, auth_key_to_datum};
use crate::document::ConfigDocument;
use crate::error::ClusterConfigError;

/// Primary key of the auth document.
pub const AUTH_DOC_ID: &str = "auth";

const AUTH_KEY_FIELD: &str = "auth_key";

/// Reads and writes the cluster auth key.
///
/// Every access to the metadata view runs on the view's home context.
/// Redaction also happens there, so the key never leaves the home thread on
/// the read path.
pub struct AuthDoc {
	view: Arc<dyn SemilatticeView<AuthMetadata>>,
	table: Arc<str>,
}

impl AuthDoc {
	pub fn new(view: Arc<dyn SemilatticeView<AuthMetadata>>, table: impl Into<Arc<str>>) -> Self {
		Self {
			view,
			table: table.into(),
		}
	}
}

#[async_trait]
impl ConfigDocument for AuthDoc {
	#[instrument(skip_all, fields(doc = AUTH_DOC_ID))]
	async fn read(&self, interruptor: &CancellationToken) -> Result<Datum, ClusterConfigError> {
		let view = Arc::clone(&self.view);
		let auth_key = self
			.view
			.home()
			.run(interruptor, move || {
				auth_key_to_datum(view.get().auth_key.get_ref())
			})
			.await?;

		let mut builder = DatumObjectBuilder::new();
		builder.overwrite("id", Datum::string(AUTH_DOC_ID));
		builder.overwrite(AUTH_KEY_FIELD, auth_key);
		Ok(builder.into_datum())
	}

	#[instrument(skip_all, fields(doc = AUTH_DOC_ID))]
	async fn write(
		&self,
		row: &Datum,
		interruptor: &CancellationToken,
	) -> Result<(), ClusterConfigError> {
		let Ok(mut converter) = DatumObjectConverter::new(row) else {
			panic!("artificial table dispatch must guarantee the row is an object");
		};
		if converter.get("id").is_err() {
			panic!("artificial table dispatch must guarantee the primary key is present");
		}

		let auth_key_datum =
			converter
				.get(AUTH_KEY_FIELD)
				.map_err(|_| ClusterConfigError::MissingField {
					field: AUTH_KEY_FIELD.to_string(),
				})?;
		let auth_key = auth_key_from_datum(&auth_key_datum, &self.table)?;

		converter.check_no_extra_keys().map_err(|err| match err {
			ConvertError::UnexpectedKeys { keys } => ClusterConfigError::UnexpectedKeys {
				keys,
				table: self.table.to_string(),
			},
			ConvertError::NotAnObject { .. } | ConvertError::MissingField { .. } => {
				unreachable!("extra-key check only reports unexpected keys: {err}")
			}
		})?;

		let key_set = !auth_key.is_empty();
		debug!(key_set, "joining auth key into cluster metadata");

		let view = Arc::clone(&self.view);
		self.view
			.home()
			.run(interruptor, move || {
				let mut metadata = view.get();
				metadata.auth_key.set(auth_key);
				view.join(metadata);
			})
			.await?;

		info!(table = %self.table, key_set, "cluster auth key updated");
		Ok(())
	}
}
