// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cluster configuration exposed as an artificial system table.
//!
//! Cluster-wide security settings live in replicated metadata, but clients
//! read and write them as rows of a table keyed by document name. This crate
//! provides:
//!
//! - [`ClusterConfigBackend`]: the table, with a fixed set of rows
//! - [`AuthDoc`]: the `auth` row, which never reveals the auth key on read
//! - Layered configuration ([`load_config`]) and tracing setup ([`init_tracing`])
//!
//! # Usage
//!
//! ```ignore
//! use loom_server_cluster_config::{load_config, spawn_auth_view, ClusterConfigBackend};
//!
//! let config = load_config()?;
//! let view = spawn_auth_view(&config)?;
//! let table = ClusterConfigBackend::from_config(view, &config);
//! let row = table.read_row(&Datum::string("auth"), &CancellationToken::new()).await?;
//! ```

pub mod auth_doc;
pub mod auth_key_datum;
pub mod backend;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod sources;
pub mod table;

pub use auth_doc::AuthDoc;
pub use auth_key_datum::{auth_key_from_datum, auth_key_to_datum, hidden_auth_key_datum};
pub use backend::ArtificialTableBackend;
pub use config::{
	load_config, load_config_with_file, ClusterConfig, ClusterConfigLayer, ConfigError, LogFormat,
	LoggingConfig, LoggingConfigLayer,
};
pub use document::ConfigDocument;
pub use error::ClusterConfigError;
pub use logging::init_tracing;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};
pub use table::{spawn_auth_view, ClusterConfigBackend};
