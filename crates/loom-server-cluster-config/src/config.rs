// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the cluster config table.
//!
//! Precedence (highest to lowest):
//! 1. Environment variables (`LOOM_SERVER_*`)
//! 2. Config file (`/etc/loom/cluster-config.toml`)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::sources::{ConfigSource, DefaultsSource, EnvSource, TomlSource};

pub const DEFAULT_TABLE_NAME: &str = "rethinkdb.cluster_config";
pub const DEFAULT_HOME_QUEUE_CAPACITY: usize = 64;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("configuration validation failed: {0}")]
	Validation(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
}

impl FromStr for LogFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"pretty" => Ok(Self::Pretty),
			"json" => Ok(Self::Json),
			other => Err(format!("unknown log format '{other}', expected 'pretty' or 'json'")),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfigLayer {
	pub level: Option<String>,
	pub format: Option<LogFormat>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
			format: self.format.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
	/// `EnvFilter` directive, e.g. `info` or `loom_server_cluster_config=debug`.
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: DEFAULT_LOG_LEVEL.to_string(),
			format: LogFormat::default(),
		}
	}
}

/// One partially specified layer of configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClusterConfigLayer {
	pub table_name: Option<String>,
	pub home_queue_capacity: Option<usize>,
	pub logging: Option<LoggingConfigLayer>,
}

impl ClusterConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.table_name.is_some() {
			self.table_name = other.table_name;
		}
		if other.home_queue_capacity.is_some() {
			self.home_queue_capacity = other.home_queue_capacity;
		}
		if let Some(overlay) = other.logging {
			self.logging.get_or_insert_with(Default::default).merge(overlay);
		}
	}

	pub fn finalize(self) -> Result<ClusterConfig, ConfigError> {
		let config = ClusterConfig {
			table_name: self
				.table_name
				.unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
			home_queue_capacity: self
				.home_queue_capacity
				.unwrap_or(DEFAULT_HOME_QUEUE_CAPACITY),
			logging: self.logging.unwrap_or_default().finalize(),
		};
		validate_config(&config)?;
		Ok(config)
	}
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterConfig {
	/// Qualified table name shown in error messages.
	pub table_name: String,
	/// Bound on jobs queued for the metadata home context.
	pub home_queue_capacity: usize,
	pub logging: LoggingConfig,
}

impl Default for ClusterConfig {
	fn default() -> Self {
		Self {
			table_name: DEFAULT_TABLE_NAME.to_string(),
			home_queue_capacity: DEFAULT_HOME_QUEUE_CAPACITY,
			logging: LoggingConfig::default(),
		}
	}
}

/// Load configuration from all sources with standard precedence.
pub fn load_config() -> Result<ClusterConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<PathBuf>,
) -> Result<ClusterConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ClusterConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ClusterConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	let config = merged.finalize()?;
	info!(
		table = %config.table_name,
		home_queue_capacity = config.home_queue_capacity,
		log_level = %config.logging.level,
		"cluster config table configuration loaded"
	);
	Ok(config)
}

fn validate_config(config: &ClusterConfig) -> Result<(), ConfigError> {
	if config.table_name.trim().is_empty() {
		return Err(ConfigError::Validation(
			"table_name must not be empty".to_string(),
		));
	}
	if config.home_queue_capacity == 0 {
		return Err(ConfigError::Validation(
			"home_queue_capacity must be greater than zero".to_string(),
		));
	}
	Ok(())
}
