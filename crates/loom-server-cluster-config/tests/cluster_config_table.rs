// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use loom_cluster_metadata::{
	AuthKey, AuthMetadata, Datum, HomeContext, InMemoryView, SemilatticeView,
};
use loom_server_cluster_config::{
	spawn_auth_view, ArtificialTableBackend, ClusterConfig, ClusterConfigBackend,
	ClusterConfigError,
};
use proptest::prelude::*;
use serde_json::json;
use tokio_util::sync::CancellationToken;

const INSERT_ILLEGAL: &str =
	"It's illegal to insert new rows into the `rethinkdb.cluster_config` table.";
const DELETE_ILLEGAL: &str = "It's illegal to delete rows from the `rethinkdb.cluster_config` table.";

fn setup() -> (ClusterConfigBackend, Arc<InMemoryView<AuthMetadata>>) {
	let config = ClusterConfig::default();
	let view = spawn_auth_view(&config).unwrap();
	let table = ClusterConfigBackend::from_config(view.clone(), &config);
	(table, view)
}

fn auth_row(auth_key: serde_json::Value) -> Datum {
	Datum::from(json!({"id": "auth", "auth_key": auth_key}))
}

async fn read_auth(table: &ClusterConfigBackend) -> Datum {
	table
		.read_row(&Datum::string("auth"), &CancellationToken::new())
		.await
		.unwrap()
		.expect("auth row exists")
}

async fn write_auth(table: &ClusterConfigBackend, row: Datum) -> Result<(), ClusterConfigError> {
	table
		.write_row(&Datum::string("auth"), Some(row), &CancellationToken::new())
		.await
}

#[tokio::test]
async fn test_primary_keys_are_exactly_auth() {
	let (table, _view) = setup();
	assert_eq!(table.primary_key_name(), "id");
	let keys = table
		.read_all_primary_keys(&CancellationToken::new())
		.await
		.unwrap();
	assert_eq!(keys, vec![Datum::string("auth")]);
}

#[tokio::test]
async fn test_fresh_cluster_has_no_auth_key() {
	let (table, _view) = setup();
	assert_eq!(read_auth(&table).await, auth_row(json!(null)));
}

#[tokio::test]
async fn test_write_null_then_read_null() {
	let (table, _view) = setup();
	write_auth(&table, auth_row(json!(null))).await.unwrap();
	assert_eq!(read_auth(&table).await, auth_row(json!(null)));
}

#[tokio::test]
async fn test_write_secret_reads_hidden() {
	let (table, view) = setup();
	write_auth(&table, auth_row(json!("s3cret"))).await.unwrap();

	let row = read_auth(&table).await;
	assert_eq!(row, auth_row(json!({"hidden": true})));
	assert!(!row.to_string().contains("s3cret"));
	assert!(!format!("{row:?}").contains("s3cret"));

	let metadata = view.subscribe().borrow().clone();
	assert_eq!(metadata.auth_key.get_ref().expose(), "s3cret");
	assert!(!format!("{metadata:?}").contains("s3cret"));
}

#[tokio::test]
async fn test_clearing_a_secret() {
	let (table, _view) = setup();
	write_auth(&table, auth_row(json!("s3cret"))).await.unwrap();
	write_auth(&table, auth_row(json!(null))).await.unwrap();
	assert_eq!(read_auth(&table).await, auth_row(json!(null)));
}

#[tokio::test]
async fn test_same_secret_twice_reads_the_same() {
	let (table, _view) = setup();
	write_auth(&table, auth_row(json!("s3cret"))).await.unwrap();
	let first = read_auth(&table).await;
	write_auth(&table, auth_row(json!("s3cret"))).await.unwrap();
	let second = read_auth(&table).await;
	assert_eq!(first, second);
}

#[tokio::test]
async fn test_secret_at_max_length_accepted() {
	let (table, _view) = setup();
	let key = "x".repeat(AuthKey::MAX_LENGTH);
	write_auth(&table, auth_row(json!(key))).await.unwrap();
	assert_eq!(read_auth(&table).await, auth_row(json!({"hidden": true})));
}

#[tokio::test]
async fn test_secret_too_long_rejected() {
	let (table, _view) = setup();
	let key = "x".repeat(AuthKey::MAX_LENGTH + 1);
	let err = write_auth(&table, auth_row(json!(key))).await.unwrap_err();
	let msg = err.to_string();
	assert!(msg.contains("2048"), "{msg}");
	assert!(msg.contains("2049"), "{msg}");
	assert_eq!(read_auth(&table).await, auth_row(json!(null)));
}

#[tokio::test]
async fn test_hidden_placeholder_rejected() {
	let (table, _view) = setup();
	write_auth(&table, auth_row(json!("s3cret"))).await.unwrap();

	// Read-modify-write of the row as returned.
	let row = read_auth(&table).await;
	let err = write_auth(&table, row).await.unwrap_err();
	assert!(matches!(err, ClusterConfigError::HiddenPlaceholder { .. }));
	assert!(err.to_string().contains("{hidden: true}"));
}

#[tokio::test]
async fn test_wrong_type_reports_value() {
	let (table, _view) = setup();
	let err = write_auth(&table, auth_row(json!([1, 2])))
		.await
		.unwrap_err();
	assert_eq!(err.to_string(), "Expected a string or null; got [1,2]");
}

#[tokio::test]
async fn test_delete_rejected() {
	let (table, _view) = setup();
	let err = table
		.write_row(&Datum::string("auth"), None, &CancellationToken::new())
		.await
		.unwrap_err();
	assert_eq!(err.to_string(), DELETE_ILLEGAL);
	assert!(table
		.read_row(&Datum::string("auth"), &CancellationToken::new())
		.await
		.unwrap()
		.is_some());
}

#[tokio::test]
async fn test_extra_keys_rejected() {
	let (table, _view) = setup();
	let row = Datum::from(json!({"id": "auth", "auth_key": null, "extra": 1}));
	let err = write_auth(&table, row).await.unwrap_err();
	assert!(matches!(err, ClusterConfigError::UnexpectedKeys { .. }));
	assert!(err.to_string().contains("`extra`"));
	assert!(err.to_string().contains("`rethinkdb.cluster_config`"));
}

#[tokio::test]
async fn test_interrupted_read() {
	let (table, _view) = setup();
	let token = CancellationToken::new();
	token.cancel();
	let err = table
		.read_row(&Datum::string("auth"), &token)
		.await
		.unwrap_err();
	assert!(matches!(err, ClusterConfigError::Interrupted));
}

/// Records every value joined into the wrapped view.
struct RecordingView {
	inner: Arc<InMemoryView<AuthMetadata>>,
	joined: Mutex<Vec<AuthMetadata>>,
}

impl SemilatticeView<AuthMetadata> for RecordingView {
	fn home(&self) -> &HomeContext {
		self.inner.home()
	}

	fn get(&self) -> AuthMetadata {
		self.inner.get()
	}

	fn join(&self, value: AuthMetadata) {
		self.joined.lock().unwrap().push(value.clone());
		self.inner.join(value);
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_are_all_merged() {
	const WRITERS: usize = 16;

	let config = ClusterConfig::default();
	let inner = spawn_auth_view(&config).unwrap();
	let view = Arc::new(RecordingView {
		inner: Arc::clone(&inner),
		joined: Mutex::new(Vec::new()),
	});
	let table = Arc::new(ClusterConfigBackend::from_config(view.clone(), &config));

	let mut handles = Vec::new();
	for i in 0..WRITERS {
		let table = Arc::clone(&table);
		handles.push(tokio::spawn(async move {
			write_auth(&table, auth_row(json!(format!("key-{i}")))).await
		}));
	}
	for handle in handles {
		handle.await.unwrap().unwrap();
	}

	let joined = view.joined.lock().unwrap().clone();
	assert_eq!(joined.len(), WRITERS);

	let keys: BTreeSet<String> = joined
		.iter()
		.map(|md| md.auth_key.get_ref().expose().to_string())
		.collect();
	let expected: BTreeSet<String> = (0..WRITERS).map(|i| format!("key-{i}")).collect();
	assert_eq!(keys, expected);

	let newest = joined
		.iter()
		.map(|md| &md.auth_key)
		.max_by_key(|v| (v.timestamp(), v.tag()))
		.unwrap();
	let current = inner.subscribe().borrow().auth_key.clone();
	assert_eq!(current.timestamp(), newest.timestamp());
	assert_eq!(current.tag(), newest.tag());
	assert_eq!(current.get_ref().expose(), newest.get_ref().expose());

	assert_eq!(read_auth(&table).await, auth_row(json!({"hidden": true})));
}

fn unknown_key() -> impl Strategy<Value = String> {
	"[a-z_]{0,12}".prop_filter("not a document name", |k| k != "auth")
}

proptest! {
	#[test]
	fn unknown_keys_cannot_be_read_or_inserted(key in unknown_key()) {
		let runtime = tokio::runtime::Builder::new_current_thread()
			.enable_all()
			.build()
			.unwrap();
		let (table, _view) = setup();
		let token = CancellationToken::new();
		let pk = Datum::string(key.clone());

		let row = runtime.block_on(table.read_row(&pk, &token)).unwrap();
		prop_assert!(row.is_none());

		let new_value = Datum::from(json!({"id": key, "auth_key": null}));
		let err = runtime
			.block_on(table.write_row(&pk, Some(new_value), &token))
			.unwrap_err();
		prop_assert_eq!(err.to_string(), INSERT_ILLEGAL);
	}
}
