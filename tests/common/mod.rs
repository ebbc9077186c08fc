//! Common test utilities and helpers
//!
//! Fixtures for building a provisioned queue over an in-memory or file store.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sprinkler::queue::api::*;
use sprinkler::store::MemoryStore;
use std::sync::Arc;

pub const PROVENANCE: &str = "https://localhost:8000/";

/// Fixed instant `secs` seconds after a base time
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn record(id: &str, secs: i64) -> Record {
    Record::new(id, at(secs), PROVENANCE).with_payload_sum(format!("sum-{}", id))
}

/// Provision the default schema on `store` and wrap it in a client
pub async fn provisioned<S: KeyValueStore + 'static>(store: Arc<S>) -> QueueClient<S> {
    let config = QueueConfig::default();
    create_schema(store.as_ref(), &config, &CallContext::background())
        .await
        .unwrap();
    QueueClient::new(store, config).unwrap()
}

pub async fn memory_client() -> (Arc<MemoryStore>, QueueClient<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let client = provisioned(Arc::clone(&store)).await;
    (store, client)
}

pub fn ids(receipts: &[Receipt]) -> Vec<&str> {
    receipts.iter().map(|r| r.id.as_str()).collect()
}
