//! Test modules for the queue protocols
//!
//! Organised by protocol; every suite runs against the in-memory store with a
//! freshly provisioned default schema.

mod cancellation;

use crate::core::context::CallContext;
use crate::queue::{QueueClient, Record};
use crate::schema::{create_schema, QueueConfig};
use crate::store::{Item, MemoryStore};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

pub(super) const TABLE: &str = "sprinkler";

pub(super) async fn client_with_page_size(
    page_size: usize,
) -> (Arc<MemoryStore>, QueueClient<MemoryStore>) {
    let store = Arc::new(MemoryStore::new().with_page_size(page_size));
    let config = QueueConfig::default();
    create_schema(store.as_ref(), &config, &CallContext::background())
        .await
        .unwrap();
    let client = QueueClient::new(Arc::clone(&store), config).unwrap();
    (store, client)
}

pub(super) async fn client() -> (Arc<MemoryStore>, QueueClient<MemoryStore>) {
    client_with_page_size(crate::store::DEFAULT_PAGE_SIZE).await
}

/// Fixed base time plus `seconds`
pub(super) fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::seconds(seconds)
}

pub(super) fn record(id: &str, seconds: i64) -> Record {
    Record::new(id, at(seconds), "https://localhost:8000/").with_payload_sum(format!("sum-{}", id))
}

pub(super) async fn stored(store: &MemoryStore, id: &str) -> Item {
    store.get_item(TABLE, id).await.unwrap().unwrap()
}

pub(super) async fn enqueue_all(client: &QueueClient<MemoryStore>, records: &[Record]) {
    let publisher = client.create_publisher();
    let ctx = CallContext::background();
    for record in records {
        assert!(publisher.enqueue(record, &ctx).await.unwrap());
    }
}

pub(super) fn ids(receipts: &[crate::queue::Receipt]) -> Vec<&str> {
    receipts.iter().map(|r| r.id.as_str()).collect()
}
