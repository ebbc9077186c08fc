//! Multi-consumer Queue over a Key-Value Store
//!
//! Producers append records to one shared table. Each destination reads the
//! same records through its own status index, so several consumer groups
//! drain the stream independently and at their own pace. There is no broker:
//! ordering comes from the index sort key and mutual exclusion from the
//! store's conditional writes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  enqueue (conditional put, fan-out status)
//! │QueuePublisher├──────────────────────────┐
//! └──────────────┘                          ▼
//!                              ┌───────────────────────┐
//!                              │  table (hash key: id) │
//!                              └──────┬─────────┬──────┘
//!                       primary-status-index   secondary-status-index
//!                                     │         │
//!          dequeue / acknowledge      ▼         ▼      dequeue / acknowledge
//!                          ┌──────────────┐  ┌──────────────┐
//!                          │QueueConsumer │  │QueueConsumer │
//!                          │  (primary)   │  │ (secondary)  │
//!                          └──────────────┘  └──────────────┘
//! ```
//!
//! Delivery is at-least-once: concurrent dequeues may return the same
//! receipts, and acknowledgment is the only step that changes state.
//!
//! # Example Usage
//!
//! ```rust
//! use sprinkler::core::context::CallContext;
//! use sprinkler::queue::{QueueClient, Record, Status};
//! use sprinkler::schema::{create_schema, QueueConfig};
//! use sprinkler::store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let ctx = CallContext::background();
//! let config = QueueConfig::default();
//! create_schema(store.as_ref(), &config, &ctx).await?;
//!
//! let client = QueueClient::new(store, config)?;
//! let publisher = client.create_publisher();
//! let record = Record::new("0", chrono::Utc::now(), "https://localhost:8000/");
//! assert!(publisher.enqueue(&record, &ctx).await?);
//!
//! let consumer = client.create_consumer("primary")?;
//! let receipts = consumer.dequeue(&Status::ready(), 10, &ctx).await?;
//! let report = consumer
//!     .acknowledge(&receipts, &Status::delivered(), &ctx)
//!     .await?;
//! assert!(report.all_acknowledged());
//! # Ok(())
//! # }
//! ```

mod ack;
pub(crate) mod call;
mod client;
mod consumer;
mod error;
mod publisher;
mod record;
mod status;

pub mod api;

pub use ack::{AckOutcome, AckReport};
pub use client::QueueClient;
pub use consumer::QueueConsumer;
pub use error::{QueueError, QueueResult};
pub use publisher::QueuePublisher;
pub use record::{Receipt, Record};
pub use status::Status;

#[cfg(test)]
mod tests;
