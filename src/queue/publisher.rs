//! Queue Publisher: idempotent enqueue
//!
//! One enqueue is one conditional put. The item carries the record's base
//! attributes and the same initial status under every destination's status
//! attribute, so the record appears in every destination's index at once.
//!
//! The put only proceeds when it moves the stored copy forward:
//!
//! ```text
//! attribute_not_exists(id) OR timestamp < :ts
//! ```
//!
//! A re-send with the same or an older timestamp fails the condition, even
//! with a different payload sum; that is reported as `Ok(false)`.

use crate::core::context::CallContext;
use crate::core::time::encode_timestamp;
use crate::queue::call::call_store;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::record::Record;
use crate::schema::QueueConfig;
use crate::store::{Condition, KeyValueStore};
use std::sync::Arc;

/// Publisher handle for writing records to the shared table
///
/// Cheap to clone; clones share the store and configuration.
pub struct QueuePublisher<S: ?Sized> {
    store: Arc<S>,
    config: Arc<QueueConfig>,
}

impl<S: ?Sized> Clone for QueuePublisher<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: KeyValueStore + ?Sized> QueuePublisher<S> {
    pub(crate) fn new(store: Arc<S>, config: Arc<QueueConfig>) -> Self {
        Self { store, config }
    }

    /// Write `record` unless the stored copy is the same or newer
    ///
    /// Returns `Ok(true)` when the record was written and `Ok(false)` when the
    /// overwrite condition rejected it.
    pub async fn enqueue(&self, record: &Record, ctx: &CallContext) -> QueueResult<bool> {
        record.validate()?;

        let item = record.to_item(&self.config);
        let condition = overwrite_condition(&self.config, record);
        log::trace!("enqueue '{}' when {}", record.id, condition);

        let result = call_store(
            ctx,
            "enqueue",
            self.store
                .put_item(&self.config.table_name, item, Some(condition)),
        )
        .await?;

        match result {
            Ok(()) => {
                log::debug!(
                    "Enqueued record '{}' at {} for {} destinations",
                    record.id,
                    encode_timestamp(&record.timestamp),
                    self.config.destinations.len()
                );
                Ok(true)
            }
            Err(err) if err.is_conditional_check_failed() => {
                log::debug!(
                    "Skipped record '{}': stored copy is the same or newer",
                    record.id
                );
                Ok(false)
            }
            Err(source) => Err(QueueError::Store {
                operation: "enqueue",
                source,
            }),
        }
    }
}

fn overwrite_condition(config: &QueueConfig, record: &Record) -> Condition {
    let names = &config.attributes;
    let timestamp = encode_timestamp(&record.timestamp);

    // Acknowledge locks on the timestamp alone, so a rewrite must move it forward
    Condition::not_exists(&names.id).or(Condition::less_than(&names.timestamp, &timestamp))
}
