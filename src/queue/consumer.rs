//! Queue Consumer: ordered dequeue and optimistic acknowledgment
//!
//! A consumer is bound to one destination. Dequeue reads the destination's
//! status index for one status value, oldest first, following continuation
//! tokens until `max_count` receipts are collected or the partition is
//! exhausted. It never changes anything.
//!
//! Acknowledge moves each receipt's record to a new status with a conditional
//! update guarded by the receipt's timestamp. If the record was overwritten by
//! a newer enqueue since it was dequeued, the guard fails and the outcome is a
//! conflict; the newer copy stays pending.

use crate::core::context::CallContext;
use crate::core::time::encode_timestamp;
use crate::queue::ack::{AckOutcome, AckReport};
use crate::queue::call::{call, call_store};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::record::Receipt;
use crate::queue::status::Status;
use crate::schema::{Destination, QueueConfig};
use crate::store::{Condition, Item, KeyValueStore, QueryRequest};
use std::sync::Arc;

/// Consumer handle for one destination
pub struct QueueConsumer<S: ?Sized> {
    store: Arc<S>,
    config: Arc<QueueConfig>,
    destination: Destination,
}

impl<S: ?Sized> Clone for QueueConsumer<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            destination: self.destination.clone(),
        }
    }
}

impl<S: KeyValueStore + ?Sized> QueueConsumer<S> {
    pub(crate) fn new(store: Arc<S>, config: Arc<QueueConfig>, destination: Destination) -> Self {
        Self {
            store,
            config,
            destination,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Up to `max_count` receipts whose status is `status`, oldest first
    ///
    /// Any failure, on any page, fails the whole call; no partial list is
    /// returned.
    pub async fn dequeue(
        &self,
        status: &Status,
        max_count: usize,
        ctx: &CallContext,
    ) -> QueueResult<Vec<Receipt>> {
        if max_count == 0 {
            return Err(QueueError::validation("max_count must be at least 1"));
        }
        if status.is_empty() {
            return Err(QueueError::validation("status must not be empty"));
        }

        let names = &self.config.attributes;
        let mut receipts = Vec::new();
        let mut next_page = None;
        let mut pages = 0usize;

        loop {
            let remaining = max_count - receipts.len();
            let request = QueryRequest::new(
                &self.config.table_name,
                &self.destination.status_index,
                status.as_str(),
            )
            .with_projection([&names.id, &names.timestamp, &names.provenance])
            .with_limit(remaining)
            .starting_after(next_page);

            let page = call(ctx, "dequeue", self.store.query(request)).await?;
            pages += 1;
            log::trace!(
                "{}: page {} returned {} items",
                self.destination.name,
                pages,
                page.items.len()
            );

            for item in page.items.iter().take(remaining) {
                receipts.push(Receipt::from_item(item, &self.config)?);
            }

            next_page = page.last_evaluated_key;
            if receipts.len() >= max_count || next_page.is_none() {
                break;
            }
        }

        log::debug!(
            "Dequeued {} '{}' receipts for {} in {} pages",
            receipts.len(),
            status,
            self.destination.name,
            pages
        );
        Ok(receipts)
    }

    /// Set this destination's status to `new_status` on every receipt's record
    ///
    /// Each receipt is handled independently and its outcome recorded in the
    /// report. Cancellation or timeout stops the loop and returns
    /// `AckInterrupted` with the outcomes gathered so far.
    pub async fn acknowledge(
        &self,
        receipts: &[Receipt],
        new_status: &Status,
        ctx: &CallContext,
    ) -> QueueResult<AckReport> {
        if new_status.is_empty() {
            return Err(QueueError::validation("new status must not be empty"));
        }

        let mut report = AckReport::default();
        for receipt in receipts {
            let outcome = match self.acknowledge_one(receipt, new_status, ctx).await {
                Ok(outcome) => outcome,
                Err(cause) => {
                    log::warn!(
                        "Acknowledgment for {} interrupted after {} of {} records",
                        self.destination.name,
                        report.len(),
                        receipts.len()
                    );
                    return Err(QueueError::AckInterrupted {
                        partial: report,
                        total: receipts.len(),
                        cause: Box::new(cause),
                    });
                }
            };

            match &outcome {
                AckOutcome::Acknowledged => log::debug!(
                    "{}: '{}' -> {}",
                    self.destination.name,
                    receipt.id,
                    new_status
                ),
                AckOutcome::Conflict => log::debug!(
                    "{}: '{}' changed since it was dequeued; left as is",
                    self.destination.name,
                    receipt.id
                ),
                AckOutcome::Failed(err) => log::warn!(
                    "{}: failed to acknowledge '{}': {}",
                    self.destination.name,
                    receipt.id,
                    err
                ),
            }
            report.push(receipt.clone(), outcome);
        }
        Ok(report)
    }

    async fn acknowledge_one(
        &self,
        receipt: &Receipt,
        new_status: &Status,
        ctx: &CallContext,
    ) -> QueueResult<AckOutcome> {
        let mut updates = Item::new();
        updates.insert(
            self.destination.status_attribute.clone(),
            new_status.to_string(),
        );
        let guard = Condition::equals(
            &self.config.attributes.timestamp,
            encode_timestamp(&receipt.timestamp),
        );

        let result = call_store(
            ctx,
            "acknowledge",
            self.store.update_item(
                &self.config.table_name,
                &receipt.id,
                updates,
                Some(guard),
            ),
        )
        .await?;

        Ok(match result {
            Ok(()) => AckOutcome::Acknowledged,
            Err(err) if err.is_conditional_check_failed() => AckOutcome::Conflict,
            Err(err) => AckOutcome::Failed(err),
        })
    }
}
