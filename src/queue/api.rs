//! Public API for the queue system
//!
//! Everything a caller needs to produce and consume records, in one import.
//! External modules should import from here rather than from the individual
//! queue, schema and store modules.

// Queue handles
pub use crate::queue::client::QueueClient;
pub use crate::queue::consumer::QueueConsumer;
pub use crate::queue::publisher::QueuePublisher;

// Records, receipts and outcomes
pub use crate::queue::ack::{AckOutcome, AckReport};
pub use crate::queue::record::{Receipt, Record};
pub use crate::queue::status::Status;

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};

// Configuration and provisioning
pub use crate::core::context::{CallContext, CancelToken};
pub use crate::schema::{
    create_schema, delete_schema, schema_exists, Destination, DestinationRegistry, QueueConfig,
};

// Store contract
pub use crate::store::KeyValueStore;
