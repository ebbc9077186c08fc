//! Queue Schema
//!
//! Describes the shape of the shared table: the base attributes every record
//! carries, the destinations reading from it, and the table name. From that
//! description it derives the table declaration (hash key `id`, one status
//! index per destination) and provisions it in a store.
//!
//! ```text
//! record: id | timestamp | payload-sum | provenance | primary-status | secondary-status
//!                 │                                        │                 │
//!                 └──── range key of ────┬─────────────────┘                 │
//!                                        ▼                                   ▼
//!                          primary-status-index            secondary-status-index
//! ```

mod attributes;
mod config;
mod destination;
mod error;
mod provision;

pub use attributes::Attributes;
pub use config::{QueueConfig, DEFAULT_TABLE_NAME};
pub use destination::{Destination, DestinationRegistry};
pub use error::{SchemaError, SchemaResult};
pub use provision::{create_schema, delete_schema, schema_exists};
