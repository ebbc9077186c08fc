//! Key-Value Store Abstraction
//!
//! The queue is built on a store that offers exactly three data primitives
//! plus table administration:
//!
//! - **conditional put**: insert or replace an item only if a predicate over
//!   the existing item holds
//! - **paginated index query**: read one status partition of a secondary
//!   index in ascending range order, resuming from a continuation token
//! - **conditional update**: set attributes only if a predicate holds
//!
//! ```text
//!            put_item / update_item                    query
//!   producer ───────────────┐            ┌───────────── consumer
//!                           ▼            │
//!                ┌──────────────────┐    │   ┌─────────────────────────┐
//!                │ table (hash: id) │────┴──▶│ index per destination   │
//!                └──────────────────┘        │ hash: status, range: ts │
//!                                            └─────────────────────────┘
//! ```
//!
//! Two backends are provided: [`MemoryStore`] for tests and embedding, and
//! [`FileStore`] which persists a `MemoryStore` snapshot as JSON.

mod condition;
mod error;
mod fault;
mod file;
mod item;
mod memory;
mod traits;

pub use condition::Condition;
pub use error::{StoreError, StoreResult};
pub use fault::{FaultInjector, Operation};
pub use file::FileStore;
pub use item::{IndexSchema, Item, PageToken, QueryPage, QueryRequest, TableSchema};
pub use memory::{MemoryStore, Snapshot, StoredTable, DEFAULT_PAGE_SIZE};
pub use traits::KeyValueStore;
