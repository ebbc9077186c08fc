//! Sprinkler: a multi-consumer queue over a conditional-write key-value store
//!
//! Producers write records once into a shared table; every registered
//! destination reads them through its own status index, oldest first, and
//! acknowledges them independently. See [`queue`] for the protocols and
//! [`queue::api`] for the public surface.

pub mod app;
pub mod core;
pub mod queue;
pub mod schema;
pub mod store;
