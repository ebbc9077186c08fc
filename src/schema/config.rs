//! Queue configuration: table name, attribute names and destinations
//!
//! A `QueueConfig` is an explicit value built once per process (or per test)
//! and passed to every component by reference. Nothing in the crate keeps or
//! mutates a shared default.

use crate::schema::attributes::Attributes;
use crate::schema::destination::{Destination, DestinationRegistry};
use crate::schema::error::{SchemaError, SchemaResult};
use crate::store::TableSchema;

pub const DEFAULT_TABLE_NAME: &str = "sprinkler";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    pub table_name: String,
    pub attributes: Attributes,
    pub destinations: DestinationRegistry,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            attributes: Attributes::default(),
            destinations: DestinationRegistry::default(),
        }
    }
}

impl QueueConfig {
    pub fn new(
        table_name: impl Into<String>,
        attributes: Attributes,
        destinations: DestinationRegistry,
    ) -> SchemaResult<Self> {
        let config = Self {
            table_name: table_name.into(),
            attributes,
            destinations,
        };
        config.validate()?;
        Ok(config)
    }

    /// Default attributes and destinations on a different table
    pub fn for_table(table_name: impl Into<String>) -> SchemaResult<Self> {
        Self::new(
            table_name,
            Attributes::default(),
            DestinationRegistry::default(),
        )
    }

    /// Check that no status attribute collides with a base attribute
    pub fn validate(&self) -> SchemaResult<()> {
        if self.table_name.trim().is_empty() {
            return Err(SchemaError::InvalidName {
                field: "table name",
                message: "table name must not be empty".to_string(),
            });
        }
        self.attributes.validate()?;
        for destination in &self.destinations {
            if self.attributes.contains(&destination.status_attribute) {
                return Err(SchemaError::Duplicate {
                    field: "status attribute",
                    value: destination.status_attribute.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn destination(&self, name: &str) -> Option<&Destination> {
        self.destinations.get(name)
    }

    /// Table declaration the queue protocols depend on
    ///
    /// `id` is the hash key; each destination gets an index partitioned by its
    /// status attribute and sorted by timestamp.
    pub fn table_schema(&self) -> TableSchema {
        self.destinations.iter().fold(
            TableSchema::new(&self.table_name, &self.attributes.id),
            |schema, destination| {
                schema.with_index(
                    &destination.status_index,
                    &destination.status_attribute,
                    &self.attributes.timestamp,
                )
            },
        )
    }
}
