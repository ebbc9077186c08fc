//! Base record attribute names

use crate::schema::error::{SchemaError, SchemaResult};

/// Names of the base attributes every record carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    /// Partition key of the table
    pub id: String,
    /// Sortable timestamp; range key of every destination index
    pub timestamp: String,
    pub payload_sum: String,
    pub provenance: String,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            timestamp: "timestamp".to_string(),
            payload_sum: "payload-sum".to_string(),
            provenance: "provenance".to_string(),
        }
    }
}

impl Attributes {
    pub fn names(&self) -> [&str; 4] {
        [
            self.id.as_str(),
            self.timestamp.as_str(),
            self.payload_sum.as_str(),
            self.provenance.as_str(),
        ]
    }

    pub fn validate(&self) -> SchemaResult<()> {
        let names = self.names();
        for (position, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::InvalidName {
                    field: "attribute name",
                    message: "attribute names must not be empty".to_string(),
                });
            }
            if names[..position].contains(name) {
                return Err(SchemaError::Duplicate {
                    field: "attribute name",
                    value: name.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().contains(&name)
    }
}
