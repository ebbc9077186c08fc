//! Item and table schema types
//!
//! The store is schemaless apart from the keys it indexes on: an item is a
//! flat map of string attributes, and a table declares only its hash key and
//! the secondary indexes derived from its items.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored item: attribute name to string value
pub type Item = BTreeMap<String, String>;

/// Secondary index declaration
///
/// An item belongs to the index when it carries both the `hash_key` and the
/// `range_key` attribute. Within one hash value, items are ordered by the
/// range value (text order) and then by primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    pub name: String,
    pub hash_key: String,
    pub range_key: String,
}

/// Table declaration: primary hash key plus secondary indexes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub hash_key: String,
    #[serde(default)]
    pub indexes: Vec<IndexSchema>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, hash_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash_key: hash_key.into(),
            indexes: Vec::new(),
        }
    }

    pub fn with_index(
        mut self,
        name: impl Into<String>,
        hash_key: impl Into<String>,
        range_key: impl Into<String>,
    ) -> Self {
        self.indexes.push(IndexSchema {
            name: name.into(),
            hash_key: hash_key.into(),
            range_key: range_key.into(),
        });
        self
    }

    pub fn index(&self, name: &str) -> Option<&IndexSchema> {
        self.indexes.iter().find(|index| index.name == name)
    }
}

/// Continuation token returned with a partial query page
///
/// Identifies the last item of the page by its index range value and primary
/// key; the next query resumes strictly after it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageToken {
    pub range_value: String,
    pub primary_key: String,
}

/// Query against one secondary index partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub table: String,
    pub index: String,
    /// Value the index hash key must equal
    pub partition_value: String,
    /// Attributes to return; empty returns the whole item
    pub projection: Vec<String>,
    /// Page size hint
    pub limit: Option<usize>,
    pub exclusive_start_key: Option<PageToken>,
}

impl QueryRequest {
    pub fn new(
        table: impl Into<String>,
        index: impl Into<String>,
        partition_value: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            index: index.into(),
            partition_value: partition_value.into(),
            projection: Vec::new(),
            limit: None,
            exclusive_start_key: None,
        }
    }

    pub fn with_projection<I, T>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.projection = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn starting_after(mut self, token: Option<PageToken>) -> Self {
        self.exclusive_start_key = token;
        self
    }
}

/// One page of query results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPage {
    pub items: Vec<Item>,
    /// Present when more items remain in the partition
    pub last_evaluated_key: Option<PageToken>,
}
