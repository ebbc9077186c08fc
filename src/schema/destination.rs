//! Destinations and the destination registry
//!
//! A destination is one independent consumer group. It owns a status
//! attribute on every record and a secondary index partitioned by that
//! attribute and sorted by timestamp, so each destination reads the shared
//! event log as its own ordered queue.

use crate::schema::error::{SchemaError, SchemaResult};

/// One consumer group: logical name plus its status attribute and index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub name: String,
    pub status_attribute: String,
    pub status_index: String,
}

impl Destination {
    pub fn new(
        name: impl Into<String>,
        status_attribute: impl Into<String>,
        status_index: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status_attribute: status_attribute.into(),
            status_index: status_index.into(),
        }
    }

    /// Conventional naming: `<name>-status` attribute, `<name>-status-index` index
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let status_attribute = format!("{}-status", name);
        let status_index = format!("{}-index", status_attribute);
        Self::new(name, status_attribute, status_index)
    }

    pub fn primary() -> Self {
        Self::named("primary")
    }

    pub fn secondary() -> Self {
        Self::named("secondary")
    }
}

/// Fixed, ordered set of destinations
///
/// Built once and read-only afterwards. Construction rejects an empty set and
/// any duplicated name, status attribute or index name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRegistry {
    destinations: Vec<Destination>,
}

impl Default for DestinationRegistry {
    fn default() -> Self {
        Self {
            destinations: vec![Destination::primary(), Destination::secondary()],
        }
    }
}

impl DestinationRegistry {
    pub fn new(destinations: Vec<Destination>) -> SchemaResult<Self> {
        if destinations.is_empty() {
            return Err(SchemaError::EmptyRegistry);
        }

        for (position, destination) in destinations.iter().enumerate() {
            let fields = [
                ("name", &destination.name),
                ("status attribute", &destination.status_attribute),
                ("status index", &destination.status_index),
            ];
            for (field, value) in fields {
                if value.trim().is_empty() {
                    return Err(SchemaError::InvalidName {
                        field,
                        message: format!("destination #{} has an empty {}", position + 1, field),
                    });
                }
            }

            let earlier = &destinations[..position];
            if earlier.iter().any(|d| d.name == destination.name) {
                return Err(SchemaError::Duplicate {
                    field: "name",
                    value: destination.name.clone(),
                });
            }
            if earlier
                .iter()
                .any(|d| d.status_attribute == destination.status_attribute)
            {
                return Err(SchemaError::Duplicate {
                    field: "status attribute",
                    value: destination.status_attribute.clone(),
                });
            }
            if earlier
                .iter()
                .any(|d| d.status_index == destination.status_index)
            {
                return Err(SchemaError::Duplicate {
                    field: "status index",
                    value: destination.status_index.clone(),
                });
            }
        }

        Ok(Self { destinations })
    }

    pub fn get(&self, name: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.destinations.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

impl<'a> IntoIterator for &'a DestinationRegistry {
    type Item = &'a Destination;
    type IntoIter = std::slice::Iter<'a, Destination>;

    fn into_iter(self) -> Self::IntoIter {
        self.destinations.iter()
    }
}
