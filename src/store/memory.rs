//! MemoryStore - in-process key-value store with derived secondary indexes
//!
//! Tables live in a `HashMap` behind one async `RwLock`; each primitive takes
//! the lock once, so a conditional write is an atomic compare-and-swap on a
//! single item. Secondary indexes are derived at query time from the items
//! that carry the index keys, which makes them read-your-writes consistent
//! (stricter than the contract requires).

use crate::store::condition::Condition;
use crate::store::error::{StoreError, StoreResult};
use crate::store::fault::{FaultInjector, Operation};
use crate::store::item::{Item, PageToken, QueryPage, QueryRequest, TableSchema};
use crate::store::traits::KeyValueStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Items returned per query page when the request carries no limit
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Serializable table contents, shared with the file-backed store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTable {
    pub schema: TableSchema,
    #[serde(default)]
    pub items: BTreeMap<String, Item>,
}

/// Full store contents keyed by table name
pub type Snapshot = BTreeMap<String, StoredTable>;

/// In-memory store backend. Clone-friendly via Arc.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, StoredTable>>>,
    faults: Arc<FaultInjector>,
    page_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            faults: Arc::new(FaultInjector::new()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Cap every query page at `page_size` items regardless of the request limit
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let store = Self::new();
        let tables = snapshot.into_iter().collect::<HashMap<_, _>>();
        Self {
            tables: Arc::new(RwLock::new(tables)),
            ..store
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        let tables = self.tables.read().await;
        tables
            .iter()
            .map(|(name, table)| (name.clone(), table.clone()))
            .collect()
    }

    /// Fresh tables holding `snapshot`, sharing this store's faults and page size
    pub(crate) fn staged(&self, snapshot: Snapshot) -> Self {
        Self {
            tables: Arc::new(RwLock::new(snapshot.into_iter().collect())),
            faults: Arc::clone(&self.faults),
            page_size: self.page_size,
        }
    }

    /// Swap the whole contents for `snapshot`
    pub(crate) async fn replace(&self, snapshot: Snapshot) {
        let mut tables = self.tables.write().await;
        *tables = snapshot.into_iter().collect();
    }

    /// Fault injection handle shared by all clones of this store
    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    /// Read a single item directly, bypassing indexes
    pub async fn get_item(&self, table: &str, key: &str) -> StoreResult<Option<Item>> {
        let tables = self.tables.read().await;
        let stored = tables.get(table).ok_or_else(|| table_not_found(table))?;
        Ok(stored.items.get(key).cloned())
    }

    pub async fn item_count(&self, table: &str) -> StoreResult<usize> {
        let tables = self.tables.read().await;
        let stored = tables.get(table).ok_or_else(|| table_not_found(table))?;
        Ok(stored.items.len())
    }

    fn page_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.page_size).clamp(1, self.page_size)
    }
}

fn table_not_found(table: &str) -> StoreError {
    StoreError::ResourceNotFound {
        resource: format!("table '{}'", table),
    }
}

fn check_condition(condition: Option<&Condition>, existing: Option<&Item>) -> StoreResult<()> {
    match condition {
        Some(condition) if !condition.evaluate(existing) => {
            log::trace!("Condition rejected write: {}", condition);
            Err(StoreError::ConditionalCheckFailed)
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn create_table(&self, schema: TableSchema) -> StoreResult<()> {
        self.faults.before(Operation::CreateTable).await?;
        if schema.name.is_empty() || schema.hash_key.is_empty() {
            return Err(StoreError::Validation {
                message: "table name and hash key must not be empty".to_string(),
            });
        }

        let mut tables = self.tables.write().await;
        if tables.contains_key(&schema.name) {
            return Err(StoreError::ResourceInUse {
                resource: format!("table '{}'", schema.name),
            });
        }
        log::debug!(
            "Creating table '{}' with {} index(es)",
            schema.name,
            schema.indexes.len()
        );
        tables.insert(
            schema.name.clone(),
            StoredTable {
                schema,
                items: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn delete_table(&self, table: &str) -> StoreResult<()> {
        self.faults.before(Operation::DeleteTable).await?;
        let mut tables = self.tables.write().await;
        tables
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| table_not_found(table))
    }

    async fn describe_table(&self, table: &str) -> StoreResult<Option<TableSchema>> {
        self.faults.before(Operation::DescribeTable).await?;
        let tables = self.tables.read().await;
        Ok(tables.get(table).map(|stored| stored.schema.clone()))
    }

    async fn put_item(
        &self,
        table: &str,
        item: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()> {
        self.faults.before(Operation::PutItem).await?;
        let mut tables = self.tables.write().await;
        let stored = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;

        let key = item
            .get(&stored.schema.hash_key)
            .filter(|key| !key.is_empty())
            .cloned()
            .ok_or_else(|| StoreError::Validation {
                message: format!("item is missing hash key '{}'", stored.schema.hash_key),
            })?;

        check_condition(condition.as_ref(), stored.items.get(&key))?;
        stored.items.insert(key, item);
        Ok(())
    }

    async fn query(&self, request: QueryRequest) -> StoreResult<QueryPage> {
        self.faults.before(Operation::Query).await?;
        let tables = self.tables.read().await;
        let stored = tables
            .get(&request.table)
            .ok_or_else(|| table_not_found(&request.table))?;
        let index = stored
            .schema
            .index(&request.index)
            .ok_or_else(|| StoreError::ResourceNotFound {
                resource: format!("index '{}' on table '{}'", request.index, request.table),
            })?;

        let mut partition: Vec<(PageToken, &Item)> = stored
            .items
            .iter()
            .filter(|(_, item)| item.get(&index.hash_key) == Some(&request.partition_value))
            .filter_map(|(key, item)| {
                item.get(&index.range_key).map(|range_value| {
                    let token = PageToken {
                        range_value: range_value.clone(),
                        primary_key: key.clone(),
                    };
                    (token, item)
                })
            })
            .filter(|(token, _)| {
                request
                    .exclusive_start_key
                    .as_ref()
                    .map_or(true, |start| token > start)
            })
            .collect();
        partition.sort_by(|a, b| a.0.cmp(&b.0));

        let limit = self.page_limit(request.limit);
        let has_more = partition.len() > limit;
        partition.truncate(limit);

        let last_evaluated_key = if has_more {
            partition.last().map(|(token, _)| token.clone())
        } else {
            None
        };

        let items = partition
            .into_iter()
            .map(|(_, item)| {
                if request.projection.is_empty() {
                    item.clone()
                } else {
                    item.iter()
                        .filter(|(name, _)| request.projection.contains(name))
                        .map(|(name, value)| (name.clone(), value.clone()))
                        .collect()
                }
            })
            .collect();

        Ok(QueryPage {
            items,
            last_evaluated_key,
        })
    }

    async fn update_item(
        &self,
        table: &str,
        key: &str,
        updates: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()> {
        self.faults.before(Operation::UpdateItem).await?;
        if key.is_empty() {
            return Err(StoreError::Validation {
                message: "update key must not be empty".to_string(),
            });
        }

        let mut tables = self.tables.write().await;
        let stored = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        if updates.contains_key(&stored.schema.hash_key) {
            return Err(StoreError::Validation {
                message: format!("cannot update key attribute '{}'", stored.schema.hash_key),
            });
        }

        check_condition(condition.as_ref(), stored.items.get(key))?;

        let hash_key = stored.schema.hash_key.clone();
        let item = stored.items.entry(key.to_string()).or_insert_with(|| {
            let mut fresh = Item::new();
            fresh.insert(hash_key, key.to_string());
            fresh
        });
        item.extend(updates);
        Ok(())
    }
}
