//! The key-value store contract the queue protocols are written against

use crate::store::condition::Condition;
use crate::store::error::StoreResult;
use crate::store::item::{Item, QueryPage, QueryRequest, TableSchema};
use async_trait::async_trait;
use std::sync::Arc;

/// Schemaless key-value store with conditional writes and secondary indexes
///
/// Every method is a single request/response exchange. Base-table writes are
/// expected to be strongly consistent; index reads may lag behind writes.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Create a table. Fails with `ResourceInUse` if it already exists.
    async fn create_table(&self, schema: TableSchema) -> StoreResult<()>;

    /// Delete a table and all of its items. Fails with `ResourceNotFound`.
    async fn delete_table(&self, table: &str) -> StoreResult<()>;

    /// Return the table declaration, `None` when the table does not exist
    async fn describe_table(&self, table: &str) -> StoreResult<Option<TableSchema>>;

    /// Insert or replace the item keyed by the table's hash key
    ///
    /// When a condition is given and does not hold for the existing item,
    /// nothing is written and `ConditionalCheckFailed` is returned.
    async fn put_item(
        &self,
        table: &str,
        item: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()>;

    /// Read one page of an index partition in ascending range order
    async fn query(&self, request: QueryRequest) -> StoreResult<QueryPage>;

    /// Set attributes on the item with the given hash key value
    ///
    /// Creates the item when it does not exist and the condition (if any)
    /// allows it.
    async fn update_item(
        &self,
        table: &str,
        key: &str,
        updates: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn create_table(&self, schema: TableSchema) -> StoreResult<()> {
        (**self).create_table(schema).await
    }

    async fn delete_table(&self, table: &str) -> StoreResult<()> {
        (**self).delete_table(table).await
    }

    async fn describe_table(&self, table: &str) -> StoreResult<Option<TableSchema>> {
        (**self).describe_table(table).await
    }

    async fn put_item(
        &self,
        table: &str,
        item: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()> {
        (**self).put_item(table, item, condition).await
    }

    async fn query(&self, request: QueryRequest) -> StoreResult<QueryPage> {
        (**self).query(request).await
    }

    async fn update_item(
        &self,
        table: &str,
        key: &str,
        updates: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()> {
        (**self).update_item(table, key, updates, condition).await
    }
}
