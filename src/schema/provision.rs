//! Table provisioning: create, delete and check for the queue table

use crate::core::context::CallContext;
use crate::queue::call::call;
use crate::queue::QueueResult;
use crate::schema::config::QueueConfig;
use crate::store::KeyValueStore;

/// Create the table with one status index per registered destination
///
/// Fails with `ResourceInUse` (wrapped in `QueueError::Store`) when the table
/// already exists.
pub async fn create_schema<S>(store: &S, config: &QueueConfig, ctx: &CallContext) -> QueueResult<()>
where
    S: KeyValueStore + ?Sized,
{
    let schema = config.table_schema();
    let indexes = schema.indexes.len();
    call(ctx, "create table", store.create_table(schema)).await?;
    log::info!(
        "Created table '{}' with {} destination indexes",
        config.table_name,
        indexes
    );
    Ok(())
}

/// Delete the table and every record in it
pub async fn delete_schema<S>(store: &S, config: &QueueConfig, ctx: &CallContext) -> QueueResult<()>
where
    S: KeyValueStore + ?Sized,
{
    call(ctx, "delete table", store.delete_table(&config.table_name)).await?;
    log::info!("Deleted table '{}'", config.table_name);
    Ok(())
}

/// Whether the table exists; store failures are errors, not `false`
pub async fn schema_exists<S>(store: &S, config: &QueueConfig, ctx: &CallContext) -> QueueResult<bool>
where
    S: KeyValueStore + ?Sized,
{
    let described = call(ctx, "describe table", store.describe_table(&config.table_name)).await?;
    Ok(described.is_some())
}
