//! FileStore - MemoryStore persisted to a JSON snapshot
//!
//! Every mutation runs against a staged copy of the tables. The staged
//! snapshot is written to a sibling temp file and renamed over the store
//! file, and only then swapped into memory, so a failed or abandoned write
//! is never visible to readers. Mutations are serialized by a write gate so
//! an older snapshot can never overwrite a newer one. Rejected conditional
//! writes do not touch the file.

use crate::store::condition::Condition;
use crate::store::error::StoreResult;
use crate::store::fault::FaultInjector;
use crate::store::item::{Item, QueryPage, QueryRequest, TableSchema};
use crate::store::memory::{MemoryStore, Snapshot};
use crate::store::traits::KeyValueStore;
use async_trait::async_trait;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub struct FileStore {
    path: PathBuf,
    memory: MemoryStore,
    write_gate: Mutex<()>,
}

impl FileStore {
    /// Open the snapshot at `path`, starting empty if the file does not exist
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let snapshot: Snapshot = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Snapshot::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::new(),
            Err(e) => return Err(e.into()),
        };
        log::debug!(
            "Opened file store {} with {} table(s)",
            path.display(),
            snapshot.len()
        );

        Ok(Self {
            path,
            memory: MemoryStore::from_snapshot(snapshot),
            write_gate: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn faults(&self) -> &FaultInjector {
        self.memory.faults()
    }

    pub async fn get_item(&self, table: &str, key: &str) -> StoreResult<Option<Item>> {
        self.memory.get_item(table, key).await
    }

    /// Apply `op` to a staged copy, persist it, then make it current
    async fn commit<F, Fut>(&self, op: F) -> StoreResult<()>
    where
        F: FnOnce(MemoryStore) -> Fut,
        Fut: Future<Output = StoreResult<()>>,
    {
        let _gate = self.write_gate.lock().await;
        let staged = self.memory.staged(self.memory.snapshot().await);
        op(staged.clone()).await?;

        let snapshot = staged.snapshot().await;
        self.persist(&snapshot).await?;
        self.memory.replace(snapshot).await;
        Ok(())
    }

    async fn persist(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        log::trace!("Persisted {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn create_table(&self, schema: TableSchema) -> StoreResult<()> {
        self.commit(|staged| async move { staged.create_table(schema).await })
            .await
    }

    async fn delete_table(&self, table: &str) -> StoreResult<()> {
        self.commit(|staged| async move { staged.delete_table(table).await })
            .await
    }

    async fn describe_table(&self, table: &str) -> StoreResult<Option<TableSchema>> {
        self.memory.describe_table(table).await
    }

    async fn put_item(
        &self,
        table: &str,
        item: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()> {
        self.commit(|staged| async move { staged.put_item(table, item, condition).await })
            .await
    }

    async fn query(&self, request: QueryRequest) -> StoreResult<QueryPage> {
        self.memory.query(request).await
    }

    async fn update_item(
        &self,
        table: &str,
        key: &str,
        updates: Item,
        condition: Option<Condition>,
    ) -> StoreResult<()> {
        self.commit(|staged| async move {
            staged.update_item(table, key, updates, condition).await
        })
        .await
    }
}
