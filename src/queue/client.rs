//! Queue client: the entry point handing out publishers and consumers

use crate::queue::consumer::QueueConsumer;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::publisher::QueuePublisher;
use crate::schema::{QueueConfig, SchemaResult};
use crate::store::KeyValueStore;
use std::sync::Arc;

/// Binds a store to a queue configuration
///
/// Every publisher and consumer created from one client shares its store and
/// configuration. Several clients over the same store and table see the same
/// records.
pub struct QueueClient<S: ?Sized> {
    store: Arc<S>,
    config: Arc<QueueConfig>,
}

impl<S: ?Sized> Clone for QueueClient<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: KeyValueStore + ?Sized> QueueClient<S> {
    /// Validates the configuration before accepting it
    pub fn new(store: Arc<S>, config: QueueConfig) -> SchemaResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn create_publisher(&self) -> QueuePublisher<S> {
        QueuePublisher::new(Arc::clone(&self.store), Arc::clone(&self.config))
    }

    /// Consumer for the destination registered under `destination`
    pub fn create_consumer(&self, destination: &str) -> QueueResult<QueueConsumer<S>> {
        let destination =
            self.config
                .destination(destination)
                .ok_or_else(|| QueueError::UnknownDestination {
                    name: destination.to_string(),
                })?;
        Ok(QueueConsumer::new(
            Arc::clone(&self.store),
            Arc::clone(&self.config),
            destination.clone(),
        ))
    }
}
