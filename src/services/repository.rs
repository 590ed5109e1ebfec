use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{watch, RwLock};

use crate::services::appwrite::{AppwriteClient, AppwriteError};

/// Errors that can occur when reading or writing entities
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Document store error: {0}")]
    Store(#[from] AppwriteError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Entity storage keyed by id
///
/// The only way handlers and services touch the document database. Values
/// are whole entities; there are no partial field updates.
#[async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Clone + Send + Sync + 'static,
{
    /// Fetch an entity, `None` when it does not exist
    async fn get(&self, id: &str) -> Result<Option<T>, RepositoryError>;

    /// Entities whose serialized `field` equals `value`, in no particular order
    async fn find_by(&self, field: &str, value: &str) -> Result<Vec<T>, RepositoryError>;

    /// Create or replace an entity and notify its subscribers
    async fn put(&self, id: &str, value: &T) -> Result<(), RepositoryError>;

    /// Watch an entity; the receiver starts at the current value
    async fn subscribe(&self, id: &str) -> Result<watch::Receiver<Option<T>>, RepositoryError>;
}

/// Per-id watch channels shared by the repository implementations
struct Subscriptions<T> {
    senders: RwLock<HashMap<String, watch::Sender<Option<T>>>>,
}

impl<T> Subscriptions<T>
where
    T: Clone + PartialEq + Send + Sync,
{
    fn new() -> Self {
        Self {
            senders: RwLock::new(HashMap::new()),
        }
    }

    async fn publish(&self, id: &str, value: Option<T>) {
        if let Some(tx) = self.senders.read().await.get(id) {
            tx.send_replace(value);
        }
    }

    async fn subscribe(&self, id: &str, current: Option<T>) -> watch::Receiver<Option<T>> {
        let mut senders = self.senders.write().await;
        match senders.get(id) {
            Some(tx) => {
                tx.send_if_modified(|value| {
                    if *value == current {
                        false
                    } else {
                        *value = current;
                        true
                    }
                });
                tx.subscribe()
            }
            None => {
                let (tx, rx) = watch::channel(current);
                senders.insert(id.to_string(), tx);
                rx
            }
        }
    }
}

/// Process-local repository, used in tests and when no document store is configured
pub struct InMemoryRepository<T> {
    documents: RwLock<HashMap<String, T>>,
    subscriptions: Subscriptions<T>,
}

impl<T> InMemoryRepository<T>
where
    T: Clone + PartialEq + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            subscriptions: Subscriptions::new(),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl<T> Default for InMemoryRepository<T>
where
    T: Clone + PartialEq + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Clone + PartialEq + Serialize + Send + Sync + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<T>, RepositoryError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn find_by(&self, field: &str, value: &str) -> Result<Vec<T>, RepositoryError> {
        let documents = self.documents.read().await;
        let mut found = Vec::new();

        for document in documents.values() {
            let json = serde_json::to_value(document)?;
            if json.get(field).and_then(|v| v.as_str()) == Some(value) {
                found.push(document.clone());
            }
        }

        Ok(found)
    }

    async fn put(&self, id: &str, value: &T) -> Result<(), RepositoryError> {
        self.documents
            .write()
            .await
            .insert(id.to_string(), value.clone());
        self.subscriptions.publish(id, Some(value.clone())).await;
        Ok(())
    }

    async fn subscribe(&self, id: &str) -> Result<watch::Receiver<Option<T>>, RepositoryError> {
        let current = self.get(id).await?;
        Ok(self.subscriptions.subscribe(id, current).await)
    }
}

/// Typed view of one Appwrite collection
///
/// The REST API has no push channel, so subscribers observe the writes made
/// through this repository handle.
pub struct AppwriteRepository<T> {
    client: Arc<AppwriteClient>,
    collection: String,
    subscriptions: Subscriptions<T>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> AppwriteRepository<T>
where
    T: Clone + PartialEq + Send + Sync,
{
    pub fn new(client: Arc<AppwriteClient>, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
            subscriptions: Subscriptions::new(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<T> Repository<T> for AppwriteRepository<T>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<T>, RepositoryError> {
        match self.client.get_document(&self.collection, id).await? {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    async fn find_by(&self, field: &str, value: &str) -> Result<Vec<T>, RepositoryError> {
        self.client
            .list_documents(&self.collection, field, value)
            .await?
            .into_iter()
            .map(|data| serde_json::from_value(data).map_err(RepositoryError::from))
            .collect()
    }

    async fn put(&self, id: &str, value: &T) -> Result<(), RepositoryError> {
        let data = serde_json::to_value(value)?;
        self.client
            .upsert_document(&self.collection, id, data)
            .await?;
        self.subscriptions.publish(id, Some(value.clone())).await;
        Ok(())
    }

    async fn subscribe(&self, id: &str) -> Result<watch::Receiver<Option<T>>, RepositoryError> {
        let current = self.get(id).await?;
        Ok(self.subscriptions.subscribe(id, current).await)
    }
}
