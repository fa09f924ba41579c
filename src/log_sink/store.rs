use crate::config::LogConfig;
use crate::error::{AdapterError, Result};
use async_std::sync::Mutex;
use async_trait::async_trait;
use hashbrown::HashMap;
use log::*;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// the operations consumed from a document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// false when the client support is missing or disabled
    fn is_available(&self) -> bool;

    /// insert the documents, in order, as a single request
    async fn batch_insert(&self, collection: &str, documents: Vec<Value>) -> Result<()>;
}

/// database instances by name
#[derive(Clone, Default)]
pub struct StoreRegistry {
    stores: HashMap<String, Arc<dyn DocumentStore>>,
}

impl StoreRegistry {
    pub fn new() -> StoreRegistry {
        StoreRegistry::default()
    }

    pub fn register(&mut self, name: &str, store: Arc<dyn DocumentStore>) {
        self.stores.insert(name.to_string(), store);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn DocumentStore>> {
        self.stores.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.stores.keys().cloned().collect()
    }
}

impl std::fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[derive(Debug, Default)]
struct Collection {
    documents: VecDeque<Value>,
    capped: Option<usize>,
}

impl Collection {
    fn push(&mut self, doc: Value) {
        self.documents.push_back(doc);
        if let Some(max) = self.capped {
            while self.documents.len() > max {
                self.documents.pop_front();
            }
        }
    }
}

/// In-process document store. Clones share the same collections.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    available: bool,
    collections: Arc<Mutex<HashMap<String, Collection>>>,
    batches: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore {
            available: true,
            collections: Arc::new(Mutex::new(HashMap::new())),
            batches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// a store holding the configured log collection, capped when `capped_size` is set
    pub async fn from_config(config: &LogConfig) -> Result<MemoryStore> {
        let store = MemoryStore::new();
        if let Some(size) = config.capped_size {
            store.create_capped(&config.collection, size).await?;
        }

        Ok(store)
    }

    /// a store whose client support is missing
    pub fn unavailable() -> MemoryStore {
        MemoryStore {
            available: false,
            ..MemoryStore::new()
        }
    }

    /// Create a capped collection that keeps only the newest `size` documents.
    /// Capping an existing collection trims it immediately.
    pub async fn create_capped(&self, collection: &str, size: usize) -> Result<()> {
        if size == 0 {
            return Err(AdapterError::provider(
                "create collection",
                format!("capped collection {} needs a size above zero", collection),
            ));
        }

        let mut map = self.collections.lock().await;
        let coll = map.entry(collection.to_string()).or_default();
        coll.capped = Some(size);
        while coll.documents.len() > size {
            coll.documents.pop_front();
        }

        info!("capped collection {} at {} documents", collection, size);

        Ok(())
    }

    /// the collection's documents, oldest first
    pub async fn documents(&self, collection: &str) -> Vec<Value> {
        let map = self.collections.lock().await;
        map.get(collection)
            .map(|c| c.documents.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// the number of batch inserts received
    pub fn batch_count(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn batch_insert(&self, collection: &str, documents: Vec<Value>) -> Result<()> {
        if !self.available {
            return Err(AdapterError::provider("batch insert", "document store is not available"));
        }

        if let Some(pos) = documents.iter().position(|d| !d.is_object()) {
            return Err(AdapterError::provider(
                "batch insert",
                format!("document {} is not an object", pos),
            ));
        }

        let mut map = self.collections.lock().await;
        let coll = map.entry(collection.to_string()).or_default();

        debug!("insert {} documents into {}", documents.len(), collection);
        for doc in documents {
            coll.push(doc);
        }
        self.batches.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}
