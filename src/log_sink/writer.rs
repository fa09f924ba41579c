use crate::config::LogConfig;
use crate::error::{AdapterError, Result};
use crate::log_sink::record::{Enrichment, LogRecord};
use crate::log_sink::store::{DocumentStore, StoreRegistry};
use crate::log_sink::{Level, LogMessage, RequestContext};
use async_trait::async_trait;
use log::*;
use std::sync::Arc;

/// a destination for batches of log messages
#[async_trait]
pub trait LogWriter: Send + Sync {
    async fn write(&self, messages: &[LogMessage], ctx: &RequestContext) -> Result<()>;
}

/// Writes each batch into one document collection with a single batch insert.
pub struct DocumentLogWriter {
    collection: String,
    name: String,
    trace_level: Level,
    store: Arc<dyn DocumentStore>,
}

impl DocumentLogWriter {
    /// Look up the configured database instance. Fails when the instance is not
    /// registered or its client support is unavailable.
    pub fn new(config: &LogConfig, registry: &StoreRegistry) -> Result<DocumentLogWriter> {
        let store = registry.get(&config.name).ok_or_else(|| {
            AdapterError::unavailable(
                format!("document store {}", config.name),
                "no database instance registered under this name",
            )
        })?;

        DocumentLogWriter::with_store(config, store)
    }

    pub fn with_store(config: &LogConfig, store: Arc<dyn DocumentStore>) -> Result<DocumentLogWriter> {
        if !store.is_available() {
            return Err(AdapterError::unavailable(
                format!("document store {}", config.name),
                "the database client is not installed or is disabled",
            ));
        }

        info!(
            "log writer ready, instance: {}, collection: {}",
            config.name, config.collection
        );

        Ok(DocumentLogWriter {
            collection: config.collection.clone(),
            name: config.name.clone(),
            trace_level: config.trace_level,
            store,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trace_level(&self) -> Level {
        self.trace_level
    }

    /// the records a batch would be written as
    pub fn records(&self, messages: &[LogMessage], ctx: &RequestContext) -> Vec<LogRecord> {
        let info = Enrichment::from_context(ctx);
        messages
            .iter()
            .map(|msg| LogRecord::build(msg, &info, self.trace_level))
            .collect()
    }
}

#[async_trait]
impl LogWriter for DocumentLogWriter {
    async fn write(&self, messages: &[LogMessage], ctx: &RequestContext) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let documents = self
            .records(messages, ctx)
            .iter()
            .map(LogRecord::to_document)
            .collect::<Result<Vec<_>>>()?;

        debug!("writing {} log records to {}", documents.len(), self.collection);

        self.store.batch_insert(&self.collection, documents).await
    }
}

impl std::fmt::Debug for DocumentLogWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentLogWriter")
            .field("collection", &self.collection)
            .field("name", &self.name)
            .field("trace_level", &self.trace_level)
            .finish()
    }
}
