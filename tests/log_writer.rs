/// integration tests for the document log writer
///
use adapter_lib::config::{AdapterConfig, LogConfig};
use adapter_lib::log_sink::{
    DocumentLogWriter, DocumentStore, Exception, Level, LogMessage, LogWriter, MemoryStore,
    RequestContext, StoreRegistry,
};
use adapter_lib::{AdapterError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

/// a store whose inserts always fail
struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    fn is_available(&self) -> bool {
        true
    }

    async fn batch_insert(&self, _collection: &str, _documents: Vec<Value>) -> Result<()> {
        Err(AdapterError::provider("batch insert", "connection reset"))
    }
}

fn request() -> RequestContext {
    RequestContext::new("203.0.113.5", "Mozilla/5.0 (X11)", "/blog?tag=<rust>&page=2")
        .with_referrer("https://example.org/start")
}

fn time() -> DateTime<Utc> {
    "2024-02-29T23:59:58Z".parse().unwrap()
}

#[test]
fn exception_message_is_rewritten() {
    async_std::task::block_on(async move {
        let config = AdapterConfig::from_json(
            r#"{ "log": { "collection": "AppLogs", "name": "logs", "trace_level": "CRITICAL" } }"#,
        )
        .unwrap()
        .log;

        let store = MemoryStore::new();
        let mut registry = StoreRegistry::new();
        registry.register("logs", Arc::new(store.clone()));

        let writer = DocumentLogWriter::new(&config, &registry).expect("should create writer");

        let exc = Exception::new("PDOException", "gone away", "#0 db.rs(10): query()\n#1 {main}");
        let messages = vec![LogMessage::new(Level::Error, "x")
            .at(time())
            .with_exception(exc)];

        writer.write(&messages, &request()).await.unwrap();

        let docs = store.documents("AppLogs").await;
        assert_eq!(
            docs,
            vec![json!({
                "hostname": "203.0.113.5",
                "user_agent": "Mozilla/5.0 (X11)",
                "url": "/blog?tag=&lt;rust&gt;&amp;page=2",
                "refer": "https://example.org/start",
                "time": { "$date": 1709251198000i64 },
                "level": "CRITICAL",
                "body": "#0 db.rs(10): query()\n#1 {main}"
            })]
        );
    });
}

#[test]
fn batch_keeps_order_in_capped_collection() {
    async_std::task::block_on(async move {
        let config = LogConfig {
            capped_size: Some(2),
            ..LogConfig::default()
        };

        let store = MemoryStore::from_config(&config).await.unwrap();

        let writer = DocumentLogWriter::with_store(&config, Arc::new(store.clone())).unwrap();
        let messages: Vec<LogMessage> = ["one", "two", "three"]
            .iter()
            .map(|body| LogMessage::new(Level::Notice, body))
            .collect();

        writer.write(&messages, &request()).await.unwrap();
        writer.write(&[], &request()).await.unwrap();

        assert_eq!(store.batch_count(), 1);
        let bodies: Vec<Value> = store
            .documents("Logs")
            .await
            .iter()
            .map(|d| d["body"].clone())
            .collect();
        assert_eq!(bodies, vec![json!("two"), json!("three")]);
    });
}

#[test]
fn insert_failure_propagates() {
    async_std::task::block_on(async move {
        let writer = DocumentLogWriter::with_store(&LogConfig::default(), Arc::new(BrokenStore)).unwrap();
        let err = writer
            .write(&[LogMessage::new(Level::Info, "lost")], &request())
            .await
            .unwrap_err();

        match err {
            AdapterError::ProviderOperationFailed { operation, reason } => {
                assert_eq!(operation, "batch insert");
                assert_eq!(reason, "connection reset");
            }
            other => panic!("expected provider failure, got {:?}", other),
        }
    });
}

#[test]
fn writer_behind_trait_object() {
    async_std::task::block_on(async move {
        let store = MemoryStore::new();
        let writer: Box<dyn LogWriter> = Box::new(
            DocumentLogWriter::with_store(&LogConfig::default(), Arc::new(store.clone())).unwrap(),
        );

        let msg = LogMessage::new("warning".parse().unwrap(), "disk at 91%")
            .with_location("src/disk.rs", 31)
            .with_origin("Disk", "check");
        writer.write(&[msg], &RequestContext::default()).await.unwrap();

        let docs = store.documents("Logs").await;
        assert_eq!(docs[0]["level"], "WARNING");
        assert_eq!(docs[0]["file"], "src/disk.rs");
        assert_eq!(docs[0]["line"], 31);
        assert_eq!(docs[0]["function"], "check");
        assert_eq!(docs[0]["hostname"], "");
    });
}
