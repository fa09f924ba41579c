use crate::cache::CacheProvider;
use crate::error::{AdapterError, Result};
use anyhow::Result as TaskResult;
use async_channel::{bounded, Receiver, Sender};
use async_trait::async_trait;
use hashbrown::HashMap;
use log::*;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::worker::{create_id, JsonString, Uptime, WorkerState, WorkerStatus, DOWN, OK};

/// the request queue depth for a provider worker
pub const QUEUE_SIZE: usize = 250;

#[derive(Debug, Clone)]
pub enum Command {
    Store(String, Value, Option<Duration>, Sender<bool>),
    Fetch(String, Sender<Option<Value>>),
    Delete(String, Sender<bool>),
    Clear(Sender<bool>),
    Keys(Sender<Vec<String>>),
    Add(String, i64, Sender<std::result::Result<i64, String>>), // adjust an integer entry by a signed step
    Len(Sender<usize>),
    Status(Sender<JsonString>), // request the worker's status
    Shutdown,
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: Value, ttl: Option<Duration>) -> Entry {
        Entry::stored_at(value, ttl, Instant::now())
    }

    /// a ttl too large to represent as an instant never expires
    fn stored_at(value: Value, ttl: Option<Duration>, now: Instant) -> Entry {
        let expires_at = ttl
            .filter(|ttl| !ttl.is_zero())
            .and_then(|ttl| now.checked_add(ttl));

        Entry { value, expires_at }
    }

    /// apply a signed step to an integer value
    fn add(&mut self, key: &str, step: i64) -> std::result::Result<i64, String> {
        let n = self
            .value
            .as_i64()
            .ok_or_else(|| format!("{} is not an integer", key))?;
        let n = n
            .checked_add(step)
            .ok_or_else(|| format!("{} would overflow adding {}", key, step))?;

        self.value = Value::from(n);
        Ok(n)
    }

    fn is_live(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(at) => at > now,
            None => true,
        }
    }
}

// the handler loop
pub async fn handler(id: String, rx: Receiver<Command>) -> TaskResult<()> {
    let uptime = Uptime::new();
    let mut state = WorkerState::Idle;
    let mut error_count = 0;

    let mut cache: HashMap<String, Entry> = HashMap::new();

    // now read and respond to requests
    while let Ok(cmd) = rx.recv().await {
        debug!("recv cmd: {:?}", cmd);
        match cmd {
            Command::Store(key, value, ttl, tx) => {
                cache.insert(key, Entry::new(value, ttl));
                error_count += send_response(true, tx).await;
            }
            Command::Fetch(key, tx) => {
                let now = Instant::now();
                let value = match cache.get(&key).map(|e| e.is_live(now)) {
                    Some(true) => cache.get(&key).map(|e| e.value.clone()),
                    Some(false) => {
                        debug!("expired key: {}", key);
                        cache.remove(&key);
                        None
                    }
                    None => None,
                };
                error_count += send_response(value, tx).await;
            }
            Command::Delete(key, tx) => {
                let now = Instant::now();
                let removed = cache.remove(&key).map(|e| e.is_live(now)).unwrap_or(false);
                error_count += send_response(removed, tx).await;
            }
            Command::Clear(tx) => {
                info!("clear {} entries", cache.len());
                cache.clear();
                error_count += send_response(true, tx).await;
            }
            Command::Keys(tx) => {
                let now = Instant::now();
                cache.retain(|_, entry| entry.is_live(now));
                let list: Vec<String> = cache.keys().cloned().collect();
                error_count += send_response(list, tx).await;
            }
            Command::Add(key, step, tx) => {
                let now = Instant::now();
                let result = match cache.get_mut(&key) {
                    Some(entry) if entry.is_live(now) => entry.add(&key, step),
                    _ => Err(format!("{} is missing", key)),
                };
                if let Err(reason) = &result {
                    warn!("add {}: {}", step, reason);
                }
                error_count += send_response(result, tx).await;
            }
            Command::Len(tx) => {
                let now = Instant::now();
                let sz = cache.values().filter(|e| e.is_live(now)).count();
                error_count += send_response(sz, tx).await;
            }
            Command::Status(tx) => {
                let status = WorkerStatus::new(
                    id.to_string(),
                    OK.to_string(),
                    state.clone(),
                    uptime.to_string(),
                    error_count,
                );

                let msg = match serde_json::to_string(&status) {
                    Ok(js) => js,
                    Err(e) => {
                        format!(r#"{}"status":"json parse error: {:?}"{}"#, "{", e, "}\n")
                    }
                };

                info!("status response: {}", msg);
                if tx.send(msg).await.is_err() {
                    error_count += 1;
                    error!("error returning status to channel: {:?}", tx);
                }
            }
            Command::Shutdown => {
                state = WorkerState::Shutdown;
                info!("worker id: {}, state: {:?}", id, state);
                break;
            }
        }
    }

    // helper functions
    async fn send_response<T>(msg: T, tx: Sender<T>) -> u16 {
        if let Err(e) = tx.send(msg).await {
            error!("error sending response: {}", e);
            1u16
        } else {
            0u16
        }
    }

    rx.close();

    Ok(())
}

/// In-process shared cache. Clones share one worker and one set of entries.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    id: String,
    uptime: Uptime,
    enabled: bool,
    request_tx: Sender<Command>,
}

impl MemoryProvider {
    /// create and start a new provider worker.
    pub fn new() -> MemoryProvider {
        let uptime = Uptime::new();
        let id = create_id();

        // this is for the provider struct
        let wid = id.clone();

        info!("starting up cache worker, id: {}", id);

        let (request_tx, request_receiver) = bounded(QUEUE_SIZE);

        // run the handler loop as a background task
        async_std::task::spawn(async move {
            match handler(id.clone(), request_receiver).await {
                Ok(()) => info!("cache worker handler exit for worker id: {}", id),
                Err(e) => error!("cache worker exit with error: {:?}", e),
            }
        });

        MemoryProvider {
            id: wid,
            uptime,
            enabled: true,
            request_tx,
        }
    }

    /// a provider whose facility is switched off; every request fails and adapters refuse it
    pub fn disabled() -> MemoryProvider {
        let (request_tx, _) = bounded(1);

        MemoryProvider {
            id: create_id(),
            uptime: Uptime::new(),
            enabled: false,
            request_tx,
        }
    }

    /// return the worker's id
    pub fn id(&self) -> String {
        self.id.to_string()
    }

    pub fn get_uptime(&self) -> String {
        self.uptime.to_string()
    }

    /// This is invoked by the client to enable sending command request to
    /// the worker
    pub fn request_channel(&self) -> Sender<Command> {
        self.request_tx.clone()
    }

    /// the number of live entries
    pub async fn len(&self) -> Result<usize> {
        self.request("len", Command::Len).await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// the worker's status as json; a stopped worker reports down
    pub async fn status(&self) -> JsonString {
        match self.request("status", Command::Status).await {
            Ok(js) => js,
            Err(e) => {
                warn!("status request failed: {}", e);
                let status = WorkerStatus::new(
                    self.id(),
                    DOWN.to_string(),
                    WorkerState::Broken,
                    self.get_uptime(),
                    0,
                );
                serde_json::to_string(&status).unwrap_or_default()
            }
        }
    }

    /// stop the worker; entries are dropped with it
    pub async fn shutdown(&self) -> Result<()> {
        self.request_tx
            .send(Command::Shutdown)
            .await
            .map_err(|e| AdapterError::provider("shutdown", e.to_string()))
    }

    async fn request<T, F>(&self, operation: &str, build: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(Sender<T>) -> Command + Send,
    {
        let (tx, rx) = bounded(1);
        self.request_tx
            .send(build(tx))
            .await
            .map_err(|e| AdapterError::provider(operation, e.to_string()))?;

        rx.recv()
            .await
            .map_err(|e| AdapterError::provider(operation, e.to_string()))
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        MemoryProvider::new()
    }
}

#[async_trait]
impl CacheProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory cache"
    }

    fn driver(&self) -> &str {
        "memory"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn store(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<bool> {
        let key = key.to_string();
        self.request("store", |tx| Command::Store(key, value, ttl, tx))
            .await
    }

    async fn fetch(&self, key: &str) -> Result<Option<Value>> {
        let key = key.to_string();
        self.request("fetch", |tx| Command::Fetch(key, tx)).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let key = key.to_string();
        self.request("delete", |tx| Command::Delete(key, tx)).await
    }

    async fn clear(&self) -> Result<bool> {
        self.request("clear", Command::Clear).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.request("keys", Command::Keys).await
    }

    async fn increment(&self, key: &str, step: i64) -> Result<i64> {
        let key = key.to_string();
        self.request("increment", |tx| Command::Add(key, step, tx))
            .await?
            .map_err(|reason| AdapterError::provider("increment", reason))
    }

    async fn decrement(&self, key: &str, step: i64) -> Result<i64> {
        let neg = step
            .checked_neg()
            .ok_or_else(|| AdapterError::provider("decrement", format!("step {} out of range", step)))?;

        let key = key.to_string();
        self.request("decrement", |tx| Command::Add(key, neg, tx))
            .await?
            .map_err(|reason| AdapterError::provider("decrement", reason))
    }
}
