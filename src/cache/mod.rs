/// cache adapter and the provider boundary it forwards to.
///
/// The adapter holds no entries of its own: it namespaces and sanitises the caller's id,
/// then hands every call to a `CacheProvider`. Any atomicity (counters, last writer wins
/// on `set`) is whatever the provider offers.
///
/// `MemoryProvider` is the in-process provider: a worker task that owns the entries and
/// answers requests over a channel, so every clone of the handle sees the same store.
///
pub mod adapter;
pub mod pattern;
pub mod worker;

pub use adapter::{CacheAdapter, DeleteMode};
pub use pattern::KeyPattern;
pub use worker::MemoryProvider;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// the operations consumed from a shared key/value provider
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// a short name used in errors and logs
    fn name(&self) -> &str;

    /// the driver name a cache group selects this provider by
    fn driver(&self) -> &str;

    /// false when the facility is missing or switched off
    fn is_enabled(&self) -> bool;

    /// store the value; a ttl of None never expires
    async fn store(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<bool>;

    async fn fetch(&self, key: &str) -> Result<Option<Value>>;

    async fn delete(&self, key: &str) -> Result<bool>;

    /// remove every entry the provider holds
    async fn clear(&self) -> Result<bool>;

    /// list the keys of all live entries
    async fn keys(&self) -> Result<Vec<String>>;

    async fn increment(&self, key: &str, step: i64) -> Result<i64>;

    async fn decrement(&self, key: &str, step: i64) -> Result<i64>;
}

/// replace characters that do not belong in a key (slashes and spaces) with underscores
pub fn sanitize_id(id: &str) -> String {
    id.replace(['/', '\\', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_id("app:user/42"), "app:user_42");
        assert_eq!(sanitize_id(r"a\b c"), "a_b_c");
        assert_eq!(sanitize_id("plain-key.1"), "plain-key.1");
        assert_eq!(sanitize_id("same id"), sanitize_id("same id"));
    }
}
