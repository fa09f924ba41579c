use crate::cache::pattern::KeyPattern;
use crate::cache::{sanitize_id, CacheProvider};
use crate::config::CacheConfig;
use crate::error::{AdapterError, Result};
use log::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// what `delete_all` removes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// every entry the provider holds, whatever its prefix
    #[default]
    All,
    /// only the entries under this adapter's configured prefix
    Prefix,
}

/// Namespaces ids with the group prefix and forwards each call to the provider.
#[derive(Debug, Clone)]
pub struct CacheAdapter<P: CacheProvider> {
    config: CacheConfig,
    provider: P,
}

impl<P: CacheProvider> CacheAdapter<P> {
    /// fails when the provider's facility is missing or disabled, or when the group
    /// names a different driver, so a bad deployment shows up at startup rather than
    /// on first use
    pub fn new(config: CacheConfig, provider: P) -> Result<CacheAdapter<P>> {
        if config.driver != provider.driver() {
            return Err(AdapterError::unavailable(
                format!("cache driver {}", config.driver),
                format!("the group is served by the {} driver", provider.driver()),
            ));
        }

        if !provider.is_enabled() {
            return Err(AdapterError::unavailable(
                provider.name(),
                "the cache provider must be installed and enabled",
            ));
        }

        info!(
            "cache adapter ready, driver: {}, prefix: '{}', default expire: {}s",
            config.driver, config.prefix, config.default_expire
        );

        Ok(CacheAdapter { config, provider })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// the physical key for an id
    pub fn key(&self, id: &str) -> String {
        sanitize_id(&format!("{}{}", self.config.prefix, id))
    }

    /// return the cached value, or `default` on a miss
    pub async fn get<T: DeserializeOwned>(&self, id: &str, default: T) -> Result<T> {
        match self.get_value(id).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(default),
        }
    }

    pub async fn get_value(&self, id: &str) -> Result<Option<Value>> {
        let key = self.key(id);
        let value = self.provider.fetch(&key).await?;
        debug!("get {}: {}", key, if value.is_some() { "hit" } else { "miss" });

        Ok(value)
    }

    /// store a value; a ttl of None uses the group's default expire
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        id: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let key = self.key(id);
        let value = serde_json::to_value(value)?;
        let ttl = ttl.or_else(|| self.config.default_ttl());

        debug!("set {}, ttl: {:?}", key, ttl);
        self.provider.store(&key, value, ttl).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.provider.delete(&self.key(id)).await
    }

    /// Delete every entry whose key matches the prefixed glob, e.g. `user:**:session`.
    /// Scans the provider's full key list, so keep it off hot paths.
    pub async fn delete_pattern(&self, pattern: &str) -> Result<usize> {
        let prefix = sanitize_id(&self.config.prefix);
        let pattern = KeyPattern::with_prefix(&prefix, &sanitize_id(pattern))?;
        let keys = self.provider.keys().await?;

        let mut count = 0;
        for key in keys.iter().filter(|k| pattern.is_match(k)) {
            if self.provider.delete(key).await? {
                count += 1;
            }
        }

        info!("delete pattern {} removed {} entries", pattern.glob(), count);

        Ok(count)
    }

    /// With `DeleteMode::All` this wipes the whole provider, including entries
    /// written by other clients under other prefixes.
    pub async fn delete_all(&self, mode: DeleteMode) -> Result<bool> {
        match mode {
            DeleteMode::All => {
                warn!("clearing all entries from {}", self.provider.name());
                self.provider.clear().await
            }
            DeleteMode::Prefix => {
                self.delete_pattern("**").await?;
                Ok(true)
            }
        }
    }

    pub async fn increment(&self, id: &str, step: i64) -> Result<i64> {
        self.provider.increment(&self.key(id), step).await
    }

    pub async fn decrement(&self, id: &str, step: i64) -> Result<i64> {
        self.provider.decrement(&self.key(id), step).await
    }

    /// increment by one
    pub async fn incr(&self, id: &str) -> Result<i64> {
        self.increment(id, 1).await
    }

    /// decrement by one
    pub async fn decr(&self, id: &str) -> Result<i64> {
        self.decrement(id, 1).await
    }
}
