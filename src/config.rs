/// configuration for cache groups and the document log writer
///
use crate::error::{AdapterError, Result};
use crate::log_sink::Level;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// seconds an entry lives when neither the caller nor the group says otherwise
pub const DEFAULT_EXPIRE: u64 = 3600;

/// a single cache group, e.g. `{"driver": "memory", "prefix": "app:", "default_expire": 600}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub driver: String,
    pub prefix: String,
    pub default_expire: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            driver: "memory".to_string(),
            prefix: String::new(),
            default_expire: DEFAULT_EXPIRE,
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Option<Duration> {
        match self.default_expire {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// target collection; a capped collection suits high volume inserts
    pub collection: String,
    /// database instance name
    pub name: String,
    /// severity forced onto messages that carry an exception
    pub trace_level: Level,
    /// cap applied to the collection by `MemoryStore::from_config`, None for unbounded
    pub capped_size: Option<usize>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            collection: "Logs".to_string(),
            name: "default".to_string(),
            trace_level: Level::Debug,
            capped_size: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub cache: HashMap<String, CacheConfig>,
    pub log: LogConfig,
}

impl AdapterConfig {
    pub fn from_json(json: &str) -> Result<AdapterConfig> {
        let config = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AdapterConfig> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AdapterError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&text).map_err(|e| AdapterError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// return the named cache group
    pub fn cache_group(&self, name: &str) -> Result<CacheConfig> {
        self.cache
            .get(name)
            .cloned()
            .ok_or_else(|| AdapterError::unavailable(format!("cache group {}", name), "not configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.driver, "memory");
        assert_eq!(config.prefix, "");
        assert_eq!(config.default_ttl(), Some(Duration::from_secs(3600)));

        let log = LogConfig::default();
        assert_eq!(log.collection, "Logs");
        assert_eq!(log.name, "default");
        assert_eq!(log.trace_level, Level::Debug);
        assert_eq!(log.capped_size, None);
    }

    #[test]
    fn zero_expire_means_no_ttl() {
        let config = CacheConfig {
            default_expire: 0,
            ..CacheConfig::default()
        };
        assert_eq!(config.default_ttl(), None);
    }

    #[test]
    fn from_json() {
        let json = r#"{
            "cache": {
                "default": { "prefix": "app:", "default_expire": 60 },
                "sessions": { "driver": "memory", "prefix": "sess:" }
            },
            "log": { "collection": "AppLogs", "trace_level": "ERROR", "capped_size": 1000 }
        }"#;

        let config = AdapterConfig::from_json(json).expect("should parse config");
        let group = config.cache_group("default").expect("default group");
        assert_eq!(group.prefix, "app:");
        assert_eq!(group.default_expire, 60);
        assert_eq!(group.driver, "memory");

        let group = config.cache_group("sessions").expect("sessions group");
        assert_eq!(group.default_expire, DEFAULT_EXPIRE);

        assert_eq!(config.log.collection, "AppLogs");
        assert_eq!(config.log.name, "default");
        assert_eq!(config.log.trace_level, Level::Error);
        assert_eq!(config.log.capped_size, Some(1000));
    }

    #[test]
    fn missing_group() {
        let config = AdapterConfig::default();
        match config.cache_group("apc") {
            Err(AdapterError::ConfigurationUnavailable { facility, .. }) => {
                assert_eq!(facility, "cache group apc")
            }
            other => panic!("expected unavailable, got {:?}", other),
        }
    }

    #[test]
    fn missing_file() {
        let err = AdapterConfig::from_file("/no/such/adapter-config.json").unwrap_err();
        assert!(matches!(err, AdapterError::Config { .. }));
    }
}
