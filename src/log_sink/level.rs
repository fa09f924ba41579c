use crate::error::AdapterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message severity, most severe first. Codes follow syslog: 0 = emergency ... 7 = debug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Level {
    pub const ALL: [Level; 8] = [
        Level::Emergency,
        Level::Alert,
        Level::Critical,
        Level::Error,
        Level::Warning,
        Level::Notice,
        Level::Info,
        Level::Debug,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Level, AdapterError> {
        Level::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| AdapterError::UnknownLevel(code.to_string()))
    }

    /// the name written to the sink
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Emergency => "EMERGENCY",
            Level::Alert => "ALERT",
            Level::Critical => "CRITICAL",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Notice => "NOTICE",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Level, AdapterError> {
        let name = s.trim().to_ascii_uppercase();
        Level::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == name)
            .ok_or_else(|| AdapterError::UnknownLevel(s.to_string()))
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Level {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        for (code, level) in Level::ALL.iter().enumerate() {
            assert_eq!(level.code() as usize, code);
            assert_eq!(Level::from_code(code as u8).unwrap(), *level);
        }
        assert!(matches!(Level::from_code(8), Err(AdapterError::UnknownLevel(_))));
    }

    #[test]
    fn names() {
        assert_eq!("error".parse::<Level>().unwrap(), Level::Error);
        assert_eq!(" Warning ".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!(Level::Critical.to_string(), "CRITICAL");
        assert!("LOUD".parse::<Level>().is_err());
    }

    #[test]
    fn ordering_and_serde() {
        assert!(Level::Emergency < Level::Debug);
        assert_eq!(serde_json::to_string(&Level::Notice).unwrap(), r#""NOTICE""#);
        assert_eq!(serde_json::from_str::<Level>(r#""ALERT""#).unwrap(), Level::Alert);
    }

    #[test]
    fn from_log_crate() {
        assert_eq!(Level::from(log::Level::Warn), Level::Warning);
        assert_eq!(Level::from(log::Level::Trace), Level::Debug);
    }
}
