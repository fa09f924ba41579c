#![doc = include_str!("../README.md")]

pub mod cache;
pub mod config;
pub mod error;
pub mod log_sink;
pub mod logging;
pub mod worker;

pub use error::{AdapterError, Result};

/// the current app version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
