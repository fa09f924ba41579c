/// log4rs setup for binaries and tests that embed the adapters.
///
use anyhow::Result;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

pub const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {t} - {m}{n}";

/// build the console configuration without installing it
pub fn console_config(level: LevelFilter) -> Result<Config> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;

    Ok(config)
}

/// install a console logger at the given level; fails if a logger is already set
pub fn init(level: LevelFilter) -> Result<()> {
    let config = console_config(level)?;
    log4rs::init_config(config)?;

    Ok(())
}

/// install a logger from a log4rs yaml file
pub fn init_file<P: AsRef<Path>>(path: P) -> Result<()> {
    log4rs::init_file(path, Default::default())
}
