// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub use log::{Level, LevelFilter, SetLoggerError};

use log::{Log, Metadata, Record};

/// Log at error level and terminate the process.
#[macro_export]
macro_rules! fatal {
    ($fmt:expr) => (
        {
            log::error!($fmt);
            std::process::exit(1);
        }
    );
    ($fmt:expr, $($arg:tt)*) => (
        {
            log::error!($fmt, $($arg)*);
            std::process::exit(1);
        }
    );
}

/// Line oriented stdout logger.
pub struct Logger {
    label: Option<&'static str>,
    level: Level,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Self {
        Self {
            label: None,
            level: Level::Info,
        }
    }

    /// Shown in place of the module path for messages above debug.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn init(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level.to_level_filter());
        Ok(())
    }

    fn target<'a>(&self, record: &'a Record) -> &'a str {
        match self.label {
            Some(label) if record.level() < Level::Debug => label,
            _ => record.target(),
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!(
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                self.target(record),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// Parses the `log_level` config value.
pub fn parse_level(level: &str) -> Option<Level> {
    match level.to_ascii_lowercase().as_str() {
        "error" => Some(Level::Error),
        "warn" | "warning" => Some(Level::Warn),
        "info" => Some(Level::Info),
        "debug" => Some(Level::Debug),
        "trace" => Some(Level::Trace),
        _ => None,
    }
}
