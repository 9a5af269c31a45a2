//! Adapter letting the `log` facade feed a [`Logger`]
//!
//! Libraries that log through `log::info!` and friends end up in the same
//! handlers as the application. The category is taken from a `category`
//! key-value pair on the record and defaults to `general`.

use crate::core::{CallSite, LogCategory, LogLevel, Logger, Result};
use std::sync::{Arc, Weak};

const CATEGORY_KEY: &str = "category";

/// Implements [`log::Log`] on top of a [`Logger`].
///
/// The bridge holds the logger weakly: once the application drops its
/// logger, records are discarded instead of keeping handlers alive.
///
/// ```no_run
/// use std::sync::Arc;
/// use rust_token_logger::prelude::*;
/// use rust_token_logger::handlers::LogBridge;
///
/// # fn main() -> rust_token_logger::Result<()> {
/// let logger = Arc::new(Logger::builder().threshold(LogLevel::Info).build());
/// LogBridge::install(&logger)?;
/// log::info!(category = "net"; "connected");
/// # Ok(())
/// # }
/// ```
pub struct LogBridge {
    logger: Weak<Logger>,
}

impl LogBridge {
    pub fn new(logger: &Arc<Logger>) -> Self {
        Self {
            logger: Arc::downgrade(logger),
        }
    }

    /// Register a bridge to `logger` as the process-wide `log` backend.
    ///
    /// Fails if another `log` backend is already installed.
    pub fn install(logger: &Arc<Logger>) -> Result<()> {
        log::set_boxed_logger(Box::new(Self::new(logger)))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }

    /// `log` has no critical or notice level, so the mapping is one to one
    pub fn map_level(level: log::Level) -> LogLevel {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }

    fn category(record: &log::Record<'_>) -> LogCategory {
        record
            .key_values()
            .get(log::kv::Key::from_str(CATEGORY_KEY))
            .map(|value| LogCategory::new(value.to_string()))
            .unwrap_or_default()
    }

    fn call_site(record: &log::Record<'_>) -> CallSite {
        CallSite {
            function: record.module_path().map(str::to_owned),
            file: record.file().map(str::to_owned),
            line: record.line(),
        }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        // Metadata carries no key-values, so only the general category can be asked
        self.logger.upgrade().is_some_and(|logger| {
            logger.is_logging(Self::map_level(metadata.level()), &LogCategory::GENERAL)
        })
    }

    fn log(&self, record: &log::Record<'_>) {
        let Some(logger) = self.logger.upgrade() else {
            return;
        };
        logger.log_message(
            Self::map_level(record.level()),
            Self::category(record),
            record.args().to_string(),
            Self::call_site(record),
        );
    }

    fn flush(&self) {
        if let Some(logger) = self.logger.upgrade() {
            let _ = logger.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        CategoryLogConfiguration, DefaultLogConfiguration, LogConfiguration, TokenizedFormatter,
    };
    use crate::handlers::{MemoryWriter, TextStreamHandler};
    use log::Log;

    fn bridged(config: Arc<dyn LogConfiguration>) -> (Arc<Logger>, LogBridge, MemoryWriter) {
        let output = MemoryWriter::new();
        let logger = Arc::new(Logger::new(Arc::clone(&config)));
        logger.add_handler(TextStreamHandler::with_formatter(
            output.clone(),
            TokenizedFormatter::with_format(config, "(%level) (%category) (%function) (%message)"),
        ));
        let bridge = LogBridge::new(&logger);
        (logger, bridge, output)
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(LogBridge::map_level(log::Level::Error), LogLevel::Error);
        assert_eq!(LogBridge::map_level(log::Level::Warn), LogLevel::Warn);
        assert_eq!(LogBridge::map_level(log::Level::Trace), LogLevel::Trace);
    }

    #[test]
    fn test_record_without_category_is_general() {
        let (_logger, bridge, output) =
            bridged(Arc::new(DefaultLogConfiguration::new(LogLevel::Info)));

        bridge.log(
            &log::Record::builder()
                .args(format_args!("listening on {}", 8080))
                .level(log::Level::Info)
                .module_path(Some("server::net"))
                .build(),
        );

        assert_eq!(output.contents(), "INFO general server::net listening on 8080\n");
    }

    #[test]
    fn test_category_from_key_values() {
        let db = LogCategory::new("db");
        let config = CategoryLogConfiguration::new(DefaultLogConfiguration::new(LogLevel::Warn))
            .with_category_threshold(db, LogLevel::Debug);
        let (_logger, bridge, output) = bridged(Arc::new(config));
        let kvs = [("category", "db")];

        bridge.log(
            &log::Record::builder()
                .args(format_args!("query took 3ms"))
                .level(log::Level::Debug)
                .module_path(Some("store"))
                .key_values(&kvs)
                .build(),
        );
        bridge.log(
            &log::Record::builder()
                .args(format_args!("filtered"))
                .level(log::Level::Debug)
                .build(),
        );

        assert_eq!(output.contents(), "DEBUG db store query took 3ms\n");
    }

    #[test]
    fn test_enabled_follows_configuration() {
        let (_logger, bridge, _output) =
            bridged(Arc::new(DefaultLogConfiguration::new(LogLevel::Warn)));

        let warn = log::Metadata::builder().level(log::Level::Warn).build();
        let debug = log::Metadata::builder().level(log::Level::Debug).build();
        assert!(bridge.enabled(&warn));
        assert!(!bridge.enabled(&debug));
    }

    #[test]
    fn test_dropped_logger_discards_records() {
        let (logger, bridge, output) =
            bridged(Arc::new(DefaultLogConfiguration::new(LogLevel::Trace)));
        drop(logger);

        bridge.log(
            &log::Record::builder()
                .args(format_args!("nobody listens"))
                .level(log::Level::Error)
                .build(),
        );
        assert!(output.contents().is_empty());
        assert!(!bridge.enabled(&log::Metadata::builder().level(log::Level::Error).build()));
    }
}
