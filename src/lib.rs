//! # Rust Token Logger
//!
//! A leveled, categorized logging facade with token-based formatting and
//! multiple output handlers.
//!
//! ## Features
//!
//! - **Token Formats**: `(%date) (%level) (%message)` style format strings,
//!   compiled once per formatter, with optional styling
//! - **Multiple Handlers**: Streams, files on a background worker, stderr,
//!   console colors, in-memory styled buffers
//! - **Filtering**: Level thresholds, per-category overrides, and handlers
//!   that receive everything
//! - **Thread Safe**: Shared `Arc<Logger>` handles usable from any thread
//! - **`log` Bridge**: Route `log::info!` and friends into the same handlers
//!
//! ## Example
//!
//! ```
//! use rust_token_logger::prelude::*;
//! use rust_token_logger::handlers::{MemoryWriter, TextStreamHandler};
//! use std::sync::Arc;
//!
//! let config = DefaultLogConfiguration::new(LogLevel::Warn).shared();
//! let output = MemoryWriter::new();
//! let logger = Logger::builder()
//!     .configuration(config.clone())
//!     .handler(TextStreamHandler::with_formatter(
//!         output.clone(),
//!         TokenizedFormatter::with_format(config, "[(%level)] (%message)"),
//!     ))
//!     .build();
//!
//! logger.error("boom");
//! logger.debug("filtered");
//! assert_eq!(output.contents(), "[ERROR] boom\n");
//! ```

pub mod core;
pub mod global;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        CallSite, CategoryLogConfiguration, DefaultLogConfiguration, HandlerId, LogCategory,
        LogConfiguration, LogEntry, LogFormatter, LogHandler, LogLevel, Logger, LoggerBuilder,
        LoggerError, Result, TokenizedFormatter,
    };
}

pub use core::{
    report_error, report_warning, CallSite, CategoryLogConfiguration, Color, CompiledFormat,
    DateFormatter, DefaultLogConfiguration, EntryKind, ErrorCallback, FormatNode, FormatToken,
    HandlerId, JsonFormatter, LogCategory, LogConfiguration, LogEntry, LogFormatter, LogHandler,
    LogLevel, Logger, LoggerBuilder, LoggerError, Result, StyledSegment, StyledText, TextStyle,
    TimestampFormat, TokenParser, TokenizedFormatter, DEFAULT_TOKEN_PATTERN,
};
