//! Core logger types and traits

pub mod configuration;
pub mod diagnostics;
pub mod error;
pub mod format_token;
pub mod formatter;
pub mod handler;
pub mod json_formatter;
pub mod log_category;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod style;
pub mod timestamp;

pub use configuration::{CategoryLogConfiguration, DefaultLogConfiguration, LogConfiguration};
pub use diagnostics::{report_error, report_warning, ErrorCallback};
pub use error::{LoggerError, Result};
pub use format_token::{CompiledFormat, FormatNode, FormatToken, TokenParser, DEFAULT_TOKEN_PATTERN};
pub use formatter::{LogFormatter, TokenizedFormatter};
pub use handler::{HandlerId, LogHandler};
pub use json_formatter::JsonFormatter;
pub use log_category::LogCategory;
pub use log_entry::{CallSite, EntryKind, LogEntry};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use style::{Color, StyledSegment, StyledText, TextStyle};
pub use timestamp::{DateFormatter, TimestampFormat};
