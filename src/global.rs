//! Process-wide logger
//!
//! Code that cannot be handed an `Arc<Logger>` logs through these functions.
//! Until [`enable_logging`] is called they do nothing.
//!
//! ```no_run
//! use std::sync::Arc;
//! use rust_token_logger::{global, LogCategory, LogLevel, Logger};
//!
//! let logger = Arc::new(Logger::builder().threshold(LogLevel::Info).build());
//! global::enable_logging(logger);
//!
//! global::info("service ready");
//! global::warn_in("retrying", LogCategory::new("net"));
//! ```

use crate::core::{report_warning, CallSite, LogCategory, LogLevel, Logger};
use std::sync::{Arc, OnceLock};

static LOGGER: OnceLock<Arc<Logger>> = OnceLock::new();

/// Install the process logger.
///
/// Only the first call has an effect; later calls leave the installed
/// logger in place, emit a warning and return `false`.
pub fn enable_logging(logger: Arc<Logger>) -> bool {
    if LOGGER.set(logger).is_err() {
        report_warning("Logging was already enabled; ignoring the new logger");
        return false;
    }
    true
}

/// The installed logger, if any
pub fn logger() -> Option<&'static Arc<Logger>> {
    LOGGER.get()
}

/// Whether the installed logger would deliver this level and category
pub fn is_logging(level: LogLevel, category: &LogCategory) -> bool {
    LOGGER
        .get()
        .is_some_and(|logger| logger.is_logging(level, category))
}

#[track_caller]
fn dispatch(level: LogLevel, category: LogCategory, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log_message(level, category, message, CallSite::caller());
    }
}

macro_rules! level_functions {
    ($($level:ident, $name:ident, $name_in:ident;)+) => {
        $(
            #[doc = concat!("Log at `", stringify!($level), "` in the general category")]
            #[track_caller]
            pub fn $name(message: impl AsRef<str>) {
                dispatch(LogLevel::$level, LogCategory::GENERAL, message.as_ref());
            }

            #[doc = concat!("Log at `", stringify!($level), "` in `category`")]
            #[track_caller]
            pub fn $name_in(message: impl AsRef<str>, category: LogCategory) {
                dispatch(LogLevel::$level, category, message.as_ref());
            }
        )+
    };
}

level_functions! {
    Critical, critical, critical_in;
    Error, error, error_in;
    Warn, warn, warn_in;
    Notice, notice, notice_in;
    Info, info, info_in;
    Debug, debug, debug_in;
    Trace, trace, trace_in;
}
