//! Side channel for failures inside the logging pipeline
//!
//! The logger cannot log its own failures through itself, and it must never
//! hand them back to the code that emitted the entry. Formatters and
//! handlers report here instead: to a user callback when one is installed,
//! otherwise to stderr with a `[LOGGER ...]` prefix.

use super::error::LoggerError;
use std::sync::Arc;

/// Callback receiving errors that were swallowed by the pipeline
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Report a soft failure
pub fn report_error(callback: Option<&ErrorCallback>, error: &LoggerError) {
    match callback {
        Some(callback) => callback(error),
        None => eprintln!("[LOGGER ERROR] {}", error),
    }
}

/// Report a misuse that was tolerated
pub fn report_warning(message: &str) {
    eprintln!("[LOGGER WARNING] {}", message);
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
