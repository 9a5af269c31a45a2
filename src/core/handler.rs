//! Handler trait for log destinations

use super::error::Result;
use super::formatter::LogFormatter;
use super::log_entry::LogEntry;
use std::fmt;

/// Identity of a handler registered with a [`Logger`](super::Logger).
///
/// Assigned at registration and used to remove the handler again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub(crate) u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

/// A destination for log entries.
///
/// Handlers are shared between the logger and the code that created them,
/// so every method takes `&self`; implementations synchronize internally.
/// `append` must not fail the caller: problems are reported through the
/// side error channel instead.
pub trait LogHandler: Send + Sync {
    fn append(&self, entry: LogEntry);

    fn formatter(&self) -> &dyn LogFormatter;

    /// Receive every entry, bypassing the configuration's level policy
    fn log_everything(&self) -> bool {
        false
    }

    /// Wait until everything appended so far reached the destination
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
