//! Log entry structure

use super::log_category::LogCategory;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distinguishes ordinary entries from the synthetic marker emitted when the
/// application announces its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Entry,
    Start,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Entry => "entry",
            EntryKind::Start => "start",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a log call was made from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallSite {
    pub function: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl CallSite {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: Some(function.into()),
            file: Some(file.into()),
            line: Some(line),
        }
    }

    /// Call site of the caller of a `#[track_caller]` function.
    ///
    /// The function name is not available this way and stays `None`.
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self {
            function: None,
            file: Some(location.file().to_string()),
            line: Some(location.line()),
        }
    }
}

/// One logging event.
///
/// Entries are built once and handed by value to every handler. Fields are
/// read through accessors; the only mutation is a single level adjustment
/// before dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    kind: EntryKind,
    level: LogLevel,
    category: LogCategory,
    message: String,
    site: CallSite,
    timestamp: DateTime<Utc>,
    #[serde(skip)]
    level_adjusted: bool,
}

impl LogEntry {
    /// Replace line breaks so one entry always renders as one line
    fn normalize_message(message: &str) -> String {
        if !message.contains(['\n', '\r']) {
            return message.to_string();
        }
        message.replace("\r\n", " ").replace(['\n', '\r'], " ")
    }

    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            kind: EntryKind::Entry,
            level,
            category: LogCategory::GENERAL,
            message: Self::normalize_message(message.as_ref()),
            site: CallSite::default(),
            timestamp: Utc::now(),
            level_adjusted: false,
        }
    }

    /// The marker entry delivered once to every handler after start
    pub fn start_marker() -> Self {
        let mut entry = Self::new(LogLevel::Info, "");
        entry.kind = EntryKind::Start;
        entry
    }

    #[must_use]
    pub fn with_category(mut self, category: LogCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_call_site(mut self, site: CallSite) -> Self {
        self.site = site;
        self
    }

    #[must_use]
    pub fn with_location(mut self, function: &str, file: &str, line: u32) -> Self {
        self.site = CallSite::new(function, file, line);
        self
    }

    /// Pin the creation time, mostly useful for reproducible output
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Change the level of an entry that has not been dispatched yet.
    ///
    /// Only the first adjustment takes effect; returns whether this call did.
    pub fn adjust_level(&mut self, level: LogLevel) -> bool {
        if self.level_adjusted {
            return false;
        }
        self.level = level;
        self.level_adjusted = true;
        true
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn category(&self) -> &LogCategory {
        &self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn call_site(&self) -> &CallSite {
        &self.site
    }

    pub fn function(&self) -> Option<&str> {
        self.site.function.as_deref()
    }

    pub fn file(&self) -> Option<&str> {
        self.site.file.as_deref()
    }

    /// Last path component of the source file
    pub fn file_name(&self) -> Option<&str> {
        self.site
            .file
            .as_deref()
            .map(|path| path.rsplit(['/', '\\']).next().unwrap_or(path))
    }

    pub fn line(&self) -> Option<u32> {
        self.site.line
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }
}
