//! JSON line rendering
//!
//! One object per entry, suitable for log aggregation tools:
//!
//! ```text
//! {"type":"entry","timestamp":"2025-01-08T10:30:45.123Z","level":"ERROR","category":"general","message":"boom","line":42}
//! ```

use super::diagnostics::{report_error, ErrorCallback};
use super::error::LoggerError;
use super::formatter::LogFormatter;
use super::log_entry::{EntryKind, LogEntry};
use super::log_level::LogLevel;
use chrono::SecondsFormat;
use serde::Serialize;

#[derive(Serialize)]
struct JsonRecord<'a> {
    #[serde(rename = "type")]
    kind: EntryKind,
    timestamp: String,
    level: LogLevel,
    category: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    function: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
}

impl<'a> From<&'a LogEntry> for JsonRecord<'a> {
    fn from(entry: &'a LogEntry) -> Self {
        Self {
            kind: entry.kind(),
            timestamp: entry.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
            level: entry.level(),
            category: entry.category().as_str(),
            message: entry.message(),
            function: entry.function(),
            file: entry.file(),
            line: entry.line(),
        }
    }
}

/// Renders each entry as a single-line (or pretty) JSON object.
///
/// Serialization failures are reported to the error callback (stderr by
/// default) and produce no output for that entry.
#[derive(Default)]
pub struct JsonFormatter {
    pretty: bool,
    on_error: Option<ErrorCallback>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_pretty() -> Self {
        Self {
            pretty: true,
            on_error: None,
        }
    }

    #[must_use]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Option<String> {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        match result {
            Ok(json) => Some(json),
            Err(e) => {
                report_error(self.on_error.as_ref(), &LoggerError::from(e));
                None
            }
        }
    }
}

impl LogFormatter for JsonFormatter {
    fn format(&self, entry: &LogEntry) -> Option<String> {
        self.serialize(&JsonRecord::from(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_category::LogCategory;
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;
    use serde::ser::Error as _;
    use std::sync::Arc;

    #[test]
    fn test_json_fields() {
        let entry = LogEntry::new(LogLevel::Error, "boom\nagain")
            .with_category(LogCategory::new("db"))
            .with_location("connect", "src/db.rs", 7)
            .with_timestamp(Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().expect("valid datetime"));

        let json = JsonFormatter::new().format(&entry).expect("json output");
        assert!(!json.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(parsed["type"], "entry");
        assert_eq!(parsed["timestamp"], "2025-01-08T10:30:45.000Z");
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["category"], "db");
        assert_eq!(parsed["message"], "boom again");
        assert_eq!(parsed["function"], "connect");
        assert_eq!(parsed["line"], 7);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let json = JsonFormatter::new()
            .format(&LogEntry::start_marker())
            .expect("json output");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(parsed["type"], "start");
        assert!(parsed.get("file").is_none());
        assert!(parsed.get("line").is_none());
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn test_failure_goes_to_side_channel() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        let formatter = JsonFormatter::new().on_error(Arc::new(move |err: &LoggerError| sink.lock().push(err.to_string())));

        assert!(formatter.serialize(&Unserializable).is_none());

        let errors = errors.lock();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("refusing to serialize"));
    }
}
