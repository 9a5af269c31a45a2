//! Timestamp formatting for the `(%date)` token
//!
//! The tokenized formatter renders dates through the [`DateFormatter`]
//! strategy. [`TimestampFormat`] is the stock implementation; any
//! `Fn(&DateTime<Utc>) -> String` closure works as well.
//!
//! ```
//! use rust_token_logger::core::{DateFormatter, TimestampFormat};
//! use chrono::Utc;
//!
//! let now = Utc::now();
//! assert!(TimestampFormat::Iso8601.format_date(&now).ends_with('Z'));
//!
//! let day_only = |dt: &chrono::DateTime<Utc>| dt.format("%Y-%m-%d").to_string();
//! assert_eq!(day_only.format_date(&now).len(), 10);
//! ```

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Strategy used to turn an entry's creation time into text
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, datetime: &DateTime<Utc>) -> String;
}

impl<F> DateFormatter for F
where
    F: Fn(&DateTime<Utc>) -> String + Send + Sync,
{
    fn format_date(&self, datetime: &DateTime<Utc>) -> String {
        self(datetime)
    }
}

/// Stock timestamp layouts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Seconds since the epoch
    Unix,

    /// Milliseconds since the epoch
    UnixMillis,

    /// Any strftime pattern, e.g. `"%d/%b/%Y:%H:%M:%S %z"`.
    ///
    /// Prefer [`TimestampFormat::custom`], which rejects invalid patterns.
    /// A pattern that cannot be rendered falls back to [`Iso8601`](Self::Iso8601).
    Custom(String),
}

impl TimestampFormat {
    /// Checked strftime layout; unknown or incomplete specifiers are an error
    pub fn custom(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "TimestampFormat",
                format!("invalid strftime pattern '{}'", pattern),
            ));
        }
        Ok(TimestampFormat::Custom(pattern))
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
            TimestampFormat::Iso8601Micros => {
                datetime.to_rfc3339_opts(SecondsFormat::Micros, true)
            }
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(pattern) => {
                let mut out = String::new();
                match write!(out, "{}", datetime.format(pattern)) {
                    Ok(()) => out,
                    Err(_) => TimestampFormat::Iso8601.format(datetime),
                }
            }
        }
    }
}

impl DateFormatter for TimestampFormat {
    fn format_date(&self, datetime: &DateTime<Utc>) -> String {
        self.format(datetime)
    }
}
