//! Log categories

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A string tag used to partition log entries.
///
/// Categories are compared and hashed by their string value. There is no
/// registry; declare your own as constants next to [`LogCategory::GENERAL`].
///
/// ```
/// use rust_token_logger::LogCategory;
///
/// const NETWORK: LogCategory = LogCategory::from_static("network");
/// assert_eq!(NETWORK, LogCategory::new("network"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogCategory(Cow<'static, str>);

impl LogCategory {
    /// The category used when none is given
    pub const GENERAL: LogCategory = LogCategory::from_static("general");

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn general() -> Self {
        Self::GENERAL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LogCategory {
    fn default() -> Self {
        Self::GENERAL
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogCategory {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LogCategory {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
