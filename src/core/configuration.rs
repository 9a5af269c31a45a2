//! Logging policy
//!
//! A [`LogConfiguration`] answers whether a (level, category) pair should be
//! logged and supplies the display string of each level. It is shared by the
//! logger and every formatter and is read from many threads at once, so
//! implementations that allow runtime changes must synchronize them.

use super::format_token::FormatToken;
use super::log_category::LogCategory;
use super::log_level::LogLevel;
use super::style::{StyledText, TextStyle};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub trait LogConfiguration: Send + Sync {
    /// Whether an entry with this level and category should be logged
    fn logging_enabled(&self, level: LogLevel, category: &LogCategory) -> bool;

    /// Text shown for `level` by the `(%level)` token
    fn display_string(&self, level: LogLevel) -> StyledText {
        StyledText::plain(level.label())
    }

    /// Style applied to every value rendered for `token`
    fn token_style(&self, _token: FormatToken) -> Option<TextStyle> {
        None
    }
}

/// Global threshold with optional custom level labels and token styles.
///
/// The category is ignored. The threshold can be changed at runtime.
///
/// ```
/// use rust_token_logger::{DefaultLogConfiguration, LogCategory, LogConfiguration, LogLevel};
///
/// let config = DefaultLogConfiguration::new(LogLevel::Warn)
///     .with_level_label(LogLevel::Error, "E");
///
/// assert!(config.logging_enabled(LogLevel::Error, &LogCategory::GENERAL));
/// assert!(!config.logging_enabled(LogLevel::Info, &LogCategory::GENERAL));
/// assert_eq!(config.display_string(LogLevel::Error).to_plain(), "E");
/// ```
#[derive(Debug, Default)]
pub struct DefaultLogConfiguration {
    threshold: RwLock<LogLevel>,
    level_labels: HashMap<LogLevel, StyledText>,
    token_styles: HashMap<FormatToken, TextStyle>,
}

impl DefaultLogConfiguration {
    pub fn new(threshold: LogLevel) -> Self {
        Self {
            threshold: RwLock::new(threshold),
            level_labels: HashMap::new(),
            token_styles: HashMap::new(),
        }
    }

    /// Read the threshold from an environment variable such as `LOG_LEVEL`.
    ///
    /// Unset or unparsable values fall back to the default threshold.
    pub fn from_env(var: &str) -> Self {
        let threshold = std::env::var(var)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        Self::new(threshold)
    }

    #[must_use]
    pub fn with_level_label(mut self, level: LogLevel, label: impl Into<StyledText>) -> Self {
        self.level_labels.insert(level, label.into());
        self
    }

    /// Color every level label with [`LogLevel::color`]
    #[must_use]
    pub fn with_level_colors(mut self) -> Self {
        for level in LogLevel::ALL {
            let label = StyledText::styled(level.label(), TextStyle::fg(level.color()));
            self.level_labels.insert(level, label);
        }
        self
    }

    #[must_use]
    pub fn with_token_style(mut self, token: FormatToken, style: TextStyle) -> Self {
        self.token_styles.insert(token, style);
        self
    }

    pub fn threshold(&self) -> LogLevel {
        *self.threshold.read()
    }

    pub fn set_threshold(&self, level: LogLevel) {
        *self.threshold.write() = level;
    }

    /// Wrap this configuration in an Arc for sharing
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl LogConfiguration for DefaultLogConfiguration {
    fn logging_enabled(&self, level: LogLevel, _category: &LogCategory) -> bool {
        level <= *self.threshold.read()
    }

    fn display_string(&self, level: LogLevel) -> StyledText {
        self.level_labels
            .get(&level)
            .cloned()
            .unwrap_or_else(|| StyledText::plain(level.label()))
    }

    fn token_style(&self, token: FormatToken) -> Option<TextStyle> {
        self.token_styles.get(&token).copied()
    }
}

/// Per-category thresholds layered over a [`DefaultLogConfiguration`].
///
/// Categories without an override use the global threshold.
#[derive(Debug, Default)]
pub struct CategoryLogConfiguration {
    base: DefaultLogConfiguration,
    overrides: RwLock<HashMap<LogCategory, LogLevel>>,
}

impl CategoryLogConfiguration {
    pub fn new(base: DefaultLogConfiguration) -> Self {
        Self {
            base,
            overrides: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_category_threshold(self, category: LogCategory, level: LogLevel) -> Self {
        self.set_category_threshold(category, level);
        self
    }

    pub fn set_category_threshold(&self, category: LogCategory, level: LogLevel) {
        self.overrides.write().insert(category, level);
    }

    pub fn clear_category_threshold(&self, category: &LogCategory) {
        self.overrides.write().remove(category);
    }

    pub fn base(&self) -> &DefaultLogConfiguration {
        &self.base
    }
}

impl LogConfiguration for CategoryLogConfiguration {
    fn logging_enabled(&self, level: LogLevel, category: &LogCategory) -> bool {
        match self.overrides.read().get(category) {
            Some(threshold) => level <= *threshold,
            None => self.base.logging_enabled(level, category),
        }
    }

    fn display_string(&self, level: LogLevel) -> StyledText {
        self.base.display_string(level)
    }

    fn token_style(&self, token: FormatToken) -> Option<TextStyle> {
        self.base.token_style(token)
    }
}
