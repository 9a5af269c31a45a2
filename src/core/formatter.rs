//! Rendering entries through a compiled format

use super::configuration::LogConfiguration;
use super::error::Result;
use super::format_token::{CompiledFormat, FormatNode, FormatToken, TokenParser};
use super::log_entry::LogEntry;
use super::style::{StyledText, TextStyle};
use super::timestamp::{DateFormatter, TimestampFormat};
use std::sync::Arc;

/// Turns entries into text.
///
/// `None` means the formatter produced nothing for this entry and the
/// handler should skip it.
pub trait LogFormatter: Send + Sync {
    fn format(&self, entry: &LogEntry) -> Option<String>;

    /// Styled rendering; by default the plain text without styles
    fn format_styled(&self, entry: &LogEntry) -> Option<StyledText> {
        self.format(entry).map(StyledText::plain)
    }
}

/// Formatter driven by a token format string such as
/// `"(%date) [(%level)] (%message)"`.
///
/// The format is compiled once at construction.
///
/// ```
/// use rust_token_logger::prelude::*;
/// use std::sync::Arc;
///
/// let config = Arc::new(DefaultLogConfiguration::new(LogLevel::Warn));
/// let formatter = TokenizedFormatter::with_format(config, "[(%level)] (%message)");
/// let entry = LogEntry::new(LogLevel::Error, "boom");
///
/// assert_eq!(formatter.format(&entry).as_deref(), Some("[ERROR] boom"));
/// ```
pub struct TokenizedFormatter {
    config: Arc<dyn LogConfiguration>,
    compiled: CompiledFormat,
    date_formatter: Box<dyn DateFormatter>,
}

impl TokenizedFormatter {
    pub const DEFAULT_FORMAT: &'static str =
        "(%date) (%level) (%category), (%function)[(%file):(%line)] (%message)";

    /// Formatter using [`Self::DEFAULT_FORMAT`]
    pub fn new(config: Arc<dyn LogConfiguration>) -> Self {
        Self::with_format(config, Self::DEFAULT_FORMAT)
    }

    pub fn with_format(config: Arc<dyn LogConfiguration>, format: &str) -> Self {
        Self::from_compiled(config, TokenParser::default().compile(format))
    }

    /// Format string whose literal text carries styles
    pub fn with_styled_format(config: Arc<dyn LogConfiguration>, format: &StyledText) -> Self {
        Self::from_compiled(config, TokenParser::default().compile_styled(format))
    }

    /// Format using a custom delimiter pattern, see [`TokenParser::with_pattern`]
    pub fn with_pattern(
        config: Arc<dyn LogConfiguration>,
        format: &str,
        pattern: &str,
    ) -> Result<Self> {
        let parser = TokenParser::with_pattern(pattern)?;
        Ok(Self::from_compiled(config, parser.compile(format)))
    }

    pub fn from_compiled(config: Arc<dyn LogConfiguration>, compiled: CompiledFormat) -> Self {
        Self {
            config,
            compiled,
            date_formatter: Box::new(TimestampFormat::default()),
        }
    }

    #[must_use]
    pub fn with_date_formatter(mut self, date_formatter: impl DateFormatter + 'static) -> Self {
        self.date_formatter = Box::new(date_formatter);
        self
    }

    pub fn compiled(&self) -> &CompiledFormat {
        &self.compiled
    }

    /// Plain value of `token` for `entry`; `None` when the entry lacks it
    fn value(&self, token: FormatToken, entry: &LogEntry) -> Option<String> {
        match token {
            FormatToken::Date => Some(self.date_formatter.format_date(entry.timestamp())),
            FormatToken::Level => Some(self.config.display_string(entry.level()).to_plain()),
            FormatToken::Category => Some(entry.category().as_str().to_string()),
            FormatToken::Message => Some(entry.message().to_string()),
            FormatToken::File => entry.file().map(str::to_string),
            FormatToken::FileName => entry.file_name().map(str::to_string),
            FormatToken::Line => entry.line().map(|line| line.to_string()),
            FormatToken::Function => entry.function().map(str::to_string),
            FormatToken::Type => Some(entry.kind().as_str().to_string()),
        }
    }

    fn styled_value(&self, token: FormatToken, entry: &LogEntry) -> Option<StyledText> {
        match token {
            FormatToken::Level => Some(self.config.display_string(entry.level())),
            _ => self.value(token, entry).map(StyledText::plain),
        }
    }
}

impl LogFormatter for TokenizedFormatter {
    fn format(&self, entry: &LogEntry) -> Option<String> {
        let mut out = String::new();
        for node in self.compiled.nodes() {
            match node {
                FormatNode::Text(text) => out.push_str(&text.to_plain()),
                FormatNode::Token(token) => {
                    if let Some(value) = self.value(*token, entry) {
                        out.push_str(&value);
                    }
                }
            }
        }
        Some(out)
    }

    /// Token values take the style in effect at the insertion point, then
    /// their own style, then the configuration's style for the token. Styles
    /// only ever apply to the inserted run.
    fn format_styled(&self, entry: &LogEntry) -> Option<StyledText> {
        let mut out = StyledText::new();
        for node in self.compiled.nodes() {
            match node {
                FormatNode::Text(text) => out.append(text),
                FormatNode::Token(token) => {
                    let Some(value) = self.styled_value(*token, entry) else {
                        continue;
                    };
                    let inherited = out.trailing_style();
                    let token_style = self.config.token_style(*token).unwrap_or(TextStyle::PLAIN);
                    for segment in value.segments() {
                        let style = inherited.overlay(&segment.style).overlay(&token_style);
                        out.push_str(&segment.text, style);
                    }
                }
            }
        }
        (!out.is_empty()).then_some(out)
    }
}
