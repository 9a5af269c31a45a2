//! Handler appending styled lines to a shared in-memory buffer

use crate::core::{
    LogConfiguration, LogEntry, LogFormatter, LogHandler, StyledText, TextStyle,
    TokenizedFormatter,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Appends the styled rendering of each entry, plus a newline, to a
/// [`StyledText`] buffer that a UI can display.
///
/// The buffer is shared: keep a clone of [`buffer`](Self::buffer) to read it
/// while the handler is registered.
pub struct AttributedBufferHandler {
    output: Arc<Mutex<StyledText>>,
    formatter: Box<dyn LogFormatter>,
    log_everything: bool,
}

impl AttributedBufferHandler {
    pub fn new(config: Arc<dyn LogConfiguration>) -> Self {
        Self::with_formatter(TokenizedFormatter::new(config), Arc::default())
    }

    pub fn with_formatter(
        formatter: impl LogFormatter + 'static,
        output: Arc<Mutex<StyledText>>,
    ) -> Self {
        Self {
            output,
            formatter: Box::new(formatter),
            log_everything: false,
        }
    }

    #[must_use]
    pub fn log_everything(mut self, log_everything: bool) -> Self {
        self.log_everything = log_everything;
        self
    }

    pub fn buffer(&self) -> Arc<Mutex<StyledText>> {
        Arc::clone(&self.output)
    }

    /// Snapshot of the buffer
    pub fn contents(&self) -> StyledText {
        self.output.lock().clone()
    }
}

impl LogHandler for AttributedBufferHandler {
    fn append(&self, entry: LogEntry) {
        let Some(styled) = self.formatter.format_styled(&entry) else {
            return;
        };
        if styled.is_empty() {
            return;
        }
        let mut output = self.output.lock();
        output.append(&styled);
        output.push_str("\n", TextStyle::PLAIN);
    }

    fn formatter(&self) -> &dyn LogFormatter {
        self.formatter.as_ref()
    }

    fn log_everything(&self) -> bool {
        self.log_everything
    }

    fn name(&self) -> &str {
        "attributed_buffer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, DefaultLogConfiguration, FormatToken, LogLevel};

    #[test]
    fn test_appends_styled_lines() {
        let config: Arc<dyn LogConfiguration> = Arc::new(
            DefaultLogConfiguration::new(LogLevel::Warn)
                .with_token_style(FormatToken::Level, TextStyle::fg(Color::Red)),
        );
        let handler = AttributedBufferHandler::with_formatter(
            TokenizedFormatter::with_format(config, "(%level): (%message)"),
            Arc::default(),
        );

        handler.append(LogEntry::new(LogLevel::Error, "boom"));
        handler.append(LogEntry::new(LogLevel::Warn, "careful"));

        let contents = handler.contents();
        assert_eq!(contents.to_plain(), "ERROR: boom\nWARN: careful\n");
        assert_eq!(contents.segments()[0].text, "ERROR");
        assert_eq!(contents.segments()[0].style, TextStyle::fg(Color::Red));
        assert!(contents.segments()[1].style.is_plain());
    }

    #[test]
    fn test_skips_empty_renderings() {
        let config: Arc<dyn LogConfiguration> = Arc::new(DefaultLogConfiguration::default());
        let handler = AttributedBufferHandler::with_formatter(
            TokenizedFormatter::with_format(config, "(%file)"),
            Arc::default(),
        );

        handler.append(LogEntry::new(LogLevel::Error, "no file"));
        assert!(handler.contents().is_empty());
    }

    #[test]
    fn test_shared_buffer() {
        let handler = AttributedBufferHandler::new(Arc::new(DefaultLogConfiguration::default()));
        let buffer = handler.buffer();

        handler.append(LogEntry::new(LogLevel::Error, "visible"));
        assert!(buffer.lock().to_plain().contains("visible"));
    }
}
