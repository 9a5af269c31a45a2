//! Console handler with optional ANSI colors

use crate::core::{
    LogConfiguration, LogEntry, LogFormatter, LogHandler, LogLevel, Result, TokenizedFormatter,
};
use std::io::Write;
use std::sync::Arc;

/// Writes each entry to the terminal on the caller's thread.
///
/// `Error` and `Critical` go to stderr, everything else to stdout. With
/// colors enabled the styled rendering is emitted as ANSI escapes, so level
/// labels colored by the configuration (see
/// [`DefaultLogConfiguration::with_level_colors`](crate::DefaultLogConfiguration::with_level_colors))
/// show up in the terminal.
pub struct ConsoleHandler {
    formatter: Box<dyn LogFormatter>,
    use_colors: bool,
    log_everything: bool,
}

impl ConsoleHandler {
    pub fn new(config: Arc<dyn LogConfiguration>) -> Self {
        Self::with_formatter(TokenizedFormatter::new(config))
    }

    pub fn with_formatter(formatter: impl LogFormatter + 'static) -> Self {
        Self {
            formatter: Box::new(formatter),
            use_colors: true,
            log_everything: false,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn log_everything(mut self, log_everything: bool) -> Self {
        self.log_everything = log_everything;
        self
    }

    fn render(&self, entry: &LogEntry) -> Option<String> {
        let text = if self.use_colors {
            self.formatter.format_styled(entry).map(|styled| styled.to_ansi())
        } else {
            self.formatter.format(entry)
        };
        text.filter(|text| !text.is_empty())
    }
}

impl LogHandler for ConsoleHandler {
    fn append(&self, entry: LogEntry) {
        let Some(output) = self.render(&entry) else {
            return;
        };

        match entry.level() {
            LogLevel::Critical | LogLevel::Error => eprintln!("{}", output),
            _ => println!("{}", output),
        }
    }

    fn formatter(&self) -> &dyn LogFormatter {
        self.formatter.as_ref()
    }

    fn log_everything(&self) -> bool {
        self.log_everything
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DefaultLogConfiguration;

    fn handler(use_colors: bool) -> ConsoleHandler {
        let config: Arc<dyn LogConfiguration> =
            Arc::new(DefaultLogConfiguration::new(LogLevel::Trace).with_level_colors());
        ConsoleHandler::with_formatter(TokenizedFormatter::with_format(config, "(%level) (%message)"))
            .with_colors(use_colors)
    }

    #[test]
    fn test_plain_rendering_without_colors() {
        let rendered = handler(false).render(&LogEntry::new(LogLevel::Info, "ready"));
        assert_eq!(rendered.as_deref(), Some("INFO ready"));
    }

    #[test]
    fn test_colored_rendering_keeps_text() {
        colored::control::set_override(true);
        let rendered = handler(true)
            .render(&LogEntry::new(LogLevel::Error, "boom"))
            .expect("rendered");
        assert!(rendered.contains("ERROR"));
        assert!(rendered.ends_with(" boom"));
        assert!(rendered.contains("\u{1b}["));
    }

    #[test]
    fn test_empty_rendering_is_skipped() {
        let config: Arc<dyn LogConfiguration> = Arc::new(DefaultLogConfiguration::default());
        let handler =
            ConsoleHandler::with_formatter(TokenizedFormatter::with_format(config, "(%line)"));
        assert!(handler.render(&LogEntry::new(LogLevel::Error, "x")).is_none());
    }
}
