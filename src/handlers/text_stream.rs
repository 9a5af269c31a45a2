//! Synchronous handler writing lines to any `io::Write`

use crate::core::{
    report_error, ErrorCallback, LogConfiguration, LogEntry, LogFormatter, LogHandler,
    LoggerError, Result, TokenizedFormatter,
};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Writes `format(entry) + "\n"` to a stream on the caller's thread.
///
/// Entries that render to nothing are skipped. Write failures are reported
/// to the error callback and never reach the caller.
pub struct TextStreamHandler {
    stream: Mutex<Box<dyn Write + Send>>,
    formatter: Box<dyn LogFormatter>,
    log_everything: bool,
    on_error: Option<ErrorCallback>,
}

impl TextStreamHandler {
    /// Handler using a [`TokenizedFormatter`] with the default format
    pub fn new(stream: impl Write + Send + 'static, config: Arc<dyn LogConfiguration>) -> Self {
        Self::with_formatter(stream, TokenizedFormatter::new(config))
    }

    pub fn with_formatter(
        stream: impl Write + Send + 'static,
        formatter: impl LogFormatter + 'static,
    ) -> Self {
        Self {
            stream: Mutex::new(Box::new(stream)),
            formatter: Box::new(formatter),
            log_everything: false,
            on_error: None,
        }
    }

    #[must_use]
    pub fn log_everything(mut self, log_everything: bool) -> Self {
        self.log_everything = log_everything;
        self
    }

    #[must_use]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }
}

impl LogHandler for TextStreamHandler {
    fn append(&self, entry: LogEntry) {
        let Some(text) = self.formatter.format(&entry) else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let mut stream = self.stream.lock();
        if let Err(e) = writeln!(stream, "{}", text) {
            report_error(
                self.on_error.as_ref(),
                &LoggerError::io_operation("writing log line", "text stream rejected the write", e),
            );
        }
    }

    fn formatter(&self) -> &dyn LogFormatter {
        self.formatter.as_ref()
    }

    fn log_everything(&self) -> bool {
        self.log_everything
    }

    fn flush(&self) -> Result<()> {
        self.stream.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "text_stream"
    }
}

/// In-memory `io::Write` sink whose clones share one buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DefaultLogConfiguration, LogLevel};

    fn config() -> Arc<dyn LogConfiguration> {
        Arc::new(DefaultLogConfiguration::new(LogLevel::Warn))
    }

    #[test]
    fn test_writes_one_line_per_entry() {
        let output = MemoryWriter::new();
        let handler = TextStreamHandler::with_formatter(
            output.clone(),
            TokenizedFormatter::with_format(config(), "[(%level)] (%message)"),
        );

        handler.append(LogEntry::new(LogLevel::Error, "boom"));
        handler.append(LogEntry::new(LogLevel::Warn, "a\nb"));

        assert_eq!(output.contents(), "[ERROR] boom\n[WARN] a b\n");
    }

    #[test]
    fn test_empty_rendering_writes_nothing() {
        let output = MemoryWriter::new();
        let handler = TextStreamHandler::with_formatter(
            output.clone(),
            TokenizedFormatter::with_format(config(), "(%function)"),
        );

        handler.append(LogEntry::new(LogLevel::Error, "no call site"));
        assert_eq!(output.contents(), "");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_go_to_callback() {
        let errors = Arc::new(Mutex::new(0usize));
        let count = Arc::clone(&errors);
        let handler = TextStreamHandler::new(BrokenPipe, config())
            .on_error(Arc::new(move |_err: &LoggerError| *count.lock() += 1));

        handler.append(LogEntry::new(LogLevel::Error, "lost"));
        assert_eq!(*errors.lock(), 1);
    }
}
