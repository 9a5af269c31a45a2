//! Asynchronous handler writing to a file or stream on a worker thread
//!
//! Each handler owns one worker thread fed by an unbounded FIFO channel.
//! `append` only enqueues, so callers never wait for I/O, and entries reach
//! the destination in the order they were appended. Dropping the handler
//! closes the channel and joins the worker: the queue is drained, the
//! writer flushed, and only then is the destination released.
//!
//! A persistently slow destination makes its queue grow without bound;
//! it never blocks the callers.

use crate::core::diagnostics::panic_message;
use crate::core::{
    report_error, ErrorCallback, LogConfiguration, LogEntry, LogFormatter, LogHandler,
    LoggerError, Result, TokenizedFormatter,
};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

enum Command {
    Write(LogEntry),
    Flush(Sender<Result<()>>),
}

enum Destination {
    Unset,
    Writer(Box<dyn Write + Send>),
    Path(PathBuf),
    StdErr,
}

/// Handler writing `format(entry) + "\n"` to a destination on its own
/// worker thread.
///
/// After the first failed write the destination is considered gone: the
/// failure is reported once and later entries are dropped.
///
/// ```no_run
/// use rust_token_logger::prelude::*;
/// use rust_token_logger::handlers::FileHandleHandler;
///
/// # fn main() -> rust_token_logger::Result<()> {
/// let config = DefaultLogConfiguration::new(LogLevel::Info).shared();
/// let logger = Logger::new(config.clone());
/// logger.add_handler(FileHandleHandler::open("app.log", config)?);
/// logger.info("written in the background");
/// logger.flush()?;
/// # Ok(())
/// # }
/// ```
pub struct FileHandleHandler {
    sender: Option<Sender<Command>>,
    worker: Option<thread::JoinHandle<()>>,
    formatter: Arc<dyn LogFormatter>,
    log_everything: bool,
    name: String,
}

impl FileHandleHandler {
    pub fn builder(config: Arc<dyn LogConfiguration>) -> FileHandleHandlerBuilder {
        FileHandleHandlerBuilder::new(config)
    }

    /// Append to the file at `path`, creating it if needed
    pub fn open(path: impl Into<PathBuf>, config: Arc<dyn LogConfiguration>) -> Result<Self> {
        Self::builder(config).path(path).build()
    }

    /// Write to an already open stream
    pub fn new(writer: impl Write + Send + 'static, config: Arc<dyn LogConfiguration>) -> Result<Self> {
        Self::builder(config).writer(writer).build()
    }

    fn spawn(
        name: String,
        writer: Box<dyn Write + Send>,
        formatter: Arc<dyn LogFormatter>,
        log_everything: bool,
        on_error: Option<ErrorCallback>,
    ) -> Result<Self> {
        let (sender, receiver) = unbounded();
        let worker_formatter = Arc::clone(&formatter);
        let worker_name = name.clone();

        let worker = thread::Builder::new()
            .name(format!("log-handler-{}", name))
            .spawn(move || {
                Self::run_worker(receiver, writer, worker_formatter, on_error, worker_name)
            })
            .map_err(|e| {
                LoggerError::io_operation("spawning handler worker", name.clone(), e)
            })?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            formatter,
            log_everything,
            name,
        })
    }

    fn run_worker(
        receiver: Receiver<Command>,
        writer: Box<dyn Write + Send>,
        formatter: Arc<dyn LogFormatter>,
        on_error: Option<ErrorCallback>,
        name: String,
    ) {
        let mut writer = BufWriter::new(writer);
        let mut failed = false;

        for command in receiver.iter() {
            match command {
                Command::Write(entry) => {
                    if failed {
                        continue;
                    }
                    let rendered = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        formatter.format(&entry)
                    }));
                    let text = match rendered {
                        Ok(Some(text)) => text,
                        Ok(None) => continue,
                        Err(panic_info) => {
                            // Skip the entry; the worker keeps serving the queue
                            report_error(
                                on_error.as_ref(),
                                &LoggerError::formatter(
                                    name.as_str(),
                                    format!("panicked: {}", panic_message(panic_info.as_ref())),
                                ),
                            );
                            continue;
                        }
                    };
                    if text.is_empty() {
                        continue;
                    }
                    if let Err(e) = writeln!(writer, "{}", text) {
                        failed = true;
                        report_error(
                            on_error.as_ref(),
                            &LoggerError::io_operation(
                                "writing log line",
                                format!("handler '{}' stops writing", name),
                                e,
                            ),
                        );
                    }
                }
                Command::Flush(ack) => {
                    let result = if failed {
                        Err(LoggerError::handler(&name, "destination is no longer writable"))
                    } else {
                        writer.flush().map_err(LoggerError::from)
                    };
                    let _ = ack.send(result);
                    continue;
                }
            }

            // Batch writes while entries keep arriving; flush once idle
            if receiver.is_empty() && !failed {
                if let Err(e) = writer.flush() {
                    failed = true;
                    report_error(
                        on_error.as_ref(),
                        &LoggerError::io_operation(
                            "flushing log destination",
                            format!("handler '{}' stops writing", name),
                            e,
                        ),
                    );
                }
            }
        }

        // Channel closed: the queue is drained, release the destination
        if !failed {
            let _ = writer.flush();
        }
    }

    fn enqueue(&self, command: Command) -> Result<()> {
        self.sender
            .as_ref()
            .ok_or_else(|| LoggerError::ChannelSendError(self.name.clone()))?
            .send(command)
            .map_err(|_| LoggerError::ChannelSendError(self.name.clone()))
    }
}

impl LogHandler for FileHandleHandler {
    fn append(&self, entry: LogEntry) {
        // Only fails once the worker is gone, which means we are shutting down
        let _ = self.enqueue(Command::Write(entry));
    }

    fn formatter(&self) -> &dyn LogFormatter {
        self.formatter.as_ref()
    }

    fn log_everything(&self) -> bool {
        self.log_everything
    }

    /// Blocks until every entry appended before this call was written
    fn flush(&self) -> Result<()> {
        let (ack, done) = bounded(1);
        self.enqueue(Command::Flush(ack))?;
        done.recv()
            .map_err(|_| LoggerError::handler(&self.name, "worker exited before flushing"))?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FileHandleHandler {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit
        drop(self.sender.take());

        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.join() {
                eprintln!(
                    "[LOGGER ERROR] Worker of handler '{}' panicked during shutdown: {:?}",
                    self.name, e
                );
            }
        }
    }
}

/// Builder for [`FileHandleHandler`]
pub struct FileHandleHandlerBuilder {
    config: Arc<dyn LogConfiguration>,
    destination: Destination,
    formatter: Option<Arc<dyn LogFormatter>>,
    log_everything: bool,
    on_error: Option<ErrorCallback>,
    name: Option<String>,
    bound_to_stderr: bool,
    rebind_attempted: bool,
}

impl FileHandleHandlerBuilder {
    pub fn new(config: Arc<dyn LogConfiguration>) -> Self {
        Self {
            config,
            destination: Destination::Unset,
            formatter: None,
            log_everything: false,
            on_error: None,
            name: None,
            bound_to_stderr: false,
            rebind_attempted: false,
        }
    }

    fn for_stderr(config: Arc<dyn LogConfiguration>) -> Self {
        let mut builder = Self::new(config);
        builder.destination = Destination::StdErr;
        builder.bound_to_stderr = true;
        builder
    }

    fn set_destination(&mut self, destination: Destination) {
        if self.bound_to_stderr {
            self.rebind_attempted = true;
        } else {
            self.destination = destination;
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.set_destination(Destination::Writer(Box::new(writer)));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.set_destination(Destination::Path(path.into()));
        self
    }

    /// Defaults to a [`TokenizedFormatter`] over the configuration
    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: impl LogFormatter + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_everything(mut self, log_everything: bool) -> Self {
        self.log_everything = log_everything;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> Result<FileHandleHandler> {
        if self.rebind_attempted {
            return Err(LoggerError::config(
                "StdErrHandler",
                "standard error handler cannot be bound to another destination",
            ));
        }

        let (writer, default_name): (Box<dyn Write + Send>, String) = match self.destination {
            Destination::Unset => {
                return Err(LoggerError::config(
                    "FileHandleHandler",
                    "no destination given; call writer() or path()",
                ))
            }
            Destination::Writer(writer) => (writer, "file_handle".to_string()),
            Destination::Path(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        LoggerError::io_operation("creating log directory", parent.display().to_string(), e)
                    })?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|e| {
                        LoggerError::io_operation("opening log file", path.display().to_string(), e)
                    })?;
                (Box::new(file), format!("file:{}", path.display()))
            }
            Destination::StdErr => (Box::new(std::io::stderr()), "stderr".to_string()),
        };

        let formatter = self
            .formatter
            .unwrap_or_else(|| Arc::new(TokenizedFormatter::new(Arc::clone(&self.config))));

        FileHandleHandler::spawn(
            self.name.unwrap_or(default_name),
            writer,
            formatter,
            self.log_everything,
            self.on_error,
        )
    }
}

/// [`FileHandleHandler`] fixed to standard error.
///
/// Its builder refuses any other destination: `build()` fails with
/// [`LoggerError::InvalidConfiguration`] if `writer` or `path` was called.
pub struct StdErrHandler {
    inner: FileHandleHandler,
}

impl StdErrHandler {
    pub fn new(config: Arc<dyn LogConfiguration>) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: Arc<dyn LogConfiguration>) -> StdErrHandlerBuilder {
        StdErrHandlerBuilder {
            inner: FileHandleHandlerBuilder::for_stderr(config),
        }
    }
}

impl LogHandler for StdErrHandler {
    fn append(&self, entry: LogEntry) {
        self.inner.append(entry);
    }

    fn formatter(&self) -> &dyn LogFormatter {
        self.inner.formatter()
    }

    fn log_everything(&self) -> bool {
        self.inner.log_everything()
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Builder for [`StdErrHandler`]
pub struct StdErrHandlerBuilder {
    inner: FileHandleHandlerBuilder,
}

impl StdErrHandlerBuilder {
    /// Rejected: makes `build()` fail
    #[must_use = "builder methods return a new value"]
    pub fn writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.inner = self.inner.writer(writer);
        self
    }

    /// Rejected: makes `build()` fail
    #[must_use = "builder methods return a new value"]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.path(path);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: impl LogFormatter + 'static) -> Self {
        self.inner = self.inner.formatter(formatter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_everything(mut self, log_everything: bool) -> Self {
        self.inner = self.inner.log_everything(log_everything);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.inner = self.inner.on_error(callback);
        self
    }

    pub fn build(self) -> Result<StdErrHandler> {
        Ok(StdErrHandler {
            inner: self.inner.build()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DefaultLogConfiguration, LogLevel};
    use crate::handlers::MemoryWriter;
    use parking_lot::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    fn config() -> Arc<dyn LogConfiguration> {
        Arc::new(DefaultLogConfiguration::new(LogLevel::Trace))
    }

    fn message_only() -> TokenizedFormatter {
        TokenizedFormatter::with_format(config(), "(%message)")
    }

    #[test]
    fn test_fifo_order() -> Result<()> {
        let output = MemoryWriter::new();
        let handler = FileHandleHandler::builder(config())
            .writer(output.clone())
            .formatter(message_only())
            .build()?;

        for i in 0..200 {
            handler.append(LogEntry::new(LogLevel::Info, format!("line {}", i)));
        }
        handler.flush()?;

        let expected: Vec<String> = (0..200).map(|i| format!("line {}", i)).collect();
        assert_eq!(output.contents().lines().collect::<Vec<_>>(), expected);
        Ok(())
    }

    #[test]
    fn test_drop_drains_queue_before_release() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("app.log");

        let handler = FileHandleHandler::builder(config())
            .path(&path)
            .formatter(message_only())
            .build()?;
        for i in 0..50 {
            handler.append(LogEntry::new(LogLevel::Info, format!("entry {}", i)));
        }
        drop(handler);

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 50);
        assert!(content.ends_with("entry 49\n"));
        Ok(())
    }

    /// Sleeps on every write so the queue backs up
    struct SlowWriter {
        inner: MemoryWriter,
    }

    impl Write for SlowWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            std::thread::sleep(Duration::from_millis(2));
            self.inner.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_append_does_not_wait_for_io() -> Result<()> {
        let output = MemoryWriter::new();
        let handler = FileHandleHandler::builder(config())
            .writer(SlowWriter { inner: output.clone() })
            .formatter(message_only())
            .build()?;

        let started = std::time::Instant::now();
        for i in 0..100 {
            handler.append(LogEntry::new(LogLevel::Info, format!("slow {}", i)));
        }
        assert!(started.elapsed() < Duration::from_millis(150));

        handler.flush()?;
        assert_eq!(output.contents().lines().count(), 100);
        Ok(())
    }

    struct FailAfter {
        remaining: usize,
        inner: MemoryWriter,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "device gone"));
            }
            self.remaining -= 1;
            self.inner.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unwritable_destination_drops_later_entries() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        let handler = FileHandleHandler::builder(config())
            .writer(FailAfter { remaining: 0, inner: MemoryWriter::new() })
            .formatter(message_only())
            .on_error(Arc::new(move |err: &LoggerError| sink.lock().push(err.to_string())))
            .build()
            .expect("handler builds");

        for i in 0..5 {
            handler.append(LogEntry::new(LogLevel::Info, format!("doomed {}", i)));
        }
        assert!(handler.flush().is_err());
        drop(handler);

        assert_eq!(errors.lock().len(), 1);
    }

    /// Panics for every entry at a chosen level
    struct ExplodingFormatter;

    impl LogFormatter for ExplodingFormatter {
        fn format(&self, entry: &LogEntry) -> Option<String> {
            if entry.level() == LogLevel::Error {
                panic!("formatter exploded");
            }
            Some(entry.message().to_string())
        }
    }

    #[test]
    fn test_panicking_formatter_does_not_kill_worker() -> Result<()> {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        let output = MemoryWriter::new();
        let handler = FileHandleHandler::builder(config())
            .writer(output.clone())
            .formatter(ExplodingFormatter)
            .on_error(Arc::new(move |err: &LoggerError| sink.lock().push(err.to_string())))
            .build()?;

        handler.append(LogEntry::new(LogLevel::Info, "before"));
        handler.append(LogEntry::new(LogLevel::Error, "boom"));
        handler.append(LogEntry::new(LogLevel::Info, "after"));
        handler.flush()?;

        assert_eq!(output.contents(), "before\nafter\n");
        let errors = errors.lock();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("formatter exploded"));
        Ok(())
    }

    #[test]
    fn test_unrenderable_date_pattern_keeps_writing() -> Result<()> {
        let output = MemoryWriter::new();
        let formatter = TokenizedFormatter::with_format(config(), "(%date) (%message)")
            .with_date_formatter(crate::core::TimestampFormat::Custom("%Q".to_string()));
        let handler = FileHandleHandler::builder(config())
            .writer(output.clone())
            .formatter(formatter)
            .build()?;

        handler.append(LogEntry::new(LogLevel::Error, "first"));
        handler.append(LogEntry::new(LogLevel::Error, "second"));
        handler.flush()?;

        let contents = output.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Z first"));
        assert!(lines[1].ends_with("Z second"));
        Ok(())
    }

    #[test]
    fn test_builder_requires_destination() {
        assert!(matches!(
            FileHandleHandler::builder(config()).build(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_stderr_handler_rejects_rebinding() {
        let result = StdErrHandler::builder(config())
            .writer(MemoryWriter::new())
            .build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));

        let result = StdErrHandler::builder(config()).path("elsewhere.log").build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_stderr_handler_builds() -> Result<()> {
        let handler = StdErrHandler::builder(config()).log_everything(true).build()?;
        assert_eq!(handler.name(), "stderr");
        assert!(handler.log_everything());
        Ok(())
    }
}
