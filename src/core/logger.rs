//! Dispatcher fanning entries out to handlers

use super::{
    configuration::{DefaultLogConfiguration, LogConfiguration},
    diagnostics::{panic_message, report_warning},
    error::{LoggerError, Result},
    handler::{HandlerId, LogHandler},
    log_category::LogCategory,
    log_entry::{CallSite, LogEntry},
    log_level::LogLevel,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone)]
struct Registered {
    id: HandlerId,
    handler: Arc<dyn LogHandler>,
}

#[derive(Default)]
struct HandlerSet {
    entries: Vec<Registered>,
    started: bool,
}

impl HandlerSet {
    fn wants_everything(&self) -> bool {
        self.entries.iter().any(|r| r.handler.log_everything())
    }

    fn snapshot(&self) -> Vec<Registered> {
        self.entries.clone()
    }
}

/// Applies the configuration's policy to each entry and forwards the
/// survivors to every registered handler, in registration order.
///
/// Registration and removal are serialized with the handler snapshot each
/// `log` call takes; handlers themselves run outside that lock, so an entry
/// already in flight can still reach a handler that was just removed.
///
/// # Example
///
/// ```
/// use rust_token_logger::prelude::*;
/// use rust_token_logger::handlers::{MemoryWriter, TextStreamHandler};
/// use std::sync::Arc;
///
/// let config = DefaultLogConfiguration::new(LogLevel::Warn).shared();
/// let logger = Logger::new(config.clone());
/// let output = MemoryWriter::new();
/// logger.add_handler(TextStreamHandler::new(output.clone(), config));
///
/// logger.warn("disk low");
/// logger.debug("tick");
///
/// assert!(output.contents().trim_end().ends_with("disk low"));
/// assert_eq!(output.contents().lines().count(), 1);
/// ```
pub struct Logger {
    config: Arc<dyn LogConfiguration>,
    handlers: RwLock<HandlerSet>,
    log_everything: AtomicBool,
    next_id: AtomicU64,
}

impl Logger {
    #[must_use]
    pub fn new(config: Arc<dyn LogConfiguration>) -> Self {
        Self {
            config,
            handlers: RwLock::new(HandlerSet::default()),
            log_everything: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn configuration(&self) -> &Arc<dyn LogConfiguration> {
        &self.config
    }

    /// Register a handler.
    ///
    /// If the application start was already logged the handler receives its
    /// start marker right away.
    pub fn append(&self, handler: Arc<dyn LogHandler>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let registered = Registered { id, handler };

        let started = {
            let mut handlers = self.handlers.write();
            handlers.entries.push(registered.clone());
            self.log_everything
                .store(handlers.wants_everything(), Ordering::Release);
            handlers.started
        };

        // Delivered without the lock so the handler may log from `append`
        if started {
            Self::deliver(&registered, LogEntry::start_marker());
        }
        id
    }

    /// Register a handler the logger will own
    pub fn add_handler<H: LogHandler + 'static>(&self, handler: H) -> HandlerId {
        self.append(Arc::new(handler))
    }

    /// Unregister a handler, returning it if it was registered
    pub fn remove(&self, id: HandlerId) -> Option<Arc<dyn LogHandler>> {
        let mut handlers = self.handlers.write();
        let index = handlers.entries.iter().position(|r| r.id == id)?;
        let removed = handlers.entries.remove(index);
        self.log_everything
            .store(handlers.wants_everything(), Ordering::Release);
        Some(removed.handler)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().entries.len()
    }

    pub fn is_started(&self) -> bool {
        self.handlers.read().started
    }

    /// Whether some registered handler asked for unfiltered delivery
    pub fn log_everything(&self) -> bool {
        self.log_everything.load(Ordering::Acquire)
    }

    /// Mark the application as started and send every handler a start marker.
    ///
    /// Calling this twice is a misuse: the second call warns, changes
    /// nothing and returns [`LoggerError::AlreadyStarted`].
    pub fn log_application_start(&self) -> Result<()> {
        // Handlers appended after this point see `started` and get their own marker
        let recipients = {
            let mut handlers = self.handlers.write();
            if handlers.started {
                report_warning("log_application_start called more than once; ignoring");
                return Err(LoggerError::AlreadyStarted);
            }
            handlers.started = true;
            handlers.snapshot()
        };

        let marker = LogEntry::start_marker();
        for registered in &recipients {
            Self::deliver(registered, marker.clone());
        }
        Ok(())
    }

    /// Whether an entry with this level and category would reach any handler
    pub fn is_logging(&self, level: LogLevel, category: &LogCategory) -> bool {
        self.log_everything() || self.config.logging_enabled(level, category)
    }

    /// Dispatch an entry.
    ///
    /// The configuration is consulted once; each handler gets the entry if
    /// that check passed or it logs everything.
    ///
    /// Handlers are called outside the registry lock, so they may log
    /// through this logger from their own `append`.
    pub fn log(&self, entry: LogEntry) {
        let recipients = self.handlers.read().snapshot();
        if recipients.is_empty() {
            return;
        }
        let enabled = self.config.logging_enabled(entry.level(), entry.category());

        for registered in &recipients {
            if enabled || registered.handler.log_everything() {
                Self::deliver(registered, entry.clone());
            }
        }
    }

    /// Build and dispatch an entry unless nobody would receive it
    pub fn log_message(
        &self,
        level: LogLevel,
        category: LogCategory,
        message: impl AsRef<str>,
        site: CallSite,
    ) {
        if !self.is_logging(level, &category) {
            return;
        }
        let entry = LogEntry::new(level, message)
            .with_category(category)
            .with_call_site(site);
        self.log(entry);
    }

    /// Hand one entry to one handler; a panicking handler must not take the
    /// caller or the other handlers down with it
    fn deliver(registered: &Registered, entry: LogEntry) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            registered.handler.append(entry)
        }));
        if let Err(panic_info) = result {
            eprintln!(
                "[LOGGER CRITICAL] Handler '{}' ({}) panicked: {}. \
                 Other handlers continue to function.",
                registered.handler.name(),
                registered.id,
                panic_message(panic_info.as_ref())
            );
        }
    }

    /// Flush every handler, returning the first failure
    pub fn flush(&self) -> Result<()> {
        let recipients = self.handlers.read().snapshot();
        let mut first_error = None;
        for registered in &recipients {
            if let Err(e) = registered.handler.flush() {
                eprintln!(
                    "[LOGGER ERROR] Handler '{}' flush failed: {}",
                    registered.handler.name(),
                    e
                );
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    #[inline]
    #[track_caller]
    pub fn critical(&self, message: impl AsRef<str>) {
        self.log_message(LogLevel::Critical, LogCategory::GENERAL, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log_message(LogLevel::Error, LogCategory::GENERAL, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log_message(LogLevel::Warn, LogCategory::GENERAL, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn notice(&self, message: impl AsRef<str>) {
        self.log_message(LogLevel::Notice, LogCategory::GENERAL, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log_message(LogLevel::Info, LogCategory::GENERAL, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log_message(LogLevel::Debug, LogCategory::GENERAL, message, CallSite::caller());
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.log_message(LogLevel::Trace, LogCategory::GENERAL, message, CallSite::caller());
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Arc::new(DefaultLogConfiguration::default()))
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Handlers with workers drain on their own drop; this covers
        // buffered synchronous ones.
        let _ = self.flush();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_token_logger::prelude::*;
/// use rust_token_logger::handlers::{MemoryWriter, TextStreamHandler};
///
/// let config = DefaultLogConfiguration::new(LogLevel::Info).shared();
/// let logger = Logger::builder()
///     .configuration(config.clone())
///     .handler(TextStreamHandler::new(MemoryWriter::new(), config))
///     .build();
///
/// assert_eq!(logger.handler_count(), 1);
/// ```
pub struct LoggerBuilder {
    config: Option<Arc<dyn LogConfiguration>>,
    handlers: Vec<Arc<dyn LogHandler>>,
    start: bool,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            handlers: Vec::new(),
            start: false,
        }
    }

    /// Use a shared configuration
    #[must_use = "builder methods return a new value"]
    pub fn configuration(mut self, config: Arc<dyn LogConfiguration>) -> Self {
        self.config = Some(config);
        self
    }

    /// Shorthand for a [`DefaultLogConfiguration`] with this threshold
    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, level: LogLevel) -> Self {
        self.config = Some(Arc::new(DefaultLogConfiguration::new(level)));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn handler<H: LogHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_handler(mut self, handler: Arc<dyn LogHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Log the application start once all handlers are registered
    #[must_use = "builder methods return a new value"]
    pub fn log_application_start(mut self) -> Self {
        self.start = true;
        self
    }

    pub fn build(self) -> Logger {
        let config = self
            .config
            .unwrap_or_else(|| Arc::new(DefaultLogConfiguration::default()));
        let logger = Logger::new(config);
        for handler in self.handlers {
            logger.append(handler);
        }
        if self.start {
            let _ = logger.log_application_start();
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
