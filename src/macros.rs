//! Logging macros for ergonomic log message formatting.
//!
//! The macros capture the enclosing function, file and line, and skip the
//! `format!` entirely when nothing would receive the entry.
//!
//! # Examples
//!
//! ```
//! use rust_token_logger::prelude::*;
//! use rust_token_logger::{info, warn};
//!
//! let logger = Logger::builder().threshold(LogLevel::Info).build();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Any `Into<LogCategory>` works as a category
//! warn!(logger, category: "net", "Slow handshake with {}", "10.0.0.7");
//! ```

/// Name of the enclosing function, without its module path.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        let mut name = name;
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name.rsplit("::").next().unwrap_or(name)
    }};
}

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_token_logger::prelude::*;
/// # let logger = Logger::default();
/// use rust_token_logger::log;
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Error, category: "http", "Error code: {}", 502);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, category: $category:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level: $crate::LogLevel = $level;
        let category: $crate::LogCategory = ::core::convert::Into::into($category);
        if logger.is_logging(level, &category) {
            logger.log_message(
                level,
                category,
                ::std::format!($($arg)+),
                $crate::CallSite::new($crate::__function_name!(), ::core::file!(), ::core::line!()),
            );
        }
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::log!($logger, $level, category: $crate::LogCategory::GENERAL, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, category: $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, category: $category, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_token_logger::prelude::*;
/// # let logger = Logger::default();
/// use rust_token_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, category: "db", "Connection timeout after {} seconds", 30);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, category: $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, category: $category, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, category: $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, category: $category, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, category: $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Notice, category: $category, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Notice, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, category: $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, category: $category, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, category: $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, category: $category, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, category: $category:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, category: $category, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}
