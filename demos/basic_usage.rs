//! Basic logger usage example
//!
//! Demonstrates console logging, token formats, categories and the
//! process-wide logger.
//!
//! Run with: cargo run --example basic_usage

use rust_token_logger::handlers::ConsoleHandler;
use rust_token_logger::prelude::*;
use rust_token_logger::{global, info, warn};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Token Logger - Basic Usage Example ===\n");

    let config = DefaultLogConfiguration::new(LogLevel::Trace)
        .with_level_colors()
        .shared();

    let logger = Arc::new(
        Logger::builder()
            .configuration(config.clone())
            .handler(ConsoleHandler::new(config.clone()))
            .build(),
    );
    logger.log_application_start()?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.notice("This is a notice message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.critical("This is a critical message");

    println!("\n2. Raising the threshold at runtime:");
    config.set_threshold(LogLevel::Info);
    println!("   Threshold set to INFO - trace and debug won't show:");
    logger.trace("Trace message (hidden)");
    logger.debug("Debug message (hidden)");
    logger.info("Info message (visible)");

    println!("\n3. Macros with categories and a custom format:");
    let compact = Logger::builder()
        .configuration(config.clone())
        .handler(ConsoleHandler::with_formatter(TokenizedFormatter::with_format(
            config.clone(),
            "[(%level)] (%category) (%function): (%message)",
        )))
        .build();
    let port = 8080;
    info!(compact, category: "net", "Listening on port {}", port);
    warn!(compact, "Using default settings for {} options", 2);

    println!("\n4. Process-wide logger:");
    global::enable_logging(Arc::clone(&logger));
    global::info("Logged through the global entry point");
    global::error_in("Query failed", LogCategory::new("db"));

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
