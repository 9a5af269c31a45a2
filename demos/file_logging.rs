//! File logging example
//!
//! Demonstrates logging to the console and to a file written on a
//! background worker, plus routing the `log` facade into the same handlers.
//!
//! Run with: cargo run --example file_logging

use rust_token_logger::handlers::{ConsoleHandler, FileHandleHandler, LogBridge};
use rust_token_logger::prelude::*;
use rust_token_logger::JsonFormatter;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Token Logger - File Logging Example ===\n");

    let config = DefaultLogConfiguration::new(LogLevel::Info).shared();

    let logger = Arc::new(
        Logger::builder()
            .configuration(config.clone())
            .handler(ConsoleHandler::new(config.clone()))
            .handler(FileHandleHandler::open("application.log", config.clone())?)
            .handler(
                FileHandleHandler::builder(config.clone())
                    .path("application.jsonl")
                    .formatter(JsonFormatter::new())
                    .build()?,
            )
            .log_application_start()
            .build(),
    );

    println!("1. Logging to console and files:");
    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.info("Configuration loaded successfully");
    logger.warn("Using default settings for some options");
    logger.error("Failed to load optional plugin");

    println!("\n2. Records from the log facade:");
    LogBridge::install(&logger)?;
    log::info!("Forwarded from a library");
    log::warn!(category = "db"; "Slow query took {} ms", 250);

    println!("\n3. Performing some operations:");
    for i in 1..=5 {
        logger.info(format!("Processing item {}/5", i));
        if i == 3 {
            logger.warn("Item 3 took longer than expected");
        }
    }

    // Wait until the background workers wrote everything
    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' and 'application.jsonl' for the output");

    Ok(())
}
