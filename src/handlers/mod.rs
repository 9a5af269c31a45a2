//! Handler implementations

pub mod attributed;
pub mod file_handle;
pub mod text_stream;

#[cfg(feature = "console")]
pub mod console;

#[cfg(feature = "log-bridge")]
pub mod bridge;

pub use attributed::AttributedBufferHandler;
pub use file_handle::{
    FileHandleHandler, FileHandleHandlerBuilder, StdErrHandler, StdErrHandlerBuilder,
};
pub use text_stream::{MemoryWriter, TextStreamHandler};

#[cfg(feature = "console")]
pub use console::ConsoleHandler;

#[cfg(feature = "log-bridge")]
pub use bridge::LogBridge;

pub use crate::core::LogHandler;
