//! Structured logging to the browser console using tracing.
//!
//! Provides configurable logging with:
//! - Different log levels for development and production
//! - One console call per event, routed by level (`console.error`, `console.warn`, ...)
//! - No timestamps, since the console adds its own

use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Logging configuration options.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Maximum log level for our own crates.
    pub level: Level,
    /// Maximum log level for dependencies.
    pub dependency_level: Level,
    /// Whether to include target module in logs.
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LoggingConfig {
    /// Create a development configuration with verbose logging.
    #[must_use]
    pub const fn development() -> Self {
        Self {
            level: Level::DEBUG,
            dependency_level: Level::INFO,
            include_target: true,
        }
    }

    /// Create a production configuration with minimal console output.
    #[must_use]
    pub const fn production() -> Self {
        Self {
            level: Level::WARN,
            dependency_level: Level::ERROR,
            include_target: false,
        }
    }

    /// Detect configuration based on build type.
    #[must_use]
    pub const fn auto() -> Self {
        if cfg!(debug_assertions) {
            Self::development()
        } else {
            Self::production()
        }
    }

    /// Set the log level for our crates.
    #[must_use]
    pub const fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set whether the target module is printed.
    #[must_use]
    pub const fn with_target(mut self, include_target: bool) -> Self {
        self.include_target = include_target;
        self
    }

    /// Filter directives for this configuration.
    #[must_use]
    pub fn directives(&self) -> String {
        let level = level_to_directive(self.level);
        format!(
            "{},pagefade_core={level},pagefade_web={level}",
            level_to_directive(self.dependency_level)
        )
    }
}

/// Initialize console logging with the given configuration.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let console_layer = fmt::layer()
        .without_time()
        .with_ansi(false)
        .with_level(false)
        .with_target(config.include_target)
        .with_writer(ConsoleMakeWriter)
        .with_filter(EnvFilter::new(config.directives()));

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

/// Initialize logging with automatic configuration detection.
///
/// # Errors
///
/// Returns an error if initialization fails.
pub fn init_auto() -> Result<(), LoggingError> {
    init(&LoggingConfig::auto())
}

/// Convert a tracing Level to a filter directive string.
const fn level_to_directive(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Hands out one [`ConsoleWriter`] per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it to the console when dropped.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    const fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }

    fn message(&self) -> String {
        String::from_utf8_lossy(&self.buffer)
            .trim_end()
            .to_string()
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let message = JsValue::from_str(&self.message());
        match self.level {
            Level::ERROR => console::error_1(&message),
            Level::WARN => console::warn_1(&message),
            Level::INFO => console::info_1(&message),
            Level::DEBUG | Level::TRACE => console::debug_1(&message),
        }
    }
}

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// A global subscriber was already set.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}
