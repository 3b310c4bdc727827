//! Log levels and subscriber setup.
//!
//! The adapter never configures logging itself; it only emits `tracing`
//! events at the level it was built with. A binary calls [`init`] once to
//! route those events to stderr and to a JSON log file.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self as tfmt, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{AdapterError, Result};

pub const DEFAULT_LOG_FILE: &str = "logs/rest_adapter.log";

/// Severity used for adapter log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = AdapterError;

    /// Case-insensitive. `NOTSET` maps to trace; `CRITICAL` and `FATAL` map
    /// to error since `tracing` has nothing above it.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" | "NOTSET" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" | "CRITICAL" | "FATAL" => Ok(LogLevel::Error),
            _ => Err(AdapterError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        LevelFilter::from_level(level.into())
    }
}

/// Emits a `tracing` event at a [`LogLevel`] only known at runtime.
macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            $crate::logging::LogLevel::Trace => ::tracing::trace!($($arg)+),
            $crate::logging::LogLevel::Debug => ::tracing::debug!($($arg)+),
            $crate::logging::LogLevel::Info => ::tracing::info!($($arg)+),
            $crate::logging::LogLevel::Warn => ::tracing::warn!($($arg)+),
            $crate::logging::LogLevel::Error => ::tracing::error!($($arg)+),
        }
    };
}
pub(crate) use event_at;

/// Where and how verbosely log output is written.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Full path of the JSON log file. Its parent directory is created on init.
    pub log_file: PathBuf,
    /// Level for the file layer, used when `RUST_LOG_JSON` is unset or empty.
    pub file_level: LogLevel,
    /// Level for the stderr layer, used when `RUST_LOG` is unset or empty.
    pub stderr_level: LogLevel,
    pub rotation: Rotation,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            file_level: LogLevel::Debug,
            stderr_level: LogLevel::Info,
            rotation: Rotation::NEVER,
        }
    }
}

impl LogConfig {
    /// Reads `LOG_FILE_PATH` and `LOG_LEVEL`, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidLogLevel`] if `LOG_LEVEL` is set to
    /// something that is not a level name.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("LOG_FILE_PATH") {
            config.log_file = PathBuf::from(path);
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.file_level = level.parse()?;
        }
        Ok(config)
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    pub fn with_file_level(mut self, level: LogLevel) -> Self {
        self.file_level = level;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    fn split_path(&self) -> (&Path, &OsStr) {
        let dir = match self.log_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let name = self
            .log_file
            .file_name()
            .unwrap_or(OsStr::new("rest_adapter.log"));
        (dir, name)
    }
}

/// Filter for one output layer. Directives from the environment replace
/// `default` entirely; `default` applies only when none are given.
fn layer_filter(directives: Option<&str>, default: LogLevel) -> EnvFilter {
    match directives {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(default.as_str()),
    }
}

/// Installs the global subscriber: colored stderr plus a JSON file.
///
/// Keep the returned guard alive for as long as logs should be flushed to
/// the file.
///
/// # Errors
///
/// Fails if the log directory cannot be created or a global subscriber is
/// already installed.
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
    let (dir, name) = config.split_path();
    std::fs::create_dir_all(dir).map_err(|source| AdapterError::Config {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_appender = RollingFileAppender::builder()
        .rotation(config.rotation.clone())
        .filename_prefix(name.to_string_lossy().into_owned())
        .build(dir)
        .map_err(|e| AdapterError::Logging(e.to_string()))?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = tfmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(layer_filter(
            std::env::var("RUST_LOG").ok().as_deref(),
            config.stderr_level,
        ));

    let json_layer = tfmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(layer_filter(
            std::env::var("RUST_LOG_JSON").ok().as_deref(),
            config.file_level,
        ));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| AdapterError::Logging(e.to_string()))?;

    Ok(guard)
}
