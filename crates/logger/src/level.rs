use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/*
 * Log level pyramid:
 *
 *          DEBUG    INFO    WARN    ERROR   FATAL
 *
 * DEBUG      x       x       x        x       x
 * INFO               x       x        x       x
 * WARN                       x        x       x
 * ERROR                               x       x
 * FATAL                                       x
 *
 * Column: configured minimum level. Row: message levels that pass the filter.
 */

/// Message severity. The derived ordering is the filter ordering:
/// a record passes when its level is >= the configured minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    pub(crate) fn from_u8(value: u8) -> LogLevel {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            _ => LogLevel::Fatal,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown log level: {0}")]
pub struct ParseLogLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

/// Where the drain thread writes: the console stream or a rotating file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Console,
    File,
}

impl LogMode {
    pub(crate) fn from_u8(value: u8) -> LogMode {
        match value {
            0 => LogMode::Console,
            _ => LogMode::File,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown log mode: {0}")]
pub struct ParseLogModeError(pub String);

impl FromStr for LogMode {
    type Err = ParseLogModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(LogMode::Console),
            "file" => Ok(LogMode::File),
            _ => Err(ParseLogModeError(s.to_string())),
        }
    }
}
