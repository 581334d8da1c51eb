use crate::level::LogLevel;
use chrono::Local;
use std::fmt::Display;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders one record line: `[LEVEL] YYYY-MM-DD HH:MM:SS - <message>`.
pub fn format_line(level: LogLevel, message: &str) -> String {
    format!(
        "[{}] {} - {}",
        level.tag(),
        Local::now().format(TIMESTAMP_FORMAT),
        message
    )
}

/// Space-joins a slice of displayable parts into one message body.
pub fn join_parts(parts: &[&dyn Display]) -> String {
    parts
        .iter()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name of today's log file, `YYYY-MM-DD.log`.
pub fn daily_file_name() -> String {
    format!("{}.log", Local::now().format("%Y-%m-%d"))
}
