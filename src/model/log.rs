use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of an engine log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Verbose,
    Log,
    Warning,
    Error,
}

impl LogLevel {
    /// Map a verbosity token from a raw log line to a level.
    ///
    /// Matching is case-insensitive; unknown tokens fold to `Log`.
    pub fn from_verbosity(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "verbose" => LogLevel::Verbose,
            "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Log,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Verbose => "verbose",
            LogLevel::Log => "log",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed engine log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp_ms: f64,
    pub level: LogLevel,
    pub category: String,
    pub message: String,
}

/// Parsed log stream plus the distinct categories observed in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogData {
    #[serde(default)]
    pub entries: Vec<LogEntry>,
    /// Sorted set of categories from lines that matched the structured
    /// format. Fallback entries do not contribute.
    #[serde(default)]
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_token_mapping() {
        assert_eq!(LogLevel::from_verbosity("Warning"), LogLevel::Warning);
        assert_eq!(LogLevel::from_verbosity("VERBOSE"), LogLevel::Verbose);
        assert_eq!(LogLevel::from_verbosity("error"), LogLevel::Error);
        assert_eq!(LogLevel::from_verbosity("Display"), LogLevel::Log);
    }

    #[test]
    fn level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LogLevel::Warning).unwrap(),
            "\"warning\""
        );
        assert_eq!(LogLevel::Error.to_string(), "error");
    }
}
