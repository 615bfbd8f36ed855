//! Engine log parsing and filtering.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::ingest::sanitize_timestamp_ms;
use crate::model::{LogData, LogEntry, LogLevel};

/// Structured line format: `[<frame>|<timestampMs>|<verbosity>] <category>: <message>`.
fn log_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\[(\d+)\|([0-9.]+)\|(\w+)\]\s*(\w+):\s*(.*)$")
            .expect("log line pattern compiles")
    })
}

/// Parse newline-delimited engine log text.
///
/// Lines that do not match the structured format are retained as fallback
/// entries (`timestamp_ms = 0`, level `log`, category `Unknown`) rather than
/// dropped; malformed input never reduces the record count. Fallback
/// entries do not contribute to the category set.
pub fn parse_log_text(text: &str) -> LogData {
    let mut entries = Vec::new();
    let mut categories = BTreeSet::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(caps) = log_line_regex().captures(line) {
            let timestamp_ms =
                sanitize_timestamp_ms(caps[2].parse::<f64>().unwrap_or(0.0));
            let category = caps[4].to_string();
            categories.insert(category.clone());
            entries.push(LogEntry {
                timestamp_ms,
                level: LogLevel::from_verbosity(&caps[3]),
                category,
                message: caps[5].to_string(),
            });
        } else {
            entries.push(LogEntry {
                timestamp_ms: 0.0,
                level: LogLevel::Log,
                category: "Unknown".to_string(),
                message: line.to_string(),
            });
        }
    }

    LogData {
        entries,
        categories: categories.into_iter().collect(),
    }
}

/// Post-parse log filter. All populated criteria must match (AND semantics).
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Keep only these levels. `None` or an empty list means no constraint.
    pub levels: Option<Vec<LogLevel>>,
    /// Keep only this exact category.
    pub category: Option<String>,
    /// Keep only messages containing this substring, case-insensitively.
    pub search: Option<String>,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(levels) = &self.levels
            && !levels.is_empty()
            && !levels.contains(&entry.level)
        {
            return false;
        }
        if let Some(category) = &self.category
            && entry.category != *category
        {
            return false;
        }
        if let Some(search) = &self.search
            && !entry
                .message
                .to_lowercase()
                .contains(&search.to_lowercase())
        {
            return false;
        }
        true
    }

    /// Apply the filter, keeping entry order.
    pub fn apply(&self, entries: &[LogEntry]) -> Vec<LogEntry> {
        entries
            .iter()
            .filter(|entry| self.matches(entry))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_line_parses() {
        let data = parse_log_text("[12|345.6|Warning] PhysicsEngine: collision overflow");
        assert_eq!(data.entries.len(), 1);
        let entry = &data.entries[0];
        assert_eq!(entry.timestamp_ms, 345.6);
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.category, "PhysicsEngine");
        assert_eq!(entry.message, "collision overflow");
        assert_eq!(data.categories, ["PhysicsEngine"]);
    }

    #[test]
    fn garbled_line_becomes_fallback_entry() {
        let data = parse_log_text("garbled text");
        assert_eq!(data.entries.len(), 1);
        let entry = &data.entries[0];
        assert_eq!(entry.timestamp_ms, 0.0);
        assert_eq!(entry.level, LogLevel::Log);
        assert_eq!(entry.category, "Unknown");
        assert_eq!(entry.message, "garbled text");
        // Fallback entries stay out of the category set.
        assert!(data.categories.is_empty());
    }

    #[test]
    fn malformed_lines_never_reduce_record_count() {
        let text = "[1|10.0|Log] Net: hello\nnot a log line\n[2|20.0|Error] Net: dropped\n";
        let data = parse_log_text(text);
        assert_eq!(data.entries.len(), 3);
        assert_eq!(data.categories, ["Net"]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let data = parse_log_text("\n  \n[1|5.0|Log] Core: up\n\n");
        assert_eq!(data.entries.len(), 1);
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let text = "[1|1.0|Log] Render: a\n[2|2.0|Log] Audio: b\n[3|3.0|Log] Render: c";
        let data = parse_log_text(text);
        assert_eq!(data.categories, ["Audio", "Render"]);
    }

    #[test]
    fn unknown_verbosity_folds_to_log() {
        let data = parse_log_text("[1|1.0|Display] Core: booted");
        assert_eq!(data.entries[0].level, LogLevel::Log);
    }

    #[test]
    fn filters_combine_with_and_semantics() {
        let text = "\
[1|1.0|Warning] Physics: body fell asleep
[2|2.0|Error] Physics: solver diverged
[3|3.0|Warning] Render: texture SOLVER missing";
        let data = parse_log_text(text);

        let filter = LogFilter {
            levels: Some(vec![LogLevel::Warning, LogLevel::Error]),
            category: Some("Physics".to_string()),
            search: Some("solver".to_string()),
        };
        let filtered = filter.apply(&data.entries);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].level, LogLevel::Error);
    }

    #[test]
    fn empty_level_list_is_no_constraint() {
        let data = parse_log_text("[1|1.0|Verbose] Core: detail");
        let filter = LogFilter {
            levels: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&data.entries).len(), 1);
    }

    #[test]
    fn search_is_case_insensitive() {
        let data = parse_log_text("[1|1.0|Log] Core: Shader Compilation Done");
        let filter = LogFilter {
            search: Some("COMPILATION".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&data.entries).len(), 1);
    }

    #[test]
    fn negative_timestamp_is_sanitized() {
        // The pattern itself rejects a leading minus, but a parse failure
        // must still not produce NaN.
        let data = parse_log_text("[1|9.9.9|Log] Core: odd timestamp");
        assert_eq!(data.entries[0].timestamp_ms, 0.0);
        assert_eq!(data.entries[0].category, "Core");
    }
}
