use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*\d{1,2}:\d{2})\s+([0-9]{5})?\s*(.*)$").expect("Line pattern should be valid")
});

/// One recognized line of a daily log, e.g. `08:00 12345 Fix bug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub time: NaiveTime,
    pub task_id: Option<String>,
    pub description: String,
}

impl ParsedLine {
    /// Time in the `HH:MM` form.
    pub fn time_str(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// Parses `line` into time, optional 5 digit task id and description. Lines that don't follow
/// the format, or carry an impossible time like `25:00`, return [None].
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let captures = LINE_PATTERN.captures(line)?;
    let time = NaiveTime::parse_from_str(captures.get(1)?.as_str().trim(), "%H:%M").ok()?;
    let task_id = captures.get(2).map(|v| v.as_str().to_string());
    let description = captures
        .get(3)
        .map(|v| v.as_str().trim_end_matches('\r').to_string())
        .unwrap_or_default();
    Some(ParsedLine {
        time,
        task_id,
        description,
    })
}
