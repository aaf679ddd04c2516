use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use tracing::warn;

use super::parser::{parse_line, ParsedLine};

/// A recognized line together with the moment it was written.
#[derive(Debug, Clone)]
pub struct TimedLine<Tz: TimeZone> {
    pub line: ParsedLine,
    pub timestamp: DateTime<Tz>,
}

/// Parses `lines` and places every recognized line on `date` in `tz`. Unrecognized lines and
/// times that don't exist on `date` (a daylight saving gap) are skipped with a warning, so every
/// later step sees the same lines.
pub fn timed_lines<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    lines: impl IntoIterator<Item = impl AsRef<str>>,
) -> Vec<TimedLine<Tz>> {
    resolve_lines(date, lines, |local| tz.from_local_datetime(&local).earliest())
}

fn resolve_lines<Tz: TimeZone>(
    date: NaiveDate,
    lines: impl IntoIterator<Item = impl AsRef<str>>,
    resolve: impl Fn(NaiveDateTime) -> Option<DateTime<Tz>>,
) -> Vec<TimedLine<Tz>> {
    lines
        .into_iter()
        .filter_map(|line| {
            let line = line.as_ref();
            let parsed = parse_line(line);
            if parsed.is_none() {
                warn!("Unrecognized line format (skipping): {line}");
            }
            parsed
        })
        .filter_map(|parsed| {
            let Some(timestamp) = resolve(date.and_time(parsed.time)) else {
                warn!(
                    "Time {} doesn't exist on {date} (skipping): {}",
                    parsed.time_str(),
                    parsed.description
                );
                return None;
            };
            Some(TimedLine {
                line: parsed,
                timestamp,
            })
        })
        .collect()
}

/// Differences between consecutive timestamps. Empty when there are less than 2 timestamps.
pub fn deltas<Tz: TimeZone>(timestamps: &[DateTime<Tz>]) -> Vec<Duration> {
    timestamps
        .windows(2)
        .map(|pair| pair[1].clone() - pair[0].clone())
        .collect()
}
