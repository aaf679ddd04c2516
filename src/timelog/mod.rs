//! Turns a daily log into a summary.
//!
//! A log is a list of lines like `08:00 12345 Fix bug`. Every line starts a task which lasts until
//! the next line, so the last line only closes the day. The pipeline goes
//! lines -> [parser] -> [timing] -> [aggregate] -> [summary], and the summary is appended to the
//! log together with a marker that stops the same file from being processed twice.

pub mod aggregate;
pub mod parser;
pub mod summary;
pub mod timing;

use std::path::Path;

use aggregate::{task_results, Aggregation, TaskDefaults};
use anyhow::Result;
use chrono::{NaiveDate, TimeZone};
use summary::{Saldo, Summary, ALREADY_PARSED_MARKER};
use timing::timed_lines;
use tracing::{debug, info, instrument};

use crate::fs::operations::{append_to_file, last_non_empty_line, open_log, read_non_empty_lines};

#[derive(Debug)]
pub enum DayOutcome {
    /// The log already ends with [ALREADY_PARSED_MARKER], nothing was done.
    AlreadyParsed,
    Summarized {
        aggregation: Aggregation,
        /// Exactly what was appended to the log.
        summary: String,
        saldo: Saldo,
    },
}

/// Computes everything the summary needs from the lines of one day.
pub fn aggregate_lines<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    lines: &[String],
    defaults: &TaskDefaults,
) -> Aggregation {
    let timed = timed_lines(tz, date, lines);
    debug!("Found {} timestamps on {date}", timed.len());

    let results = task_results(&timed);
    let mut aggregation = Aggregation::from_results(&results);
    defaults.apply(&mut aggregation.buckets);
    aggregation
}

/// Summarizes the log at `path` written on `date` and appends the summary to it.
/// A missing file is an error, an already processed file is left untouched.
#[instrument(skip(tz, defaults))]
pub async fn summarize_day<Tz: TimeZone>(
    path: &Path,
    date: NaiveDate,
    tz: &Tz,
    defaults: &TaskDefaults,
) -> Result<DayOutcome> {
    let mut file = open_log(path).await?;

    let last_line = last_non_empty_line(&mut file, &mut vec![0; 1024]).await?;
    if last_line.is_some_and(|v| v.trim() == ALREADY_PARSED_MARKER) {
        info!("File already parsed");
        return Ok(DayOutcome::AlreadyParsed);
    }

    let lines = read_non_empty_lines(&mut file).await?;
    drop(file);

    let aggregation = aggregate_lines(tz, date, &lines, defaults);
    let summary = Summary::new(&aggregation);
    let saldo = summary.saldo;
    let summary = summary.to_string();
    append_to_file(path, &summary).await?;
    info!("Appended summary to {}", path.display());

    Ok(DayOutcome::Summarized {
        aggregation,
        summary,
        saldo,
    })
}
