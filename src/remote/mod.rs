//! Submitting booked hours to a time tracking service.

pub mod redmine;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use tracing::info;

use crate::timelog::aggregate::Bucket;

/// A single time entry on an issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntry {
    pub issue_id: String,
    pub spent_on: NaiveDate,
    pub hours: f64,
    pub comments: String,
}

/// Anything able to record time entries. Intended to abstract the remote service so the
/// submission can be tested.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TimeEntrySink {
    async fn create_time_entry(&self, entry: &TimeEntry) -> Result<()>;
}

/// Time entry for a bucket, if it has a task and any booked time.
pub fn time_entry_for(bucket: &Bucket, date: NaiveDate) -> Option<TimeEntry> {
    let task_id = bucket.task_id.as_ref()?;
    if bucket.rounded_hours <= 0. {
        return None;
    }
    Some(TimeEntry {
        issue_id: task_id.clone(),
        spent_on: date,
        hours: bucket.rounded_hours,
        comments: bucket.joined_descriptions(),
    })
}

/// Sends one entry per eligible bucket, in bucket order. Stops at the first failure, entries
/// sent before it stay sent. Returns the number of entries sent.
pub async fn submit_time_entries(
    buckets: &[Bucket],
    sink: &impl TimeEntrySink,
    date: NaiveDate,
) -> Result<usize> {
    let mut sent = 0;
    for entry in buckets.iter().filter_map(|v| time_entry_for(v, date)) {
        sink.create_time_entry(&entry).await?;
        info!(
            "Logged {}h on {} for {}",
            entry.hours, entry.issue_id, entry.spent_on
        );
        sent += 1;
    }
    Ok(sent)
}
