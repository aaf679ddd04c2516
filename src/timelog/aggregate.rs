use std::collections::{BTreeSet, HashMap};

use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::timing::{deltas, TimedLine};

/// Descriptions starting with this prefix mark time that isn't work.
pub const FREE_PREFIX: &str = "#";

/// Key of the bucket for lines that have neither a task id nor a description.
pub const NO_DESCRIPTION_KEY: &str = "#no-desc";

/// Time spent on a single log line, until the next line started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub task_id: Option<String>,
    pub delta_seconds: i64,
    pub description: String,
}

impl TaskResult {
    pub fn is_free(&self) -> bool {
        self.description.starts_with(FREE_PREFIX)
    }
}

/// Pairs each timed line with the time until the next one. The last line has nothing after it
/// and is dropped.
pub fn task_results<Tz: TimeZone>(timed: &[TimedLine<Tz>]) -> Vec<TaskResult> {
    let timestamps = timed
        .iter()
        .map(|v| v.timestamp.clone())
        .collect::<Vec<_>>();

    timed
        .iter()
        .zip(deltas(&timestamps))
        .map(|(TimedLine { line, .. }, delta)| {
            let mut delta_seconds = delta.num_seconds();
            if delta_seconds < 0 {
                warn!(
                    "Time goes backwards after {} {}, counting it as 0",
                    line.time_str(),
                    line.description
                );
                delta_seconds = 0;
            }
            TaskResult {
                task_id: line.task_id.clone(),
                delta_seconds,
                description: line.description.clone(),
            }
        })
        .collect()
}

/// Converts minutes to decimal hours rounded to the nearest quarter of an hour.
///
/// Ties round to even. A tie would need `15k + 7.5` minutes, so with whole minutes the mode never
/// actually decides anything.
pub fn minutes_to_rounded_decimal_hours(total_minutes: i64) -> f64 {
    (total_minutes as f64 / 15.).round_ties_even() / 4.
}

/// Grouped time for one task id + description, one description or one free time label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub key: String,
    pub task_id: Option<String>,
    pub descriptions: BTreeSet<String>,
    pub total_minutes: i64,
    pub total_hours: i64,
    pub remainder_minutes: i64,
    pub rounded_hours: f64,
}

impl Bucket {
    fn new(key: String, task_id: Option<String>) -> Self {
        Self {
            key,
            task_id,
            descriptions: BTreeSet::new(),
            total_minutes: 0,
            total_hours: 0,
            remainder_minutes: 0,
            rounded_hours: 0.,
        }
    }

    fn add_minutes(&mut self, minutes: i64) {
        self.total_minutes += minutes;
        self.total_hours = self.total_minutes / 60;
        self.remainder_minutes = self.total_minutes % 60;
        self.rounded_hours = minutes_to_rounded_decimal_hours(self.total_minutes);
    }

    /// Free time buckets are keyed by a `#` label and never count as work.
    pub fn is_free(&self) -> bool {
        self.key.starts_with(FREE_PREFIX)
    }

    /// Descriptions in lexicographic order joined by `, `.
    pub fn joined_descriptions(&self) -> String {
        self.descriptions
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Everything computed from one day of the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    /// Buckets in the order their key was first seen.
    pub buckets: Vec<Bucket>,
    pub work_seconds: i64,
    pub free_seconds: i64,
}

impl Aggregation {
    pub fn from_results(results: &[TaskResult]) -> Self {
        let (work_seconds, free_seconds) = compute_totals(results);
        Self {
            buckets: group_tasks(results),
            work_seconds,
            free_seconds,
        }
    }

    pub fn bucket(&self, key: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|v| v.key == key)
    }
}

/// Returns (work seconds, free seconds).
pub fn compute_totals(results: &[TaskResult]) -> (i64, i64) {
    results.iter().fold((0, 0), |(work, free), result| {
        if result.is_free() {
            (work, free + result.delta_seconds)
        } else {
            (work + result.delta_seconds, free)
        }
    })
}

/// Groups results by `"<task id> <description>"`, or by description alone when there's no task
/// id.
pub fn group_tasks(results: &[TaskResult]) -> Vec<Bucket> {
    let mut positions = HashMap::<String, usize>::new();
    let mut buckets = Vec::<Bucket>::new();

    for result in results {
        let key = match &result.task_id {
            Some(task_id) => format!("{task_id} {}", result.description),
            None if result.description.is_empty() => NO_DESCRIPTION_KEY.to_string(),
            None => result.description.clone(),
        };
        let position = *positions.entry(key.clone()).or_insert_with(|| {
            buckets.push(Bucket::new(key, result.task_id.clone()));
            buckets.len() - 1
        });
        let bucket = &mut buckets[position];
        bucket.add_minutes(result.delta_seconds / 60);
        if !result.description.is_empty() {
            bucket.descriptions.insert(result.description.clone());
        }
    }
    trace!("Grouped {} results into {} buckets", results.len(), buckets.len());
    buckets
}

/// Maps shorthand descriptions like `standup` to the task they are booked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDefaults(HashMap<String, String>);

impl TaskDefaults {
    pub fn new(mapping: HashMap<String, String>) -> Self {
        Self(mapping)
    }

    pub fn get(&self, description: &str) -> Option<&str> {
        self.0.get(description).map(String::as_str)
    }

    /// Sets the task id of every bucket whose key is in the mapping.
    pub fn apply(&self, buckets: &mut [Bucket]) {
        for bucket in buckets {
            if let Some(task_id) = self.get(&bucket.key) {
                trace!("Using default task {task_id} for {}", bucket.key);
                bucket.task_id = Some(task_id.to_string());
            }
        }
    }
}

impl Default for TaskDefaults {
    fn default() -> Self {
        const ORGANIZATION: &str = "77549";
        const STANDUP: &str = "77488";
        const REFINEMENT: &str = "77548";
        const REVIEW: &str = "77489";
        const PLANNING: &str = "77491";
        const ENVIRONMENT_CHECK: &str = "77546";
        const COP: &str = "77422";
        const COP_PREPARATION: &str = "80565";

        let mapping = [
            ("sync", ORGANIZATION),
            ("rezie", ORGANIZATION),
            ("organization", ORGANIZATION),
            ("standup", STANDUP),
            ("refinement", REFINEMENT),
            ("refinement priprava", REFINEMENT),
            ("review", REVIEW),
            ("review priprava", REVIEW),
            ("retro", REVIEW),
            ("retrospektiva", REVIEW),
            ("retrospektiva priprava", REVIEW),
            ("planning", PLANNING),
            ("planning priprava", PLANNING),
            ("kontrola prostredi", ENVIRONMENT_CHECK),
            ("cop", COP),
            ("CoP", COP),
            ("CoP priprava", COP_PREPARATION),
            ("cop priprava", COP_PREPARATION),
        ]
        .into_iter()
        .map(|(description, task_id)| (description.to_string(), task_id.to_string()))
        .collect();
        Self(mapping)
    }
}
