use std::fmt::{self, Display};

use super::aggregate::{Aggregation, Bucket};

/// Last line of a processed log. Files ending with it are never processed again.
pub const ALREADY_PARSED_MARKER: &str = "already parsed";

/// Minutes of work expected in a day.
pub const WORKDAY_MINUTES: i64 = 8 * 60;

/// Difference between the booked (rounded) hours and a full workday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saldo {
    pub minutes: i64,
    pub negative: bool,
}

impl Saldo {
    /// The size comes from the rounded hours, the sign from the real work minutes.
    fn new(rounded_hours: f64, work_minutes: i64) -> Self {
        Self {
            minutes: (rounded_hours * 60. - WORKDAY_MINUTES as f64).abs() as i64,
            negative: work_minutes < WORKDAY_MINUTES,
        }
    }

    pub fn sign(&self) -> &'static str {
        if self.negative {
            "-"
        } else {
            ""
        }
    }

    pub fn remark(&self) -> &'static str {
        if self.minutes == 0 {
            "working šul-nul"
        } else if !self.negative {
            "working too much"
        } else {
            "working too little"
        }
    }
}

impl Display for Saldo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = self.sign();
        write!(
            f,
            "saldo: {sign}{}h {}m ({sign}{})",
            self.minutes / 60,
            self.minutes % 60,
            self.minutes
        )
    }
}

/// Block appended to the end of a daily log.
#[derive(Debug, Clone)]
pub struct Summary<'a> {
    buckets: &'a [Bucket],
    pub total_minutes: i64,
    pub work_minutes: i64,
    pub free_minutes: i64,
    /// Sum of rounded hours of every bucket that isn't free time.
    pub rounded_hours: f64,
    pub saldo: Saldo,
}

impl<'a> Summary<'a> {
    pub fn new(aggregation: &'a Aggregation) -> Self {
        let rounded_hours = aggregation
            .buckets
            .iter()
            .filter(|v| !v.is_free())
            .map(|v| v.rounded_hours)
            .sum::<f64>();
        let work_minutes = aggregation.work_seconds / 60;
        Self {
            buckets: &aggregation.buckets,
            total_minutes: (aggregation.work_seconds + aggregation.free_seconds) / 60,
            work_minutes,
            free_minutes: aggregation.free_seconds / 60,
            rounded_hours,
            saldo: Saldo::new(rounded_hours, work_minutes),
        }
    }
}

/// What a bucket is called in the summary.
fn bucket_label(bucket: &Bucket) -> String {
    let descriptions = bucket.joined_descriptions();
    let prefix = if bucket.is_free() {
        Some(bucket.key.as_str())
    } else {
        bucket.task_id.as_deref()
    };
    match prefix {
        Some(prefix) if prefix != descriptions => format!("{prefix} {descriptions}")
            .trim_end()
            .to_string(),
        _ => descriptions,
    }
}

fn hours_and_minutes(minutes: i64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n\nSummary:")?;
        for bucket in self.buckets {
            // Debug keeps the fractional part, 1.0 instead of 1
            writeln!(
                f,
                "{} = {} ~ {:?}h: {}",
                bucket.total_minutes,
                hours_and_minutes(bucket.total_minutes),
                bucket.rounded_hours,
                bucket_label(bucket)
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "total: {} ({})",
            hours_and_minutes(self.total_minutes),
            self.total_minutes
        )?;
        writeln!(
            f,
            "total work: {} ({})",
            hours_and_minutes(self.work_minutes),
            self.work_minutes
        )?;
        writeln!(f, "total work rounded hours: {:?}", self.rounded_hours)?;
        writeln!(
            f,
            "total free:  {} ({})",
            hours_and_minutes(self.free_minutes),
            self.free_minutes
        )?;
        writeln!(f, "{}", self.saldo)?;
        writeln!(f, "{}", self.saldo.remark())?;
        write!(f, "{ALREADY_PARSED_MARKER}")
    }
}

#[cfg(test)]
mod tests {
    use crate::timelog::aggregate::{Aggregation, TaskDefaults, TaskResult};

    use super::{Saldo, Summary};

    fn result(task_id: Option<&str>, minutes: i64, description: &str) -> TaskResult {
        TaskResult {
            task_id: task_id.map(str::to_string),
            delta_seconds: minutes * 60,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_summary_text() {
        let mut aggregation = Aggregation::from_results(&[
            result(None, 15, "standup"),
            result(Some("12345"), 130, "Fix bug"),
            result(None, 30, "#lunch"),
            result(None, 20, "reading"),
            result(None, 10, ""),
        ]);
        TaskDefaults::default().apply(&mut aggregation.buckets);

        let expected = "\n\nSummary:\n\
            15 = 0h 15m ~ 0.25h: 77488 standup\n\
            130 = 2h 10m ~ 2.25h: 12345 Fix bug\n\
            30 = 0h 30m ~ 0.5h: #lunch\n\
            20 = 0h 20m ~ 0.25h: reading\n\
            10 = 0h 10m ~ 0.25h: #no-desc\n\
            \n\
            total: 3h 25m (205)\n\
            total work: 2h 55m (175)\n\
            total work rounded hours: 2.75\n\
            total free:  0h 30m (30)\n\
            saldo: -5h 15m (-315)\n\
            working too little\n\
            already parsed";
        assert_eq!(Summary::new(&aggregation).to_string(), expected);
    }

    #[test]
    fn test_label_without_descriptions_has_no_trailing_space() {
        let aggregation = Aggregation::from_results(&[result(None, 10, "")]);
        let text = Summary::new(&aggregation).to_string();
        // Older logs end this line with "#no-desc " (key, space, nothing). The space is trimmed on
        // purpose, so the two formats differ here.
        assert!(text.contains("10 = 0h 10m ~ 0.25h: #no-desc\n"));
        assert!(!text.contains("#no-desc \n"));
    }

    #[test]
    fn test_summary_whole_hours_keep_fraction() {
        let aggregation = Aggregation::from_results(&[result(Some("12345"), 480, "Task A")]);
        let summary = Summary::new(&aggregation);
        let text = summary.to_string();
        assert!(text.contains("480 = 8h 0m ~ 8.0h: 12345 Task A\n"));
        assert!(text.contains("total work rounded hours: 8.0\n"));
        assert!(text.contains("saldo: 0h 0m (0)\nworking šul-nul\n"));
        assert!(text.ends_with("\nalready parsed"));
    }

    #[test]
    fn test_saldo_over_target() {
        let aggregation = Aggregation::from_results(&[result(None, 500, "coding")]);
        let summary = Summary::new(&aggregation);
        assert_eq!(
            summary.saldo,
            Saldo {
                minutes: 15,
                negative: false
            }
        );
        assert_eq!(summary.saldo.to_string(), "saldo: 0h 15m (15)");
        assert_eq!(summary.saldo.remark(), "working too much");
    }

    #[test]
    fn test_free_time_is_not_counted_as_work() {
        let aggregation = Aggregation::from_results(&[
            result(None, 480, "coding"),
            result(None, 60, "#lunch"),
        ]);
        let summary = Summary::new(&aggregation);
        assert_eq!(summary.total_minutes, 540);
        assert_eq!(summary.work_minutes, 480);
        assert_eq!(summary.free_minutes, 60);
        assert_eq!(summary.rounded_hours, 8.);
        assert_eq!(summary.saldo.remark(), "working šul-nul");
    }

    #[test]
    fn test_label_when_task_id_equals_descriptions() {
        let mut aggregation = Aggregation::from_results(&[result(None, 60, "77777")]);
        aggregation.buckets[0].task_id = Some("77777".into());
        assert!(Summary::new(&aggregation)
            .to_string()
            .contains("60 = 1h 0m ~ 1.0h: 77777\n"));
    }

    #[test]
    fn test_label_of_free_bucket_with_task_id() {
        let aggregation = Aggregation::from_results(&[result(Some("12345"), 60, "#training")]);
        // keyed "12345 #training", so it isn't a free bucket even though the time is free
        let text = Summary::new(&aggregation).to_string();
        assert!(text.contains("60 = 1h 0m ~ 1.0h: 12345 #training\n"));
        assert!(text.contains("total work rounded hours: 1.0\n"));
        assert!(text.contains("total free:  1h 0m (60)\n"));
    }
}
