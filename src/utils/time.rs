use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// This is the standard way of converting a date to a string in logtime.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Two letter code used in log file names.
pub fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Name of the log file for a day. For example `2026-02-21 SA.md`.
pub fn log_file_name(date: NaiveDate) -> String {
    format!(
        "{} {}.md",
        date_to_record_name(date),
        weekday_code(date.weekday())
    )
}

/// Returns the date `days` days before `today`. Negative values move forward.
/// [None] when the result is outside of the supported dates.
pub fn days_before(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    today.checked_sub_signed(Duration::try_days(days)?)
}
