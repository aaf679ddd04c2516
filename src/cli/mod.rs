pub mod output;
pub mod prompt;

use std::{fmt::Display, io, path::PathBuf};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    config::{Config, RedmineConfig},
    remote::{redmine::RedmineClient, submit_time_entries},
    timelog::{summarize_day, DayOutcome},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, default_root_folder, log_file_path},
        logging::{enable_logging, CLI_PREFIX},
        time::days_before,
    },
};

const SUBMIT_PROMPT: &str = "Send on api? (y/n): ";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "logtime", version, long_about = None)]
#[command(about = "Summarizes a daily time log and submits the hours to Redmine", long_about = None)]
pub struct Args {
    #[arg(
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Number of days to go back"
    )]
    pub days_back: i64,
    #[arg(
        long,
        conflicts_with = "days_back",
        help = "Day of the log. Examples are \"yesterday\", \"friday\", \"15/03/2025\""
    )]
    pub date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    pub date_style: DateStyle,
    #[arg(
        long,
        env = "LOGTIME_ROOT",
        help = "Folder with the logs. By default ~/logtime"
    )]
    pub root: Option<PathBuf>,
    #[arg(long, help = "Don't offer to send the hours to Redmine")]
    pub no_submit: bool,
    #[arg(long, help = "Enable trace logging")]
    pub log: bool,
    #[arg(short, long, help = "Don't print logs into the console")]
    pub quiet: bool,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(
        CLI_PREFIX,
        &create_application_default_path()?,
        logging_level,
        !args.quiet,
    )?;

    run(args, &DefaultClock, prompt::confirm_on_terminal).await
}

/// Summarizes the selected day and, once confirmed, submits it.
pub async fn run(
    args: Args,
    clock: &impl Clock,
    confirm: impl FnOnce(&str) -> io::Result<bool>,
) -> Result<()> {
    let date = resolve_date(&args, clock)?;
    let root = args.root.clone().unwrap_or_else(default_root_folder);
    let config = Config::load(&root)?;
    let path = log_file_path(&config.root, date);
    info!("Processing {}", path.display());

    let DayOutcome::Summarized {
        aggregation,
        summary,
        saldo,
    } = summarize_day(&path, date, &Local, &config.defaults).await?
    else {
        return Ok(());
    };

    info!("{}", serde_json::to_string_pretty(&aggregation.buckets)?);
    output::print_summary(&summary, &saldo);

    if args.no_submit {
        return Ok(());
    }
    if !confirm(SUBMIT_PROMPT)? {
        info!("User declined sending to API. Finishing.");
        return Ok(());
    }

    let client = RedmineClient::new(&RedmineConfig::from_env()?);
    let sent = submit_time_entries(&aggregation.buckets, &client, date).await?;
    info!("Sent {sent} time entries");
    Ok(())
}

/// Picks the day of the log, either from `--date` or `--days-back`.
fn resolve_date(args: &Args, clock: &impl Clock) -> Result<NaiveDate> {
    let Some(date) = &args.date else {
        return days_before(clock.today(), args.days_back).ok_or_else(|| {
            Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("{} days back is out of range", args.days_back),
                )
                .into()
        });
    };
    match parse_date_string(date, clock.now(), args.date_style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {e}"),
            )
            .into()),
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, fs, path::Path};

    use anyhow::Result;
    use chrono::{DateTime, Local, NaiveDate, TimeZone};
    use clap::Parser;
    use tempfile::tempdir;

    use crate::utils::{clock::Clock, dir::log_file_path, logging::TEST_LOGGING};

    use super::{resolve_date, run, Args};

    struct TestClock;

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Local> {
            Local.with_ymd_and_hms(2026, 2, 23, 18, 0, 0).unwrap()
        }
    }

    fn parse_args(command: &[&str]) -> Args {
        Args::parse_from(std::iter::once("logtime").chain(command.iter().copied()))
    }

    fn write_log(root: &Path, date: NaiveDate, content: &str) -> Result<std::path::PathBuf> {
        let path = log_file_path(root, date);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, content)?;
        Ok(path)
    }

    #[test]
    fn test_default_args() {
        let args = parse_args(&[]);
        assert_eq!(args.days_back, 0);
        assert_eq!(args.date, None);
        assert!(!args.no_submit);
        assert_eq!(
            resolve_date(&args, &TestClock).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 23).unwrap()
        );
    }

    #[test]
    fn test_days_back() {
        let args = parse_args(&["--days-back", "2"]);
        assert_eq!(
            resolve_date(&args, &TestClock).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 21).unwrap()
        );
    }

    #[test]
    fn test_days_back_out_of_range() {
        let args = parse_args(&["--days-back", "100000000000"]);
        let error = resolve_date(&args, &TestClock).unwrap_err();
        assert_eq!(
            error.downcast_ref::<clap::Error>().unwrap().kind(),
            clap::error::ErrorKind::ValueValidation
        );

        let args = parse_args(&["--days-back", "-100000000000"]);
        assert!(resolve_date(&args, &TestClock).is_err());
    }

    #[test]
    fn test_date_text() {
        let args = parse_args(&["--date", "yesterday"]);
        assert_eq!(
            resolve_date(&args, &TestClock).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 22).unwrap()
        );

        let args = parse_args(&["--date", "15/03/2025"]);
        assert_eq!(
            resolve_date(&args, &TestClock).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );

        let args = parse_args(&["--date", "not a date at all"]);
        assert!(resolve_date(&args, &TestClock).is_err());
    }

    #[test]
    fn test_date_conflicts_with_days_back() {
        let parsed =
            Args::try_parse_from(["logtime", "--date", "yesterday", "--days-back", "1"]);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_run_summarizes_selected_day() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let date = NaiveDate::from_ymd_opt(2026, 2, 22).unwrap();
        let path = write_log(dir.path(), date, "08:00 standup\n08:15 12345 Fix bug\n16:00 end\n")?;

        let root = dir.path().to_str().unwrap();
        let asked = Cell::new(false);
        run(
            parse_args(&["--root", root, "--days-back", "1"]),
            &TestClock,
            |_| {
                asked.set(true);
                Ok(false)
            },
        )
        .await?;

        assert!(asked.get());
        let content = fs::read_to_string(&path)?;
        assert!(content.contains("15 = 0h 15m ~ 0.25h: 77488 standup\n"));
        assert!(content.ends_with("\nalready parsed"));
        Ok(())
    }

    #[tokio::test]
    async fn test_run_without_submit_never_asks() -> Result<()> {
        let dir = tempdir()?;
        let date = NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        write_log(dir.path(), date, "08:00 standup\n08:15 end\n")?;

        let root = dir.path().to_str().unwrap();
        run(parse_args(&["--root", root, "--no-submit"]), &TestClock, |_| {
            panic!("Shouldn't ask")
        })
        .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_run_missing_log() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().to_str().unwrap();
        let result = run(parse_args(&["--root", root]), &TestClock, |_| Ok(false)).await;
        assert!(result.is_err());
        Ok(())
    }
}
