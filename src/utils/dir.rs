use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};

use super::time::log_file_name;

const APPLICATION_NAME: &str = "logtime";

/// Directory holding application state, currently only logs. Tries $XDG_STATE_HOME and falls
/// back to $HOME/.local/state.
pub fn create_application_default_path() -> Result<PathBuf> {
    let mut path = env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|_| {
            env::var("HOME").map(|home| {
                let mut path = PathBuf::from(home);
                path.push(".local/state");
                path
            })
        })
        .map_err(|_| anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))?;
    path.push(APPLICATION_NAME);

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

/// Root folder with the daily logs when nothing else is configured.
pub fn default_root_folder() -> PathBuf {
    expand_home(Path::new("~/logtime"))
}

/// Replaces a leading `~` with $HOME. Paths without it are returned as is.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

/// Location of the log for `date`: `<root>/<YYYY>/<MM>/<YYYY-MM-DD> <DOW>.md`
pub fn log_file_path(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(date.year().to_string())
        .join(format!("{:02}", date.month()))
        .join(log_file_name(date))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use chrono::NaiveDate;

    use super::{expand_home, log_file_path};

    #[test]
    fn test_log_file_path() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 21).unwrap();
        assert_eq!(
            log_file_path(Path::new("/logs"), date),
            PathBuf::from("/logs/2026/02/2026-02-21 SA.md")
        );
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(
            expand_home(Path::new("/var/logtime")),
            PathBuf::from("/var/logtime")
        );
    }

    #[test]
    fn test_expand_home_replaces_tilde() {
        let Some(home) = std::env::var_os("HOME") else {
            return;
        };
        assert_eq!(
            expand_home(Path::new("~/logtime")),
            PathBuf::from(home).join("logtime")
        );
    }
}
