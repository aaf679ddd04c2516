use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{timelog::aggregate::TaskDefaults, utils::dir::expand_home};

pub const REDMINE_URL_VAR: &str = "LOGTIME_REDMINE_URL";
pub const REDMINE_API_KEY_VAR: &str = "LOGTIME_REDMINE_API_KEY";

/// File in the root folder that replaces the built-in [TaskDefaults].
pub const DEFAULTS_FILE_NAME: &str = "defaults.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedmineConfig {
    pub url: String,
    pub api_key: String,
}

impl RedmineConfig {
    /// Reads the connection from the environment. Only needed once the user wants to submit.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var(REDMINE_URL_VAR).with_context(|| format!("{REDMINE_URL_VAR} is not set"))?,
            api_key: env::var(REDMINE_API_KEY_VAR)
                .with_context(|| format!("{REDMINE_API_KEY_VAR} is not set"))?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Folder holding `<YYYY>/<MM>/<YYYY-MM-DD> <DOW>.md` logs.
    pub root: PathBuf,
    pub defaults: TaskDefaults,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let root = expand_home(root);
        let defaults = load_defaults(&root.join(DEFAULTS_FILE_NAME))?;
        Ok(Self { root, defaults })
    }
}

fn load_defaults(path: &Path) -> Result<TaskDefaults> {
    if !path.exists() {
        debug!("No {path:?}, using built-in task defaults");
        return Ok(TaskDefaults::default());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path:?}"))?;
    let defaults = serde_json::from_str::<TaskDefaults>(&content)
        .with_context(|| format!("Failed to parse task defaults in {path:?}"))?;
    info!("Loaded task defaults from {path:?}");
    Ok(defaults)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::{Config, DEFAULTS_FILE_NAME};

    #[test]
    fn test_builtin_defaults_without_file() -> Result<()> {
        let dir = tempdir()?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.root, dir.path());
        assert_eq!(config.defaults.get("standup"), Some("77488"));
        assert_eq!(config.defaults.get("CoP priprava"), Some("80565"));
        Ok(())
    }

    #[test]
    fn test_defaults_file_replaces_builtin() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(DEFAULTS_FILE_NAME),
            r#"{"daily": "12121", "standup": "34343"}"#,
        )?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.defaults.get("daily"), Some("12121"));
        assert_eq!(config.defaults.get("standup"), Some("34343"));
        assert_eq!(config.defaults.get("retro"), None);
        Ok(())
    }

    #[test]
    fn test_broken_defaults_file() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(DEFAULTS_FILE_NAME), "[1, 2]")?;
        assert!(Config::load(dir.path()).is_err());
        Ok(())
    }
}
