use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::config::RedmineConfig;

use super::{TimeEntry, TimeEntrySink};

const API_KEY_HEADER: &str = "X-Redmine-API-Key";

#[derive(Serialize)]
struct TimeEntryRequest<'a> {
    time_entry: &'a TimeEntry,
}

/// Client for the REST api of Redmine. Only creating time entries is supported.
pub struct RedmineClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RedmineClient {
    pub fn new(config: &RedmineConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl TimeEntrySink for RedmineClient {
    async fn create_time_entry(&self, entry: &TimeEntry) -> Result<()> {
        let url = format!("{}/time_entries.json", self.base_url);
        debug!("Posting {entry:?} to {url}");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&TimeEntryRequest { time_entry: entry })
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Redmine rejected time entry for {}: {status} {body}", entry.issue_id);
        }
        Ok(())
    }
}
