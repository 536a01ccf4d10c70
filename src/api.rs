//! Schedule backend client

use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

use crate::guide::time::api_date;
use crate::models::{ChannelInfo, ChannelLineup, Schedule};

pub const DEFAULT_USER_AGENT: &str = concat!("tv_schedule/", env!("CARGO_PKG_VERSION"));

/// Why a fetch failed. Every variant is shown to the user the same way;
/// the detail only goes to the log.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ureq::Error> for FetchError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

/// Anything that can produce the schedule for a date.
///
/// Implementations are called from background threads.
pub trait ScheduleSource: Send + Sync + 'static {
    fn fetch_schedule(&self, date: NaiveDate) -> Result<Schedule, FetchError>;
}

pub struct ScheduleClient {
    base_url: String,
    user_agent: String,
    agent: ureq::Agent,
}

impl ScheduleClient {
    pub fn new(base_url: &str, connect_timeout: Duration, request_timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(request_timeout))
            .timeout_connect(Some(connect_timeout))
            .build()
            .new_agent();

        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            agent,
        }
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        if !user_agent.trim().is_empty() {
            self.user_agent = user_agent.to_string();
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn schedule_url(&self, date: NaiveDate) -> String {
        format!("{}/api/schedule?date={}", self.base_url, api_date(date))
    }

    pub fn channels_url(&self) -> String {
        format!("{}/api/channels", self.base_url)
    }

    fn get(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(FetchError::Status(status));
        }

        Ok(response.body_mut().read_to_string()?)
    }

    /// Channel lineup known to the backend
    pub fn fetch_channels(&self) -> Result<Vec<ChannelInfo>, FetchError> {
        let body = self.get(&self.channels_url())?;
        let lineup: ChannelLineup = serde_json::from_str(&body)?;
        Ok(lineup.channels)
    }
}

impl ScheduleSource for ScheduleClient {
    fn fetch_schedule(&self, date: NaiveDate) -> Result<Schedule, FetchError> {
        let url = self.schedule_url(date);
        log::debug!("GET {}", url);
        let body = self.get(&url)?;
        parse_schedule(&body)
    }
}

/// Decode a `/api/schedule` response body
pub fn parse_schedule(body: &str) -> Result<Schedule, FetchError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
