use super::PersistenceResult;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Read-only copy of the calendar published over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteCalendar {
    url: String,
    timeout: Duration,
}

impl RemoteCalendar {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Downloads the raw CSV body. A 404 is `Ok(None)`; other failures are errors.
    pub fn fetch(&self) -> PersistenceResult<Option<String>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        debug!(url = %self.url, "fetching fallback calendar");
        let response = client.get(&self.url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.error_for_status()?.text()?;
        Ok(Some(body))
    }
}
