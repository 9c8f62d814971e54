// Webworm episode probe
// Checks whether the link of the next episode already leads to a real page.

use std::time::Duration;

use tracing::{debug, warn};

use crate::types::errors::TrackerError;

/// Trait defining the next-episode availability check.
pub trait EpisodeProbe: Send + Sync {
    /// `Ok(true)` when `url` serves a page that is not a "404" page.
    fn is_available(&self, url: &str) -> Result<bool, TrackerError>;
}

/// Probe that issues a GET request with `reqwest` on a private tokio runtime.
pub struct HttpProbe {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl HttpProbe {
    /// Creates a probe whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TrackerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::ProbeFailure(format!("failed to build HTTP client: {}", e)))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TrackerError::ProbeFailure(format!("failed to start runtime: {}", e)))?;
        Ok(Self { client, runtime })
    }
}

impl EpisodeProbe for HttpProbe {
    /// Unreachable hosts count as "not available" rather than as errors.
    fn is_available(&self, url: &str) -> Result<bool, TrackerError> {
        self.runtime.block_on(async {
            let response = match self.client.get(url).send().await {
                Ok(r) => r,
                Err(e) => {
                    warn!(url, error = %e, "couldn't reach url");
                    return Ok(false);
                }
            };
            let status = response.status();
            if !status.is_success() {
                debug!(url, %status, "next episode not available");
                return Ok(false);
            }
            let body = match response.text().await {
                Ok(b) => b,
                Err(e) => {
                    warn!(url, error = %e, "couldn't read page body");
                    return Ok(false);
                }
            };
            Ok(!page_title(&body).is_some_and(|title| title.contains("404")))
        })
    }
}

/// Extracts the text of the first `<title>` element, if any.
pub fn page_title(html: &str) -> Option<&str> {
    let lower = html.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let start = open + lower[open..].find('>')? + 1;
    let end = start + lower[start..].find("</title")?;
    Some(html[start..end].trim())
}
