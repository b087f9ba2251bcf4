//! HTTP client wrapper used by the metadata fetcher (§4.8) and the
//! coordinator readiness poll (§4.5 step 4). Grounds the teacher's
//! `poll_until_ready` pattern (`daemon/src/adapters/agent/mod.rs`),
//! generalized from a fixed attempt budget to an unbounded
//! once-per-second poll honoring a cancellation token.

use lrc_core::error::{RecoverError, Result};
use tokio_util::sync::CancellationToken;

pub struct HttpClient {
    inner: reqwest::Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    pub fn new() -> Self {
        HttpClient {
            inner: reqwest::Client::new(),
        }
    }

    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let resp = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| RecoverError::Http(e.to_string()))?;
        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| RecoverError::Http(e.to_string()))
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| RecoverError::Http(e.to_string()))?;
        resp.text().await.map_err(|e| RecoverError::Http(e.to_string()))
    }
}

/// Polls `url` once per second until it returns HTTP 200, or the
/// cancellation token fires. No upper bound on attempts (§4.5 step 4:
/// "the operator aborts via context").
pub async fn poll_until_ready(
    client: &HttpClient,
    url: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    loop {
        if cancel.is_cancelled() {
            return Err(RecoverError::Cancelled);
        }

        match client.inner.get(url).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(%url, "coordinator is ready");
                return Ok(());
            }
            Ok(resp) => {
                tracing::debug!(%url, status = %resp.status(), "coordinator not ready yet");
            }
            Err(e) => {
                tracing::debug!(%url, error = %e, "coordinator poll failed");
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_secs(1)) => {}
            _ = cancel.cancelled() => return Err(RecoverError::Cancelled),
        }
    }
}
