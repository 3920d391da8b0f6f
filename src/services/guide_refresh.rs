//! Downstream guide refresh notification
//!
//! After the enriched guide is written, Jellyfin is asked to re-read its Live
//! TV guide. This is a courtesy call: every failure is logged and swallowed.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::JellyfinConfig;
use crate::errors::AppResult;

const REFRESH_PATH: &str = "/LiveTv/Guide/Refresh";
const TOKEN_HEADER: &str = "X-Emby-Token";

/// Something that can be told the guide changed
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuideRefresher: Send + Sync {
    /// Best effort, never fails
    async fn refresh(&self);
}

/// Jellyfin Live TV guide refresh over HTTP
pub struct JellyfinRefresher {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl JellyfinRefresher {
    pub fn new(config: &JellyfinConfig) -> AppResult<Self> {
        Self::with_timeout(&config.url, &config.apikey, config.timeout)
    }

    pub fn with_timeout(base_url: &str, api_key: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: refresh_endpoint(base_url),
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GuideRefresher for JellyfinRefresher {
    async fn refresh(&self) {
        let response = self
            .client
            .post(&self.endpoint)
            .header(TOKEN_HEADER, &self.api_key)
            .send()
            .await;

        match response {
            Ok(response) if is_refresh_success(response.status()) => {
                info!("Jellyfin guide refresh triggered successfully.");
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("Jellyfin refresh returned {}: {}", status.as_u16(), body);
            }
            Err(e) => {
                warn!("Could not trigger Jellyfin refresh: {}", e);
            }
        }
    }
}

/// Refresher used when the downstream service is switched off
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRefresher;

#[async_trait]
impl GuideRefresher for NoopRefresher {
    async fn refresh(&self) {
        info!("Guide refresh disabled, skipping Jellyfin notification.");
    }
}

fn refresh_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), REFRESH_PATH)
}

fn is_refresh_success(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;
    use tracing_test::traced_test;

    #[test]
    fn test_refresh_endpoint_trims_slashes() {
        assert_eq!(
            refresh_endpoint("http://jellyfin:8096/"),
            "http://jellyfin:8096/LiveTv/Guide/Refresh"
        );
        assert_eq!(
            refresh_endpoint("http://jellyfin:8096"),
            "http://jellyfin:8096/LiveTv/Guide/Refresh"
        );
    }

    #[test]
    fn test_success_statuses() {
        assert!(is_refresh_success(StatusCode::OK));
        assert!(is_refresh_success(StatusCode::NO_CONTENT));
        assert!(!is_refresh_success(StatusCode::ACCEPTED));
        assert!(!is_refresh_success(StatusCode::UNAUTHORIZED));
        assert!(!is_refresh_success(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_swallowed() {
        // Port 9 on localhost: nothing listens, the connection is refused
        let refresher = JellyfinRefresher::with_timeout(
            "http://127.0.0.1:9",
            "key",
            Duration::from_millis(500),
        )
        .unwrap();
        assert_eq!(refresher.endpoint(), "http://127.0.0.1:9/LiveTv/Guide/Refresh");
        refresher.refresh().await;
    }

    fn refresher_for(base_url: &str) -> JellyfinRefresher {
        JellyfinRefresher::with_timeout(base_url, "secret-key", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_no_content_is_success() {
        let (base_url, server) = serve_once("204 No Content", "").await;
        refresher_for(&base_url).refresh().await;

        let head = server.await.unwrap();
        assert!(head.starts_with("POST /LiveTv/Guide/Refresh HTTP/1.1"));
        assert!(head.to_ascii_lowercase().contains("x-emby-token: secret-key"));
        assert!(logs_contain("Jellyfin guide refresh triggered successfully."));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_ok_is_success() {
        let (base_url, server) = serve_once("200 OK", "").await;
        refresher_for(&base_url).refresh().await;
        server.await.unwrap();

        assert!(logs_contain("Jellyfin guide refresh triggered successfully."));
        assert!(!logs_contain("Jellyfin refresh returned"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_error_status_is_logged_with_body() {
        let (base_url, server) = serve_once("500 Internal Server Error", "guide busy").await;
        refresher_for(&base_url).refresh().await;
        server.await.unwrap();

        assert!(logs_contain("Jellyfin refresh returned 500: guide busy"));
        assert!(!logs_contain("triggered successfully"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unauthorized_is_logged() {
        let (base_url, server) = serve_once("401 Unauthorized", "").await;
        refresher_for(&base_url).refresh().await;
        server.await.unwrap();

        assert!(logs_contain("Jellyfin refresh returned 401"));
    }
}
