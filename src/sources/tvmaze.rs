//! TVmaze single-search poster lookup
//!
//! One request per title against `/singlesearch/shows`, no retries. Every
//! failure mode (non-200, timeout, bad JSON) collapses into "no poster", which
//! the pipeline caches exactly like a genuine miss.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::LookupConfig;
use crate::errors::AppResult;

/// Looks up a poster URL for a normalized title
#[async_trait]
pub trait PosterLookup: Send + Sync {
    async fn lookup(&self, title: &str) -> Option<String>;
}

/// Subset of the TVmaze show payload we care about
#[derive(Debug, Deserialize)]
pub struct ShowSearchResponse {
    #[serde(default)]
    pub image: Option<ShowImage>,
}

#[derive(Debug, Deserialize)]
pub struct ShowImage {
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
}

impl ShowSearchResponse {
    /// Highest resolution image available: `original`, else `medium`
    pub fn best_image(self) -> Option<String> {
        let image = self.image?;
        image
            .original
            .filter(|url| !url.is_empty())
            .or(image.medium.filter(|url| !url.is_empty()))
    }
}

pub struct TvMazeClient {
    client: Client,
    base_url: String,
}

impl TvMazeClient {
    pub fn new(config: &LookupConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Single-search URL for a title
    pub fn search_url(&self, title: &str) -> String {
        format!(
            "{}/singlesearch/shows?q={}",
            self.base_url,
            urlencoding::encode(title)
        )
    }
}

#[async_trait]
impl PosterLookup for TvMazeClient {
    async fn lookup(&self, title: &str) -> Option<String> {
        let url = self.search_url(title);
        debug!("Looking up poster: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Poster lookup for '{}' failed: {}", title, e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            debug!(
                "Poster lookup for '{}' returned {}",
                title,
                response.status().as_u16()
            );
            return None;
        }

        match response.json::<ShowSearchResponse>().await {
            Ok(show) => show.best_image(),
            Err(e) => {
                warn!("Poster lookup for '{}' returned an unreadable body: {}", title, e);
                None
            }
        }
    }
}
