//! News search provider.
//!
//! [`HttpNewsProvider`] queries the NewsAPI `everything` endpoint;
//! [`StaticNewsProvider`] answers from memory for tests and demos.

use crate::config::NewsConfig;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub author: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub source: Source,
    pub title: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NewsError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("News service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Could not decode news response: {0}")]
    Decode(String),
}

/// Asynchronous news search.
#[async_trait]
pub trait NewsProvider: Send + Sync + 'static {
    async fn get_news(&self, query: &str) -> Result<NewsResponse, NewsError>;
}

/// NewsAPI client over reqwest.
pub struct HttpNewsProvider {
    client: reqwest::Client,
    config: NewsConfig,
}

impl HttpNewsProvider {
    pub fn new(config: NewsConfig) -> Result<Self, NewsError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| NewsError::Transport(err.to_string()))?;
        if config.api_key.is_none() {
            warn!("news API key not configured; requests will likely be rejected");
        }
        Ok(Self { client, config })
    }

    /// Query parameters for `query`, with dates relative to `today`.
    pub fn query_params(&self, query: &str, today: NaiveDate) -> Vec<(&'static str, String)> {
        let from = today
            .checked_sub_days(chrono::Days::new(u64::from(self.config.lookback_days)))
            .unwrap_or(today);
        vec![
            ("q", query.to_string()),
            ("from", from.format("%Y-%m-%d").to_string()),
            ("to", today.format("%Y-%m-%d").to_string()),
            ("sortBy", self.config.sort_by.clone()),
        ]
    }
}

#[async_trait]
impl NewsProvider for HttpNewsProvider {
    async fn get_news(&self, query: &str) -> Result<NewsResponse, NewsError> {
        let params = self.query_params(query, Local::now().date_naive());
        let mut request = self.client.get(&self.config.base_url).query(&params);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        debug!(query, url = %self.config.base_url, "requesting news");
        let response = request
            .send()
            .await
            .map_err(|err| NewsError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NewsError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let news = response
            .json::<NewsResponse>()
            .await
            .map_err(|err| NewsError::Decode(err.to_string()))?;
        debug!(query, articles = news.articles.len(), "news received");
        Ok(news)
    }
}

/// Provider answering every query with the same result.
#[derive(Clone, Debug)]
pub struct StaticNewsProvider {
    result: Result<NewsResponse, NewsError>,
    latency: Duration,
}

impl StaticNewsProvider {
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            result: Ok(NewsResponse {
                status: "ok".to_string(),
                total_results: articles.len() as u32,
                articles,
            }),
            latency: Duration::ZERO,
        }
    }

    pub fn failing(error: NewsError) -> Self {
        Self {
            result: Err(error),
            latency: Duration::ZERO,
        }
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl NewsProvider for StaticNewsProvider {
    async fn get_news(&self, _query: &str) -> Result<NewsResponse, NewsError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.result.clone()
    }
}
