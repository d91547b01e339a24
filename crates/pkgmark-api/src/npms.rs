use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::retry::{is_retryable_status, with_retry_if, RetryConfig};

/// Public npms endpoint
pub const NPMS_API_BASE: &str = "https://api.npms.io/v2";

/// Default number of results per search. npms caps this at 250.
pub const DEFAULT_PAGE_SIZE: u32 = 25;
const MAX_PAGE_SIZE: u32 = 250;

#[derive(Error, Debug)]
pub enum NpmsError {
    #[error("API request failed: status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl NpmsError {
    /// Whether asking again has any chance of a different answer
    pub fn is_retryable(&self) -> bool {
        match self {
            NpmsError::RequestFailed { status, .. } => reqwest::StatusCode::from_u16(*status)
                .map(is_retryable_status)
                .unwrap_or(false),
            NpmsError::RateLimitExceeded => true,
            NpmsError::NetworkError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            NpmsError::ParseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, NpmsError>;

/// Top-level body of `GET /search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpmsSearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub results: Vec<NpmsSearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpmsSearchResult {
    pub package: NpmsPackage,
    pub score: Option<NpmsScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpmsPackage {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub links: NpmsLinks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpmsLinks {
    pub npm: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpmsScore {
    #[serde(rename = "final")]
    pub final_score: f64,
}

/// Client for the npms.io search API
pub struct NpmsClient {
    client: reqwest::Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl NpmsClient {
    /// Fully configured client
    pub fn build(base_url: String, timeout: Duration, retry_config: RetryConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("pkgmark/0.1.0")
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_config,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Free-text package search
    ///
    /// A blank query short-circuits to an empty response; the registry
    /// would reject it anyway.
    pub async fn search(&self, query: &str, size: u32) -> Result<NpmsSearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(NpmsSearchResponse::default());
        }

        let url = format!("{}/search", self.base_url);
        let size = size.clamp(1, MAX_PAGE_SIZE).to_string();

        tracing::debug!("Searching npms for {:?} (size {})", query, size);

        with_retry_if(
            &self.retry_config,
            || async {
                let response = self
                    .client
                    .get(&url)
                    .query(&[("q", query), ("size", size.as_str())])
                    .send()
                    .await?;

                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(NpmsError::RateLimitExceeded);
                }

                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(NpmsError::RequestFailed {
                        status: status.as_u16(),
                        body,
                    });
                }

                let body = response.text().await?;
                parse_search_response(&body)
            },
            NpmsError::is_retryable,
        )
        .await
    }
}

/// Decode a raw `/search` body
pub fn parse_search_response(body: &str) -> Result<NpmsSearchResponse> {
    Ok(serde_json::from_str(body)?)
}
