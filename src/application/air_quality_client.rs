// Fetch collaborator interface for air-quality data
use crate::domain::query::QueryParams;
use crate::domain::reading::DecodedResponse;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Service unavailable: HTTP {0}")]
    ServiceUnavailable(u16),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl FetchError {
    /// Transport failures and 500/502/504 answers are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::ServiceUnavailable(500 | 502 | 504)
        )
    }
}

#[async_trait]
pub trait AirQualityClient: Send + Sync {
    /// Execute one request and decode the first location in the response
    async fn fetch(&self, params: &QueryParams) -> Result<DecodedResponse, FetchError>;
}
