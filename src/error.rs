use std::sync::Arc;

use thiserror::Error;

/// Failures surfaced by the HTTP wrapper. Each kind is logged once where it happens
/// and then propagated unchanged.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, reset...).
    #[error("no response received from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The request could not be built.
    #[error("error setting up request: {0}")]
    Setup(String),

    /// The body did not match the expected payload shape.
    #[error("unexpected payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A query that exhausted its retries. Shared between every waiter of the same key.
#[derive(Debug, Clone, Error)]
#[error("{source}")]
pub struct QueryError {
    pub key: String,
    pub attempts: u32,
    #[source]
    pub source: Arc<ApiError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("{0} must be used within the dashboard shell")]
    OutsideProvider(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_shows_raw_message() {
        let err = QueryError {
            key: "overview".to_string(),
            attempts: 2,
            source: Arc::new(ApiError::Status {
                url: "http://localhost:8000/api/v1/overview".to_string(),
                status: 503,
                body: "down".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "request to http://localhost:8000/api/v1/overview failed with status 503: down"
        );
        assert_eq!(err.source.status(), Some(503));
    }

    #[test]
    fn test_context_error_message() {
        let err = ContextError::OutsideProvider("FilterState");
        assert_eq!(err.to_string(), "FilterState must be used within the dashboard shell");
    }
}
