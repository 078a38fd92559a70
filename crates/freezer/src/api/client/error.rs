use std::path::PathBuf;

use reqwest::{Method, StatusCode};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("TLS configuration error ({}): {reason}", .path.display())]
    TlsConfig { path: PathBuf, reason: String },
    #[error("failed to JSON serialize the request body: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("poorly formatted response from {url}: {source}")]
    Decode {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
    #[error("HTTP {method} request to {url} failed: {source}")]
    Transport {
        method: Method,
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("HTTP {method} request to {url} failed (status: {status}): {body}")]
    HttpStatus {
        method: Method,
        url: Url,
        status: StatusCode,
        body: String,
    },
}

impl ApiError {
    /// Status code of a non-200 response, if that is what this error is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
