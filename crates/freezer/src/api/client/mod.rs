//! Request dispatch
//!
//! Every call the client makes to the server goes through [`Dispatch`]. The
//! production implementation is [`ApiClient`]; tests swap in a recorder.

mod client;
mod error;

use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use url::Url;

pub use client::{ApiClient, TlsIdentity};
pub use error::ApiError;

/// Body of an outgoing request.
///
/// Which variant is chosen decides whether the dispatcher serializes and which
/// content type goes on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// Sent untouched, without a content type override
    Raw(Vec<u8>),
    /// Sent as `application/json`
    Json(serde_json::Value),
    /// Sent as `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Serialize a structured value into a JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }
}

/// A fully resolved request, ready to put on the wire.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub method: Method,
    pub url: Url,
    /// Bearer token; `None` only for the login call
    pub token: Option<String>,
    pub body: RequestBody,
    /// Per-request deadline; `None` leaves the transport default in place
    pub timeout: Option<Duration>,
}

#[async_trait::async_trait]
pub trait Dispatch: Send + Sync {
    /// Send a single request and return the raw response body.
    ///
    /// Anything but HTTP 200 is an [`ApiError::HttpStatus`] carrying the
    /// response body text. There are no retries.
    async fn dispatch(&self, request: DispatchRequest) -> Result<Bytes, ApiError>;
}

/// A typed endpoint of the remote API.
pub trait ApiRequest: Send + Sync {
    type Response: Send;

    const METHOD: Method;

    /// Path below the host, starting with `/api/`
    fn path(&self) -> String;

    fn body(&self) -> Result<RequestBody, ApiError> {
        Ok(RequestBody::Empty)
    }

    /// Decode the raw response body.
    fn parse(body: &[u8]) -> Result<Self::Response, serde_json::Error>;
}
