use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::client::{ApiError, ApiRequest, RequestBody};

/// Default chunk size when the server does not advertise one (4 MiB)
pub const DEFAULT_CHUNK_SIZE: u64 = 4 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub crypto_hash: String,
    #[serde(default)]
    pub capabilities: ServerCapabilities,
}

/// What the server told us about itself at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCapabilities {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;

    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        "/api/users/login".to_string()
    }

    fn body(&self) -> Result<RequestBody, ApiError> {
        Ok(RequestBody::Form(vec![
            ("user".to_string(), self.user.clone()),
            ("password".to_string(), self.password.clone()),
        ]))
    }

    fn parse(body: &[u8]) -> Result<Self::Response, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
