//! Test doubles for code that talks to the server.
#![allow(dead_code)]

use std::collections::HashMap;

use bytes::Bytes;
use common::crypto::CryptoKey;
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::api::client::{ApiError, Dispatch, DispatchRequest, RequestBody};
use crate::api::v0::file::{FileInfo, FileVersionInfo};
use crate::api::v0::users::ServerCapabilities;
use crate::session::Session;

/// Canned answer for one endpoint
#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Vec<u8>),
    Status(StatusCode, String),
}

impl Reply {
    pub fn json(value: serde_json::Value) -> Self {
        Reply::Ok(serde_json::to_vec(&value).unwrap())
    }

    pub fn empty() -> Self {
        Reply::Ok(Vec::new())
    }
}

/// A request as the dispatcher saw it
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub token: Option<String>,
    pub body: RequestBody,
}

/// Dispatcher that answers from a table keyed by method and path and records
/// every request it is handed. Unknown endpoints answer 404.
#[derive(Default)]
pub struct MockDispatcher {
    replies: HashMap<(Method, String), Reply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, method: Method, path: &str, reply: Reply) -> Self {
        self.replies.insert((method, path.to_string()), reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn calls_with(&self, method: Method) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method)
            .collect()
    }
}

#[async_trait::async_trait]
impl Dispatch for MockDispatcher {
    async fn dispatch(&self, request: DispatchRequest) -> Result<Bytes, ApiError> {
        let path = request.url.path().to_string();
        self.calls.lock().push(RecordedCall {
            method: request.method.clone(),
            path: path.clone(),
            token: request.token.clone(),
            body: request.body.clone(),
        });

        match self.replies.get(&(request.method.clone(), path)) {
            Some(Reply::Ok(body)) => Ok(Bytes::from(body.clone())),
            Some(Reply::Status(status, body)) => Err(ApiError::HttpStatus {
                method: request.method,
                url: request.url,
                status: *status,
                body: body.clone(),
            }),
            None => Err(ApiError::HttpStatus {
                method: request.method,
                url: request.url,
                status: StatusCode::NOT_FOUND,
                body: "404 page not found".to_string(),
            }),
        }
    }
}

pub fn session() -> Session {
    Session {
        host: Url::parse("http://localhost:8040").unwrap(),
        token: "test-token".to_string(),
        crypto_hash: "salt".to_string(),
        key: CryptoKey::derive("secret", "salt"),
        capabilities: ServerCapabilities::default(),
        tls: None,
        request_timeout: None,
    }
}

/// Catalog entry whose name is encrypted with the test session's key
pub fn file(session: &Session, file_id: i64, name: &str, current_version: u64) -> FileInfo {
    FileInfo {
        file_id,
        user_id: 1,
        file_name: session.key.encrypt_string(name).unwrap(),
        is_dir: false,
        current_version: version(current_version),
    }
}

pub fn version(version_number: u64) -> FileVersionInfo {
    FileVersionInfo {
        version_id: version_number as i64 + 100,
        version_number,
        permissions: 0o644,
        last_mod: 1_500_000_000,
        chunk_count: None,
        file_hash: String::new(),
    }
}

pub fn catalog_reply(files: &[FileInfo]) -> Reply {
    Reply::json(serde_json::json!({ "files": files }))
}
