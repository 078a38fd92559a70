use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::models::FileInfo;
use crate::api::client::ApiRequest;

/// Fetch the whole catalog. Names are encrypted at rest, so there is no way to
/// ask the server for a single name.
#[derive(Debug, Clone, Default)]
pub struct ListFilesRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFilesResponse {
    #[serde(default)]
    pub files: Vec<FileInfo>,
}

impl ApiRequest for ListFilesRequest {
    type Response = ListFilesResponse;

    const METHOD: Method = Method::GET;

    fn path(&self) -> String {
        "/api/files".to_string()
    }

    fn parse(body: &[u8]) -> Result<Self::Response, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
