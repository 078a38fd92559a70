use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::models::{FileId, FileVersionInfo};
use crate::api::client::{ApiError, ApiRequest, RequestBody};

#[derive(Debug, Clone)]
pub struct ListVersionsRequest {
    pub file_id: FileId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListVersionsResponse {
    #[serde(default)]
    pub versions: Vec<FileVersionInfo>,
}

impl ApiRequest for ListVersionsRequest {
    type Response = ListVersionsResponse;

    const METHOD: Method = Method::GET;

    fn path(&self) -> String {
        format!("/api/file/{}/versions", self.file_id)
    }

    fn parse(body: &[u8]) -> Result<Self::Response, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// Delete the inclusive version range `[min_version, max_version]`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteVersionsRequest {
    #[serde(skip)]
    pub file_id: FileId,
    pub min_version: u64,
    pub max_version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteVersionsResponse {
    pub status: bool,
}

impl ApiRequest for DeleteVersionsRequest {
    type Response = DeleteVersionsResponse;

    const METHOD: Method = Method::DELETE;

    fn path(&self) -> String {
        format!("/api/file/{}/versions", self.file_id)
    }

    fn body(&self) -> Result<RequestBody, ApiError> {
        RequestBody::json(self)
    }

    fn parse(body: &[u8]) -> Result<Self::Response, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
