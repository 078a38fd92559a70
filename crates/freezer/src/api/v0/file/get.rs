use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::models::{FileId, FileInfo};
use crate::api::client::ApiRequest;

#[derive(Debug, Clone)]
pub struct GetFileRequest {
    pub file_id: FileId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFileResponse {
    #[serde(default)]
    pub file_info: Option<FileInfo>,
    /// Chunk indices the server has not stored yet, local to this file
    #[serde(default)]
    pub missing_chunks: Vec<u64>,
}

impl ApiRequest for GetFileRequest {
    type Response = GetFileResponse;

    const METHOD: Method = Method::GET;

    fn path(&self) -> String {
        format!("/api/file/{}", self.file_id)
    }

    fn parse(body: &[u8]) -> Result<Self::Response, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
