use reqwest::Method;

use super::models::FileId;
use crate::api::client::ApiRequest;

/// Remove a file and every one of its versions. The response body carries
/// nothing; a 200 is the whole answer.
#[derive(Debug, Clone)]
pub struct DeleteFileRequest {
    pub file_id: FileId,
}

impl ApiRequest for DeleteFileRequest {
    type Response = ();

    const METHOD: Method = Method::DELETE;

    fn path(&self) -> String {
        format!("/api/file/{}", self.file_id)
    }

    fn parse(_body: &[u8]) -> Result<Self::Response, serde_json::Error> {
        Ok(())
    }
}
