//! Wire shapes and endpoints for `/api/files` and `/api/file/{id}`

pub mod delete;
pub mod get;
pub mod list;
pub mod models;
pub mod versions;

pub use delete::DeleteFileRequest;
pub use get::{GetFileRequest, GetFileResponse};
pub use list::{ListFilesRequest, ListFilesResponse};
pub use models::{FileId, FileInfo, FileVersionInfo};
pub use versions::{
    DeleteVersionsRequest, DeleteVersionsResponse, ListVersionsRequest, ListVersionsResponse,
};
