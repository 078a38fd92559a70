//! Whole-file operations
//!
//! Thin sequencing over [`FileResolver`], the typed endpoints and [`ChunkStream`].

use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::path::Path;

use common::chunk::{chunk_hash, ChunkError, ChunkStream};
use regex::Regex;

use crate::api::client::ApiError;
use crate::api::v0::file::{
    DeleteFileRequest, FileId, FileInfo, FileVersionInfo, GetFileRequest, ListVersionsRequest,
};
use crate::catalog::{CatalogError, FileResolver};
use crate::remote::Remote;

#[derive(Debug, thiserror::Error)]
pub enum FileOpsError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to compile the regular expression: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    #[error("chunk size of {0} bytes does not fit in memory on this platform")]
    ChunkSizeOverflow(u64),
}

/// Result of removing one file in a batch
#[derive(Debug)]
pub struct RemovalOutcome {
    pub file_id: FileId,
    pub name: String,
    pub result: Result<(), ApiError>,
}

/// A local chunk the server has not stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChunk {
    pub number: u64,
    pub len: usize,
    /// Hex BLAKE3 digest of the chunk bytes
    pub hash: String,
}

#[derive(Clone, Copy)]
pub struct FileOps<'a> {
    remote: Remote<'a>,
}

impl<'a> FileOps<'a> {
    pub fn new(remote: Remote<'a>) -> Self {
        Self { remote }
    }

    pub fn resolver(&self) -> FileResolver<'a> {
        FileResolver::new(self.remote)
    }

    /// Remove the file registered under `name`. The name is still resolved on a
    /// dry run, so a typo fails the same way it would for real.
    pub async fn rm_file(&self, name: &str, dry_run: bool) -> Result<FileInfo, FileOpsError> {
        let file = self.resolver().resolve(name).await?;
        if dry_run {
            tracing::info!(name, file_id = file.file_id, "dry run, not removing file");
        } else {
            self.delete(file.file_id).await?;
        }
        Ok(file)
    }

    /// Remove a file by id without consulting the catalog.
    pub async fn rm_file_by_id(&self, file_id: FileId) -> Result<(), FileOpsError> {
        self.delete(file_id).await?;
        Ok(())
    }

    /// Remove every file whose decrypted name matches `pattern`.
    ///
    /// Each match gets an outcome; a failed delete does not stop the rest.
    pub async fn rm_matching(
        &self,
        pattern: &str,
        dry_run: bool,
    ) -> Result<Vec<RemovalOutcome>, FileOpsError> {
        let pattern = Regex::new(pattern)?;
        let matches = self.resolver().matching(&pattern).await?;

        let mut outcomes = Vec::with_capacity(matches.len());
        for (name, file) in matches {
            let result = if dry_run {
                tracing::info!(name = %name, file_id = file.file_id, "dry run, not removing file");
                Ok(())
            } else {
                self.delete(file.file_id).await
            };
            if let Err(e) = &result {
                tracing::warn!(name = %name, file_id = file.file_id, "failed to remove file: {}", e);
            }
            outcomes.push(RemovalOutcome {
                file_id: file.file_id,
                name,
                result,
            });
        }

        Ok(outcomes)
    }

    /// Every stored version of the file registered under `name`.
    pub async fn file_versions(&self, name: &str) -> Result<Vec<FileVersionInfo>, FileOpsError> {
        let file = self.resolver().resolve(name).await?;
        let response = self
            .remote
            .call(&ListVersionsRequest {
                file_id: file.file_id,
            })
            .await?;
        Ok(response.versions)
    }

    /// Chunk indices the server still needs for `file_id`.
    pub async fn missing_chunks(&self, file_id: FileId) -> Result<Vec<u64>, FileOpsError> {
        let response = self.remote.call(&GetFileRequest { file_id }).await?;
        Ok(response.missing_chunks)
    }

    /// Walk the local copy at `path` and collect the chunks the server is missing.
    ///
    /// The chunk count comes from the server's accounting when it reports one,
    /// otherwise from the local file length. A local file shorter than the
    /// server expects fails with [`ChunkError::Truncated`].
    pub async fn pending_chunks(
        &self,
        file_id: FileId,
        path: &Path,
        chunk_size: u64,
    ) -> Result<Vec<PendingChunk>, FileOpsError> {
        let chunk_size =
            usize::try_from(chunk_size).map_err(|_| FileOpsError::ChunkSizeOverflow(chunk_size))?;
        let response = self.remote.call(&GetFileRequest { file_id }).await?;
        let missing: BTreeSet<u64> = response.missing_chunks.iter().copied().collect();
        if missing.is_empty() {
            return Ok(Vec::new());
        }

        let remote_count = response
            .file_info
            .as_ref()
            .and_then(|info| info.current_version.chunk_count);
        let stream = match remote_count {
            Some(count) => ChunkStream::new(path, chunk_size, count)?,
            None => ChunkStream::for_file(path, chunk_size)?,
        };
        tracing::debug!(
            file_id,
            chunks = stream.chunk_count(),
            chunk_size = stream.chunk_size(),
            missing = missing.len(),
            "scanning local copy for missing chunks"
        );

        let mut pending = Vec::new();
        stream.for_each(|number, bytes| {
            if missing.contains(&number) {
                pending.push(PendingChunk {
                    number,
                    len: bytes.len(),
                    hash: chunk_hash(bytes),
                });
            }
            if pending.len() == missing.len() {
                Ok::<_, FileOpsError>(ControlFlow::Break(()))
            } else {
                Ok(ControlFlow::Continue(()))
            }
        })?;

        Ok(pending)
    }

    async fn delete(&self, file_id: FileId) -> Result<(), ApiError> {
        self.remote.call(&DeleteFileRequest { file_id }).await?;
        tracing::debug!(file_id, "removed file");
        Ok(())
    }
}
