//! Pruning historical file versions
//!
//! A prune deletes an inclusive range of versions. The current version is never
//! part of a prune: the requested maximum must sit strictly below it.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::api::client::ApiError;
use crate::api::v0::file::{DeleteVersionsRequest, FileId, FileInfo};
use crate::catalog::{CatalogError, FileResolver};
use crate::remote::Remote;

/// Token for "every version except the current one"
pub const LATEST_MINUS_ONE: &str = "H~";
const LATEST_MINUS_ONE_LONG: &str = "latest-minus-one";

#[derive(Debug, thiserror::Error)]
pub enum PruneError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("failed to delete the file versions: {0}")]
    Api(#[from] ApiError),
    #[error("the maximum version number ({max_version}) cannot be equal or greater than the current version number ({current_version}) of file {file_id}")]
    InvalidRange {
        file_id: FileId,
        max_version: i128,
        current_version: u64,
    },
    #[error("the minimum version number ({min_version}) is greater than the maximum version number ({max_version}) for file {file_id}")]
    InvertedRange {
        file_id: FileId,
        min_version: u64,
        max_version: u64,
    },
    #[error("the server returned a failed status while deleting versions of file {file_id}")]
    ServerRejected { file_id: FileId },
    #[error("failed to compile the regular expression: {0}")]
    Pattern(#[from] regex::Error),
    #[error("invalid max version {0:?}: expected a number or H~")]
    Validation(String),
}

/// Upper bound of a prune, either literal or relative to each file's current version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxVersion {
    Exact(u64),
    LatestMinusOne,
}

impl MaxVersion {
    /// The concrete maximum for a file at `current_version`. `None` when the
    /// relative form would go below zero.
    pub fn resolve(&self, current_version: u64) -> Option<u64> {
        match self {
            MaxVersion::Exact(version) => Some(*version),
            MaxVersion::LatestMinusOne => current_version.checked_sub(1),
        }
    }
}

impl FromStr for MaxVersion {
    type Err = PruneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == LATEST_MINUS_ONE || s.eq_ignore_ascii_case(LATEST_MINUS_ONE_LONG) {
            return Ok(MaxVersion::LatestMinusOne);
        }
        s.parse::<u64>()
            .map(MaxVersion::Exact)
            .map_err(|_| PruneError::Validation(s.to_string()))
    }
}

impl fmt::Display for MaxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxVersion::Exact(version) => write!(f, "{version}"),
            MaxVersion::LatestMinusOne => f.write_str(LATEST_MINUS_ONE),
        }
    }
}

/// Result of pruning one file in a batch
#[derive(Debug)]
pub struct PruneOutcome {
    pub file_id: FileId,
    pub name: String,
    pub min_version: u64,
    pub max_version: u64,
    pub result: Result<(), PruneError>,
}

#[derive(Clone, Copy)]
pub struct VersionPruner<'a> {
    remote: Remote<'a>,
}

impl<'a> VersionPruner<'a> {
    pub fn new(remote: Remote<'a>) -> Self {
        Self { remote }
    }

    /// Delete versions `[min_version, max_version]` of `file`.
    ///
    /// With `dry_run` set only the range check runs.
    pub async fn prune(
        &self,
        file: &FileInfo,
        min_version: u64,
        max_version: u64,
        dry_run: bool,
    ) -> Result<(), PruneError> {
        let current_version = file.current_version.version_number;
        if max_version >= current_version {
            return Err(PruneError::InvalidRange {
                file_id: file.file_id,
                max_version: max_version.into(),
                current_version,
            });
        }
        if min_version > max_version {
            return Err(PruneError::InvertedRange {
                file_id: file.file_id,
                min_version,
                max_version,
            });
        }

        if dry_run {
            tracing::info!(
                file_id = file.file_id,
                min_version,
                max_version,
                "dry run, not deleting versions"
            );
            return Ok(());
        }

        let request = DeleteVersionsRequest {
            file_id: file.file_id,
            min_version,
            max_version,
        };
        let response = self.remote.call(&request).await?;
        if !response.status {
            return Err(PruneError::ServerRejected {
                file_id: file.file_id,
            });
        }

        tracing::debug!(file_id = file.file_id, min_version, max_version, "pruned versions");
        Ok(())
    }

    /// Resolve `name` and prune it. Returns the resolved file and the concrete
    /// maximum version used.
    pub async fn prune_by_name(
        &self,
        name: &str,
        min_version: u64,
        max_version: MaxVersion,
        dry_run: bool,
    ) -> Result<(FileInfo, u64), PruneError> {
        let file = FileResolver::new(self.remote).resolve(name).await?;
        let current_version = file.current_version.version_number;

        let Some(max) = max_version.resolve(current_version) else {
            return Err(PruneError::InvalidRange {
                file_id: file.file_id,
                max_version: -1,
                current_version,
            });
        };

        self.prune(&file, min_version, max, dry_run).await?;
        Ok((file, max))
    }

    /// Prune every file whose decrypted name matches `pattern`.
    ///
    /// Files where the concrete maximum would not be below the current version
    /// (e.g. a single-version file under [`MaxVersion::LatestMinusOne`]) or
    /// would fall below `min_version` are skipped without an outcome. Each remaining file gets its own outcome; a
    /// failure on one file does not stop the others.
    pub async fn prune_matching(
        &self,
        pattern: &str,
        min_version: u64,
        max_version: MaxVersion,
        dry_run: bool,
    ) -> Result<Vec<PruneOutcome>, PruneError> {
        let pattern = Regex::new(pattern)?;
        let matches = FileResolver::new(self.remote).matching(&pattern).await?;

        let mut outcomes = Vec::new();
        for (name, file) in matches {
            let current_version = file.current_version.version_number;
            let max = match max_version.resolve(current_version) {
                Some(max) if max < current_version && max >= min_version => max,
                _ => {
                    tracing::debug!(name = %name, current_version, %max_version, "skipping file, nothing to prune");
                    continue;
                }
            };

            let result = self.prune(&file, min_version, max, dry_run).await;
            if let Err(e) = &result {
                tracing::warn!(name = %name, file_id = file.file_id, "failed to prune versions: {}", e);
            }

            outcomes.push(PruneOutcome {
                file_id: file.file_id,
                name,
                min_version,
                max_version: max,
                result,
            });
        }

        Ok(outcomes)
    }
}
