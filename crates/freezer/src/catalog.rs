//! Resolving plaintext file names against the remote catalog
//!
//! The server only ever sees encrypted names, so it cannot look a file up by
//! name. Resolution fetches the whole catalog and decrypts entries one by one.
//! Nothing is cached: every lookup sees the server's latest state.

use common::crypto::CryptoError;
use regex::Regex;

use crate::api::client::ApiError;
use crate::api::v0::file::{FileId, FileInfo, ListFilesRequest};
use crate::remote::Remote;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not get the file catalog from the server: {0}")]
    Api(#[from] ApiError),
    #[error("could not find the file: {name}")]
    NotFound { name: String },
    #[error("failed to decrypt the name of file {file_id}: {source}")]
    Decryption {
        file_id: FileId,
        #[source]
        source: CryptoError,
    },
}

#[derive(Clone, Copy)]
pub struct FileResolver<'a> {
    remote: Remote<'a>,
}

impl<'a> FileResolver<'a> {
    pub fn new(remote: Remote<'a>) -> Self {
        Self { remote }
    }

    /// Fetch every file registered for the user, in server order.
    pub async fn fetch_catalog(&self) -> Result<Vec<FileInfo>, CatalogError> {
        let response = self.remote.call(&ListFilesRequest).await?;
        tracing::debug!(files = response.files.len(), "fetched file catalog");
        Ok(response.files)
    }

    /// Decrypt a catalog entry's name with the session key.
    pub fn decrypt_name(&self, file: &FileInfo) -> Result<String, CatalogError> {
        self.remote
            .session()
            .key
            .decrypt_string(&file.file_name)
            .map_err(|source| CatalogError::Decryption {
                file_id: file.file_id,
                source,
            })
    }

    /// Find the catalog entry whose decrypted name equals `name`.
    ///
    /// The first match in server order wins. A name that fails to decrypt
    /// aborts the search even if it sits before the one being looked for.
    pub async fn resolve(&self, name: &str) -> Result<FileInfo, CatalogError> {
        for file in self.fetch_catalog().await? {
            if self.decrypt_name(&file)? == name {
                tracing::debug!(name, file_id = file.file_id, "resolved file name");
                return Ok(file);
            }
        }

        Err(CatalogError::NotFound {
            name: name.to_string(),
        })
    }

    /// Every catalog entry whose decrypted name matches `pattern`, paired with
    /// that plaintext name.
    ///
    /// All names are decrypted before anything is returned, so a caller never
    /// acts on part of a catalog that later turns out to be unreadable.
    pub async fn matching(&self, pattern: &Regex) -> Result<Vec<(String, FileInfo)>, CatalogError> {
        let mut matches = Vec::new();
        for file in self.fetch_catalog().await? {
            let name = self.decrypt_name(&file)?;
            if pattern.is_match(&name) {
                matches.push((name, file));
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{catalog_reply, file, session, MockDispatcher, Reply};
    use reqwest::{Method, StatusCode};

    #[tokio::test]
    async fn test_resolve_finds_entry_at_any_position() {
        let session = session();
        let names = ["a.txt", "b.txt", "c.txt", "d.txt"];
        let files: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| file(&session, i as i64 + 1, name, 1))
            .collect();
        let dispatcher =
            MockDispatcher::new().reply(Method::GET, "/api/files", catalog_reply(&files));
        let resolver = FileResolver::new(Remote::new(&session, &dispatcher));

        for (i, name) in names.iter().enumerate() {
            let found = resolver.resolve(name).await.unwrap();
            assert_eq!(found.file_id, i as i64 + 1);
        }

        // no caching: one catalog fetch per lookup
        assert_eq!(dispatcher.calls().len(), names.len());
        assert!(dispatcher
            .calls()
            .iter()
            .all(|call| call.token.as_deref() == Some("test-token")));
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let session = session();
        let files = vec![file(&session, 1, "a.txt", 0)];
        let dispatcher =
            MockDispatcher::new().reply(Method::GET, "/api/files", catalog_reply(&files));
        let resolver = FileResolver::new(Remote::new(&session, &dispatcher));

        let err = resolver.resolve("missing.txt").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { ref name } if name == "missing.txt"));
    }

    #[tokio::test]
    async fn test_resolve_aborts_on_undecryptable_entry() {
        let session = session();
        let mut corrupt = file(&session, 1, "ignored", 0);
        corrupt.file_name = "bm90IGEgcmVhbCBjaXBoZXJ0ZXh0".to_string();
        let files = vec![corrupt, file(&session, 2, "wanted.txt", 0)];
        let dispatcher =
            MockDispatcher::new().reply(Method::GET, "/api/files", catalog_reply(&files));
        let resolver = FileResolver::new(Remote::new(&session, &dispatcher));

        let err = resolver.resolve("wanted.txt").await.unwrap_err();
        assert!(matches!(err, CatalogError::Decryption { file_id: 1, .. }));
    }

    #[tokio::test]
    async fn test_resolve_first_match_wins() {
        let session = session();
        let files = vec![
            file(&session, 7, "dup.txt", 0),
            file(&session, 8, "dup.txt", 0),
        ];
        let dispatcher =
            MockDispatcher::new().reply(Method::GET, "/api/files", catalog_reply(&files));
        let resolver = FileResolver::new(Remote::new(&session, &dispatcher));

        assert_eq!(resolver.resolve("dup.txt").await.unwrap().file_id, 7);
    }

    #[tokio::test]
    async fn test_catalog_failure_is_surfaced() {
        let session = session();
        let dispatcher = MockDispatcher::new().reply(
            Method::GET,
            "/api/files",
            Reply::Status(StatusCode::UNAUTHORIZED, "token expired".to_string()),
        );
        let resolver = FileResolver::new(Remote::new(&session, &dispatcher));

        let err = resolver.resolve("a.txt").await.unwrap_err();
        match err {
            CatalogError::Api(api) => {
                assert_eq!(api.status(), Some(StatusCode::UNAUTHORIZED));
                assert!(api.to_string().contains("token expired"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_matching_filters_by_pattern() {
        let session = session();
        let files = vec![
            file(&session, 1, "a.txt", 0),
            file(&session, 2, "b.jpg", 0),
            file(&session, 3, "c.txt", 0),
        ];
        let dispatcher =
            MockDispatcher::new().reply(Method::GET, "/api/files", catalog_reply(&files));
        let resolver = FileResolver::new(Remote::new(&session, &dispatcher));

        let pattern = Regex::new(r".*\.txt").unwrap();
        let matches = resolver.matching(&pattern).await.unwrap();
        let names: Vec<_> = matches.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "c.txt"]);
    }
}
