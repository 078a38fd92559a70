use serde::{Deserialize, Serialize};

pub type FileId = i64;

/// One entry of the server's per-user file catalog.
///
/// `file_name` is ciphertext; see `common::crypto::CryptoKey::decrypt_string`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    #[serde(rename = "fileID")]
    pub file_id: FileId,
    #[serde(rename = "userID", default)]
    pub user_id: i64,
    pub file_name: String,
    #[serde(default)]
    pub is_dir: bool,
    pub current_version: FileVersionInfo,
}

/// A single immutable version of a file. Version numbers are dense per file and
/// the current version is always the highest one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVersionInfo {
    #[serde(rename = "versionID", default)]
    pub version_id: i64,
    pub version_number: u64,
    #[serde(default)]
    pub permissions: u32,
    #[serde(default)]
    pub last_mod: i64,
    #[serde(default)]
    pub chunk_count: Option<u64>,
    #[serde(default)]
    pub file_hash: String,
}
