use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One album folder found by a scan of the source collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub path: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    #[serde(rename = "mp3_count")]
    pub track_count: u32,
    pub has_cover: bool,
    pub size_mb: f64,
    #[serde(default)]
    pub is_synced: bool,
    #[serde(default)]
    pub fingerprint: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryItem {
    pub name: String,
    pub path: String,
    #[serde(rename = "isDirectory")]
    pub is_directory: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub last_source_directory: String,
    pub last_target_directory: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanRequest {
    pub directory: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BrowseRequest {
    pub path: String,
}

/// Body shared by `/api/check-sync` and `/api/sync`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumTargetRequest {
    pub source_path: String,
    pub target_directory: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsyncRequest {
    pub target_directory: String,
    pub album_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckSyncResponse {
    pub synced: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Identity of an album folder: its own name plus the sorted names of the
/// files directly inside it. Independent of where the folder lives.
pub fn folder_fingerprint<S: AsRef<str>>(folder_name: &str, file_names: &[S]) -> String {
    let mut files: Vec<&str> = file_names.iter().map(|name| name.as_ref()).collect();
    files.sort_unstable();
    let mut data = String::from(folder_name);
    for file in files {
        data.push('|');
        data.push_str(file);
    }
    hex::encode(Sha256::digest(data.as_bytes()))
}
