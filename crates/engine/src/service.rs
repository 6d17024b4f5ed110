use async_trait::async_trait;
use bytes::Bytes;
use common::AlbumRecord;

/// The remote album service the engine drives. Every call may fail with a
/// transport-level [`ServiceError`]; the engine decides per call site how
/// that failure degrades.
#[async_trait]
pub trait AlbumService: Send + Sync {
    async fn scan(&self, directory: &str) -> Result<Vec<AlbumRecord>, ServiceError>;

    async fn check_synced(
        &self,
        source_path: &str,
        target_directory: &str,
    ) -> Result<bool, ServiceError>;

    /// Copies an album to the target. Returns the service's result message.
    async fn sync_album(
        &self,
        source_path: &str,
        target_directory: &str,
    ) -> Result<String, ServiceError>;

    /// Removes `album_name` from the target. Returns the service's result message.
    async fn unsync_album(
        &self,
        target_directory: &str,
        album_name: &str,
    ) -> Result<String, ServiceError>;

    async fn cover_image(&self, source_path: &str) -> Result<Option<Bytes>, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Transport(String),
    Status { status: u16, message: String },
    Decode(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Transport(message) => write!(f, "transport error: {}", message),
            ServiceError::Status { status, message } => write!(f, "http {}: {}", status, message),
            ServiceError::Decode(message) => write!(f, "decode error: {}", message),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}
