use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use common::{
    AlbumRecord, AlbumTargetRequest, AppSettings, BrowseRequest, CheckSyncResponse,
    DirectoryItem, ErrorResponse, ResultResponse, ScanRequest, StatusResponse, UnsyncRequest,
};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::service::{AlbumService, ServiceError};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// [`AlbumService`] over the JSON API served by the `server` crate.
#[derive(Clone)]
pub struct HttpAlbumService {
    client: Client,
    base_url: String,
}

impl HttpAlbumService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent("musicsync/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ServiceError> {
        let response = self.client.get(self.url(path)).send().await?;
        decode(response).await
    }

    pub async fn drives(&self) -> Result<Vec<String>, ServiceError> {
        self.get_json("/api/drives").await
    }

    pub async fn browse(&self, path: &str) -> Result<Vec<DirectoryItem>, ServiceError> {
        self.post_json(
            "/api/browse",
            &BrowseRequest {
                path: path.to_string(),
            },
        )
        .await
    }

    pub async fn load_settings(&self) -> Result<AppSettings, ServiceError> {
        self.get_json("/api/settings").await
    }

    pub async fn save_settings(&self, settings: &AppSettings) -> Result<(), ServiceError> {
        let _: StatusResponse = self.post_json("/api/settings", settings).await?;
        Ok(())
    }
}

#[async_trait]
impl AlbumService for HttpAlbumService {
    async fn scan(&self, directory: &str) -> Result<Vec<AlbumRecord>, ServiceError> {
        self.post_json(
            "/api/scan",
            &ScanRequest {
                directory: directory.to_string(),
            },
        )
        .await
    }

    async fn check_synced(
        &self,
        source_path: &str,
        target_directory: &str,
    ) -> Result<bool, ServiceError> {
        let response: CheckSyncResponse = self
            .post_json(
                "/api/check-sync",
                &AlbumTargetRequest {
                    source_path: source_path.to_string(),
                    target_directory: target_directory.to_string(),
                },
            )
            .await?;
        Ok(response.synced)
    }

    async fn sync_album(
        &self,
        source_path: &str,
        target_directory: &str,
    ) -> Result<String, ServiceError> {
        let response: ResultResponse = self
            .post_json(
                "/api/sync",
                &AlbumTargetRequest {
                    source_path: source_path.to_string(),
                    target_directory: target_directory.to_string(),
                },
            )
            .await?;
        Ok(response.result)
    }

    async fn unsync_album(
        &self,
        target_directory: &str,
        album_name: &str,
    ) -> Result<String, ServiceError> {
        let response: ResultResponse = self
            .post_json(
                "/api/unsync",
                &UnsyncRequest {
                    target_directory: target_directory.to_string(),
                    album_name: album_name.to_string(),
                },
            )
            .await?;
        Ok(response.result)
    }

    async fn cover_image(&self, source_path: &str) -> Result<Option<Bytes>, ServiceError> {
        // `/` is escaped too, so the whole path travels as one segment.
        let url = self.url(&format!("/api/cover/{}", urlencoding::encode(source_path)));
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(Some(response.bytes().await?))
    }
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ServiceError> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| ServiceError::Decode(err.to_string()))
}

async fn status_error(response: Response) -> ServiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ServiceError::Status {
        status: status.as_u16(),
        message: error_message(status, &body),
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
