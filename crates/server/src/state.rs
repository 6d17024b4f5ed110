use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::Json;
use common::ErrorResponse;
use library::Library;
use parking_lot::RwLock;
use serde::Serialize;

use crate::config::{resolve_path, ServerConfig};

#[derive(Clone)]
pub struct AppState {
    pub library: Library,
    pub config_path: PathBuf,
    pub config: Arc<RwLock<ServerConfig>>,
}

impl AppState {
    pub fn new(config_path: PathBuf, config: ServerConfig) -> Self {
        Self {
            library: Library::new(),
            config_path,
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        let config = self.config.read();
        resolve_path(&self.config_path, &config.settings_path)
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub type JsonResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;
