use std::path::PathBuf;

use axum::{http::StatusCode, Json};
use common::{BrowseRequest, DirectoryItem};
use library::{browse_directory, list_drives};

use crate::state::JsonResult;
use crate::utils::{join_error, json_error, library_error};

pub async fn drives() -> JsonResult<Vec<String>> {
    let drives = tokio::task::spawn_blocking(list_drives)
        .await
        .map_err(join_error)?;
    Ok(Json(drives))
}

pub async fn browse(Json(request): Json<BrowseRequest>) -> JsonResult<Vec<DirectoryItem>> {
    if request.path.trim().is_empty() {
        return Err(json_error(StatusCode::BAD_REQUEST, "path is required"));
    }
    let path = PathBuf::from(request.path);
    let items = tokio::task::spawn_blocking(move || browse_directory(&path))
        .await
        .map_err(join_error)?
        .map_err(library_error)?;
    Ok(Json(items))
}
