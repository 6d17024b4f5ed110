use std::path::PathBuf;

use axum::{
    body::Body,
    extract::{Path as AxumPath, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use common::{
    AlbumRecord, AlbumTargetRequest, CheckSyncResponse, ResultResponse, ScanRequest,
    UnsyncRequest,
};
use library::find_cover_image;
use tokio_util::io::ReaderStream;
use tracing::warn;

use crate::state::{AppState, JsonResult};
use crate::utils::{join_error, json_error, json_error_response, library_error};

pub async fn scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> JsonResult<Vec<AlbumRecord>> {
    let directory = request.directory.trim().to_string();
    if directory.is_empty() {
        return Err(json_error(StatusCode::BAD_REQUEST, "directory is required"));
    }
    let library = state.library.clone();
    let albums = tokio::task::spawn_blocking(move || library.scan(&PathBuf::from(directory)))
        .await
        .map_err(join_error)?
        .map_err(library_error)?;
    Ok(Json(albums))
}

pub async fn check_sync(
    State(state): State<AppState>,
    Json(request): Json<AlbumTargetRequest>,
) -> JsonResult<CheckSyncResponse> {
    if request.source_path.is_empty() || request.target_directory.is_empty() {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "sourcePath and targetDirectory are required",
        ));
    }
    let library = state.library.clone();
    let synced = tokio::task::spawn_blocking(move || {
        library.check_synced(
            &PathBuf::from(request.source_path),
            &PathBuf::from(request.target_directory),
        )
    })
    .await
    .map_err(join_error)?;
    Ok(Json(CheckSyncResponse { synced }))
}

pub async fn sync(
    State(state): State<AppState>,
    Json(request): Json<AlbumTargetRequest>,
) -> JsonResult<ResultResponse> {
    if request.source_path.is_empty() || request.target_directory.is_empty() {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "sourcePath and targetDirectory are required",
        ));
    }
    let library = state.library.clone();
    let result = tokio::task::spawn_blocking(move || {
        library.sync_album(
            &PathBuf::from(request.source_path),
            &PathBuf::from(request.target_directory),
        )
    })
    .await
    .map_err(join_error)?
    .map_err(library_error)?;
    Ok(Json(ResultResponse { result }))
}

pub async fn unsync(
    State(state): State<AppState>,
    Json(request): Json<UnsyncRequest>,
) -> JsonResult<ResultResponse> {
    if request.target_directory.is_empty() || request.album_name.is_empty() {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "targetDirectory and albumName are required",
        ));
    }
    let library = state.library.clone();
    let result = tokio::task::spawn_blocking(move || {
        library.unsync_album(&PathBuf::from(request.target_directory), &request.album_name)
    })
    .await
    .map_err(join_error)?
    .map_err(library_error)?;
    Ok(Json(ResultResponse { result }))
}

pub async fn cover(AxumPath(album_path): AxumPath<String>) -> Response {
    let album = PathBuf::from(album_path);
    let source = match tokio::task::spawn_blocking(move || find_cover_image(&album)).await {
        Ok(Some(source)) => source,
        Ok(None) => return json_error_response(StatusCode::NOT_FOUND, "cover not found"),
        Err(err) => {
            return json_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("worker failed: {}", err),
            )
        }
    };

    let file = match tokio::fs::File::open(&source).await {
        Ok(file) => file,
        Err(err) => {
            warn!("Failed to open cover {}: {}", source.display(), err);
            return json_error_response(StatusCode::NOT_FOUND, "cover not found");
        }
    };
    let mime = mime_guess::from_path(&source).first_or_octet_stream();
    let mut response = Response::new(Body::from_stream(ReaderStream::new(file)));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.as_ref())
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );
    response
}
