use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::ErrorResponse;
use library::LibraryError;
use tokio::task::JoinError;

pub fn json_error(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn json_error_response(status: StatusCode, message: impl Into<String>) -> Response {
    json_error(status, message).into_response()
}

pub fn library_error(err: LibraryError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        LibraryError::NotFound(_) => StatusCode::NOT_FOUND,
        LibraryError::InvalidName(_) => StatusCode::BAD_REQUEST,
        LibraryError::Io(_) | LibraryError::Walk(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(status, err.to_string())
}

pub fn join_error(err: JoinError) -> (StatusCode, Json<ErrorResponse>) {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("worker failed: {}", err),
    )
}
