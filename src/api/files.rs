use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::services::storage;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/:key", get(download))
}

async fn download(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !storage::is_valid_key(&key) {
        return Err(ApiError::BadRequest("Invalid file key".to_string()));
    }

    if !state.storage().exists(&key).await {
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    let bytes = state
        .storage()
        .read(&key)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to read stored file"))?;

    let disposition = format!("attachment; filename=\"{key}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
