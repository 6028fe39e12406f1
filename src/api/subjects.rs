use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::subject::{SubjectCreate, SubjectResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subjects).post(create_subject))
        .route("/:subject_id", get(get_subject).delete(delete_subject))
}

async fn list_subjects(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubjectResponse>>, ApiError> {
    let subjects = repositories::subjects::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list subjects"))?;

    Ok(Json(subjects.into_iter().map(SubjectResponse::from_db).collect()))
}

async fn create_subject(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<SubjectCreate>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() || name.len() > 100 {
        return Err(ApiError::BadRequest("Subject name must be a non-empty string".to_string()));
    }

    let existing = repositories::subjects::exists_by_name(state.db(), name)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing subject"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Subject with this name already exists".to_string()));
    }

    let subject = repositories::subjects::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        name,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create subject"))?;

    Ok((StatusCode::CREATED, Json(SubjectResponse::from_db(subject))))
}

async fn get_subject(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> Result<Json<SubjectResponse>, ApiError> {
    let subject = repositories::subjects::find_by_id(state.db(), &subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load subject"))?
        .ok_or_else(|| ApiError::NotFound("Subject not found".to_string()))?;

    Ok(Json(SubjectResponse::from_db(subject)))
}

async fn delete_subject(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let in_use = repositories::subjects::has_assignments(state.db(), &subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check subject usage"))?;
    if in_use {
        return Err(ApiError::Conflict("Subject still has assignments".to_string()));
    }

    let deleted = repositories::subjects::delete(state.db(), &subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete subject"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Subject not found".to_string()))
    }
}
