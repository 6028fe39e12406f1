use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::assignments::load_fresh_assignment;
use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::decode_upload;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::submission::{SubmissionCreate, SubmissionResponse};
use crate::services::access;

pub(super) async fn submit(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
    Json(payload): Json<SubmissionCreate>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let assignment = load_fresh_assignment(&state, &assignment_id).await?;

    if !access::can_submit(&user, &assignment) {
        return Err(ApiError::Forbidden("Not allowed to submit to this assignment"));
    }

    let solution_text = payload
        .solution_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());
    if solution_text.is_none() && payload.file.is_none() {
        return Err(ApiError::BadRequest(
            "A submission needs solution text or a file".to_string(),
        ));
    }

    // The submission payload is the primary artifact: if it cannot be
    // persisted the submit fails outright.
    let file_path = match payload.file.as_ref() {
        Some(upload) => {
            let bytes = decode_upload(
                &upload.filename,
                &upload.content_base64,
                state.settings().storage().max_upload_size_mb,
            )?;
            let key = state.storage().store(&bytes, &upload.filename).await.map_err(|err| {
                tracing::error!(error = %err, file = %upload.filename, "Failed to store submission file");
                ApiError::ServiceUnavailable("File storage is unavailable".to_string())
            })?;
            Some(key)
        }
        None => None,
    };

    let submitted_at = primitive_now_utc();
    let is_late = submitted_at > assignment.deadline;
    let submission_id = Uuid::new_v4().to_string();

    let inserted = repositories::submissions::create_if_absent(
        state.db(),
        repositories::submissions::CreateSubmission {
            id: &submission_id,
            assignment_id: &assignment.id,
            student_id: &user.id,
            file_path: file_path.as_deref(),
            solution_text,
            submitted_at,
            is_late,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create submission"))?;

    if !inserted {
        // Lost the race or resubmitted; the stored file is orphaned, so
        // clean it up best effort.
        if let Some(key) = file_path.as_deref() {
            if let Err(err) = state.storage().delete(key).await {
                tracing::warn!(error = %err, key = %key, "Failed to delete orphaned file");
            }
        }
        return Err(ApiError::Conflict(
            "A submission for this assignment already exists".to_string(),
        ));
    }

    let row = repositories::submissions::find_row_by_id(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_row(row))))
}

/// Role-scoped listing: students see their own submissions, teachers
/// everything submitted to their assignments.
pub(super) async fn my_submissions(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let rows = match user.role {
        UserRole::Student => {
            repositories::submissions::list_for_student(state.db(), &user.id).await
        }
        UserRole::Teacher => {
            repositories::submissions::list_for_teacher(state.db(), &user.id).await
        }
        UserRole::Admin => {
            return Err(ApiError::BadRequest(
                "Admin accounts have no submissions of their own".to_string(),
            ));
        }
    }
    .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    Ok(Json(rows.into_iter().map(SubmissionResponse::from_row).collect()))
}
