use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentTeacher, CurrentUser};
use crate::api::validation::validate_score;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::submission::{GradeRequest, SubmissionResponse};
use crate::services::access;

pub(super) async fn grade_submission(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(submission_id): Path<String>,
    Json(payload): Json<GradeRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = repositories::submissions::find_by_id(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    let assignment = repositories::assignments::find_by_id(state.db(), &submission.assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    // Grading is reserved to the owning teacher; admin is not enough.
    if !access::can_grade(&user, &assignment) {
        return Err(ApiError::Forbidden("Only the assignment's teacher may grade it"));
    }

    validate_score(payload.score, assignment.max_score)?;

    repositories::submissions::grade(
        state.db(),
        &submission.id,
        payload.score,
        payload.feedback,
        &user.id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to grade submission"))?;

    let row = repositories::submissions::find_row_by_id(state.db(), &submission.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    Ok(Json(SubmissionResponse::from_row(row)))
}

pub(super) async fn unchecked_submissions(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let rows = repositories::submissions::list_unchecked_for_teacher(state.db(), &teacher.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    Ok(Json(rows.into_iter().map(SubmissionResponse::from_row).collect()))
}

pub(super) async fn get_submission(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(submission_id): Path<String>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let row = repositories::submissions::find_row_by_id(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    let allowed = user.role == UserRole::Admin
        || user.id == row.student_id
        || user.id == row.assignment_teacher_id;
    if !allowed {
        return Err(ApiError::Forbidden("Not allowed to view this submission"));
    }

    Ok(Json(SubmissionResponse::from_row(row)))
}
