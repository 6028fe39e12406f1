use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentTeacher, CurrentUser};
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::api::validation::{
    decode_upload, validate_group_name, validate_max_score, validate_title,
};
use crate::core::state::AppState;
use crate::core::time::{parse_rfc3339_to_primitive, primitive_now_utc};
use crate::db::models::Assignment;
use crate::db::types::{AssignmentStatus, UserRole};
use crate::repositories;
use crate::schemas::assignment::{
    AssignmentCreate, AssignmentDetailResponse, AssignmentFileResponse, AssignmentResponse,
};
use crate::schemas::submission::SubmissionResponse;
use crate::services::{access, statistics};

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

/// An active assignment whose deadline has passed is due for the
/// expired transition; completed assignments never are.
fn expiry_due(assignment: &Assignment, now: PrimitiveDateTime) -> bool {
    assignment.status == AssignmentStatus::Active && assignment.deadline < now
}

pub(super) async fn create_assignment(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentCreate>,
) -> Result<(StatusCode, Json<AssignmentResponse>), ApiError> {
    validate_title(&payload.title)?;
    validate_group_name(&payload.group_name)?;
    validate_max_score(payload.max_score)?;

    let deadline = parse_rfc3339_to_primitive(&payload.deadline)
        .map_err(|_| ApiError::BadRequest("Deadline must be an RFC 3339 timestamp".to_string()))?;

    let now = primitive_now_utc();
    if deadline <= now {
        return Err(ApiError::BadRequest("Deadline must be in the future".to_string()));
    }

    let subject = repositories::subjects::find_by_id(state.db(), &payload.subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load subject"))?;
    if subject.is_none() {
        return Err(ApiError::NotFound("Subject not found".to_string()));
    }

    // Client-side payload problems surface before anything is written.
    let max_size_mb = state.settings().storage().max_upload_size_mb;
    let mut attachments = Vec::with_capacity(payload.attachments.len());
    for upload in &payload.attachments {
        let bytes = decode_upload(&upload.filename, &upload.content_base64, max_size_mb)?;
        attachments.push((upload.filename.clone(), bytes));
    }

    let assignment = repositories::assignments::create(
        state.db(),
        repositories::assignments::CreateAssignment {
            id: &Uuid::new_v4().to_string(),
            subject_id: &payload.subject_id,
            teacher_id: &teacher.id,
            group_name: &payload.group_name,
            title: &payload.title,
            description: payload.description.as_deref(),
            deadline,
            max_score: payload.max_score,
            status: AssignmentStatus::Active,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create assignment"))?;

    // Attachments are best effort: a failed store or record is logged and
    // skipped without failing the assignment.
    for (filename, bytes) in attachments {
        let key = match state.storage().store(&bytes, &filename).await {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(error = %err, file = %filename, "Failed to store attachment, skipping");
                continue;
            }
        };
        if let Err(err) = repositories::assignment_files::create(
            state.db(),
            &Uuid::new_v4().to_string(),
            &assignment.id,
            &key,
            &filename,
            now,
        )
        .await
        {
            tracing::warn!(error = %err, file = %filename, "Failed to record attachment, skipping");
        }
    }

    let row = repositories::assignments::find_row_by_id(state.db(), &assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    Ok((StatusCode::CREATED, Json(AssignmentResponse::from_row(row))))
}

/// Role-scoped listing: students see their group's assignments, teachers
/// their own, admins everything.
pub(super) async fn list_assignments(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<AssignmentResponse>>, ApiError> {
    let limit = query.limit.clamp(1, 500);
    let skip = query.skip.max(0);

    repositories::assignments::expire_due(state.db(), primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to refresh assignment statuses"))?;

    // The total must cover the same scope as the page, not the whole table.
    let (rows, total_count) = match user.role {
        UserRole::Student => {
            let Some(group_name) = user.group_name.as_deref() else {
                return Err(ApiError::BadRequest(
                    "Student account has no group assigned".to_string(),
                ));
            };
            let rows =
                repositories::assignments::list_for_group(state.db(), group_name, limit, skip)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;
            let total = repositories::assignments::count_for_group(state.db(), group_name)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to count assignments"))?;
            (rows, total)
        }
        UserRole::Teacher => {
            let rows =
                repositories::assignments::list_for_teacher(state.db(), &user.id, limit, skip)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;
            let total = repositories::assignments::count_for_teacher(state.db(), &user.id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to count assignments"))?;
            (rows, total)
        }
        UserRole::Admin => {
            let rows = repositories::assignments::list_all(state.db(), limit, skip)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;
            let total = repositories::assignments::count(state.db())
                .await
                .map_err(|e| ApiError::internal(e, "Failed to count assignments"))?;
            (rows, total)
        }
    };

    Ok(Json(PaginatedResponse {
        items: rows.into_iter().map(AssignmentResponse::from_row).collect(),
        total_count,
        skip,
        limit,
    }))
}

pub(super) async fn list_all_assignments(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<AssignmentResponse>>, ApiError> {
    let limit = query.limit.clamp(1, 500);
    let skip = query.skip.max(0);

    repositories::assignments::expire_due(state.db(), primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to refresh assignment statuses"))?;

    let rows = repositories::assignments::list_all(state.db(), limit, skip)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;
    let total_count = repositories::assignments::count(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count assignments"))?;

    Ok(Json(PaginatedResponse {
        items: rows.into_iter().map(AssignmentResponse::from_row).collect(),
        total_count,
        skip,
        limit,
    }))
}

pub(super) async fn get_assignment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
) -> Result<Json<AssignmentDetailResponse>, ApiError> {
    let assignment = load_fresh_assignment(&state, &assignment_id).await?;

    if !access::can_view(&user, &assignment) {
        return Err(ApiError::Forbidden("Not allowed to view this assignment"));
    }

    let row = repositories::assignments::find_row_by_id(state.db(), &assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    let files = repositories::assignment_files::list_for_assignment(state.db(), &assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load assignment files"))?;

    let submissions = repositories::submissions::list_for_assignment(state.db(), &assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    let score_rows =
        submissions.iter().map(|submission| (submission.score, submission.is_late)).collect::<Vec<_>>();

    Ok(Json(AssignmentDetailResponse {
        assignment: AssignmentResponse::from_row(row),
        files: files.into_iter().map(AssignmentFileResponse::from_db).collect(),
        submissions: submissions.into_iter().map(SubmissionResponse::from_row).collect(),
        statistics: statistics::summarize(score_rows),
    }))
}

pub(super) async fn expire_assignment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let assignment = find_assignment(&state, &assignment_id).await?;

    if !access::can_manage(&user, &assignment) {
        return Err(ApiError::Forbidden("Not allowed to manage this assignment"));
    }

    repositories::assignments::mark_expired_if_due(state.db(), &assignment.id, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to expire assignment"))?;

    let row = repositories::assignments::find_row_by_id(state.db(), &assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    Ok(Json(AssignmentResponse::from_row(row)))
}

pub(super) async fn delete_assignment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let assignment = find_assignment(&state, &assignment_id).await?;

    if !access::can_manage(&user, &assignment) {
        return Err(ApiError::Forbidden("Not allowed to manage this assignment"));
    }

    let mut stored_keys =
        repositories::assignment_files::list_paths_for_assignment(state.db(), &assignment.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load assignment files"))?;
    let submission_keys =
        repositories::submissions::list_file_paths_for_assignment(state.db(), &assignment.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load submission files"))?;
    stored_keys.extend(submission_keys);

    // Stored files come down first, best effort, so the records never
    // outlive their backing files.
    for key in stored_keys {
        if let Err(err) = state.storage().delete(&key).await {
            tracing::warn!(error = %err, key = %key, "Failed to delete stored file, skipping");
        }
    }

    let deleted = repositories::assignments::delete(state.db(), &assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete assignment"))?;
    if !deleted {
        return Err(ApiError::NotFound("Assignment not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn assignment_statistics(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
) -> Result<Json<statistics::SubmissionStatistics>, ApiError> {
    let assignment = find_assignment(&state, &assignment_id).await?;

    if !access::can_view(&user, &assignment) {
        return Err(ApiError::Forbidden("Not allowed to view this assignment"));
    }

    let score_rows = repositories::submissions::score_rows_for_assignment(state.db(), &assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission scores"))?;

    Ok(Json(statistics::summarize(score_rows)))
}

pub(super) async fn list_assignment_submissions(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let assignment = find_assignment(&state, &assignment_id).await?;

    if !access::can_manage(&user, &assignment) {
        return Err(ApiError::Forbidden("Not allowed to view these submissions"));
    }

    let rows = repositories::submissions::list_for_assignment(state.db(), &assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?;

    Ok(Json(rows.into_iter().map(SubmissionResponse::from_row).collect()))
}

async fn find_assignment(
    state: &AppState,
    assignment_id: &str,
) -> Result<Assignment, ApiError> {
    repositories::assignments::find_by_id(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))
}

/// Load an assignment, applying the lazy expiry transition first so the
/// returned status reflects the deadline.
pub(crate) async fn load_fresh_assignment(
    state: &AppState,
    assignment_id: &str,
) -> Result<Assignment, ApiError> {
    let mut assignment = find_assignment(state, assignment_id).await?;

    if expiry_due(&assignment, primitive_now_utc()) {
        repositories::assignments::mark_expired_if_due(
            state.db(),
            &assignment.id,
            primitive_now_utc(),
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to expire assignment"))?;
        assignment = find_assignment(state, assignment_id).await?;
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month, Time};

    fn at(day: u8) -> PrimitiveDateTime {
        let date = Date::from_calendar_date(2026, Month::May, day).unwrap();
        PrimitiveDateTime::new(date, Time::from_hms(12, 0, 0).unwrap())
    }

    fn assignment(status: AssignmentStatus, deadline: PrimitiveDateTime) -> Assignment {
        Assignment {
            id: "a1".to_string(),
            subject_id: "s1".to_string(),
            teacher_id: "t1".to_string(),
            group_name: "G-101".to_string(),
            title: "Integrals".to_string(),
            description: None,
            deadline,
            max_score: 100,
            status,
            created_at: at(1),
            updated_at: at(1),
        }
    }

    #[test]
    fn active_past_deadline_is_due_for_expiry() {
        assert!(expiry_due(&assignment(AssignmentStatus::Active, at(10)), at(11)));
    }

    #[test]
    fn active_before_deadline_is_not_due() {
        assert!(!expiry_due(&assignment(AssignmentStatus::Active, at(10)), at(9)));
    }

    #[test]
    fn expired_and_completed_are_never_due_again() {
        assert!(!expiry_due(&assignment(AssignmentStatus::Expired, at(10)), at(11)));
        assert!(!expiry_due(&assignment(AssignmentStatus::Completed, at(10)), at(11)));
    }
}
