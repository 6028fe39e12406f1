use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::db::types::{AssignmentStatus, UserRole};
use crate::repositories;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/statistics", get(platform_statistics))
}

#[derive(Debug, Serialize)]
struct StudentAverage {
    student_id: String,
    student_name: String,
    graded_count: i64,
    average_score: f64,
}

#[derive(Debug, Serialize)]
struct PlatformStatistics {
    total_users: i64,
    students: i64,
    teachers: i64,
    total_assignments: i64,
    active_assignments: i64,
    expired_assignments: i64,
    total_submissions: i64,
    ungraded_submissions: i64,
    student_averages: Vec<StudentAverage>,
}

async fn platform_statistics(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<PlatformStatistics>, ApiError> {
    let db = state.db();

    let total_users = repositories::users::count(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count users"))?;
    let students = repositories::users::count_by_role(db, UserRole::Student)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count students"))?;
    let teachers = repositories::users::count_by_role(db, UserRole::Teacher)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count teachers"))?;

    let total_assignments = repositories::assignments::count(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count assignments"))?;
    let active_assignments =
        repositories::assignments::count_by_status(db, AssignmentStatus::Active)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count assignments"))?;
    let expired_assignments =
        repositories::assignments::count_by_status(db, AssignmentStatus::Expired)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count assignments"))?;

    let total_submissions = repositories::submissions::count(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count submissions"))?;
    let ungraded_submissions = repositories::submissions::count_ungraded(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count submissions"))?;

    let student_averages = repositories::submissions::average_scores_by_student(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to aggregate student scores"))?
        .into_iter()
        .map(|row| StudentAverage {
            student_id: row.student_id,
            student_name: row.student_name,
            graded_count: row.graded_count,
            average_score: row.average_score,
        })
        .collect();

    Ok(Json(PlatformStatistics {
        total_users,
        students,
        teachers,
        total_assignments,
        active_assignments,
        expired_assignments,
        total_submissions,
        ungraded_submissions,
        student_averages,
    }))
}
