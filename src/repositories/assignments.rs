use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Assignment;
use crate::db::types::AssignmentStatus;

const COLUMNS: &str = "\
    id, subject_id, teacher_id, group_name, title, description, deadline, \
    max_score, status, created_at, updated_at";

/// Assignment row joined with the names a list or detail response needs.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AssignmentRow {
    pub(crate) id: String,
    pub(crate) subject_id: String,
    pub(crate) subject_name: String,
    pub(crate) teacher_id: String,
    pub(crate) teacher_name: String,
    pub(crate) group_name: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) deadline: PrimitiveDateTime,
    pub(crate) max_score: i32,
    pub(crate) status: AssignmentStatus,
    pub(crate) created_at: PrimitiveDateTime,
}

const ROW_SELECT: &str = "\
    SELECT a.id, a.subject_id, s.name AS subject_name, a.teacher_id,
           u.full_name AS teacher_name, a.group_name, a.title, a.description,
           a.deadline, a.max_score, a.status, a.created_at
    FROM assignments a
    JOIN subjects s ON s.id = a.subject_id
    JOIN users u ON u.id = a.teacher_id";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!("SELECT {COLUMNS} FROM assignments WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_row_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<AssignmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentRow>(&format!("{ROW_SELECT} WHERE a.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateAssignment<'a> {
    pub id: &'a str,
    pub subject_id: &'a str,
    pub teacher_id: &'a str,
    pub group_name: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub deadline: PrimitiveDateTime,
    pub max_score: i32,
    pub status: AssignmentStatus,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAssignment<'_>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (
            id, subject_id, teacher_id, group_name, title, description,
            deadline, max_score, status, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.subject_id)
    .bind(params.teacher_id)
    .bind(params.group_name)
    .bind(params.title)
    .bind(params.description)
    .bind(params.deadline)
    .bind(params.max_score)
    .bind(params.status)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_for_group(
    pool: &PgPool,
    group_name: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<AssignmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentRow>(&format!(
        "{ROW_SELECT}
         WHERE a.group_name = $1
         ORDER BY a.deadline, a.id
         LIMIT $2 OFFSET $3"
    ))
    .bind(group_name)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_teacher(
    pool: &PgPool,
    teacher_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<AssignmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentRow>(&format!(
        "{ROW_SELECT}
         WHERE a.teacher_id = $1
         ORDER BY a.created_at DESC, a.id
         LIMIT $2 OFFSET $3"
    ))
    .bind(teacher_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_all(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<AssignmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentRow>(&format!(
        "{ROW_SELECT}
         ORDER BY a.created_at DESC, a.id
         LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Flip a single active assignment past its deadline to expired. The guard
/// makes the call safe to repeat and a no-op for completed assignments.
pub(crate) async fn mark_expired_if_due(
    pool: &PgPool,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE assignments SET status = $1, updated_at = $2
         WHERE id = $3 AND status = $4 AND deadline < $2",
    )
    .bind(AssignmentStatus::Expired)
    .bind(now)
    .bind(id)
    .bind(AssignmentStatus::Active)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Same transition applied to every overdue active assignment, used before
/// list reads so stored statuses match what callers are shown.
pub(crate) async fn expire_due(pool: &PgPool, now: PrimitiveDateTime) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE assignments SET status = $1, updated_at = $2
         WHERE status = $3 AND deadline < $2",
    )
    .bind(AssignmentStatus::Expired)
    .bind(now)
    .bind(AssignmentStatus::Active)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assignments")
        .fetch_one(pool)
        .await
}

pub(crate) async fn count_for_group(pool: &PgPool, group_name: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assignments WHERE group_name = $1")
        .bind(group_name)
        .fetch_one(pool)
        .await
}

pub(crate) async fn count_for_teacher(pool: &PgPool, teacher_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assignments WHERE teacher_id = $1")
        .bind(teacher_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn count_by_status(
    pool: &PgPool,
    status: AssignmentStatus,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assignments WHERE status = $1")
        .bind(status)
        .fetch_one(pool)
        .await
}
