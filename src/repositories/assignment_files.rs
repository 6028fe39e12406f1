use sqlx::PgPool;

use crate::db::models::AssignmentFile;

const COLUMNS: &str = "id, assignment_id, file_path, file_name, created_at";

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    assignment_id: &str,
    file_path: &str,
    file_name: &str,
    created_at: time::PrimitiveDateTime,
) -> Result<AssignmentFile, sqlx::Error> {
    sqlx::query_as::<_, AssignmentFile>(&format!(
        "INSERT INTO assignment_files (id, assignment_id, file_path, file_name, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(assignment_id)
    .bind(file_path)
    .bind(file_name)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_for_assignment(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<AssignmentFile>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentFile>(&format!(
        "SELECT {COLUMNS} FROM assignment_files WHERE assignment_id = $1 ORDER BY created_at, id"
    ))
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_paths_for_assignment(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT file_path FROM assignment_files WHERE assignment_id = $1",
    )
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}
