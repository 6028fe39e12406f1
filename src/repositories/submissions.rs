use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Submission;

pub(crate) const COLUMNS: &str = "\
    id, assignment_id, student_id, file_path, solution_text, submitted_at, \
    is_late, score, feedback, graded_by, graded_at, created_at, updated_at";

/// Submission joined with the assignment and student context responses need.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SubmissionRow {
    pub(crate) id: String,
    pub(crate) assignment_id: String,
    pub(crate) assignment_title: String,
    pub(crate) assignment_deadline: PrimitiveDateTime,
    pub(crate) assignment_teacher_id: String,
    pub(crate) subject_name: String,
    pub(crate) group_name: String,
    pub(crate) max_score: i32,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) file_path: Option<String>,
    pub(crate) solution_text: Option<String>,
    pub(crate) submitted_at: PrimitiveDateTime,
    pub(crate) is_late: bool,
    pub(crate) score: Option<i32>,
    pub(crate) feedback: Option<String>,
    pub(crate) graded_at: Option<PrimitiveDateTime>,
}

const ROW_SELECT: &str = "\
    SELECT sub.id, sub.assignment_id, a.title AS assignment_title,
           a.deadline AS assignment_deadline, a.teacher_id AS assignment_teacher_id,
           s.name AS subject_name, a.group_name, a.max_score,
           sub.student_id, u.full_name AS student_name,
           sub.file_path, sub.solution_text, sub.submitted_at, sub.is_late,
           sub.score, sub.feedback, sub.graded_at
    FROM submissions sub
    JOIN assignments a ON a.id = sub.assignment_id
    JOIN subjects s ON s.id = a.subject_id
    JOIN users u ON u.id = sub.student_id";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!("SELECT {COLUMNS} FROM submissions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_row_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<SubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRow>(&format!("{ROW_SELECT} WHERE sub.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateSubmission<'a> {
    pub id: &'a str,
    pub assignment_id: &'a str,
    pub student_id: &'a str,
    pub file_path: Option<&'a str>,
    pub solution_text: Option<&'a str>,
    pub submitted_at: PrimitiveDateTime,
    pub is_late: bool,
}

/// Insert a submission unless the student already has one for the
/// assignment. The unique constraint arbitrates concurrent submits, so
/// `false` means another insert won the race or one already existed.
pub(crate) async fn create_if_absent(
    pool: &PgPool,
    params: CreateSubmission<'_>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO submissions (
            id, assignment_id, student_id, file_path, solution_text,
            submitted_at, is_late, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$6,$6)
        ON CONFLICT (assignment_id, student_id) DO NOTHING",
    )
    .bind(params.id)
    .bind(params.assignment_id)
    .bind(params.student_id)
    .bind(params.file_path)
    .bind(params.solution_text)
    .bind(params.submitted_at)
    .bind(params.is_late)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_for_assignment(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<SubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRow>(&format!(
        "{ROW_SELECT} WHERE sub.assignment_id = $1 ORDER BY sub.submitted_at, sub.id"
    ))
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<SubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRow>(&format!(
        "{ROW_SELECT} WHERE sub.student_id = $1 ORDER BY sub.submitted_at DESC, sub.id"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// Every submission made to the teacher's assignments.
pub(crate) async fn list_for_teacher(
    pool: &PgPool,
    teacher_id: &str,
) -> Result<Vec<SubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRow>(&format!(
        "{ROW_SELECT} WHERE a.teacher_id = $1 ORDER BY sub.submitted_at DESC, sub.id"
    ))
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

/// Ungraded submissions across every assignment the teacher owns.
pub(crate) async fn list_unchecked_for_teacher(
    pool: &PgPool,
    teacher_id: &str,
) -> Result<Vec<SubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRow>(&format!(
        "{ROW_SELECT}
         WHERE a.teacher_id = $1 AND sub.score IS NULL
         ORDER BY sub.submitted_at, sub.id"
    ))
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn grade(
    pool: &PgPool,
    id: &str,
    score: i32,
    feedback: Option<String>,
    graded_by: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE submissions SET score = $1, feedback = $2, graded_by = $3,
            graded_at = $4, updated_at = $4 WHERE id = $5",
    )
    .bind(score)
    .bind(feedback)
    .bind(graded_by)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// The (score, is_late) pairs statistics are computed from.
pub(crate) async fn score_rows_for_assignment(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<(Option<i32>, bool)>, sqlx::Error> {
    sqlx::query_as::<_, (Option<i32>, bool)>(
        "SELECT score, is_late FROM submissions WHERE assignment_id = $1",
    )
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_file_paths_for_assignment(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT file_path FROM submissions WHERE assignment_id = $1 AND file_path IS NOT NULL",
    )
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StudentAverageRow {
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) graded_count: i64,
    pub(crate) average_score: f64,
}

/// Average score per student over graded submissions only.
pub(crate) async fn average_scores_by_student(
    pool: &PgPool,
) -> Result<Vec<StudentAverageRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentAverageRow>(
        "SELECT sub.student_id, u.full_name AS student_name,
                COUNT(sub.score) AS graded_count,
                AVG(sub.score)::float8 AS average_score
         FROM submissions sub
         JOIN users u ON u.id = sub.student_id
         WHERE sub.score IS NOT NULL
         GROUP BY sub.student_id, u.full_name
         ORDER BY u.full_name, sub.student_id",
    )
    .fetch_all(pool)
    .await
}

pub(crate) async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions")
        .fetch_one(pool)
        .await
}

pub(crate) async fn count_ungraded(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions WHERE score IS NULL")
        .fetch_one(pool)
        .await
}
