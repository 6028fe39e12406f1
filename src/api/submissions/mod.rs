mod student;
mod teacher;
#[cfg(test)]
mod tests;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/assignments/:assignment_id", post(student::submit))
        .route("/my", get(student::my_submissions))
        .route("/unchecked", get(teacher::unchecked_submissions))
        .route("/:submission_id", get(teacher::get_submission))
        .route("/:submission_id/grade", post(teacher::grade_submission))
}
