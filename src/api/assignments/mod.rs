mod handlers;
#[cfg(test)]
mod tests;

pub(crate) use handlers::load_fresh_assignment;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_assignment).get(handlers::list_assignments))
        .route("/all", get(handlers::list_all_assignments))
        .route("/:assignment_id", get(handlers::get_assignment).delete(handlers::delete_assignment))
        .route("/:assignment_id/expire", post(handlers::expire_assignment))
        .route("/:assignment_id/statistics", get(handlers::assignment_statistics))
        .route("/:assignment_id/submissions", get(handlers::list_assignment_submissions))
}
