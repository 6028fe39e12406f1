use axum::http::{Method, StatusCode};
use serde_json::json;
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

async fn create_assignment(
    app: axum::Router,
    token: &str,
    subject_id: &str,
    group_name: &str,
    title: &str,
) -> String {
    let deadline = (OffsetDateTime::now_utc() + Duration::hours(2))
        .replace_nanosecond(0)
        .expect("nanoseconds")
        .format(&Rfc3339)
        .expect("deadline");

    let response = app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/assignments",
            Some(token),
            Some(json!({
                "subject_id": subject_id,
                "group_name": group_name,
                "title": title,
                "deadline": deadline,
                "max_score": 100
            })),
        ))
        .await
        .expect("create assignment");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    body["id"].as_str().expect("assignment id").to_string()
}

#[tokio::test]
async fn listing_totals_cover_only_the_callers_scope() {
    let ctx = test_support::setup_test_context().await;

    let teacher_a = test_support::insert_user(
        ctx.state.db(),
        "teach_scope_a",
        "Scope Teacher A",
        UserRole::Teacher,
        None,
        "teacher-pass",
    )
    .await;
    let teacher_b = test_support::insert_user(
        ctx.state.db(),
        "teach_scope_b",
        "Scope Teacher B",
        UserRole::Teacher,
        None,
        "teacher-pass",
    )
    .await;
    let student = test_support::insert_user(
        ctx.state.db(),
        "stud_scope",
        "Scope Student",
        UserRole::Student,
        Some("M3201"),
        "student-pass",
    )
    .await;
    let subject = test_support::insert_subject(ctx.state.db(), "Geometry").await;

    let token_a = test_support::bearer_token(&teacher_a.id, ctx.state.settings());
    let token_b = test_support::bearer_token(&teacher_b.id, ctx.state.settings());
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    create_assignment(ctx.app.clone(), &token_a, &subject.id, "M3201", "Triangles").await;
    create_assignment(ctx.app.clone(), &token_a, &subject.id, "M3201", "Circles").await;
    create_assignment(ctx.app.clone(), &token_b, &subject.id, "M3202", "Vectors").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/assignments",
            Some(&token_a),
            None,
        ))
        .await
        .expect("teacher listing");
    let status = response.status();
    let listed = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {listed}");
    assert_eq!(listed["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(listed["total_count"], 2);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/assignments",
            Some(&student_token),
            None,
        ))
        .await
        .expect("student listing");
    let status = response.status();
    let listed = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {listed}");
    assert_eq!(listed["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(listed["total_count"], 2);
}
