use axum::http::{Method, StatusCode};
use base64::Engine;
use serde_json::json;
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

fn assignment_payload(subject_id: &str, group_name: &str) -> serde_json::Value {
    let deadline = (OffsetDateTime::now_utc() + Duration::hours(2))
        .replace_nanosecond(0)
        .expect("nanoseconds")
        .format(&Rfc3339)
        .expect("deadline");

    json!({
        "subject_id": subject_id,
        "group_name": group_name,
        "title": "Linear equations homework",
        "description": "Solve the full problem set",
        "deadline": deadline,
        "max_score": 100
    })
}

async fn create_assignment(
    app: axum::Router,
    token: &str,
    payload: serde_json::Value,
) -> String {
    let response = app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/assignments",
            Some(token),
            Some(payload),
        ))
        .await
        .expect("create assignment");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    body["id"].as_str().expect("assignment id").to_string()
}

#[tokio::test]
async fn duplicate_submission_is_rejected_with_conflict() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_user(
        ctx.state.db(),
        "teach_ivanova",
        "Anna Ivanova",
        UserRole::Teacher,
        None,
        "teacher-pass",
    )
    .await;
    let student = test_support::insert_user(
        ctx.state.db(),
        "stud_petrov",
        "Boris Petrov",
        UserRole::Student,
        Some("M3101"),
        "student-pass",
    )
    .await;
    let subject = test_support::insert_subject(ctx.state.db(), "Algebra").await;

    let teacher_token = test_support::bearer_token(&teacher.id, ctx.state.settings());
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    let assignment_id = create_assignment(
        ctx.app.clone(),
        &teacher_token,
        assignment_payload(&subject.id, "M3101"),
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/assignments/{assignment_id}"),
            Some(&student_token),
            Some(json!({"solution_text": "x = 4"})),
        ))
        .await
        .expect("first submit");
    let status = response.status();
    let first = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {first}");
    assert_eq!(first["solution_text"], "x = 4");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/assignments/{assignment_id}"),
            Some(&student_token),
            Some(json!({"solution_text": "second attempt"})),
        ))
        .await
        .expect("second submit");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");

    // The first submission is untouched by the rejected resubmit.
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/submissions/my",
            Some(&student_token),
            None,
        ))
        .await
        .expect("list own submissions");
    let status = response.status();
    let mine = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {mine}");
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    assert_eq!(mine[0]["solution_text"], "x = 4");
}

#[tokio::test]
async fn grading_is_reserved_to_the_owning_teacher() {
    let ctx = test_support::setup_test_context().await;

    let owner = test_support::insert_user(
        ctx.state.db(),
        "teach_owner",
        "Owner Teacher",
        UserRole::Teacher,
        None,
        "teacher-pass",
    )
    .await;
    let outsider = test_support::insert_user(
        ctx.state.db(),
        "teach_other",
        "Other Teacher",
        UserRole::Teacher,
        None,
        "teacher-pass",
    )
    .await;
    let student = test_support::insert_user(
        ctx.state.db(),
        "stud_sidorov",
        "Vera Sidorova",
        UserRole::Student,
        Some("M3102"),
        "student-pass",
    )
    .await;
    let subject = test_support::insert_subject(ctx.state.db(), "Physics").await;

    let owner_token = test_support::bearer_token(&owner.id, ctx.state.settings());
    let outsider_token = test_support::bearer_token(&outsider.id, ctx.state.settings());
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    let assignment_id = create_assignment(
        ctx.app.clone(),
        &owner_token,
        assignment_payload(&subject.id, "M3102"),
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/assignments/{assignment_id}"),
            Some(&student_token),
            Some(json!({"solution_text": "F = ma"})),
        ))
        .await
        .expect("submit");
    let status = response.status();
    let submission = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {submission}");
    let submission_id = submission["id"].as_str().expect("submission id");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/{submission_id}/grade"),
            Some(&outsider_token),
            Some(json!({"score": 90, "feedback": "not my call"})),
        ))
        .await
        .expect("foreign grade");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");

    // The rejected attempt left no trace on the submission.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/submissions/{submission_id}"),
            Some(&owner_token),
            None,
        ))
        .await
        .expect("fetch submission");
    let status = response.status();
    let fetched = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {fetched}");
    assert!(fetched["score"].is_null());
    assert!(fetched["graded_at"].is_null());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/submissions/{submission_id}/grade"),
            Some(&owner_token),
            Some(json!({"score": 85, "feedback": "Well reasoned"})),
        ))
        .await
        .expect("owner grade");
    let status = response.status();
    let graded = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {graded}");
    assert_eq!(graded["score"], 85);
    assert_eq!(graded["feedback"], "Well reasoned");
    assert!(!graded["graded_at"].is_null());
}

#[tokio::test]
async fn deleting_assignment_removes_stored_attachments() {
    let ctx = test_support::setup_test_context().await;

    let teacher = test_support::insert_user(
        ctx.state.db(),
        "teach_files",
        "Files Teacher",
        UserRole::Teacher,
        None,
        "teacher-pass",
    )
    .await;
    let subject = test_support::insert_subject(ctx.state.db(), "Chemistry").await;
    let teacher_token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    let mut payload = assignment_payload(&subject.id, "M3103");
    payload["attachments"] = json!([{
        "filename": "notes.pdf",
        "content_base64": base64::engine::general_purpose::STANDARD.encode(b"lecture notes"),
    }]);
    let assignment_id = create_assignment(ctx.app.clone(), &teacher_token, payload).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/assignments/{assignment_id}"),
            Some(&teacher_token),
            None,
        ))
        .await
        .expect("assignment detail");
    let status = response.status();
    let detail = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {detail}");
    let key = detail["files"][0]["file_path"].as_str().expect("file key").to_string();
    assert!(ctx.state.storage().exists(&key).await);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/assignments/{assignment_id}"),
            Some(&teacher_token),
            None,
        ))
        .await
        .expect("delete assignment");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(!ctx.state.storage().exists(&key).await);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/assignments/{assignment_id}"),
            Some(&teacher_token),
            None,
        ))
        .await
        .expect("fetch deleted assignment");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
