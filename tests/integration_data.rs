mod common;

use axum::http::{StatusCode, header};
use common::{TestApp, body_json, json_request};
use schoolhub::schoolhub_models::students::Student;
use serde_json::json;

#[tokio::test]
async fn test_export_is_a_json_attachment() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .send(json_request("GET", "/api/data/export/students", Some(&token), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"students_export.json\""
    );

    let body = body_json(response).await;
    let exported: Vec<Student> = serde_json::from_value(body).unwrap();
    let stored = app.state.store.read(|s| s.data.students.clone()).await;
    assert_eq!(exported, stored);

    let audited = app
        .state
        .store
        .read(|s| s.audit_log.iter().any(|e| e.action == "export_data"))
        .await;
    assert!(audited);
}

#[tokio::test]
async fn test_export_unknown_collection() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (status, _) = app.json("GET", "/api/data/export/grades", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_parent_export_is_scoped_to_own_child() {
    let app = TestApp::new().await;
    app.register(
        "parent",
        "doe",
        json!({ "child_name": "Tim Doe", "child_class": "11A" }),
    )
    .await;
    let token = app.login("parent", "doe").await;

    let (status, body) = app.json("GET", "/api/data/export/students", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let students = body.as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["name"], "Tim Doe");
}

#[tokio::test]
async fn test_backup_is_admin_only() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token().await;
    let (status, _) = app.json("GET", "/api/data/backup", Some(&teacher), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    let response = app
        .send(json_request("GET", "/api/data/backup", Some(&admin), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("schoolhub_backup_"));
    let bundle = body_json(response).await;
    assert_eq!(bundle["data"]["students"].as_array().map(Vec::len), Some(2));
    assert_eq!(bundle["users"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_restore_replaces_data() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (_, bundle) = app.json("GET", "/api/data/backup", Some(&token), None).await;
    app.json("DELETE", "/api/students/1", Some(&token), None).await;
    assert_eq!(app.state.store.read(|s| s.data.students.len()).await, 1);

    let (status, _) = app.json("POST", "/api/data/restore", Some(&token), Some(bundle)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.state.store.read(|s| s.data.students.len()).await, 2);
}

#[tokio::test]
async fn test_undo_and_redo_delete() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    app.json("DELETE", "/api/students/2", Some(&token), None).await;

    let (status, body) = app.json("POST", "/api/data/undo", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);
    assert!(app.state.store.read(|s| s.data.student(2).is_some()).await);

    let (_, body) = app.json("POST", "/api/data/redo", Some(&token), None).await;
    assert_eq!(body["changed"], true);
    assert!(app.state.store.read(|s| s.data.student(2).is_none()).await);

    let (_, body) = app.json("POST", "/api/data/redo", Some(&token), None).await;
    assert_eq!(body["changed"], false);
}

#[tokio::test]
async fn test_messages_between_accounts() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token().await;
    app.register("parent", "doe", json!({})).await;
    let parent = app.login("parent", "doe").await;

    let (status, sent) = app
        .json(
            "POST",
            "/api/messages",
            Some(&teacher),
            Some(json!({ "to": "doe", "content": "Tim did well today" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sent["subject"], "Chat Message");

    let (status, thread) = app
        .json("GET", "/api/messages/conversations/wilson", Some(&parent), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let thread = thread.as_array().unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0]["read"], true);

    let (status, _) = app
        .json(
            "POST",
            "/api/messages",
            Some(&teacher),
            Some(json!({ "to": "nobody", "content": "hello" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
