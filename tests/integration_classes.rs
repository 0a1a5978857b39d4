mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_class_name_with_path_characters_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    for name in ["5/6", "10A?", "10#B", "100%"] {
        let (status, _) = app
            .json("POST", "/api/classes", Some(&token), Some(json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", name);
    }

    let classes = app.state.store.read(|s| s.data.classes.clone()).await;
    assert_eq!(classes, vec!["10A", "10B", "11A"]);
}

#[tokio::test]
async fn test_class_with_spaces_is_created_and_deleted() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .json("POST", "/api/classes", Some(&token), Some(json!({ "name": "Year 5 & 6" })))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["name"], "Year 5 & 6");

    let (status, _) = app
        .json("DELETE", "/api/classes/Year%205%20%26%206", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let classes = app.state.store.read(|s| s.data.classes.clone()).await;
    assert!(!classes.iter().any(|c| c == "Year 5 & 6"));

    let (status, _) = app
        .json("DELETE", "/api/classes/Year%205%20%26%206", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_teacher_cannot_create_class() {
    let app = TestApp::new().await;
    let token = app.teacher_token().await;

    let (status, _) = app
        .json("POST", "/api/classes", Some(&token), Some(json!({ "name": "12C" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
