mod common;

use axum::http::StatusCode;
use common::{PASSWORD, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_register_and_login_teacher() {
    let app = TestApp::new().await;

    let (status, body) = app.register("teacher", "wilson", json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "wilson");
    assert_eq!(body["role"], "teacher");
    assert!(body.get("password").is_none());

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "role": "teacher", "username": "wilson", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["redirect"], "/app/dashboard");
}

#[tokio::test]
async fn test_duplicate_username_and_role_conflicts() {
    let app = TestApp::new().await;
    app.register("teacher", "wilson", json!({})).await;

    let (status, _) = app.register("teacher", "wilson", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Same username under another role is a separate account.
    let (status, _) = app.register("parent", "wilson", json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_with_wrong_role_is_rejected() {
    let app = TestApp::new().await;
    app.register("teacher", "wilson", json!({})).await;

    let (status, body) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "role": "parent", "username": "wilson", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("Invalid credentials"));
}

#[tokio::test]
async fn test_login_with_wrong_password_is_rejected() {
    let app = TestApp::new().await;
    app.register("teacher", "wilson", json!({})).await;

    let (status, _) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "role": "teacher", "username": "wilson", "password": "Wrong1234" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_registration_needs_code() {
    let app = TestApp::new().await;

    let (status, _) = app.register("admin", "principal", json!({ "admin_code": "guess" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let code = app.state.config.registration.admin_code.clone();
    let (status, _) = app.register("admin", "principal", json!({ "admin_code": code })).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_weak_password_is_unprocessable() {
    let app = TestApp::new().await;
    let (status, _) = app
        .json(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "role": "teacher",
                "name": "Weak",
                "email": "weak@example.com",
                "username": "weak",
                "password": "short",
                "confirm_password": "short",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_parent_registration_links_child() {
    let app = TestApp::new().await;
    let (status, _) = app
        .register(
            "parent",
            "doe",
            json!({ "child_name": "Tim Doe", "child_class": "11A" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let child = app
        .state
        .store
        .read(|s| s.data.students.iter().find(|st| st.name == "Tim Doe").cloned())
        .await
        .unwrap();
    assert_eq!(child.class_name, "11A");
    assert_eq!(child.parent.as_deref(), Some("doe Test"));
    assert_eq!(child.attendance, 100);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new().await;
    let token = app.teacher_token().await;

    let (status, _) = app.json("GET", "/api/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.json("POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.json("GET", "/api/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_plain_stored_password_is_upgraded_on_login() {
    use chrono::Utc;
    use schoolhub::schoolhub_core::{is_password_digest, verify_password};
    use schoolhub::schoolhub_models::{Role, User};
    use schoolhub::schoolhub_store::StoreError;

    let app = TestApp::new().await;
    app.state
        .store
        .mutate(|tx| {
            let id = tx.next_id();
            tx.users.push(User {
                id,
                role: Role::Teacher,
                name: "Mr. Brown".to_string(),
                email: "brown@school.com".to_string(),
                username: "brown".to_string(),
                password: PASSWORD.to_string(),
                phone: String::new(),
                address: String::new(),
                registered_date: Utc::now(),
                child_name: None,
                child_class: None,
            });
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap();

    let (status, _) = app
        .json(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "role": "teacher", "username": "brown", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.login("teacher", "brown").await;

    let stored = app
        .state
        .store
        .read(|s| s.user("brown", Role::Teacher).map(|u| u.password.clone()))
        .await
        .unwrap();
    assert!(is_password_digest(&stored));
    assert!(verify_password(PASSWORD, &stored));

    // Still works against the digest.
    app.login("teacher", "brown").await;
}
