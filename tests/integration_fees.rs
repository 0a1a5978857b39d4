mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_payment_is_capped_at_outstanding_balance() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    // John Doe has paid 3000 of 5000.
    let (status, body) = app
        .json(
            "POST",
            "/api/fees/1/payments",
            Some(&token),
            Some(json!({ "amount": 2500.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"].as_f64(), Some(2000.0));
    assert_eq!(body["fees"]["paid"].as_f64(), Some(5000.0));
    assert_eq!(body["fees"]["pending"].as_f64(), Some(0.0));
    assert_eq!(body["fees"]["settled"], true);
}

#[tokio::test]
async fn test_non_positive_payment_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .json(
            "POST",
            "/api/fees/1/payments",
            Some(&token),
            Some(json!({ "amount": 0.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_payment_for_unknown_student() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .json(
            "POST",
            "/api/fees/404/payments",
            Some(&token),
            Some(json!({ "amount": 10.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_parent_pays_own_child() {
    let app = TestApp::new().await;
    app.register(
        "parent",
        "doe",
        json!({ "child_name": "Tim Doe", "child_class": "11A" }),
    )
    .await;
    let token = app.login("parent", "doe").await;

    let (status, body) = app
        .json("POST", "/api/fees/pay", Some(&token), Some(json!({ "amount": 1000.0 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fees"]["name"], "Tim Doe");
    assert_eq!(body["applied"].as_f64(), Some(1000.0));

    // Parents only see their own child in the summary.
    let (status, body) = app.json("GET", "/api/fees", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["students"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Tim Doe");
}

#[tokio::test]
async fn test_parent_without_child_cannot_pay() {
    let app = TestApp::new().await;
    app.register("parent", "lonely", json!({})).await;
    let token = app.login("parent", "lonely").await;

    let (status, _) = app
        .json("POST", "/api/fees/pay", Some(&token), Some(json!({ "amount": 10.0 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
