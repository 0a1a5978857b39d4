#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use schoolhub::router::init_router;
use schoolhub::schoolhub_config::AppConfig;
use schoolhub::schoolhub_store::SchoolStore;
use schoolhub::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const PASSWORD: &str = "Secret123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = SchoolStore::in_memory().await.unwrap();
        let mut config = AppConfig::default();
        config.sync.enabled = false;
        let state = AppState::new(store, config, None);
        Self {
            router: init_router(state.clone()),
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(json_request(method, uri, token, body)).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Register an account; parents also get `extra` merged in.
    pub async fn register(&self, role: &str, username: &str, extra: Value) -> (StatusCode, Value) {
        let mut body = json!({
            "role": role,
            "name": format!("{} Test", username),
            "email": format!("{}@example.com", username),
            "username": username,
            "password": PASSWORD,
            "confirm_password": PASSWORD,
        });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                body.insert(key.clone(), value.clone());
            }
        }
        self.json("POST", "/api/auth/register", None, Some(body)).await
    }

    pub async fn login(&self, role: &str, username: &str) -> String {
        let (status, body) = self
            .json(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "role": role, "username": username, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        let code = self.state.config.registration.admin_code.clone();
        let (status, _) = self.register("admin", "principal", json!({ "admin_code": code })).await;
        assert_eq!(status, StatusCode::CREATED);
        self.login("admin", "principal").await
    }

    pub async fn teacher_token(&self) -> String {
        let (status, _) = self.register("teacher", "wilson", json!({})).await;
        assert_eq!(status, StatusCode::CREATED);
        self.login("teacher", "wilson").await
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
