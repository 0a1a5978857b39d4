use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use schoolhub_auth::SessionStatus;
use schoolhub_core::{AppError, ErrorResponse};
use schoolhub_models::users::{LoginRequest, RegisterRequestDto, UserProfile};
use tracing::instrument;

use super::model::{LoginResponse, MessageResponse};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "Account created", body = UserProfile),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 403, description = "Invalid admin code", body = ErrorResponse),
        (status = 409, description = "Username already registered for this role", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let user = AuthService::register(&state.store, &state.config.registration, dto).await?;
    Ok((StatusCode::CREATED, Json(user.profile())))
}

/// Sign in with role, username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let (session, user) = AuthService::login(&state.store, &state.sessions, dto).await?;
    state.persist_sessions().await;

    let cookie = Cookie::build((state.config.session.cookie_name.clone(), session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    let response = LoginResponse {
        expires_at: session.expires_at(state.sessions.timeout()),
        token: session.token,
        user: user.profile(),
        redirect: "/app/dashboard".to_string(),
    };
    Ok((jar.add(cookie), Json(response)))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, jar))]
pub async fn logout_user(
    State(state): State<AppState>,
    jar: CookieJar,
    user: AuthUser,
) -> Result<(CookieJar, Json<serde_json::Value>), AppError> {
    AuthService::logout(&state.store, &state.sessions, user.token()).await?;
    state.persist_sessions().await;

    let cookie = Cookie::build((state.config.session.cookie_name.clone(), "")).path("/");
    Ok((
        jar.remove(cookie),
        Json(serde_json::json!({
            "message": "Logged out successfully",
            "redirect": "/login"
        })),
    ))
}

/// Remaining session lifetime. Does not count as activity.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session status", body = SessionStatus),
        (status = 401, description = "No live session", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn session_status(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<SessionStatus>, AppError> {
    let token = crate::middleware::auth::session_token(&headers, &state.config.session.cookie_name)
        .ok_or_else(|| AppError::unauthorized("Please log in to continue"))?;
    let status = state
        .sessions
        .status(&token)
        .ok_or_else(|| AppError::unauthorized("Session expired. Please log in again."))?;
    Ok(Json(status))
}

/// Restart the session's inactivity timer
#[utoipa::path(
    post,
    path = "/api/auth/session/extend",
    responses(
        (status = 200, description = "Session extended", body = SessionStatus),
        (status = 401, description = "No live session", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, user), fields(username = %user.username()))]
pub async fn extend_session(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SessionStatus>, AppError> {
    state
        .sessions
        .extend(user.token())
        .ok_or_else(|| AppError::unauthorized("Session expired. Please log in again."))?;
    state.persist_sessions().await;

    let status = state
        .sessions
        .status(user.token())
        .ok_or_else(|| AppError::unauthorized("Session expired. Please log in again."))?;
    Ok(Json(status))
}
