use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use schoolhub_auth::Session;
use schoolhub_core::AppError;
use schoolhub_models::Role;

use crate::state::AppState;

/// Session token from the bearer header, falling back to the cookie.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// The signed-in user behind a request. Resolving counts as activity.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Session);

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.0.username
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn token(&self) -> &str {
        &self.0.token
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == Role::Admin
    }
}

async fn resolve_session(parts: &Parts, state: &AppState) -> Result<Session, AppError> {
    let token = session_token(&parts.headers, &state.config.session.cookie_name)
        .ok_or_else(|| AppError::unauthorized("Please log in to continue"))?;

    state
        .sessions
        .resolve(&token)
        .ok_or_else(|| AppError::unauthorized("Session expired. Please log in again."))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_session(parts, state).await.map(AuthUser)
    }
}

/// Like [`AuthUser`] but for HTML pages: without a session the browser is
/// sent to the login page instead of receiving a JSON error.
#[derive(Debug, Clone)]
pub struct PageUser(pub Session);

pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl FromRequestParts<AppState> for PageUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_session(parts, state)
            .await
            .map(PageUser)
            .map_err(|_| LoginRedirect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("schoolhub_session=xyz"));
        assert_eq!(session_token(&headers, "schoolhub_session").as_deref(), Some("abc"));
    }

    #[test]
    fn test_cookie_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; schoolhub_session=xyz"),
        );
        assert_eq!(session_token(&headers, "schoolhub_session").as_deref(), Some("xyz"));
        assert_eq!(session_token(&headers, "other"), None);
    }

    #[test]
    fn test_malformed_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(session_token(&headers, "schoolhub_session"), None);
    }
}
