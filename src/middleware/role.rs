//! Role checks, as route layers and as extractors.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use schoolhub_core::AppError;
use schoolhub_models::Role;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn ensure_role(user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role()) {
        return Ok(());
    }
    let names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
    Err(AppError::forbidden(format!(
        "Access denied. Required role: {}",
        names.join(" or ")
    )))
}

/// Let the request through only when the session's role is in `allowed`.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &state).await?;
    ensure_role(&user, allowed)?;

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Route layer for admin-only routers.
///
/// ```rust,ignore
/// router.route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin, Role::Teacher]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Declare an extractor that wraps [`AuthUser`] and rejects other roles.
macro_rules! require_role {
    ($name:ident, [$($role:expr),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                ensure_role(&user, &[$($role),+])?;
                Ok($name(user))
            }
        }
    };
}

require_role!(RequireAdmin, [Role::Admin]);
require_role!(RequireStaff, [Role::Admin, Role::Teacher]);
require_role!(RequireParent, [Role::Parent]);
