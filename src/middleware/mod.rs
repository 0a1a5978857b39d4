//! Request extractors and middleware for sessions and roles.
//!
//! - [`auth`]: resolves the session token into an [`auth::AuthUser`]
//! - [`role`]: role-restricted extractors and route layers
//!
//! A session token is accepted from an `Authorization: Bearer <token>`
//! header or from the session cookie set at login, so the same handlers
//! serve API clients and the browser pages.
//!
//! ```ignore
//! use crate::middleware::role::RequireAdmin;
//!
//! async fn delete_teacher(RequireAdmin(user): RequireAdmin) -> impl IntoResponse {
//!     // only admins reach this point
//! }
//! ```

pub mod auth;
pub mod role;
