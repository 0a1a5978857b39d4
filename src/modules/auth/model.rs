use chrono::{DateTime, Utc};
use schoolhub_models::users::UserProfile;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Session token; also set as the session cookie.
    pub token: String,
    pub user: UserProfile,
    pub expires_at: DateTime<Utc>,
    /// Dashboard page for the signed-in role.
    pub redirect: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
