use schoolhub_models::audit::AuditEntry;
use schoolhub_models::users::UserProfile;
use serde::Serialize;
use utoipa::ToSchema;

/// Everything the caller may take away about their own account.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountExport {
    pub profile: UserProfile,
    pub activity: Vec<AuditEntry>,
}

impl AccountExport {
    pub fn file_name(&self) -> String {
        format!("{}_account_data.json", self.profile.username)
    }
}
