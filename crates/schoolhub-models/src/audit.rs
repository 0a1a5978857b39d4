use chrono::{DateTime, Utc};
use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const LOCAL_IP: &str = "localhost";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    /// Username of the actor, "system" for background work.
    pub user: String,
    pub action: String,
    pub details: String,
    #[serde(default = "local_ip")]
    pub ip: String,
}

fn local_ip() -> String {
    LOCAL_IP.to_string()
}
