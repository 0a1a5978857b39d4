use chrono::NaiveDate;
use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_EVENT_TIME: &str = "09:00";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: RecordId,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 200, message = "Event title is required"))]
    pub title: String,
    pub date: NaiveDate,
    /// `HH:MM`, defaults to 09:00.
    #[validate(length(min = 4, max = 5, message = "Time must look like 09:00"))]
    pub time: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub description: Option<String>,
}
