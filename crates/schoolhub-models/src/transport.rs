use schoolhub_core::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_ROUTE_CAPACITY: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransportRoute {
    pub id: RecordId,
    pub route: String,
    pub driver: String,
    /// Names of the students riding this route.
    #[serde(default)]
    pub students: Vec<String>,
    pub capacity: u32,
}

impl TransportRoute {
    pub fn is_full(&self) -> bool {
        self.students.len() >= self.capacity as usize
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateRouteDto {
    #[validate(length(min = 1, max = 100, message = "Route name is required"))]
    pub route: String,
    #[validate(length(min = 1, max = 100, message = "Driver name is required"))]
    pub driver: String,
    #[validate(range(min = 1, max = 200, message = "Capacity must be between 1 and 200"))]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct AssignRouteStudentDto {
    pub student_id: RecordId,
}
