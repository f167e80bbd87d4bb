use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use entity::sea_orm_active_enums::{RequestStatus, Role};

#[derive(Deserialize, ToSchema)]
pub struct AddEmployeeDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
}

/// Role-change request formatted for the manager dashboard
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequestDto {
    /// ID of the employee the request belongs to
    pub id: i32,
    pub employee: String,
    #[schema(value_type = String)]
    pub current_role: Role,
    #[schema(value_type = String)]
    pub requested_role: Role,
    pub reason: Option<String>,
    pub request_date: Option<DateTime<Utc>>,
    #[schema(value_type = String)]
    pub status: RequestStatus,
}
