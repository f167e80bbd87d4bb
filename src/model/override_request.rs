use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use entity::sea_orm_active_enums::{RequestStatus, Simulator};

use crate::model::user::UserRefDto;

#[derive(Deserialize, ToSchema)]
pub struct CreateOverrideDto {
    pub reason: Option<String>,
}

/// Condensed booking fields carried on a resolved override request
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummaryDto {
    pub id: i32,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[schema(value_type = String)]
    pub simulator: Simulator,
}

impl From<&entity::booking::Model> for BookingSummaryDto {
    fn from(booking: &entity::booking::Model) -> Self {
        Self {
            id: booking.id,
            title: booking.title.clone(),
            start_time: booking.start_time,
            end_time: booking.end_time,
            simulator: booking.simulator,
        }
    }
}

/// Pending override request with booking and requester resolved
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequestDto {
    pub id: i32,
    pub booking: BookingSummaryDto,
    pub requester: UserRefDto,
    pub reason: String,
    #[schema(value_type = String)]
    pub status: RequestStatus,
    pub department: String,
    pub created_at: DateTime<Utc>,
}
