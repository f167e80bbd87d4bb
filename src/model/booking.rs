use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use entity::sea_orm_active_enums::{BookingStatus, Priority, Simulator};

use crate::model::user::UserRefDto;

/// Booking payload with creator and participants resolved
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[schema(value_type = String)]
    pub simulator: Simulator,
    #[schema(value_type = String)]
    pub status: BookingStatus,
    #[schema(value_type = String)]
    pub priority: Priority,
    pub created_by: UserRefDto,
    pub participants: Vec<UserRefDto>,
    pub department: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingDto {
    pub fn from_parts(
        booking: entity::booking::Model,
        creator: &entity::sim_user::Model,
        participants: &[entity::sim_user::Model],
    ) -> Self {
        Self {
            id: booking.id,
            title: booking.title,
            description: booking.description,
            start_time: booking.start_time,
            end_time: booking.end_time,
            simulator: booking.simulator,
            status: booking.status,
            priority: booking.priority,
            created_by: UserRefDto::from(creator),
            participants: participants.iter().map(UserRefDto::from).collect(),
            department: booking.department,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Booking creation input. Enum-valued fields arrive as plain strings and
/// are validated in the service so failures map to 400 with a message
/// rather than a body-rejection. Any supplied `status` is ignored; new
/// bookings always start out `scheduled`.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub simulator: Option<String>,
    pub priority: Option<String>,
    pub participants: Option<Vec<i32>>,
    pub department: Option<String>,
}

/// Partial booking update; absent fields are left untouched.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub simulator: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub participants: Option<Vec<i32>>,
    pub department: Option<String>,
}

/// Query filters for the booking list. Date bounds are inclusive:
/// `start_date` on start times, `end_date` on end times.
#[derive(Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilterParams {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub simulator: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
}
