use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::{RequestStatus, Role, UserStatus};

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sim_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string, excluded from every API payload.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub department: String,
    pub status: UserStatus,
    pub can_manage_users: bool,
    pub can_manage_bookings: bool,
    pub can_view_bookings: bool,
    pub can_view_reports: bool,
    #[sea_orm(nullable)]
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[sea_orm(nullable)]
    #[serde(skip_serializing)]
    pub reset_password_expires: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub requested_role: Option<Role>,
    #[sea_orm(nullable)]
    pub role_request_reason: Option<String>,
    #[sea_orm(nullable)]
    pub role_request_date: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub role_request_status: Option<RequestStatus>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::booking::Entity")]
    Booking,
    #[sea_orm(has_many = "super::booking_participant::Entity")]
    BookingParticipant,
    #[sea_orm(has_many = "super::override_request::Entity")]
    OverrideRequest,
    #[sea_orm(has_many = "super::reminder::Entity")]
    Reminder,
}

impl Related<super::booking_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookingParticipant.def()
    }
}

impl Related<super::override_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OverrideRequest.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        super::booking_participant::Relation::Booking.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::booking_participant::Relation::SimUser.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
