use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::{BookingStatus, Priority, Simulator};

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    pub simulator: Simulator,
    pub status: BookingStatus,
    pub priority: Priority,
    pub created_by: i32,
    pub department: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sim_user::Entity",
        from = "Column::CreatedBy",
        to = "super::sim_user::Column::Id"
    )]
    SimUser,
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

impl Related<super::reminder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reminder.def()
    }
}

impl Related<super::sim_user::Entity> for Entity {
    fn to() -> RelationDef {
        super::booking_participant::Relation::SimUser.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::booking_participant::Relation::Booking.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
