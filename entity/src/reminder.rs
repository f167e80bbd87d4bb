use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Durable pre-session reminder. Rows survive restarts; the dispatch poll
/// sends due rows and flips `delivered` so each fires at most once.
#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reminder")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub booking_id: i32,
    pub user_id: i32,
    pub fire_at: DateTimeUtc,
    pub delivered: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
    #[sea_orm(
        belongs_to = "super::sim_user::Entity",
        from = "Column::UserId",
        to = "super::sim_user::Column::Id"
    )]
    SimUser,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::sim_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SimUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
