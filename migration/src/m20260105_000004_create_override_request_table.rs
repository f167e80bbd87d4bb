use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260105_000001_create_sim_user_table::SimUser;
use crate::m20260105_000002_create_booking_table::Booking;

static FK_OVERRIDE_BOOKING_ID: &str = "fk_override_request_booking_id";
static FK_OVERRIDE_REQUESTER_ID: &str = "fk_override_request_requester_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OverrideRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(OverrideRequest::Id))
                    .col(integer(OverrideRequest::BookingId))
                    .col(integer(OverrideRequest::RequesterId))
                    .col(string(OverrideRequest::Reason))
                    .col(string_len(OverrideRequest::Status, 16))
                    .col(string(OverrideRequest::Department))
                    .col(timestamp_with_time_zone(OverrideRequest::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_OVERRIDE_BOOKING_ID)
                    .from_tbl(OverrideRequest::Table)
                    .from_col(OverrideRequest::BookingId)
                    .to_tbl(Booking::Table)
                    .to_col(Booking::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_OVERRIDE_REQUESTER_ID)
                    .from_tbl(OverrideRequest::Table)
                    .from_col(OverrideRequest::RequesterId)
                    .to_tbl(SimUser::Table)
                    .to_col(SimUser::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_OVERRIDE_BOOKING_ID)
                    .table(OverrideRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_OVERRIDE_REQUESTER_ID)
                    .table(OverrideRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(OverrideRequest::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum OverrideRequest {
    Table,
    Id,
    BookingId,
    RequesterId,
    Reason,
    Status,
    Department,
    CreatedAt,
}
