use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260105_000001_create_sim_user_table::SimUser;
use crate::m20260105_000002_create_booking_table::Booking;

static FK_REMINDER_BOOKING_ID: &str = "fk_reminder_booking_id";
static FK_REMINDER_USER_ID: &str = "fk_reminder_user_id";
static IDX_REMINDER_DUE: &str = "idx_reminder_due";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reminder::Table)
                    .if_not_exists()
                    .col(pk_auto(Reminder::Id))
                    .col(integer(Reminder::BookingId))
                    .col(integer(Reminder::UserId))
                    .col(timestamp_with_time_zone(Reminder::FireAt))
                    .col(boolean(Reminder::Delivered).default(false))
                    .col(timestamp_with_time_zone(Reminder::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REMINDER_BOOKING_ID)
                    .from_tbl(Reminder::Table)
                    .from_col(Reminder::BookingId)
                    .to_tbl(Booking::Table)
                    .to_col(Booking::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REMINDER_USER_ID)
                    .from_tbl(Reminder::Table)
                    .from_col(Reminder::UserId)
                    .to_tbl(SimUser::Table)
                    .to_col(SimUser::Id)
                    .to_owned(),
            )
            .await?;

        // The dispatch poll scans for undelivered rows that are due
        manager
            .create_index(
                Index::create()
                    .name(IDX_REMINDER_DUE)
                    .table(Reminder::Table)
                    .col(Reminder::Delivered)
                    .col(Reminder::FireAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_REMINDER_BOOKING_ID)
                    .table(Reminder::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_REMINDER_USER_ID)
                    .table(Reminder::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Reminder::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Reminder {
    Table,
    Id,
    BookingId,
    UserId,
    FireAt,
    Delivered,
    CreatedAt,
}
