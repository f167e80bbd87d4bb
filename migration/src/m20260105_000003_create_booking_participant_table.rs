use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260105_000001_create_sim_user_table::SimUser;
use crate::m20260105_000002_create_booking_table::Booking;

static FK_PARTICIPANT_BOOKING_ID: &str = "fk_booking_participant_booking_id";
static FK_PARTICIPANT_USER_ID: &str = "fk_booking_participant_user_id";
static IDX_PARTICIPANT_UNIQUE: &str = "idx_booking_participant_unique";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookingParticipant::Table)
                    .if_not_exists()
                    .col(pk_auto(BookingParticipant::Id))
                    .col(integer(BookingParticipant::BookingId))
                    .col(integer(BookingParticipant::UserId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PARTICIPANT_BOOKING_ID)
                    .from_tbl(BookingParticipant::Table)
                    .from_col(BookingParticipant::BookingId)
                    .to_tbl(Booking::Table)
                    .to_col(Booking::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PARTICIPANT_USER_ID)
                    .from_tbl(BookingParticipant::Table)
                    .from_col(BookingParticipant::UserId)
                    .to_tbl(SimUser::Table)
                    .to_col(SimUser::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PARTICIPANT_UNIQUE)
                    .table(BookingParticipant::Table)
                    .col(BookingParticipant::BookingId)
                    .col(BookingParticipant::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PARTICIPANT_BOOKING_ID)
                    .table(BookingParticipant::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PARTICIPANT_USER_ID)
                    .table(BookingParticipant::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(BookingParticipant::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum BookingParticipant {
    Table,
    Id,
    BookingId,
    UserId,
}
