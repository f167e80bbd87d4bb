use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260105_000001_create_sim_user_table::SimUser;

static FK_BOOKING_CREATED_BY: &str = "fk_booking_created_by";
static IDX_BOOKING_SCHEDULE: &str = "idx_booking_schedule";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(pk_auto(Booking::Id))
                    .col(string(Booking::Title))
                    .col(string_null(Booking::Description))
                    .col(timestamp_with_time_zone(Booking::StartTime))
                    .col(timestamp_with_time_zone(Booking::EndTime))
                    .col(string_len(Booking::Simulator, 8))
                    .col(string_len(Booking::Status, 16))
                    .col(string_len(Booking::Priority, 4))
                    .col(integer(Booking::CreatedBy))
                    .col(string(Booking::Department))
                    .col(timestamp_with_time_zone(Booking::CreatedAt))
                    .col(timestamp_with_time_zone(Booking::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_BOOKING_CREATED_BY)
                    .from_tbl(Booking::Table)
                    .from_col(Booking::CreatedBy)
                    .to_tbl(SimUser::Table)
                    .to_col(SimUser::Id)
                    .to_owned(),
            )
            .await?;

        // Conflict detection filters on simulator and the time window
        manager
            .create_index(
                Index::create()
                    .name(IDX_BOOKING_SCHEDULE)
                    .table(Booking::Table)
                    .col(Booking::Simulator)
                    .col(Booking::StartTime)
                    .col(Booking::EndTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_BOOKING_CREATED_BY)
                    .table(Booking::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    Title,
    Description,
    StartTime,
    EndTime,
    Simulator,
    Status,
    Priority,
    CreatedBy,
    Department,
    CreatedAt,
    UpdatedAt,
}
