use sea_orm_migration::{prelude::*, schema::*};

static IDX_SIM_USER_EMAIL: &str = "idx_sim_user_email";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SimUser::Table)
                    .if_not_exists()
                    .col(pk_auto(SimUser::Id))
                    .col(string(SimUser::Name))
                    .col(string_uniq(SimUser::Email))
                    .col(string(SimUser::PasswordHash))
                    .col(string_len(SimUser::Role, 16))
                    .col(string(SimUser::Department))
                    .col(string_len(SimUser::Status, 16))
                    .col(boolean(SimUser::CanManageUsers))
                    .col(boolean(SimUser::CanManageBookings))
                    .col(boolean(SimUser::CanViewBookings))
                    .col(boolean(SimUser::CanViewReports))
                    .col(string_null(SimUser::ResetPasswordToken))
                    .col(timestamp_with_time_zone_null(SimUser::ResetPasswordExpires))
                    .col(string_len_null(SimUser::RequestedRole, 16))
                    .col(string_null(SimUser::RoleRequestReason))
                    .col(timestamp_with_time_zone_null(SimUser::RoleRequestDate))
                    .col(string_len_null(SimUser::RoleRequestStatus, 16))
                    .col(timestamp_with_time_zone(SimUser::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SIM_USER_EMAIL)
                    .table(SimUser::Table)
                    .col(SimUser::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SimUser::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum SimUser {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    Department,
    Status,
    CanManageUsers,
    CanManageBookings,
    CanViewBookings,
    CanViewReports,
    ResetPasswordToken,
    ResetPasswordExpires,
    RequestedRole,
    RoleRequestReason,
    RoleRequestDate,
    RoleRequestStatus,
    CreatedAt,
}
