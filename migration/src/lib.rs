pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_sim_user_table;
mod m20260105_000002_create_booking_table;
mod m20260105_000003_create_booking_participant_table;
mod m20260105_000004_create_override_request_table;
mod m20260105_000005_create_reminder_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_sim_user_table::Migration),
            Box::new(m20260105_000002_create_booking_table::Migration),
            Box::new(m20260105_000003_create_booking_participant_table::Migration),
            Box::new(m20260105_000004_create_override_request_table::Migration),
            Box::new(m20260105_000005_create_reminder_table::Migration),
        ]
    }
}
