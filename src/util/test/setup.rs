use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ActiveValue, ConnectionTrait, Database, DatabaseConnection,
    DbBackend, DbErr, IntoActiveModel, Schema,
};

use entity::sea_orm_active_enums::{BookingStatus, Priority, Role, Simulator};
use entity::{booking, sim_user};

use crate::{
    data::{
        booking::{BookingRepository, NewBooking},
        user::{NewUser, UserRepository},
    },
    model::app::{AppState, AuthKeys},
    model::user::Permissions,
    util::test::notifier::RecordingNotifier,
};

pub struct TestSetup {
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
}

/// Returns an [`AppState`] over an in-memory database plus the recording
/// notifier backing it, used across service tests
pub async fn test_setup() -> TestSetup {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    let notifier = Arc::new(RecordingNotifier::default());

    let state = AppState {
        db,
        notifier: notifier.clone(),
        auth_keys: AuthKeys::from_secret(b"test-secret"),
        frontend_url: "http://localhost:3000".to_string(),
        reminder_lead_minutes: 60,
    };

    TestSetup { state, notifier }
}

/// Creates every table the tests touch
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(DbBackend::Sqlite);

    db.execute(&schema.create_table_from_entity(entity::prelude::SimUser))
        .await?;
    db.execute(&schema.create_table_from_entity(entity::prelude::Booking))
        .await?;
    db.execute(&schema.create_table_from_entity(entity::prelude::BookingParticipant))
        .await?;
    db.execute(&schema.create_table_from_entity(entity::prelude::OverrideRequest))
        .await?;
    db.execute(&schema.create_table_from_entity(entity::prelude::Reminder))
        .await?;

    Ok(())
}

/// Inserts a user with flags derived from the role. The password hash is
/// a placeholder; tests exercising login go through registration instead.
pub async fn create_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    role: &str,
    department: &str,
) -> Result<sim_user::Model, DbErr> {
    let role = Role::try_from_value(&role.to_string()).unwrap();

    UserRepository::new(db)
        .create(
            NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: "unverifiable-placeholder".to_string(),
                role,
                department: department.to_string(),
            },
            Permissions::for_role(role),
        )
        .await
}

/// Inserts a scheduled booking with start/end offset in minutes from now
pub async fn create_booking(
    db: &DatabaseConnection,
    created_by: i32,
    simulator: Simulator,
    start_offset_minutes: i64,
    end_offset_minutes: i64,
) -> Result<booking::Model, DbErr> {
    let now = Utc::now();

    BookingRepository::new(db)
        .create(NewBooking {
            title: "Test session".to_string(),
            description: None,
            start_time: now + Duration::minutes(start_offset_minutes),
            end_time: now + Duration::minutes(end_offset_minutes),
            simulator,
            priority: Priority::P4,
            created_by,
            department: "Ops".to_string(),
        })
        .await
}

/// Forces a booking into a status, bypassing the transition rules, for
/// arranging test fixtures
pub async fn set_booking_status(
    db: &DatabaseConnection,
    booking: booking::Model,
    status: BookingStatus,
) -> Result<booking::Model, DbErr> {
    let mut booking = booking.into_active_model();

    booking.status = ActiveValue::Set(status);

    booking.update(db).await
}
