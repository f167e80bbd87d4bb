use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use entity::sea_orm_active_enums::BookingStatus;

use crate::{
    data::{booking::BookingRepository, reminder::ReminderRepository, user::UserRepository},
    error::Error,
    notify::{log_failure, Notifier, Recipient},
};

/// Mails out every reminder whose fire time has passed and marks it
/// delivered. Reminders whose booking has been cancelled, completed, or
/// deleted in the meantime are retired silently. Returns how many
/// reminder emails went out.
pub async fn dispatch_due_reminders(
    db: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
) -> Result<usize, Error> {
    let reminder_repository = ReminderRepository::new(&db);
    let booking_repository = BookingRepository::new(&db);
    let user_repository = UserRepository::new(&db);

    let due = reminder_repository.list_due(Utc::now()).await?;

    let mut dispatched = 0;

    for reminder in due {
        let booking = booking_repository.find_by_id(reminder.booking_id).await?;
        let user = user_repository.find_by_id(reminder.user_id).await?;

        if let (Some(booking), Some(user)) = (booking, user) {
            if booking.status == BookingStatus::Scheduled {
                log_failure(
                    "booking reminder",
                    notifier
                        .booking_reminder(&Recipient::from(&user), &booking)
                        .await,
                );

                dispatched += 1;
            }
        }

        reminder_repository.mark_delivered(reminder).await?;
    }

    Ok(dispatched)
}

#[cfg(test)]
mod tests {
    mod dispatch_tests {
        use std::sync::Arc;

        use chrono::{Duration, Utc};
        use entity::sea_orm_active_enums::{BookingStatus, Simulator};

        use crate::data::reminder::ReminderRepository;
        use crate::scheduler::reminder::dispatch_due_reminders;
        use crate::util::test::setup::{
            create_booking, create_tables, create_user, set_booking_status, test_setup,
        };

        /// Expect only reminders past their fire time to go out, each
        /// exactly once
        #[tokio::test]
        async fn test_dispatch_due_only_and_once() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let user = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();
            let booking = create_booking(&test.state.db, user.id, Simulator::Sim1, 120, 180)
                .await
                .unwrap();

            let repository = ReminderRepository::new(&test.state.db);

            repository
                .create(booking.id, user.id, Utc::now() - Duration::minutes(5))
                .await
                .unwrap();
            repository
                .create(booking.id, user.id, Utc::now() + Duration::hours(1))
                .await
                .unwrap();

            let notifier: Arc<dyn crate::notify::Notifier> = test.notifier.clone();

            let count = dispatch_due_reminders(test.state.db.clone(), notifier.clone())
                .await
                .unwrap();
            assert_eq!(count, 1);

            let sent = test.notifier.sent();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].kind, "booking_reminder");
            assert_eq!(sent[0].to, "u1@example.com");

            // A second poll finds nothing; the row is marked delivered
            let count = dispatch_due_reminders(test.state.db.clone(), notifier)
                .await
                .unwrap();
            assert_eq!(count, 0);
            assert_eq!(test.notifier.sent().len(), 1);
        }

        /// Expect reminders for cancelled bookings to be retired without
        /// a mail going out
        #[tokio::test]
        async fn test_dispatch_skips_cancelled_booking() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let user = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();
            let booking = create_booking(&test.state.db, user.id, Simulator::Sim1, 120, 180)
                .await
                .unwrap();
            set_booking_status(&test.state.db, booking.clone(), BookingStatus::Cancelled)
                .await
                .unwrap();

            ReminderRepository::new(&test.state.db)
                .create(booking.id, user.id, Utc::now() - Duration::minutes(5))
                .await
                .unwrap();

            let notifier: Arc<dyn crate::notify::Notifier> = test.notifier.clone();

            let count = dispatch_due_reminders(test.state.db.clone(), notifier.clone())
                .await
                .unwrap();
            assert_eq!(count, 0);
            assert!(test.notifier.sent().is_empty());

            // Retired for good, not retried forever
            let count = dispatch_due_reminders(test.state.db.clone(), notifier)
                .await
                .unwrap();
            assert_eq!(count, 0);
        }
    }
}
