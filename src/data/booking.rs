use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    ExprTrait, QueryFilter, QueryOrder,
};

use entity::sea_orm_active_enums::{BookingStatus, Priority, Simulator};
use entity::{booking, booking_participant, sim_user};

/// Field set required to insert a booking row. Status is not part of it:
/// every new booking starts out `scheduled`.
pub struct NewBooking {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub simulator: Simulator,
    pub priority: Priority,
    pub created_by: i32,
    pub department: String,
}

/// Filters applied to the booking list query
#[derive(Default)]
pub struct BookingQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub simulator: Option<Simulator>,
    pub department: Option<String>,
    pub status: Option<BookingStatus>,
}

pub struct BookingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> BookingRepository<'a, C> {
    /// Creates a new instance of [`BookingRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_booking: NewBooking) -> Result<booking::Model, DbErr> {
        let now = Utc::now();

        let booking = booking::ActiveModel {
            title: ActiveValue::Set(new_booking.title),
            description: ActiveValue::Set(new_booking.description),
            start_time: ActiveValue::Set(new_booking.start_time),
            end_time: ActiveValue::Set(new_booking.end_time),
            simulator: ActiveValue::Set(new_booking.simulator),
            status: ActiveValue::Set(BookingStatus::Scheduled),
            priority: ActiveValue::Set(new_booking.priority),
            created_by: ActiveValue::Set(new_booking.created_by),
            department: ActiveValue::Set(new_booking.department),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        booking.insert(self.db).await
    }

    pub async fn find_by_id(&self, booking_id: i32) -> Result<Option<booking::Model>, DbErr> {
        entity::prelude::Booking::find_by_id(booking_id)
            .one(self.db)
            .await
    }

    /// Bookings matching the filter, ordered by start time ascending.
    /// Date bounds are inclusive: `start_date` on start times, `end_date`
    /// on end times.
    pub async fn list(&self, query: BookingQuery) -> Result<Vec<booking::Model>, DbErr> {
        let mut select = entity::prelude::Booking::find();

        if let Some(start_date) = query.start_date {
            select = select.filter(booking::Column::StartTime.gte(start_date));
        }

        if let Some(end_date) = query.end_date {
            select = select.filter(booking::Column::EndTime.lte(end_date));
        }

        if let Some(simulator) = query.simulator {
            select = select.filter(booking::Column::Simulator.eq(simulator));
        }

        if let Some(department) = query.department {
            select = select.filter(booking::Column::Department.eq(department));
        }

        if let Some(status) = query.status {
            select = select.filter(booking::Column::Status.eq(status));
        }

        select
            .order_by_asc(booking::Column::StartTime)
            .all(self.db)
            .await
    }

    /// First booking other than `exclude_id` on the same simulator whose
    /// interval overlaps [start, end) under strict half-open comparison
    pub async fn find_overlapping(
        &self,
        simulator: Simulator,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_id: i32,
    ) -> Result<Option<booking::Model>, DbErr> {
        entity::prelude::Booking::find()
            .filter(booking::Column::Id.ne(exclude_id))
            .filter(booking::Column::Simulator.eq(simulator))
            .filter(booking::Column::StartTime.lt(end))
            .filter(booking::Column::EndTime.gt(start))
            .one(self.db)
            .await
    }

    /// Booking currently in progress on the simulator, excluding
    /// `exclude_id`. Guards the one-in-progress-per-simulator invariant.
    pub async fn find_in_progress(
        &self,
        simulator: Simulator,
        exclude_id: i32,
    ) -> Result<Option<booking::Model>, DbErr> {
        entity::prelude::Booking::find()
            .filter(booking::Column::Id.ne(exclude_id))
            .filter(booking::Column::Simulator.eq(simulator))
            .filter(booking::Column::Status.eq(BookingStatus::InProgress))
            .one(self.db)
            .await
    }

    /// In-progress bookings where the user is creator or participant
    pub async fn list_active_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<booking::Model>, DbErr> {
        let participant_booking_ids: Vec<i32> = entity::prelude::BookingParticipant::find()
            .filter(booking_participant::Column::UserId.eq(user_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|row| row.booking_id)
            .collect();

        entity::prelude::Booking::find()
            .filter(booking::Column::Status.eq(BookingStatus::InProgress))
            .filter(
                booking::Column::CreatedBy
                    .eq(user_id)
                    .or(booking::Column::Id.is_in(participant_booking_ids)),
            )
            .order_by_asc(booking::Column::StartTime)
            .all(self.db)
            .await
    }

    pub async fn update(
        &self,
        booking: booking::ActiveModel,
    ) -> Result<booking::Model, DbErr> {
        booking.update(self.db).await
    }

    /// Deletes a booking
    ///
    /// Returns OK regardless of the booking existing; check
    /// [`DeleteResult::rows_affected`] for the outcome.
    pub async fn delete(&self, booking_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Booking::delete_by_id(booking_id)
            .exec(self.db)
            .await
    }

    /// Participant users of a booking
    pub async fn participants(
        &self,
        booking_id: i32,
    ) -> Result<Vec<sim_user::Model>, DbErr> {
        let rows = entity::prelude::BookingParticipant::find()
            .filter(booking_participant::Column::BookingId.eq(booking_id))
            .find_also_related(entity::prelude::SimUser)
            .all(self.db)
            .await?;

        Ok(rows.into_iter().filter_map(|(_, user)| user).collect())
    }

    /// Replaces the participant set of a booking
    pub async fn set_participants(
        &self,
        booking_id: i32,
        user_ids: &[i32],
    ) -> Result<(), DbErr> {
        entity::prelude::BookingParticipant::delete_many()
            .filter(booking_participant::Column::BookingId.eq(booking_id))
            .exec(self.db)
            .await?;

        for user_id in user_ids {
            let participant = booking_participant::ActiveModel {
                booking_id: ActiveValue::Set(booking_id),
                user_id: ActiveValue::Set(*user_id),
                ..Default::default()
            };

            participant.insert(self.db).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    mod overlap_tests {
        use chrono::Duration;
        use entity::sea_orm_active_enums::Simulator;

        use crate::data::booking::BookingRepository;
        use crate::util::test::setup::{create_booking, create_tables, create_user, test_setup};

        /// Expect strict half-open comparison: a shared boundary instant
        /// is not an overlap, any shared interior is
        #[tokio::test]
        async fn test_find_overlapping_boundaries() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let user = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();
            let existing = create_booking(&test.state.db, user.id, Simulator::Sim1, 60, 120)
                .await
                .unwrap();

            let repository = BookingRepository::new(&test.state.db);

            // Ends exactly at the existing start
            let hit = repository
                .find_overlapping(
                    Simulator::Sim1,
                    existing.start_time - Duration::minutes(60),
                    existing.start_time,
                    0,
                )
                .await
                .unwrap();
            assert!(hit.is_none());

            // One minute into the existing interval
            let hit = repository
                .find_overlapping(
                    Simulator::Sim1,
                    existing.start_time - Duration::minutes(60),
                    existing.start_time + Duration::minutes(1),
                    0,
                )
                .await
                .unwrap();
            assert_eq!(hit.unwrap().id, existing.id);

            // Fully containing the existing interval
            let hit = repository
                .find_overlapping(
                    Simulator::Sim1,
                    existing.start_time - Duration::minutes(30),
                    existing.end_time + Duration::minutes(30),
                    0,
                )
                .await
                .unwrap();
            assert!(hit.is_some());

            // Same window, other simulator
            let hit = repository
                .find_overlapping(Simulator::Sim2, existing.start_time, existing.end_time, 0)
                .await
                .unwrap();
            assert!(hit.is_none());

            // A booking never conflicts with itself
            let hit = repository
                .find_overlapping(
                    Simulator::Sim1,
                    existing.start_time,
                    existing.end_time,
                    existing.id,
                )
                .await
                .unwrap();
            assert!(hit.is_none());
        }
    }

    mod participant_tests {
        use entity::sea_orm_active_enums::Simulator;

        use crate::data::booking::BookingRepository;
        use crate::util::test::setup::{create_booking, create_tables, create_user, test_setup};

        /// Expect set_participants to fully replace the previous set
        #[tokio::test]
        async fn test_set_participants_replaces() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let owner = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();
            let a = create_user(&test.state.db, "A", "a@example.com", "P2", "Ops")
                .await
                .unwrap();
            let b = create_user(&test.state.db, "B", "b@example.com", "P2", "Ops")
                .await
                .unwrap();

            let booking = create_booking(&test.state.db, owner.id, Simulator::Sim1, 0, 60)
                .await
                .unwrap();

            let repository = BookingRepository::new(&test.state.db);

            repository.set_participants(booking.id, &[a.id]).await.unwrap();
            repository.set_participants(booking.id, &[b.id]).await.unwrap();

            let participants = repository.participants(booking.id).await.unwrap();

            assert_eq!(participants.len(), 1);
            assert_eq!(participants[0].id, b.id);
        }
    }
}
