use chrono::{Duration, Utc};
use sea_orm::{ActiveEnum, ActiveValue, DatabaseConnection, IntoActiveModel};

use entity::booking;
use entity::sea_orm_active_enums::{BookingStatus, Priority, Simulator};
use entity::sim_user;

use crate::{
    data::{
        booking::{BookingQuery, BookingRepository, NewBooking},
        reminder::ReminderRepository,
        user::UserRepository,
    },
    error::Error,
    model::booking::{BookingDto, BookingFilterParams, CreateBookingDto, UpdateBookingDto},
    notify::{log_failure, Notifier, Recipient},
};

/// How a status change entered the system. The standard table covers the
/// regular update path; the privileged paths are explicit edges so the
/// transition table stays authoritative for them too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPath {
    /// Regular `PUT /bookings/{id}` status change
    Standard,
    /// Creator ending their own session ahead of schedule
    EarlyEnd,
    /// Manager-approved override cancelling the booking
    Override,
}

/// Validates a status change against the transition table.
///
/// Standard edges: scheduled→in-progress, scheduled→cancelled,
/// in-progress→completed, in-progress→cancelled. The early-end path adds
/// in-progress→completed only; the override path may cancel from either
/// live state. Nothing ever leaves a terminal state.
pub fn validate_transition(
    from: BookingStatus,
    to: BookingStatus,
    path: TransitionPath,
) -> Result<(), Error> {
    let allowed = match path {
        TransitionPath::Standard => matches!(
            (from, to),
            (BookingStatus::Scheduled, BookingStatus::InProgress)
                | (BookingStatus::Scheduled, BookingStatus::Cancelled)
                | (BookingStatus::InProgress, BookingStatus::Completed)
                | (BookingStatus::InProgress, BookingStatus::Cancelled)
        ),
        TransitionPath::EarlyEnd => {
            from == BookingStatus::InProgress && to == BookingStatus::Completed
        }
        TransitionPath::Override => {
            matches!(from, BookingStatus::Scheduled | BookingStatus::InProgress)
                && to == BookingStatus::Cancelled
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(Error::InvalidTransition {
            from: from.to_value(),
            to: to.to_value(),
        })
    }
}

pub fn parse_simulator(value: &str) -> Result<Simulator, Error> {
    Simulator::try_from_value(&value.to_string())
        .map_err(|_| Error::Validation(format!("Invalid simulator: {}", value)))
}

pub fn parse_priority(value: &str) -> Result<Priority, Error> {
    Priority::try_from_value(&value.to_string())
        .map_err(|_| Error::Validation(format!("Invalid priority: {}", value)))
}

pub fn parse_status(value: &str) -> Result<BookingStatus, Error> {
    BookingStatus::try_from_value(&value.to_string())
        .map_err(|_| Error::Validation(format!("Invalid status: {}", value)))
}

pub struct BookingService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a dyn Notifier,
    reminder_lead_minutes: i64,
}

impl<'a> BookingService<'a> {
    /// Creates a new instance of [`BookingService`]
    pub fn new(
        db: &'a DatabaseConnection,
        notifier: &'a dyn Notifier,
        reminder_lead_minutes: i64,
    ) -> Self {
        Self {
            db,
            notifier,
            reminder_lead_minutes,
        }
    }

    /// Resolves creator and participants onto the booking payload
    async fn resolve(&self, booking: booking::Model) -> Result<BookingDto, Error> {
        let user_repository = UserRepository::new(self.db);
        let booking_repository = BookingRepository::new(self.db);

        let creator = user_repository
            .find_by_id(booking.created_by)
            .await?
            .ok_or(Error::NotFound("Booking creator"))?;

        let participants = booking_repository.participants(booking.id).await?;

        Ok(BookingDto::from_parts(booking, &creator, &participants))
    }

    async fn resolve_all(&self, bookings: Vec<booking::Model>) -> Result<Vec<BookingDto>, Error> {
        let mut resolved = Vec::with_capacity(bookings.len());

        for booking in bookings {
            resolved.push(self.resolve(booking).await?);
        }

        Ok(resolved)
    }

    /// Bookings matching the filter, ordered by start time ascending
    pub async fn list(
        &self,
        params: BookingFilterParams,
        caller: &sim_user::Model,
    ) -> Result<Vec<BookingDto>, Error> {
        if !caller.can_view_bookings {
            return Err(Error::Forbidden("Access denied".to_string()));
        }

        let query = BookingQuery {
            start_date: params.start_date,
            end_date: params.end_date,
            simulator: params.simulator.as_deref().map(parse_simulator).transpose()?,
            department: params.department,
            status: params.status.as_deref().map(parse_status).transpose()?,
        };

        let bookings = BookingRepository::new(self.db).list(query).await?;

        self.resolve_all(bookings).await
    }

    /// Creates a booking owned by the caller. Status always starts out
    /// `scheduled`; priority defaults to P4. A durable reminder row is
    /// written when the fire time has not already passed.
    pub async fn create(
        &self,
        input: CreateBookingDto,
        caller: &sim_user::Model,
    ) -> Result<BookingDto, Error> {
        let title = input
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Validation("Title is required".to_string()))?;
        let start_time = input
            .start_time
            .ok_or_else(|| Error::Validation("Start time is required".to_string()))?;
        let end_time = input
            .end_time
            .ok_or_else(|| Error::Validation("End time is required".to_string()))?;
        let simulator = parse_simulator(
            &input
                .simulator
                .ok_or_else(|| Error::Validation("Simulator is required".to_string()))?,
        )?;
        let department = input
            .department
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| Error::Validation("Department is required".to_string()))?;

        let priority = match input.priority.as_deref() {
            Some(value) => parse_priority(value)?,
            None => Priority::P4,
        };

        let booking_repository = BookingRepository::new(self.db);

        let booking = booking_repository
            .create(NewBooking {
                title,
                description: input.description,
                start_time,
                end_time,
                simulator,
                priority,
                created_by: caller.id,
                department,
            })
            .await?;

        if let Some(participants) = input.participants {
            booking_repository
                .set_participants(booking.id, &participants)
                .await?;
        }

        let fire_at = start_time - Duration::minutes(self.reminder_lead_minutes);
        if fire_at > Utc::now() {
            ReminderRepository::new(self.db)
                .create(booking.id, caller.id, fire_at)
                .await?;
        }

        log_failure(
            "booking confirmation",
            self.notifier
                .booking_confirmation(&Recipient::from(caller), &booking)
                .await,
        );

        self.resolve(booking).await
    }

    /// Applies a partial update. Status changes go through the standard
    /// transition table; scheduling changes run interval conflict
    /// detection against every other booking on the simulator.
    pub async fn update(
        &self,
        booking_id: i32,
        updates: UpdateBookingDto,
        caller: &sim_user::Model,
    ) -> Result<BookingDto, Error> {
        let booking_repository = BookingRepository::new(self.db);

        let booking = booking_repository
            .find_by_id(booking_id)
            .await?
            .ok_or(Error::NotFound("Booking"))?;

        let participants = booking_repository.participants(booking.id).await?;

        let is_creator = booking.created_by == caller.id;
        let is_participant = participants.iter().any(|p| p.id == caller.id);

        if !is_creator && !is_participant && !caller.can_manage_bookings {
            return Err(Error::Forbidden(
                "Not authorized to modify this booking".to_string(),
            ));
        }

        let new_simulator = match updates.simulator.as_deref() {
            Some(value) => parse_simulator(value)?,
            None => booking.simulator,
        };
        let new_start = updates.start_time.unwrap_or(booking.start_time);
        let new_end = updates.end_time.unwrap_or(booking.end_time);

        let reschedules = updates.simulator.is_some()
            || updates.start_time.is_some()
            || updates.end_time.is_some();

        if reschedules {
            if let Some(conflicting) = booking_repository
                .find_overlapping(new_simulator, new_start, new_end, booking.id)
                .await?
            {
                return Err(Error::BookingConflict {
                    simulator: new_simulator.to_value(),
                    conflicting: Box::new(conflicting),
                });
            }
        }

        let target_status = match updates.status.as_deref() {
            Some(value) => {
                let target = parse_status(value)?;

                validate_transition(booking.status, target, TransitionPath::Standard)?;

                if target == BookingStatus::InProgress {
                    if let Some(_busy) = booking_repository
                        .find_in_progress(new_simulator, booking.id)
                        .await?
                    {
                        return Err(Error::SimulatorBusy {
                            simulator: new_simulator.to_value(),
                        });
                    }
                }

                Some(target)
            }
            None => None,
        };

        let scheduled_end = booking.end_time;

        let mut active = booking.into_active_model();

        if let Some(title) = updates.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(description) = updates.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(department) = updates.department {
            active.department = ActiveValue::Set(department);
        }
        if let Some(priority) = updates.priority.as_deref() {
            active.priority = ActiveValue::Set(parse_priority(priority)?);
        }
        if reschedules {
            active.simulator = ActiveValue::Set(new_simulator);
            active.start_time = ActiveValue::Set(new_start);
            active.end_time = ActiveValue::Set(new_end);
        }
        if let Some(status) = target_status {
            active.status = ActiveValue::Set(status);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let booking = booking_repository.update(active).await?;

        if let Some(participant_ids) = updates.participants {
            booking_repository
                .set_participants(booking.id, &participant_ids)
                .await?;
        }

        match target_status {
            Some(BookingStatus::InProgress) => {
                for participant in &participants {
                    log_failure(
                        "booking started",
                        self.notifier
                            .booking_started(&Recipient::from(participant), &booking)
                            .await,
                    );
                }
            }
            Some(BookingStatus::Completed) => {
                let now = Utc::now();

                if now < scheduled_end {
                    self.broadcast_early_release(&booking, caller, now).await?;
                }
            }
            _ => {}
        }

        self.resolve(booking).await
    }

    /// Hard-deletes a booking along with its participant rows, reminders,
    /// and override requests (all cascade).
    pub async fn delete(&self, booking_id: i32, caller: &sim_user::Model) -> Result<(), Error> {
        if !caller.can_manage_bookings {
            return Err(Error::Forbidden("Access denied".to_string()));
        }

        let result = BookingRepository::new(self.db).delete(booking_id).await?;

        if result.rows_affected == 0 {
            return Err(Error::NotFound("Booking"));
        }

        Ok(())
    }

    /// Completes the caller's own booking ahead of schedule via the
    /// early-end edge and announces the freed window to the rest of the
    /// caller's department
    pub async fn end_early(
        &self,
        booking_id: i32,
        caller: &sim_user::Model,
    ) -> Result<BookingDto, Error> {
        let booking_repository = BookingRepository::new(self.db);

        let booking = booking_repository
            .find_by_id(booking_id)
            .await?
            .ok_or(Error::NotFound("Booking"))?;

        if booking.created_by != caller.id {
            return Err(Error::Forbidden("Not authorized".to_string()));
        }

        validate_transition(
            booking.status,
            BookingStatus::Completed,
            TransitionPath::EarlyEnd,
        )?;

        let now = Utc::now();

        let mut active = booking.into_active_model();
        active.status = ActiveValue::Set(BookingStatus::Completed);
        active.updated_at = ActiveValue::Set(now);

        let booking = booking_repository.update(active).await?;

        self.broadcast_early_release(&booking, caller, now).await?;

        self.resolve(booking).await
    }

    /// In-progress bookings where the caller is creator or participant
    pub async fn list_active(&self, caller: &sim_user::Model) -> Result<Vec<BookingDto>, Error> {
        let bookings = BookingRepository::new(self.db)
            .list_active_for_user(caller.id)
            .await?;

        self.resolve_all(bookings).await
    }

    /// Early-release notice to every other active user of the caller's
    /// department
    async fn broadcast_early_release(
        &self,
        booking: &booking::Model,
        caller: &sim_user::Model,
        freed_from: chrono::DateTime<Utc>,
    ) -> Result<(), Error> {
        let recipients = UserRepository::new(self.db)
            .list_department_recipients(&caller.department, caller.id)
            .await?;

        for recipient in &recipients {
            log_failure(
                "early release",
                self.notifier
                    .early_release(&Recipient::from(recipient), booking, freed_from)
                    .await,
            );
        }

        Ok(())
    }
}
