use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::Error,
    model::{
        api::{ErrorDto, MessageDto},
        app::AppState,
        auth::AuthUser,
        booking::{BookingDto, BookingFilterParams, CreateBookingDto, UpdateBookingDto},
    },
    service::booking::BookingService,
};

pub static BOOKING_TAG: &str = "booking";

/// Lists bookings, optionally filtered by date range, simulator,
/// department, or status
///
/// # Responses
/// - 200 (OK): Bookings ordered by start time
/// - 400 (Bad Request): Unknown simulator or status filter value
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller lacks the view-bookings permission
#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = BOOKING_TAG,
    params(BookingFilterParams),
    responses(
        (status = 200, description = "Matching bookings", body = Vec<BookingDto>),
        (status = 400, description = "Invalid filter value", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<BookingFilterParams>,
) -> Result<impl IntoResponse, Error> {
    let bookings = BookingService::new(
        &state.db,
        state.notifier.as_ref(),
        state.reminder_lead_minutes,
    )
    .list(params, &user)
    .await?;

    Ok(Json(bookings))
}

/// Creates a booking owned by the caller
///
/// # Responses
/// - 201 (Created): The new booking, always starting out `scheduled`
/// - 400 (Bad Request): Missing required fields or invalid enum values
/// - 401 (Unauthorized): Not authenticated
/// - 500 (Internal Server Error): Database failure
#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = BOOKING_TAG,
    request_body = CreateBookingDto,
    responses(
        (status = 201, description = "Booking created", body = BookingDto),
        (status = 400, description = "Invalid booking payload", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<CreateBookingDto>,
) -> Result<impl IntoResponse, Error> {
    let booking = BookingService::new(
        &state.db,
        state.notifier.as_ref(),
        state.reminder_lead_minutes,
    )
    .create(input, &user)
    .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Applies a partial update to a booking. Status changes follow the
/// booking state machine; rescheduling runs conflict detection.
///
/// # Responses
/// - 200 (OK): The updated booking
/// - 400 (Bad Request): Invalid field value or disallowed status transition
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller is neither creator, participant, nor booking manager
/// - 404 (Not Found): No such booking
/// - 409 (Conflict): Interval overlap or the simulator already has a live session
#[utoipa::path(
    put,
    path = "/api/bookings/{id}",
    tag = BOOKING_TAG,
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    request_body = UpdateBookingDto,
    responses(
        (status = 200, description = "Booking updated", body = BookingDto),
        (status = 400, description = "Invalid update", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not authorized for this booking", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 409, description = "Scheduling conflict", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateBookingDto>,
) -> Result<impl IntoResponse, Error> {
    let booking = BookingService::new(
        &state.db,
        state.notifier.as_ref(),
        state.reminder_lead_minutes,
    )
    .update(id, input, &user)
    .await?;

    Ok(Json(booking))
}

/// Deletes a booking
///
/// # Responses
/// - 200 (OK): Booking removed
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller lacks the manage-bookings permission
/// - 404 (Not Found): No such booking
#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    tag = BOOKING_TAG,
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking deleted", body = MessageDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    BookingService::new(
        &state.db,
        state.notifier.as_ref(),
        state.reminder_lead_minutes,
    )
    .delete(id, &user)
    .await?;

    Ok(Json(MessageDto::new("Booking deleted")))
}

/// Completes the caller's own booking ahead of its scheduled end and
/// notifies the rest of the department that the simulator is free
///
/// # Responses
/// - 200 (OK): The completed booking
/// - 400 (Bad Request): Booking already completed or cancelled
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller is not the creator
/// - 404 (Not Found): No such booking
#[utoipa::path(
    put,
    path = "/api/bookings/{id}/end-early",
    tag = BOOKING_TAG,
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking completed early", body = BookingDto),
        (status = 400, description = "Booking is not live", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Only the creator may end a booking early", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn end_booking_early(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let booking = BookingService::new(
        &state.db,
        state.notifier.as_ref(),
        state.reminder_lead_minutes,
    )
    .end_early(id, &user)
    .await?;

    Ok(Json(booking))
}

/// Lists in-progress bookings the caller created or participates in
///
/// # Responses
/// - 200 (OK): The caller's live bookings
/// - 401 (Unauthorized): Not authenticated
#[utoipa::path(
    get,
    path = "/api/bookings/active",
    tag = BOOKING_TAG,
    responses(
        (status = 200, description = "The caller's live bookings", body = Vec<BookingDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_active_bookings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, Error> {
    let bookings = BookingService::new(
        &state.db,
        state.notifier.as_ref(),
        state.reminder_lead_minutes,
    )
    .list_active(&user)
    .await?;

    Ok(Json(bookings))
}
