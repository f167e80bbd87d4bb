use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::Error,
    model::{
        api::ErrorDto,
        app::AppState,
        auth::AuthUser,
        override_request::{CreateOverrideDto, OverrideRequestDto},
    },
    service::override_request::OverrideService,
};

pub static OVERRIDE_TAG: &str = "override";

/// Files an override request against a live booking. The booking owner
/// is notified; a department manager resolves the request.
///
/// # Responses
/// - 201 (Created): Request stored as pending
/// - 400 (Bad Request): Reason too short, or the booking is already terminal
/// - 401 (Unauthorized): Not authenticated
/// - 404 (Not Found): No such booking
#[utoipa::path(
    post,
    path = "/api/bookings/{id}/request-override",
    tag = OVERRIDE_TAG,
    params(
        ("id" = i32, Path, description = "Booking ID the override targets")
    ),
    request_body = CreateOverrideDto,
    responses(
        (status = 201, description = "Override request filed", body = OverrideRequestDto),
        (status = 400, description = "Invalid override request", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn request_override(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<CreateOverrideDto>,
) -> Result<impl IntoResponse, Error> {
    let request = OverrideService::new(&state.db, state.notifier.as_ref())
        .request(id, input, &user)
        .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// Lists pending override requests of the manager's department, oldest
/// first
///
/// # Responses
/// - 200 (OK): Pending requests with booking and requester resolved
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller is not a manager
#[utoipa::path(
    get,
    path = "/api/bookings/override-requests",
    tag = OVERRIDE_TAG,
    responses(
        (status = 200, description = "Pending override requests", body = Vec<OverrideRequestDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Managers only", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_override_requests(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, Error> {
    let requests = OverrideService::new(&state.db, state.notifier.as_ref())
        .list_pending(&user)
        .await?;

    Ok(Json(requests))
}

/// Approves a pending override request, cancelling the target booking
///
/// # Responses
/// - 200 (OK): Request approved, booking cancelled
/// - 400 (Bad Request): Request already resolved, or the booking is terminal
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller is not a manager of the request's department
/// - 404 (Not Found): No such request
#[utoipa::path(
    post,
    path = "/api/bookings/override-requests/{id}/approve",
    tag = OVERRIDE_TAG,
    params(
        ("id" = i32, Path, description = "Override request ID")
    ),
    responses(
        (status = 200, description = "Request approved", body = OverrideRequestDto),
        (status = 400, description = "Request cannot be approved", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Managers of the department only", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_override_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let request = OverrideService::new(&state.db, state.notifier.as_ref())
        .approve(id, &user)
        .await?;

    Ok(Json(request))
}

/// Rejects a pending override request, leaving the booking untouched
///
/// # Responses
/// - 200 (OK): Request rejected
/// - 400 (Bad Request): Request already resolved
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller is not a manager of the request's department
/// - 404 (Not Found): No such request
#[utoipa::path(
    post,
    path = "/api/bookings/override-requests/{id}/reject",
    tag = OVERRIDE_TAG,
    params(
        ("id" = i32, Path, description = "Override request ID")
    ),
    responses(
        (status = 200, description = "Request rejected", body = OverrideRequestDto),
        (status = 400, description = "Request already resolved", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Managers of the department only", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_override_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let request = OverrideService::new(&state.db, state.notifier.as_ref())
        .reject(id, &user)
        .await?;

    Ok(Json(request))
}
