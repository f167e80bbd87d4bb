//! HTTP routing and OpenAPI documentation configuration.
//!
//! All API endpoints are registered here with their OpenAPI
//! specifications, and Swagger UI is configured to provide interactive
//! API documentation at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and
/// Swagger UI documentation.
///
/// # Registered Endpoints
/// - `POST /api/auth/register` - Create an account and sign in
/// - `POST /api/auth/login` - Sign in with email and password
/// - `GET /api/auth/me` - Get the authenticated user
/// - `POST /api/auth/forgot-password` - Start a password reset
/// - `POST /api/auth/reset-password/{token}` - Complete a password reset
/// - `POST /api/auth/request-role-change` - File a role-change request
/// - `GET /api/bookings` - List bookings with filters
/// - `POST /api/bookings` - Create a booking
/// - `GET /api/bookings/active` - List the caller's live bookings
/// - `PUT /api/bookings/{id}` - Update a booking
/// - `DELETE /api/bookings/{id}` - Delete a booking
/// - `PUT /api/bookings/{id}/end-early` - Complete a booking early
/// - `POST /api/bookings/{id}/request-override` - File an override request
/// - `GET /api/bookings/override-requests` - List pending override requests
/// - `POST /api/bookings/override-requests/{id}/approve` - Approve an override
/// - `POST /api/bookings/override-requests/{id}/reject` - Reject an override
/// - `GET /api/employees/list` - List department employees
/// - `POST /api/employees/add` - Create an employee account
/// - `GET /api/employees/role-requests` - List role-change requests
/// - `POST /api/employees/role-requests/{id}/approve` - Approve a role change
/// - `POST /api/employees/role-requests/{id}/reject` - Reject a role change
///
/// The OpenAPI specification is served at `/api/docs/openapi.json`, with
/// interactive documentation at `/api/docs`.
pub fn routes() -> Router<AppState> {
    let (routes, api) = api_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}

fn api_parts() -> (Router<AppState>, utoipa::openapi::OpenApi) {
    #[derive(OpenApi)]
    #[openapi(info(title = "SimCal", description = "Simulator booking API"), tags(
        (name = controller::auth::AUTH_TAG, description = "Authentication API routes"),
        (name = controller::booking::BOOKING_TAG, description = "Booking lifecycle API routes"),
        (name = controller::override_request::OVERRIDE_TAG, description = "Override workflow API routes"),
        (name = controller::employee::EMPLOYEE_TAG, description = "Employee management API routes"),
    ))]
    struct ApiDoc;

    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::auth::register))
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::me))
        .routes(routes!(controller::auth::forgot_password))
        .routes(routes!(controller::auth::reset_password))
        .routes(routes!(controller::auth::request_role_change))
        .routes(routes!(
            controller::booking::list_bookings,
            controller::booking::create_booking
        ))
        .routes(routes!(controller::booking::list_active_bookings))
        .routes(routes!(
            controller::booking::update_booking,
            controller::booking::delete_booking
        ))
        .routes(routes!(controller::booking::end_booking_early))
        .routes(routes!(controller::override_request::request_override))
        .routes(routes!(controller::override_request::list_override_requests))
        .routes(routes!(controller::override_request::approve_override_request))
        .routes(routes!(controller::override_request::reject_override_request))
        .routes(routes!(controller::employee::list_employees))
        .routes(routes!(controller::employee::add_employee))
        .routes(routes!(controller::employee::list_role_requests))
        .routes(routes!(controller::employee::approve_role_request))
        .routes(routes!(controller::employee::reject_role_request))
        .split_for_parts()
}
