use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid booking status transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },
    #[error("Simulator {simulator} already has a booking in progress")]
    SimulatorBusy { simulator: String },
    #[error("Booking conflict detected on simulator {simulator}")]
    BookingConflict {
        simulator: String,
        conflicting: Box<entity::booking::Model>,
    },
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    #[error(transparent)]
    JwtError(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    #[error(transparent)]
    NotifyError(#[from] crate::notify::NotifyError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(message) => {
                debug!("Validation error: {}", message);

                (StatusCode::BAD_REQUEST, Json(ErrorDto { message })).into_response()
            }
            Error::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    message: "Authentication required".to_string(),
                }),
            )
                .into_response(),
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    message: "Invalid credentials".to_string(),
                }),
            )
                .into_response(),
            Error::Forbidden(message) => {
                debug!("Authorization error: {}", message);

                (StatusCode::FORBIDDEN, Json(ErrorDto { message })).into_response()
            }
            Error::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                Json(ErrorDto {
                    message: format!("{} not found", entity),
                }),
            )
                .into_response(),
            err @ Error::InvalidTransition { .. } => {
                debug!("State machine error: {}", err);

                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorDto {
                        message: err.to_string(),
                    }),
                )
                    .into_response()
            }
            err @ Error::SimulatorBusy { .. } => {
                debug!("Simulator conflict: {}", err);

                (
                    StatusCode::CONFLICT,
                    Json(ErrorDto {
                        message: err.to_string(),
                    }),
                )
                    .into_response()
            }
            Error::BookingConflict {
                simulator,
                conflicting,
            } => {
                debug!("Booking conflict on simulator {}", simulator);

                (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "message": "Booking conflict detected",
                        "conflictingBooking": *conflicting,
                    })),
                )
                    .into_response()
            }
            err => {
                error!("Internal server error: {}", err);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDto {
                        message: "Internal server error".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
