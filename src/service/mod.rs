//! Business logic services.
//!
//! Services sit between the HTTP controllers and the repositories: they
//! enforce permissions, the booking state machine, and conflict rules,
//! and they fan out fire-and-forget notifications.

pub mod auth;
pub mod booking;
pub mod override_request;
pub mod user;
