//! Data access layer repositories.
//!
//! Repositories provide an abstraction layer over database operations,
//! organized by domain: users, bookings, override requests, and the
//! durable reminder queue.

pub mod booking;
pub mod override_request;
pub mod reminder;
pub mod user;
