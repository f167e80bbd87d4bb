//! Request/response DTOs and shared application state.

pub mod api;
pub mod app;
pub mod auth;
pub mod booking;
pub mod employee;
pub mod override_request;
pub mod user;
