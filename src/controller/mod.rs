//! HTTP controller endpoints for the SimCal web API.
//!
//! Controllers handle HTTP requests, hand the work to services, and map
//! the results onto responses. Authentication is resolved through the
//! [`crate::model::auth::AuthUser`] extractor; every endpoint carries a
//! utoipa annotation for the OpenAPI document.

pub mod auth;
pub mod booking;
pub mod employee;
pub mod override_request;
