//! SimCal server application core.
//!
//! Backend for booking time on a shared pool of simulator resources. Covers
//! the booking lifecycle (scheduling, conflict detection, status
//! transitions), the manager-approved override workflow, department-scoped
//! employee administration, and email notifications dispatched around each
//! of those events.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod notify;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
