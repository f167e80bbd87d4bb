use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Access level of a user account. The P-tiers double as booking urgency
/// levels elsewhere in the system; `Manager` carries department-scoped
/// administrative rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    #[sea_orm(string_value = "P1")]
    #[serde(rename = "P1")]
    P1,
    #[sea_orm(string_value = "P2")]
    #[serde(rename = "P2")]
    P2,
    #[sea_orm(string_value = "P3")]
    #[serde(rename = "P3")]
    P3,
    #[sea_orm(string_value = "P4")]
    #[serde(rename = "P4")]
    P4,
    #[sea_orm(string_value = "manager")]
    #[serde(rename = "manager")]
    Manager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum UserStatus {
    #[sea_orm(string_value = "active")]
    #[serde(rename = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    #[serde(rename = "inactive")]
    Inactive,
}

/// Fixed pool of bookable simulator resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum Simulator {
    #[sea_orm(string_value = "SIM1")]
    #[serde(rename = "SIM1")]
    Sim1,
    #[sea_orm(string_value = "SIM2")]
    #[serde(rename = "SIM2")]
    Sim2,
    #[sea_orm(string_value = "SIM3")]
    #[serde(rename = "SIM3")]
    Sim3,
    #[sea_orm(string_value = "SIM4")]
    #[serde(rename = "SIM4")]
    Sim4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BookingStatus {
    #[sea_orm(string_value = "scheduled")]
    #[serde(rename = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "in-progress")]
    #[serde(rename = "in-progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    #[serde(rename = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    #[serde(rename = "cancelled")]
    Cancelled,
}

/// Booking urgency classification, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(4))")]
pub enum Priority {
    #[sea_orm(string_value = "P1")]
    #[serde(rename = "P1")]
    P1,
    #[sea_orm(string_value = "P2")]
    #[serde(rename = "P2")]
    P2,
    #[sea_orm(string_value = "P3")]
    #[serde(rename = "P3")]
    P3,
    #[sea_orm(string_value = "P4")]
    #[serde(rename = "P4")]
    P4,
}

/// Resolution state shared by override requests and role-change requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    #[serde(rename = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    #[serde(rename = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    #[serde(rename = "rejected")]
    Rejected,
}
