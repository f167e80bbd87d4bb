pub mod prelude;

pub mod booking;
pub mod booking_participant;
pub mod override_request;
pub mod reminder;
pub mod sea_orm_active_enums;
pub mod sim_user;
