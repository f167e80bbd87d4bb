pub use super::booking::Entity as Booking;
pub use super::booking_participant::Entity as BookingParticipant;
pub use super::override_request::Entity as OverrideRequest;
pub use super::reminder::Entity as Reminder;
pub use super::sim_user::Entity as SimUser;
