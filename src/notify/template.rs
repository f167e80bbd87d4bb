//! Plain-text templates for each notification kind.

use chrono::{DateTime, Utc};

use entity::booking;

use crate::notify::Recipient;

/// Rendered subject/body pair ready for the transport
pub struct Email {
    pub subject: String,
    pub body: String,
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn booking_lines(booking: &booking::Model) -> String {
    format!(
        "  Title: {}\n  Simulator: {:?}\n  Time: {} - {}",
        booking.title,
        booking.simulator,
        format_time(booking.start_time),
        format_time(booking.end_time),
    )
}

pub fn booking_confirmation(to: &Recipient, booking: &booking::Model) -> Email {
    Email {
        subject: "Booking Confirmation".to_string(),
        body: format!(
            "Dear {},\n\nYour booking has been confirmed:\n\n{}\n\nThank you for using SimCal.",
            to.name,
            booking_lines(booking),
        ),
    }
}

pub fn booking_reminder(to: &Recipient, booking: &booking::Model) -> Email {
    Email {
        subject: "Upcoming Booking Reminder".to_string(),
        body: format!(
            "Dear {},\n\nYour simulator session starts soon:\n\n{}\n",
            to.name,
            booking_lines(booking),
        ),
    }
}

pub fn booking_started(to: &Recipient, booking: &booking::Model) -> Email {
    Email {
        subject: "Booking In Progress".to_string(),
        body: format!(
            "Dear {},\n\nA booking you participate in has started:\n\n{}\n",
            to.name,
            booking_lines(booking),
        ),
    }
}

pub fn early_release(
    to: &Recipient,
    booking: &booking::Model,
    freed_from: DateTime<Utc>,
) -> Email {
    Email {
        subject: "Simulator Released Early".to_string(),
        body: format!(
            "Dear {},\n\n{:?} has been released ahead of schedule and is free \
             from {} until {}.\n",
            to.name,
            booking.simulator,
            format_time(freed_from),
            format_time(booking.end_time),
        ),
    }
}

pub fn override_requested(
    to: &Recipient,
    requester: &Recipient,
    reason: &str,
    booking: &booking::Model,
) -> Email {
    Email {
        subject: "Booking Override Request".to_string(),
        body: format!(
            "Dear {},\n\n{} ({}) has requested to override your booking:\n\n{}\n\n\
             Reason: {}\n\nA manager will review the request.",
            to.name, requester.name, requester.email,
            booking_lines(booking),
            reason,
        ),
    }
}

pub fn override_approved(to: &Recipient, booking: &booking::Model) -> Email {
    Email {
        subject: "Override Request Approved".to_string(),
        body: format!(
            "Dear {},\n\nYour override request has been approved. The booking \
             below has been cancelled:\n\n{}\n",
            to.name,
            booking_lines(booking),
        ),
    }
}

pub fn override_rejected(to: &Recipient, booking: &booking::Model) -> Email {
    Email {
        subject: "Override Request Rejected".to_string(),
        body: format!(
            "Dear {},\n\nYour override request for the booking below has been \
             rejected:\n\n{}\n",
            to.name,
            booking_lines(booking),
        ),
    }
}

pub fn welcome(to: &Recipient, initial_password: &str) -> Email {
    Email {
        subject: "Welcome to SimCal".to_string(),
        body: format!(
            "Dear {},\n\nYour account has been created.\n\n  Email: {}\n  \
             Password: {}\n\nPlease change your password after your first login.",
            to.name, to.email, initial_password,
        ),
    }
}

pub fn password_reset(to: &Recipient, reset_link: &str) -> Email {
    Email {
        subject: "Password Reset Request".to_string(),
        body: format!(
            "Dear {},\n\nA password reset was requested for your account. Use \
             the link below within one hour:\n\n{}\n\nIf you did not request \
             this, you can ignore this email.",
            to.name, reset_link,
        ),
    }
}
