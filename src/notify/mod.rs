//! Outbound email notifications.
//!
//! Every send is fire-and-forget: a booking or override mutation never
//! fails because mail could not be delivered. Callers route results
//! through [`log_failure`] so delivery problems surface in the logs only.

pub mod smtp;
pub mod template;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use entity::{booking, sim_user};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to send email: {0}")]
    SendFailed(String),
    #[error("Invalid mail configuration: {0}")]
    InvalidConfig(String),
}

/// Name/address pair a notification is delivered to
#[derive(Debug, Clone)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

impl From<&sim_user::Model> for Recipient {
    fn from(user: &sim_user::Model) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Templated notifications sent around booking and override events
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn booking_confirmation(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError>;

    async fn booking_reminder(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError>;

    /// Sent to participants when their booking enters in-progress
    async fn booking_started(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError>;

    /// Announces a simulator freed ahead of schedule; `freed_from` is the
    /// moment the slot opened, the original end time closes the window
    async fn early_release(
        &self,
        to: &Recipient,
        booking: &booking::Model,
        freed_from: DateTime<Utc>,
    ) -> Result<(), NotifyError>;

    async fn override_requested(
        &self,
        to: &Recipient,
        requester: &Recipient,
        reason: &str,
        booking: &booking::Model,
    ) -> Result<(), NotifyError>;

    async fn override_approved(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError>;

    async fn override_rejected(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError>;

    async fn welcome(&self, to: &Recipient, initial_password: &str) -> Result<(), NotifyError>;

    async fn password_reset(&self, to: &Recipient, reset_link: &str)
        -> Result<(), NotifyError>;
}

/// Logs a failed send and drops it. The triggering operation has already
/// succeeded by the time a notification goes out.
pub fn log_failure(kind: &str, result: Result<(), NotifyError>) {
    if let Err(err) = result {
        warn!("Failed to send {} notification: {}", kind, err);
    }
}

/// Notifier used when no SMTP transport is configured; writes each
/// would-be send to the log instead.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn booking_confirmation(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        info!(
            "booking confirmation for '{}' to {} (no SMTP configured)",
            booking.title, to.email
        );
        Ok(())
    }

    async fn booking_reminder(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        info!(
            "booking reminder for '{}' to {} (no SMTP configured)",
            booking.title, to.email
        );
        Ok(())
    }

    async fn booking_started(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        info!(
            "booking started notice for '{}' to {} (no SMTP configured)",
            booking.title, to.email
        );
        Ok(())
    }

    async fn early_release(
        &self,
        to: &Recipient,
        booking: &booking::Model,
        freed_from: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        info!(
            "early release of {:?} from {} to {} (no SMTP configured)",
            booking.simulator, freed_from, to.email
        );
        Ok(())
    }

    async fn override_requested(
        &self,
        to: &Recipient,
        requester: &Recipient,
        _reason: &str,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        info!(
            "override request by {} on '{}' to {} (no SMTP configured)",
            requester.email, booking.title, to.email
        );
        Ok(())
    }

    async fn override_approved(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        info!(
            "override approval for '{}' to {} (no SMTP configured)",
            booking.title, to.email
        );
        Ok(())
    }

    async fn override_rejected(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        info!(
            "override rejection for '{}' to {} (no SMTP configured)",
            booking.title, to.email
        );
        Ok(())
    }

    async fn welcome(&self, to: &Recipient, _initial_password: &str) -> Result<(), NotifyError> {
        info!("welcome email to {} (no SMTP configured)", to.email);
        Ok(())
    }

    async fn password_reset(
        &self,
        to: &Recipient,
        _reset_link: &str,
    ) -> Result<(), NotifyError> {
        info!("password reset email to {} (no SMTP configured)", to.email);
        Ok(())
    }
}
