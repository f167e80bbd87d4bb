//! SMTP-backed [`Notifier`] implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::{
    message::Mailbox,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use entity::booking;

use crate::config::SmtpConfig;
use crate::notify::{template, template::Email, Notifier, NotifyError, Recipient};

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::InvalidConfig(format!("SMTP relay error: {}", e)))?
            .port(config.port);

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let from = config
            .from_address
            .parse()
            .map_err(|e| NotifyError::InvalidConfig(format!("Invalid from address: {}", e)))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    async fn send(&self, to: &Recipient, email: Email) -> Result<(), NotifyError> {
        let to_mailbox: Mailbox = format!("{} <{}>", to.name, to.email)
            .parse()
            .map_err(|e| NotifyError::SendFailed(format!("Invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(email.subject)
            .body(email.body)
            .map_err(|e| NotifyError::SendFailed(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn booking_confirmation(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        self.send(to, template::booking_confirmation(to, booking)).await
    }

    async fn booking_reminder(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        self.send(to, template::booking_reminder(to, booking)).await
    }

    async fn booking_started(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        self.send(to, template::booking_started(to, booking)).await
    }

    async fn early_release(
        &self,
        to: &Recipient,
        booking: &booking::Model,
        freed_from: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        self.send(to, template::early_release(to, booking, freed_from))
            .await
    }

    async fn override_requested(
        &self,
        to: &Recipient,
        requester: &Recipient,
        reason: &str,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        self.send(to, template::override_requested(to, requester, reason, booking))
            .await
    }

    async fn override_approved(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        self.send(to, template::override_approved(to, booking)).await
    }

    async fn override_rejected(
        &self,
        to: &Recipient,
        booking: &booking::Model,
    ) -> Result<(), NotifyError> {
        self.send(to, template::override_rejected(to, booking)).await
    }

    async fn welcome(&self, to: &Recipient, initial_password: &str) -> Result<(), NotifyError> {
        self.send(to, template::welcome(to, initial_password)).await
    }

    async fn password_reset(
        &self,
        to: &Recipient,
        reset_link: &str,
    ) -> Result<(), NotifyError> {
        self.send(to, template::password_reset(to, reset_link)).await
    }
}
