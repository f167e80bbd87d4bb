use crate::error::Error;

/// SMTP transport settings. When absent the server falls back to a
/// log-only notifier, which is the normal mode in development.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
}

pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub listen_port: u16,
    /// Minutes before a booking's start time at which the reminder fires.
    pub reminder_lead_minutes: i64,
    pub smtp: Option<SmtpConfig>,
}

fn required(var: &str) -> Result<String, Error> {
    std::env::var(var).map_err(|_| Error::MissingEnvVar(var.to_string()))
}

fn optional(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

fn parse_u16(var: &str, value: String) -> Result<u16, Error> {
    value.parse().map_err(|_| Error::InvalidEnvValue {
        var: var.to_string(),
        reason: format!("expected a port number, got {:?}", value),
    })
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let listen_port = match optional("PORT") {
            Some(value) => parse_u16("PORT", value)?,
            None => 8080,
        };

        let reminder_lead_minutes = match optional("REMINDER_LEAD_MINUTES") {
            Some(value) => value.parse().map_err(|_| Error::InvalidEnvValue {
                var: "REMINDER_LEAD_MINUTES".to_string(),
                reason: format!("expected minutes, got {:?}", value),
            })?,
            None => 60,
        };

        let smtp = match optional("SMTP_HOST") {
            Some(host) => {
                let port = match optional("SMTP_PORT") {
                    Some(value) => parse_u16("SMTP_PORT", value)?,
                    None => 587,
                };

                Some(SmtpConfig {
                    host,
                    port,
                    username: optional("SMTP_USER"),
                    password: optional("SMTP_PASS"),
                    from_address: required("SMTP_FROM")?,
                })
            }
            None => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            frontend_url: required("FRONTEND_URL")?,
            listen_port,
            reminder_lead_minutes,
            smtp,
        })
    }
}
