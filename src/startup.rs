use std::sync::Arc;

use tracing::info;

use crate::{
    config::Config,
    error::Error,
    notify::{smtp::SmtpNotifier, LogNotifier, Notifier},
};

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Build the email notifier: an SMTP transport when one is configured,
/// otherwise a log-only fallback
pub fn build_notifier(config: &Config) -> Result<Arc<dyn Notifier>, Error> {
    match &config.smtp {
        Some(smtp) => {
            info!("Sending notifications via SMTP relay {}", smtp.host);

            Ok(Arc::new(SmtpNotifier::new(smtp)?))
        }
        None => {
            info!("No SMTP transport configured; notifications are logged only");

            Ok(Arc::new(LogNotifier))
        }
    }
}
