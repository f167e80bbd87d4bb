//! Cron-based dispatch of durable booking reminders.
//!
//! Reminders are persisted rows rather than in-process timers, so a
//! restart never loses them. A recurring job polls for rows whose fire
//! time has passed and mails them out.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error};

use crate::{error::Error, notify::Notifier};

pub mod reminder;

/// Every minute, on the minute
const REMINDER_CRON_EXPRESSION: &str = "0 * * * * *";

pub struct Scheduler {
    db: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`]
    pub async fn new(db: DatabaseConnection, notifier: Arc<dyn Notifier>) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self {
            db,
            notifier,
            sched,
        })
    }

    /// Registers the reminder dispatch job and starts the scheduler
    pub async fn start(mut self) -> Result<(), Error> {
        self.schedule_job(
            REMINDER_CRON_EXPRESSION,
            "booking reminder",
            reminder::dispatch_due_reminders,
        )
        .await?;

        self.sched.start().await?;

        Ok(())
    }

    /// Schedules a recurring job with the specified cron expression. The
    /// function receives clones of the database connection and notifier
    /// and returns how many items it dispatched.
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(DatabaseConnection, Arc<dyn Notifier>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let db = self.db.clone();
        let notifier = Arc::clone(&self.notifier);
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let db = db.clone();
                let notifier = Arc::clone(&notifier);
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(db, notifier).await {
                        Ok(count) => debug!("Dispatched {} {} item(s)", count, name),
                        Err(e) => error!("Error dispatching {} items: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
