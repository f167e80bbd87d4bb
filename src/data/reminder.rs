use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use entity::reminder;

pub struct ReminderRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ReminderRepository<'a, C> {
    /// Creates a new instance of [`ReminderRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        booking_id: i32,
        user_id: i32,
        fire_at: DateTime<Utc>,
    ) -> Result<reminder::Model, DbErr> {
        let reminder = reminder::ActiveModel {
            booking_id: ActiveValue::Set(booking_id),
            user_id: ActiveValue::Set(user_id),
            fire_at: ActiveValue::Set(fire_at),
            delivered: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };

        reminder.insert(self.db).await
    }

    /// Undelivered reminders whose fire time has passed, oldest first
    pub async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<reminder::Model>, DbErr> {
        entity::prelude::Reminder::find()
            .filter(reminder::Column::Delivered.eq(false))
            .filter(reminder::Column::FireAt.lte(now))
            .order_by_asc(reminder::Column::FireAt)
            .all(self.db)
            .await
    }

    pub async fn mark_delivered(
        &self,
        reminder: reminder::Model,
    ) -> Result<reminder::Model, DbErr> {
        let mut reminder = reminder.into_active_model();

        reminder.delivered = ActiveValue::Set(true);

        reminder.update(self.db).await
    }
}
