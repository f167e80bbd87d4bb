use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use entity::override_request;
use entity::sea_orm_active_enums::RequestStatus;

pub struct OverrideRequestRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OverrideRequestRepository<'a, C> {
    /// Creates a new instance of [`OverrideRequestRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a pending override request. The row is written before any
    /// notification goes out so a request is never lost to a mail failure.
    pub async fn create(
        &self,
        booking_id: i32,
        requester_id: i32,
        reason: String,
        department: String,
    ) -> Result<override_request::Model, DbErr> {
        let request = override_request::ActiveModel {
            booking_id: ActiveValue::Set(booking_id),
            requester_id: ActiveValue::Set(requester_id),
            reason: ActiveValue::Set(reason),
            status: ActiveValue::Set(RequestStatus::Pending),
            department: ActiveValue::Set(department),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };

        request.insert(self.db).await
    }

    pub async fn find_by_id(
        &self,
        request_id: i32,
    ) -> Result<Option<override_request::Model>, DbErr> {
        entity::prelude::OverrideRequest::find_by_id(request_id)
            .one(self.db)
            .await
    }

    /// Marks a request approved or rejected
    pub async fn set_status(
        &self,
        request: override_request::Model,
        status: RequestStatus,
    ) -> Result<override_request::Model, DbErr> {
        let mut request = request.into_active_model();

        request.status = ActiveValue::Set(status);

        request.update(self.db).await
    }

    /// Pending requests of a department, oldest first
    pub async fn list_pending(
        &self,
        department: &str,
    ) -> Result<Vec<override_request::Model>, DbErr> {
        entity::prelude::OverrideRequest::find()
            .filter(override_request::Column::Department.eq(department))
            .filter(override_request::Column::Status.eq(RequestStatus::Pending))
            .order_by_asc(override_request::Column::CreatedAt)
            .all(self.db)
            .await
    }
}
