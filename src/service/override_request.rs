use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel, TransactionTrait};

use entity::sea_orm_active_enums::{BookingStatus, RequestStatus};
use entity::{override_request, sim_user};

use crate::{
    data::{booking::BookingRepository, override_request::OverrideRequestRepository, user::UserRepository},
    error::Error,
    model::override_request::{BookingSummaryDto, CreateOverrideDto, OverrideRequestDto},
    model::user::UserRefDto,
    notify::{log_failure, Notifier, Recipient},
    service::booking::{validate_transition, TransitionPath},
    service::user::require_manager,
};

const MIN_REASON_LENGTH: usize = 10;

pub struct OverrideService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a dyn Notifier,
}

impl<'a> OverrideService<'a> {
    /// Creates a new instance of [`OverrideService`]
    pub fn new(db: &'a DatabaseConnection, notifier: &'a dyn Notifier) -> Self {
        Self { db, notifier }
    }

    async fn resolve(
        &self,
        request: override_request::Model,
    ) -> Result<OverrideRequestDto, Error> {
        let booking = BookingRepository::new(self.db)
            .find_by_id(request.booking_id)
            .await?
            .ok_or(Error::NotFound("Booking"))?;

        let requester = UserRepository::new(self.db)
            .find_by_id(request.requester_id)
            .await?
            .ok_or(Error::NotFound("Requester"))?;

        Ok(OverrideRequestDto {
            id: request.id,
            booking: BookingSummaryDto::from(&booking),
            requester: UserRefDto::from(&requester),
            reason: request.reason,
            status: request.status,
            department: request.department,
            created_at: request.created_at,
        })
    }

    /// Files an override request against a live booking. The row is
    /// persisted before the owner is notified, so a mail failure never
    /// loses the request.
    pub async fn request(
        &self,
        booking_id: i32,
        input: CreateOverrideDto,
        caller: &sim_user::Model,
    ) -> Result<OverrideRequestDto, Error> {
        let reason = input
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| r.len() >= MIN_REASON_LENGTH)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Override reason must be at least {} characters",
                    MIN_REASON_LENGTH
                ))
            })?;

        let booking = BookingRepository::new(self.db)
            .find_by_id(booking_id)
            .await?
            .ok_or(Error::NotFound("Booking"))?;

        if !matches!(
            booking.status,
            BookingStatus::Scheduled | BookingStatus::InProgress
        ) {
            return Err(Error::Validation(
                "Cannot request an override for a completed or cancelled booking".to_string(),
            ));
        }

        let request = OverrideRequestRepository::new(self.db)
            .create(
                booking.id,
                caller.id,
                reason.clone(),
                booking.department.clone(),
            )
            .await?;

        if let Some(owner) = UserRepository::new(self.db)
            .find_by_id(booking.created_by)
            .await?
        {
            log_failure(
                "override requested",
                self.notifier
                    .override_requested(&Recipient::from(&owner), &Recipient::from(caller), &reason, &booking)
                    .await,
            );
        }

        self.resolve(request).await
    }

    /// Pending requests of the manager's department, oldest first
    pub async fn list_pending(
        &self,
        caller: &sim_user::Model,
    ) -> Result<Vec<OverrideRequestDto>, Error> {
        require_manager(caller)?;

        let requests = OverrideRequestRepository::new(self.db)
            .list_pending(&caller.department)
            .await?;

        let mut resolved = Vec::with_capacity(requests.len());

        for request in requests {
            resolved.push(self.resolve(request).await?);
        }

        Ok(resolved)
    }

    /// Approves a pending request: the request flips to approved and the
    /// booking is cancelled via the override edge, both inside one
    /// transaction. The requester is notified after commit.
    pub async fn approve(
        &self,
        request_id: i32,
        caller: &sim_user::Model,
    ) -> Result<OverrideRequestDto, Error> {
        let (request, requester) = self.load_pending(request_id, caller).await?;

        let booking = BookingRepository::new(self.db)
            .find_by_id(request.booking_id)
            .await?
            .ok_or(Error::NotFound("Booking"))?;

        validate_transition(
            booking.status,
            BookingStatus::Cancelled,
            TransitionPath::Override,
        )?;

        let txn = self.db.begin().await?;

        let request = OverrideRequestRepository::new(&txn)
            .set_status(request, RequestStatus::Approved)
            .await?;

        let mut active = booking.clone().into_active_model();
        active.status = ActiveValue::Set(BookingStatus::Cancelled);
        active.updated_at = ActiveValue::Set(chrono::Utc::now());

        BookingRepository::new(&txn).update(active).await?;

        txn.commit().await?;

        log_failure(
            "override approved",
            self.notifier
                .override_approved(&Recipient::from(&requester), &booking)
                .await,
        );

        self.resolve(request).await
    }

    /// Rejects a pending request; the booking is left untouched
    pub async fn reject(
        &self,
        request_id: i32,
        caller: &sim_user::Model,
    ) -> Result<OverrideRequestDto, Error> {
        let (request, requester) = self.load_pending(request_id, caller).await?;

        let booking = BookingRepository::new(self.db)
            .find_by_id(request.booking_id)
            .await?
            .ok_or(Error::NotFound("Booking"))?;

        let request = OverrideRequestRepository::new(self.db)
            .set_status(request, RequestStatus::Rejected)
            .await?;

        log_failure(
            "override rejected",
            self.notifier
                .override_rejected(&Recipient::from(&requester), &booking)
                .await,
        );

        self.resolve(request).await
    }

    /// Loads a request for resolution: manager only, same department,
    /// still pending
    async fn load_pending(
        &self,
        request_id: i32,
        caller: &sim_user::Model,
    ) -> Result<(override_request::Model, sim_user::Model), Error> {
        require_manager(caller)?;

        let request = OverrideRequestRepository::new(self.db)
            .find_by_id(request_id)
            .await?
            .ok_or(Error::NotFound("Override request"))?;

        if request.department != caller.department {
            return Err(Error::Forbidden(
                "Request belongs to another department".to_string(),
            ));
        }

        if request.status != RequestStatus::Pending {
            return Err(Error::Validation(
                "Request has already been resolved".to_string(),
            ));
        }

        let requester = UserRepository::new(self.db)
            .find_by_id(request.requester_id)
            .await?
            .ok_or(Error::NotFound("Requester"))?;

        Ok((request, requester))
    }
}

#[cfg(test)]
mod tests {
    mod request_tests {
        use entity::sea_orm_active_enums::{BookingStatus, RequestStatus, Simulator};
        use sea_orm::EntityTrait;

        use crate::error::Error;
        use crate::model::override_request::CreateOverrideDto;
        use crate::service::override_request::OverrideService;
        use crate::util::test::setup::{
            create_booking, create_tables, create_user, set_booking_status, test_setup,
        };

        fn reason(text: &str) -> CreateOverrideDto {
            CreateOverrideDto {
                reason: Some(text.to_string()),
            }
        }

        /// Expect the request row to be persisted as pending with the
        /// booking's department, and the owner to be notified
        #[tokio::test]
        async fn test_request_persists_then_notifies() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let owner = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();
            let requester = create_user(&test.state.db, "U2", "u2@example.com", "P1", "Ops")
                .await
                .unwrap();

            let booking = create_booking(&test.state.db, owner.id, Simulator::Sim1, 0, 60)
                .await
                .unwrap();

            let service = OverrideService::new(&test.state.db, test.notifier.as_ref());

            let request = service
                .request(booking.id, reason("Urgent certification run"), &requester)
                .await
                .unwrap();

            assert_eq!(request.status, RequestStatus::Pending);
            assert_eq!(request.department, "Ops");
            assert_eq!(request.requester.id, requester.id);

            let stored = entity::prelude::OverrideRequest::find()
                .all(&test.state.db)
                .await
                .unwrap();
            assert_eq!(stored.len(), 1);

            let sent = test.notifier.sent();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].kind, "override_requested");
            assert_eq!(sent[0].to, "u1@example.com");
        }

        /// Expect short reasons to be rejected before anything is written
        #[tokio::test]
        async fn test_request_reason_too_short() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let owner = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();
            let booking = create_booking(&test.state.db, owner.id, Simulator::Sim1, 0, 60)
                .await
                .unwrap();

            let service = OverrideService::new(&test.state.db, test.notifier.as_ref());

            let result = service.request(booking.id, reason("too short"), &owner).await;

            assert!(matches!(result, Err(Error::Validation(_))));
            assert!(test.notifier.sent().is_empty());
        }

        /// Expect requests against terminal bookings to be rejected
        #[tokio::test]
        async fn test_request_terminal_booking() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let owner = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();
            let booking = create_booking(&test.state.db, owner.id, Simulator::Sim1, 0, 60)
                .await
                .unwrap();
            let booking = set_booking_status(&test.state.db, booking, BookingStatus::Cancelled)
                .await
                .unwrap();

            let service = OverrideService::new(&test.state.db, test.notifier.as_ref());

            let result = service
                .request(booking.id, reason("Urgent certification run"), &owner)
                .await;

            assert!(matches!(result, Err(Error::Validation(_))));
        }
    }

    mod resolution_tests {
        use entity::sea_orm_active_enums::{BookingStatus, RequestStatus, Simulator};

        use crate::data::booking::BookingRepository;
        use crate::error::Error;
        use crate::model::override_request::CreateOverrideDto;
        use crate::service::override_request::OverrideService;
        use crate::util::test::setup::{create_booking, create_tables, create_user, test_setup};

        async fn seed(
            test: &crate::util::test::setup::TestSetup,
        ) -> (entity::sim_user::Model, entity::booking::Model, i32) {
            let owner = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();
            let requester = create_user(&test.state.db, "U2", "u2@example.com", "P1", "Ops")
                .await
                .unwrap();
            let manager = create_user(&test.state.db, "M1", "m1@example.com", "manager", "Ops")
                .await
                .unwrap();

            let booking = create_booking(&test.state.db, owner.id, Simulator::Sim1, 0, 60)
                .await
                .unwrap();

            let service = OverrideService::new(&test.state.db, test.notifier.as_ref());

            let request = service
                .request(
                    booking.id,
                    CreateOverrideDto {
                        reason: Some("Urgent certification run".to_string()),
                    },
                    &requester,
                )
                .await
                .unwrap();

            (manager, booking, request.id)
        }

        /// Expect approval to cancel the booking and flip the request to
        /// approved, then notify the requester
        #[tokio::test]
        async fn test_approve() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let (manager, booking, request_id) = seed(&test).await;

            let service = OverrideService::new(&test.state.db, test.notifier.as_ref());

            let resolved = service.approve(request_id, &manager).await.unwrap();

            assert_eq!(resolved.status, RequestStatus::Approved);

            let booking = BookingRepository::new(&test.state.db)
                .find_by_id(booking.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(booking.status, BookingStatus::Cancelled);

            let sent = test.notifier.sent();
            assert!(sent
                .iter()
                .any(|s| s.kind == "override_approved" && s.to == "u2@example.com"));
        }

        /// Expect rejection to leave the booking untouched
        #[tokio::test]
        async fn test_reject() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let (manager, booking, request_id) = seed(&test).await;

            let service = OverrideService::new(&test.state.db, test.notifier.as_ref());

            let resolved = service.reject(request_id, &manager).await.unwrap();

            assert_eq!(resolved.status, RequestStatus::Rejected);

            let booking = BookingRepository::new(&test.state.db)
                .find_by_id(booking.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(booking.status, BookingStatus::Scheduled);

            let sent = test.notifier.sent();
            assert!(sent
                .iter()
                .any(|s| s.kind == "override_rejected" && s.to == "u2@example.com"));
        }

        /// Expect an already-resolved request to be rejected as a
        /// validation error on the second resolution
        #[tokio::test]
        async fn test_resolve_twice() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let (manager, _, request_id) = seed(&test).await;

            let service = OverrideService::new(&test.state.db, test.notifier.as_ref());

            service.approve(request_id, &manager).await.unwrap();

            let result = service.approve(request_id, &manager).await;

            assert!(matches!(result, Err(Error::Validation(_))));
        }

        /// Expect non-managers and managers of other departments to be
        /// denied
        #[tokio::test]
        async fn test_resolution_access() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let (_, _, request_id) = seed(&test).await;

            let outsider = create_user(
                &test.state.db,
                "M2",
                "m2@example.com",
                "manager",
                "Engineering",
            )
            .await
            .unwrap();
            let regular = create_user(&test.state.db, "U3", "u3@example.com", "P3", "Ops")
                .await
                .unwrap();

            let service = OverrideService::new(&test.state.db, test.notifier.as_ref());

            assert!(matches!(
                service.approve(request_id, &regular).await,
                Err(Error::Forbidden(_))
            ));
            assert!(matches!(
                service.approve(request_id, &outsider).await,
                Err(Error::Forbidden(_))
            ));
        }

        /// Expect pending listings to be department-scoped and oldest
        /// first
        #[tokio::test]
        async fn test_list_pending_scope() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let (manager, _, request_id) = seed(&test).await;

            // A second request in another department
            let other_owner = create_user(
                &test.state.db,
                "U9",
                "u9@example.com",
                "P2",
                "Engineering",
            )
            .await
            .unwrap();
            let other_booking =
                create_booking(&test.state.db, other_owner.id, Simulator::Sim2, 0, 60)
                    .await
                    .unwrap();

            let service = OverrideService::new(&test.state.db, test.notifier.as_ref());

            service
                .request(
                    other_booking.id,
                    CreateOverrideDto {
                        reason: Some("Blocked on simulator time".to_string()),
                    },
                    &other_owner,
                )
                .await
                .unwrap();

            let pending = service.list_pending(&manager).await.unwrap();

            assert_eq!(pending.len(), 1);
            assert_eq!(pending[0].id, request_id);
        }
    }
}
