use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use entity::sea_orm_active_enums::{RequestStatus, Role, UserStatus};
use entity::sim_user;

use crate::model::user::Permissions;

/// Field set required to insert a user row. Permission flags are supplied
/// separately so the caller always derives them from the role.
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub department: String,
}

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        new_user: NewUser,
        permissions: Permissions,
    ) -> Result<sim_user::Model, DbErr> {
        let user = sim_user::ActiveModel {
            name: ActiveValue::Set(new_user.name),
            email: ActiveValue::Set(new_user.email),
            password_hash: ActiveValue::Set(new_user.password_hash),
            role: ActiveValue::Set(new_user.role),
            department: ActiveValue::Set(new_user.department),
            status: ActiveValue::Set(UserStatus::Active),
            can_manage_users: ActiveValue::Set(permissions.can_manage_users),
            can_manage_bookings: ActiveValue::Set(permissions.can_manage_bookings),
            can_view_bookings: ActiveValue::Set(permissions.can_view_bookings),
            can_view_reports: ActiveValue::Set(permissions.can_view_reports),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };

        user.insert(self.db).await
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<sim_user::Model>, DbErr> {
        entity::prelude::SimUser::find_by_id(user_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<sim_user::Model>, DbErr> {
        entity::prelude::SimUser::find()
            .filter(sim_user::Column::Email.eq(email))
            .one(self.db)
            .await
    }

    /// Finds the user holding an unexpired password reset token
    pub async fn find_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<sim_user::Model>, DbErr> {
        entity::prelude::SimUser::find()
            .filter(sim_user::Column::ResetPasswordToken.eq(token))
            .filter(sim_user::Column::ResetPasswordExpires.gt(now))
            .one(self.db)
            .await
    }

    /// Non-manager users of a department, for the manager employee table
    pub async fn list_department_employees(
        &self,
        department: &str,
    ) -> Result<Vec<sim_user::Model>, DbErr> {
        entity::prelude::SimUser::find()
            .filter(sim_user::Column::Department.eq(department))
            .filter(sim_user::Column::Role.ne(Role::Manager))
            .order_by_asc(sim_user::Column::Name)
            .all(self.db)
            .await
    }

    /// Active users of a department other than `except_user_id`, the
    /// audience for early-release broadcasts
    pub async fn list_department_recipients(
        &self,
        department: &str,
        except_user_id: i32,
    ) -> Result<Vec<sim_user::Model>, DbErr> {
        entity::prelude::SimUser::find()
            .filter(sim_user::Column::Department.eq(department))
            .filter(sim_user::Column::Id.ne(except_user_id))
            .filter(sim_user::Column::Status.eq(UserStatus::Active))
            .all(self.db)
            .await
    }

    /// Users of a department with a role-change request on file
    pub async fn list_role_requests(
        &self,
        department: &str,
    ) -> Result<Vec<sim_user::Model>, DbErr> {
        entity::prelude::SimUser::find()
            .filter(sim_user::Column::Department.eq(department))
            .filter(sim_user::Column::RequestedRole.is_not_null())
            .order_by_asc(sim_user::Column::RoleRequestDate)
            .all(self.db)
            .await
    }

    pub async fn set_password(
        &self,
        user: sim_user::Model,
        password_hash: String,
    ) -> Result<sim_user::Model, DbErr> {
        let mut user = user.into_active_model();

        user.password_hash = ActiveValue::Set(password_hash);
        user.reset_password_token = ActiveValue::Set(None);
        user.reset_password_expires = ActiveValue::Set(None);

        user.update(self.db).await
    }

    pub async fn set_reset_token(
        &self,
        user: sim_user::Model,
        token: String,
        expires: DateTime<Utc>,
    ) -> Result<sim_user::Model, DbErr> {
        let mut user = user.into_active_model();

        user.reset_password_token = ActiveValue::Set(Some(token));
        user.reset_password_expires = ActiveValue::Set(Some(expires));

        user.update(self.db).await
    }

    pub async fn store_role_request(
        &self,
        user: sim_user::Model,
        requested_role: Role,
        reason: String,
    ) -> Result<sim_user::Model, DbErr> {
        let mut user = user.into_active_model();

        user.requested_role = ActiveValue::Set(Some(requested_role));
        user.role_request_reason = ActiveValue::Set(Some(reason));
        user.role_request_date = ActiveValue::Set(Some(Utc::now()));
        user.role_request_status = ActiveValue::Set(Some(RequestStatus::Pending));

        user.update(self.db).await
    }

    /// Clears a role-change request, optionally applying the new role and
    /// its derived permission flags when the request was approved
    pub async fn resolve_role_request(
        &self,
        user: sim_user::Model,
        outcome: RequestStatus,
        new_role: Option<(Role, Permissions)>,
    ) -> Result<sim_user::Model, DbErr> {
        let mut user = user.into_active_model();

        if let Some((role, permissions)) = new_role {
            user.role = ActiveValue::Set(role);
            user.can_manage_users = ActiveValue::Set(permissions.can_manage_users);
            user.can_manage_bookings = ActiveValue::Set(permissions.can_manage_bookings);
            user.can_view_bookings = ActiveValue::Set(permissions.can_view_bookings);
            user.can_view_reports = ActiveValue::Set(permissions.can_view_reports);
        }

        user.requested_role = ActiveValue::Set(None);
        user.role_request_reason = ActiveValue::Set(None);
        user.role_request_date = ActiveValue::Set(None);
        user.role_request_status = ActiveValue::Set(Some(outcome));

        user.update(self.db).await
    }
}

#[cfg(test)]
mod tests {
    mod reset_token_tests {
        use chrono::{Duration, Utc};

        use crate::data::user::UserRepository;
        use crate::util::test::setup::{create_tables, create_user, test_setup};

        /// Expect an unexpired token to resolve and an expired one not to
        #[tokio::test]
        async fn test_find_by_reset_token_expiry() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let user = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();

            let repository = UserRepository::new(&test.state.db);

            let user = repository
                .set_reset_token(
                    user,
                    "token-a".to_string(),
                    Utc::now() + Duration::hours(1),
                )
                .await
                .unwrap();

            assert!(repository
                .find_by_reset_token("token-a", Utc::now())
                .await
                .unwrap()
                .is_some());
            assert!(repository
                .find_by_reset_token("token-b", Utc::now())
                .await
                .unwrap()
                .is_none());

            repository
                .set_reset_token(
                    user,
                    "token-a".to_string(),
                    Utc::now() - Duration::minutes(1),
                )
                .await
                .unwrap();

            assert!(repository
                .find_by_reset_token("token-a", Utc::now())
                .await
                .unwrap()
                .is_none());
        }
    }

    mod recipient_tests {
        use entity::sea_orm_active_enums::UserStatus;
        use sea_orm::{ActiveModelTrait, ActiveValue, IntoActiveModel};

        use crate::data::user::UserRepository;
        use crate::util::test::setup::{create_tables, create_user, test_setup};

        /// Expect broadcasts to cover active same-department users only,
        /// never the excluded caller
        #[tokio::test]
        async fn test_department_recipients() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let caller = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();
            create_user(&test.state.db, "U2", "u2@example.com", "P2", "Ops")
                .await
                .unwrap();
            create_user(&test.state.db, "U3", "u3@example.com", "P2", "Engineering")
                .await
                .unwrap();

            let inactive = create_user(&test.state.db, "U4", "u4@example.com", "P2", "Ops")
                .await
                .unwrap();
            let mut inactive = inactive.into_active_model();
            inactive.status = ActiveValue::Set(UserStatus::Inactive);
            inactive.update(&test.state.db).await.unwrap();

            let recipients = UserRepository::new(&test.state.db)
                .list_department_recipients("Ops", caller.id)
                .await
                .unwrap();

            assert_eq!(recipients.len(), 1);
            assert_eq!(recipients[0].email, "u2@example.com");
        }
    }
}
