use sea_orm::DatabaseConnection;

use entity::sea_orm_active_enums::{RequestStatus, Role};
use entity::sim_user;

use crate::{
    data::user::{NewUser, UserRepository},
    error::Error,
    model::employee::{AddEmployeeDto, RoleRequestDto},
    model::user::{Permissions, UserDto},
    notify::{log_failure, Notifier, Recipient},
    service::auth::{hash_password, is_strong_password, is_valid_email, parse_role},
};

pub fn require_manager(user: &sim_user::Model) -> Result<(), Error> {
    if user.role != Role::Manager {
        return Err(Error::Forbidden(
            "Access denied. Managers only.".to_string(),
        ));
    }

    Ok(())
}

fn role_request_dto(user: &sim_user::Model) -> Option<RoleRequestDto> {
    let requested_role = user.requested_role?;

    Some(RoleRequestDto {
        id: user.id,
        employee: user.name.clone(),
        current_role: user.role,
        requested_role,
        reason: user.role_request_reason.clone(),
        request_date: user.role_request_date,
        status: user.role_request_status.unwrap_or(RequestStatus::Pending),
    })
}

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
    notifier: &'a dyn Notifier,
}

impl<'a> UserService<'a> {
    /// Creates a new instance of [`UserService`]
    pub fn new(db: &'a DatabaseConnection, notifier: &'a dyn Notifier) -> Self {
        Self { db, notifier }
    }

    /// Non-manager employees of the caller's department
    pub async fn list_employees(&self, caller: &sim_user::Model) -> Result<Vec<UserDto>, Error> {
        require_manager(caller)?;

        let employees = UserRepository::new(self.db)
            .list_department_employees(&caller.department)
            .await?;

        Ok(employees.into_iter().map(UserDto::from).collect())
    }

    /// Creates an employee account in the caller's department. The new
    /// account always lands in the caller's department regardless of any
    /// department supplied in the payload, and managers cannot mint
    /// other managers here.
    pub async fn add_employee(
        &self,
        input: AddEmployeeDto,
        caller: &sim_user::Model,
    ) -> Result<UserDto, Error> {
        require_manager(caller)?;

        let name = input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| (2..=50).contains(&n.len()))
            .ok_or_else(|| {
                Error::Validation("Name must be between 2 and 50 characters".to_string())
            })?;

        let email = input
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| is_valid_email(e))
            .ok_or_else(|| Error::Validation("A valid email is required".to_string()))?;

        let password = input
            .password
            .filter(|p| is_strong_password(p))
            .ok_or_else(|| {
                Error::Validation(
                    "Password must be at least 8 characters with uppercase, lowercase, \
                     number and special character"
                        .to_string(),
                )
            })?;

        let role = parse_role(
            &input
                .role
                .ok_or_else(|| Error::Validation("Role is required".to_string()))?,
        )?;

        if role == Role::Manager {
            return Err(Error::Validation(
                "Managers cannot create other manager accounts".to_string(),
            ));
        }

        let repository = UserRepository::new(self.db);

        if repository.find_by_email(&email).await?.is_some() {
            return Err(Error::Validation("User already exists".to_string()));
        }

        let password_hash = hash_password(&password)?;

        let user = repository
            .create(
                NewUser {
                    name,
                    email: email.clone(),
                    password_hash,
                    role,
                    department: caller.department.clone(),
                },
                Permissions::for_role(role),
            )
            .await?;

        log_failure(
            "welcome",
            self.notifier
                .welcome(&Recipient::from(&user), &password)
                .await,
        );

        Ok(UserDto::from(user))
    }

    /// Role-change requests on file in the caller's department, oldest
    /// first
    pub async fn list_role_requests(
        &self,
        caller: &sim_user::Model,
    ) -> Result<Vec<RoleRequestDto>, Error> {
        require_manager(caller)?;

        let users = UserRepository::new(self.db)
            .list_role_requests(&caller.department)
            .await?;

        Ok(users.iter().filter_map(role_request_dto).collect())
    }

    /// Approves an employee's role-change request: the requested role is
    /// applied and the permission flags recomputed from it
    pub async fn approve_role_request(
        &self,
        employee_id: i32,
        caller: &sim_user::Model,
    ) -> Result<UserDto, Error> {
        let (employee, requested_role) = self.load_pending_request(employee_id, caller).await?;

        let employee = UserRepository::new(self.db)
            .resolve_role_request(
                employee,
                RequestStatus::Approved,
                Some((requested_role, Permissions::for_role(requested_role))),
            )
            .await?;

        Ok(UserDto::from(employee))
    }

    /// Rejects an employee's role-change request, leaving their role as is
    pub async fn reject_role_request(
        &self,
        employee_id: i32,
        caller: &sim_user::Model,
    ) -> Result<UserDto, Error> {
        let (employee, _) = self.load_pending_request(employee_id, caller).await?;

        let employee = UserRepository::new(self.db)
            .resolve_role_request(employee, RequestStatus::Rejected, None)
            .await?;

        Ok(UserDto::from(employee))
    }

    async fn load_pending_request(
        &self,
        employee_id: i32,
        caller: &sim_user::Model,
    ) -> Result<(sim_user::Model, Role), Error> {
        require_manager(caller)?;

        let employee = UserRepository::new(self.db)
            .find_by_id(employee_id)
            .await?
            .ok_or(Error::NotFound("Employee"))?;

        if employee.department != caller.department {
            return Err(Error::Forbidden(
                "Employee belongs to another department".to_string(),
            ));
        }

        let requested_role = employee
            .requested_role
            .ok_or_else(|| Error::Validation("No role request on file".to_string()))?;

        Ok((employee, requested_role))
    }
}

#[cfg(test)]
mod tests {
    mod permission_tests {
        use entity::sea_orm_active_enums::Role;

        use crate::model::user::Permissions;

        /// Expect managers to hold every flag and P-tiers to manage and
        /// view bookings only
        #[test]
        fn test_permissions_for_role() {
            let manager = Permissions::for_role(Role::Manager);

            assert!(manager.can_manage_users);
            assert!(manager.can_manage_bookings);
            assert!(manager.can_view_bookings);
            assert!(manager.can_view_reports);

            for role in [Role::P1, Role::P2, Role::P3, Role::P4] {
                let permissions = Permissions::for_role(role);

                assert!(!permissions.can_manage_users);
                assert!(permissions.can_manage_bookings);
                assert!(permissions.can_view_bookings);
                assert!(!permissions.can_view_reports);
            }
        }
    }

    mod add_employee_tests {
        use crate::error::Error;
        use crate::model::employee::AddEmployeeDto;
        use crate::service::user::UserService;
        use crate::util::test::setup::{create_tables, create_user, test_setup};

        fn employee_input() -> AddEmployeeDto {
            AddEmployeeDto {
                name: Some("New Hire".to_string()),
                email: Some("hire@example.com".to_string()),
                password: Some("Str0ng!Pass".to_string()),
                role: Some("P3".to_string()),
                department: None,
            }
        }

        /// Expect the account to land in the manager's department with
        /// flags derived from the role, plus a welcome notification
        #[tokio::test]
        async fn test_add_employee() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let manager = create_user(&test.state.db, "M1", "m1@example.com", "manager", "Ops")
                .await
                .unwrap();

            let service = UserService::new(&test.state.db, test.notifier.as_ref());

            let employee = service.add_employee(employee_input(), &manager).await.unwrap();

            assert_eq!(employee.department, "Ops");
            assert!(employee.permissions.can_manage_bookings);
            assert!(!employee.permissions.can_manage_users);

            let sent = test.notifier.sent();
            assert!(sent
                .iter()
                .any(|s| s.kind == "welcome" && s.to == "hire@example.com"));
        }

        /// Expect non-managers to be denied
        #[tokio::test]
        async fn test_add_employee_requires_manager() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let regular = create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();

            let service = UserService::new(&test.state.db, test.notifier.as_ref());

            assert!(matches!(
                service.add_employee(employee_input(), &regular).await,
                Err(Error::Forbidden(_))
            ));
        }

        /// Expect weak passwords, manager roles, and duplicate emails to
        /// be rejected
        #[tokio::test]
        async fn test_add_employee_validation() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let manager = create_user(&test.state.db, "M1", "m1@example.com", "manager", "Ops")
                .await
                .unwrap();

            let service = UserService::new(&test.state.db, test.notifier.as_ref());

            let mut weak = employee_input();
            weak.password = Some("password".to_string());
            assert!(matches!(
                service.add_employee(weak, &manager).await,
                Err(Error::Validation(_))
            ));

            let mut as_manager = employee_input();
            as_manager.role = Some("manager".to_string());
            assert!(matches!(
                service.add_employee(as_manager, &manager).await,
                Err(Error::Validation(_))
            ));

            service.add_employee(employee_input(), &manager).await.unwrap();

            assert!(matches!(
                service.add_employee(employee_input(), &manager).await,
                Err(Error::Validation(_))
            ));
        }
    }

    mod role_request_tests {
        use entity::sea_orm_active_enums::{RequestStatus, Role};
        use sea_orm::EntityTrait;

        use crate::error::Error;
        use crate::model::user::RoleChangeRequestDto;
        use crate::service::auth::AuthService;
        use crate::service::user::UserService;
        use crate::util::test::setup::{create_tables, create_user, test_setup};

        async fn file_request(db: &sea_orm::DatabaseConnection, user: &entity::sim_user::Model) {
            AuthService::new(db)
                .request_role_change(
                    user.clone(),
                    RoleChangeRequestDto {
                        requested_role: Some("P1".to_string()),
                        reason: Some("Completed advanced certification".to_string()),
                    },
                )
                .await
                .unwrap()
        }

        /// Expect approval to apply the requested role, recompute the
        /// permission flags, and clear the request
        #[tokio::test]
        async fn test_approve_role_request() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let manager = create_user(&test.state.db, "M1", "m1@example.com", "manager", "Ops")
                .await
                .unwrap();
            let employee = create_user(&test.state.db, "U1", "u1@example.com", "P3", "Ops")
                .await
                .unwrap();

            file_request(&test.state.db, &employee).await;

            let service = UserService::new(&test.state.db, test.notifier.as_ref());

            let pending = service.list_role_requests(&manager).await.unwrap();
            assert_eq!(pending.len(), 1);
            assert_eq!(pending[0].requested_role, Role::P1);

            let updated = service
                .approve_role_request(employee.id, &manager)
                .await
                .unwrap();

            assert_eq!(updated.role, Role::P1);
            assert!(updated.permissions.can_manage_bookings);

            let stored = entity::prelude::SimUser::find_by_id(employee.id)
                .one(&test.state.db)
                .await
                .unwrap()
                .unwrap();

            assert!(stored.requested_role.is_none());
            assert_eq!(stored.role_request_status, Some(RequestStatus::Approved));

            assert!(service.list_role_requests(&manager).await.unwrap().is_empty());
        }

        /// Expect rejection to leave the role untouched
        #[tokio::test]
        async fn test_reject_role_request() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let manager = create_user(&test.state.db, "M1", "m1@example.com", "manager", "Ops")
                .await
                .unwrap();
            let employee = create_user(&test.state.db, "U1", "u1@example.com", "P3", "Ops")
                .await
                .unwrap();

            file_request(&test.state.db, &employee).await;

            let service = UserService::new(&test.state.db, test.notifier.as_ref());

            let updated = service
                .reject_role_request(employee.id, &manager)
                .await
                .unwrap();

            assert_eq!(updated.role, Role::P3);
        }

        /// Expect managers of other departments to be denied
        #[tokio::test]
        async fn test_role_request_department_scope() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let outsider = create_user(
                &test.state.db,
                "M2",
                "m2@example.com",
                "manager",
                "Engineering",
            )
            .await
            .unwrap();
            let employee = create_user(&test.state.db, "U1", "u1@example.com", "P3", "Ops")
                .await
                .unwrap();

            file_request(&test.state.db, &employee).await;

            let service = UserService::new(&test.state.db, test.notifier.as_ref());

            assert!(matches!(
                service.approve_role_request(employee.id, &outsider).await,
                Err(Error::Forbidden(_))
            ));
        }
    }

    mod list_employee_tests {
        use crate::service::user::UserService;
        use crate::util::test::setup::{create_tables, create_user, test_setup};

        /// Expect the listing to cover non-manager users of the caller's
        /// department only
        #[tokio::test]
        async fn test_list_employees_scope() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let manager = create_user(&test.state.db, "M1", "m1@example.com", "manager", "Ops")
                .await
                .unwrap();
            create_user(&test.state.db, "U1", "u1@example.com", "P2", "Ops")
                .await
                .unwrap();
            create_user(&test.state.db, "U2", "u2@example.com", "P2", "Engineering")
                .await
                .unwrap();
            create_user(&test.state.db, "M2", "m2@example.com", "manager", "Ops")
                .await
                .unwrap();

            let service = UserService::new(&test.state.db, test.notifier.as_ref());

            let employees = service.list_employees(&manager).await.unwrap();

            assert_eq!(employees.len(), 1);
            assert_eq!(employees[0].email, "u1@example.com");
        }
    }
}
