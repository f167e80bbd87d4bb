use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use entity::sea_orm_active_enums::{Role, UserStatus};

/// Permission flags carried on every user row.
///
/// Flags are never edited directly; they are recomputed from the role via
/// [`Permissions::for_role`] at every point the role is set or changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_manage_users: bool,
    pub can_manage_bookings: bool,
    pub can_view_bookings: bool,
    pub can_view_reports: bool,
}

impl Permissions {
    /// Derives the permission set a role grants. Managers hold every flag;
    /// the P-tiers can manage and view bookings only.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Manager => Self {
                can_manage_users: true,
                can_manage_bookings: true,
                can_view_bookings: true,
                can_view_reports: true,
            },
            Role::P1 | Role::P2 | Role::P3 | Role::P4 => Self {
                can_manage_users: false,
                can_manage_bookings: true,
                can_view_bookings: true,
                can_view_reports: false,
            },
        }
    }
}

/// Full user payload, password hash excluded
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[schema(value_type = String)]
    pub role: Role,
    pub department: String,
    #[schema(value_type = String)]
    pub status: UserStatus,
    pub permissions: Permissions,
}

impl From<entity::sim_user::Model> for UserDto {
    fn from(user: entity::sim_user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            department: user.department,
            status: user.status,
            permissions: Permissions {
                can_manage_users: user.can_manage_users,
                can_manage_bookings: user.can_manage_bookings,
                can_view_bookings: user.can_view_bookings,
                can_view_reports: user.can_view_reports,
            },
        }
    }
}

/// Minimal user reference used when resolving booking creators,
/// participants, and override requesters
#[derive(Serialize, Deserialize, ToSchema)]
pub struct UserRefDto {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<&entity::sim_user::Model> for UserRefDto {
    fn from(user: &entity::sim_user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginDto {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token plus user payload returned by register and login
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    pub token: String,
    pub user: UserDto,
}

#[derive(Deserialize, ToSchema)]
pub struct ForgotPasswordDto {
    pub email: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ResetPasswordDto {
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleChangeRequestDto {
    pub requested_role: Option<String>,
    pub reason: Option<String>,
}
