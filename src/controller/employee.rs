use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::Error,
    model::{
        api::ErrorDto,
        app::AppState,
        auth::AuthUser,
        employee::{AddEmployeeDto, RoleRequestDto},
        user::UserDto,
    },
    service::user::UserService,
};

pub static EMPLOYEE_TAG: &str = "employee";

/// Lists non-manager employees of the manager's department
///
/// # Responses
/// - 200 (OK): Employees ordered by name
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller is not a manager
#[utoipa::path(
    get,
    path = "/api/employees/list",
    tag = EMPLOYEE_TAG,
    responses(
        (status = 200, description = "Department employees", body = Vec<UserDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Managers only", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_employees(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, Error> {
    let employees = UserService::new(&state.db, state.notifier.as_ref())
        .list_employees(&user)
        .await?;

    Ok(Json(employees))
}

/// Creates an employee account in the manager's department. The new
/// employee receives a welcome email carrying their initial password.
///
/// # Responses
/// - 201 (Created): The new employee account
/// - 400 (Bad Request): Invalid fields, weak password, or email taken
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller is not a manager
#[utoipa::path(
    post,
    path = "/api/employees/add",
    tag = EMPLOYEE_TAG,
    request_body = AddEmployeeDto,
    responses(
        (status = 201, description = "Employee created", body = UserDto),
        (status = 400, description = "Invalid employee payload", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Managers only", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_employee(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<AddEmployeeDto>,
) -> Result<impl IntoResponse, Error> {
    let employee = UserService::new(&state.db, state.notifier.as_ref())
        .add_employee(input, &user)
        .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// Lists role-change requests on file in the manager's department
///
/// # Responses
/// - 200 (OK): Role requests, oldest first
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller is not a manager
#[utoipa::path(
    get,
    path = "/api/employees/role-requests",
    tag = EMPLOYEE_TAG,
    responses(
        (status = 200, description = "Role-change requests", body = Vec<RoleRequestDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Managers only", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_role_requests(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, Error> {
    let requests = UserService::new(&state.db, state.notifier.as_ref())
        .list_role_requests(&user)
        .await?;

    Ok(Json(requests))
}

/// Approves an employee's role-change request, applying the requested
/// role and recomputing their permission flags
///
/// # Responses
/// - 200 (OK): The employee with their new role
/// - 400 (Bad Request): No request on file
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller is not a manager of the employee's department
/// - 404 (Not Found): No such employee
#[utoipa::path(
    post,
    path = "/api/employees/role-requests/{id}/approve",
    tag = EMPLOYEE_TAG,
    params(
        ("id" = i32, Path, description = "ID of the employee whose request is resolved")
    ),
    responses(
        (status = 200, description = "Role request approved", body = UserDto),
        (status = 400, description = "No request on file", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Managers of the department only", body = ErrorDto),
        (status = 404, description = "Employee not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_role_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let employee = UserService::new(&state.db, state.notifier.as_ref())
        .approve_role_request(id, &user)
        .await?;

    Ok(Json(employee))
}

/// Rejects an employee's role-change request, leaving their role as is
///
/// # Responses
/// - 200 (OK): The employee, role unchanged
/// - 400 (Bad Request): No request on file
/// - 401 (Unauthorized): Not authenticated
/// - 403 (Forbidden): Caller is not a manager of the employee's department
/// - 404 (Not Found): No such employee
#[utoipa::path(
    post,
    path = "/api/employees/role-requests/{id}/reject",
    tag = EMPLOYEE_TAG,
    params(
        ("id" = i32, Path, description = "ID of the employee whose request is resolved")
    ),
    responses(
        (status = 200, description = "Role request rejected", body = UserDto),
        (status = 400, description = "No request on file", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Managers of the department only", body = ErrorDto),
        (status = 404, description = "Employee not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_role_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let employee = UserService::new(&state.db, state.notifier.as_ref())
        .reject_role_request(id, &user)
        .await?;

    Ok(Json(employee))
}
