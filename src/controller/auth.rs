use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::Error,
    model::{
        api::{ErrorDto, MessageDto},
        app::AppState,
        auth::AuthUser,
        user::{
            AuthResponseDto, ForgotPasswordDto, LoginDto, RegisterDto, ResetPasswordDto,
            RoleChangeRequestDto, UserDto,
        },
    },
    notify::{log_failure, Recipient},
    service::auth::{issue_token, AuthService},
};

pub static AUTH_TAG: &str = "auth";

/// Registers a new account and signs the caller in
///
/// # Responses
/// - 201 (Created): Account created; returns a bearer token plus the user
/// - 400 (Bad Request): Missing or invalid fields, or the email is taken
/// - 500 (Internal Server Error): Database or hashing failure
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = AuthResponseDto),
        (status = 400, description = "Invalid registration payload", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterDto>,
) -> Result<impl IntoResponse, Error> {
    let user = AuthService::new(&state.db).register(input).await?;

    let token = issue_token(&state.auth_keys, user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponseDto {
            token,
            user: UserDto::from(user),
        }),
    ))
}

/// Verifies credentials and issues a bearer token
///
/// # Responses
/// - 200 (OK): Returns a bearer token plus the user
/// - 401 (Unauthorized): Unknown email or wrong password
/// - 500 (Internal Server Error): Database or token failure
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Signed in", body = AuthResponseDto),
        (status = 401, description = "Invalid credentials", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginDto>,
) -> Result<impl IntoResponse, Error> {
    let email = input.email.ok_or(Error::InvalidCredentials)?;
    let password = input.password.ok_or(Error::InvalidCredentials)?;

    let user = AuthService::new(&state.db).login(&email, &password).await?;

    let token = issue_token(&state.auth_keys, user.id)?;

    Ok(Json(AuthResponseDto {
        token,
        user: UserDto::from(user),
    }))
}

/// Returns the authenticated caller's account
///
/// # Responses
/// - 200 (OK): The caller's user payload
/// - 401 (Unauthorized): Missing, invalid, or expired token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "The authenticated user", body = UserDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn me(AuthUser(user): AuthUser) -> Result<impl IntoResponse, Error> {
    Ok(Json(UserDto::from(user)))
}

/// Starts a password reset. The response never reveals whether the email
/// exists; when it does, a reset link valid for one hour is mailed out.
///
/// # Responses
/// - 200 (OK): Always, regardless of the email being known
/// - 400 (Bad Request): No email supplied
/// - 500 (Internal Server Error): Database failure
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = AUTH_TAG,
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Reset started if the account exists", body = MessageDto),
        (status = 400, description = "No email supplied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordDto>,
) -> Result<impl IntoResponse, Error> {
    let email = input
        .email
        .ok_or_else(|| Error::Validation("Please provide an email".to_string()))?;

    if let Some((user, token)) = AuthService::new(&state.db).forgot_password(&email).await? {
        let reset_link = format!("{}/reset-password/{}", state.frontend_url, token);

        log_failure(
            "password reset",
            state
                .notifier
                .password_reset(&Recipient::from(&user), &reset_link)
                .await,
        );
    }

    Ok(Json(MessageDto::new(
        "If the email is registered, a reset link has been sent",
    )))
}

/// Consumes a reset token and stores a new password
///
/// # Responses
/// - 200 (OK): Password updated; the token is now spent
/// - 400 (Bad Request): Missing password, or invalid/expired token
/// - 500 (Internal Server Error): Database or hashing failure
#[utoipa::path(
    post,
    path = "/api/auth/reset-password/{token}",
    tag = AUTH_TAG,
    params(
        ("token" = String, Path, description = "Password reset token from the emailed link")
    ),
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password updated", body = MessageDto),
        (status = 400, description = "Invalid or expired token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<ResetPasswordDto>,
) -> Result<impl IntoResponse, Error> {
    let password = input
        .password
        .ok_or_else(|| Error::Validation("Please provide a new password".to_string()))?;

    AuthService::new(&state.db)
        .reset_password(&token, &password)
        .await?;

    Ok(Json(MessageDto::new("Password has been reset")))
}

/// Files a role-change request for the caller; a department manager
/// resolves it from the employee dashboard
///
/// # Responses
/// - 200 (OK): Request stored as pending
/// - 400 (Bad Request): Invalid role, short reason, or a request already pending
/// - 401 (Unauthorized): Not authenticated
/// - 500 (Internal Server Error): Database failure
#[utoipa::path(
    post,
    path = "/api/auth/request-role-change",
    tag = AUTH_TAG,
    request_body = RoleChangeRequestDto,
    responses(
        (status = 200, description = "Role request filed", body = MessageDto),
        (status = 400, description = "Invalid role request", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn request_role_change(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<RoleChangeRequestDto>,
) -> Result<impl IntoResponse, Error> {
    AuthService::new(&state.db)
        .request_role_change(user, input)
        .await?;

    Ok(Json(MessageDto::new("Role change request submitted")))
}
