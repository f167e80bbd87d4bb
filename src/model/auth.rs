use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use chrono::Utc;
use jsonwebtoken::{decode, Validation};
use serde::{Deserialize, Serialize};

use entity::sea_orm_active_enums::UserStatus;

use crate::{data::user::UserRepository, error::Error, model::app::AppState};

/// Bearer token lifetime.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID the token was issued to
    pub sub: i32,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user_id: i32) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        }
    }
}

/// The authenticated caller, resolved from the `Authorization` bearer
/// header. Extraction fails with 401 for a missing/invalid/expired token
/// or an inactive account.
pub struct AuthUser(pub entity::sim_user::Model);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Error> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(Error::Unauthenticated)?;

        let claims = decode::<Claims>(token, &state.auth_keys.decoding, &Validation::default())
            .map_err(|_| Error::Unauthenticated)?
            .claims;

        let user_repository = UserRepository::new(&state.db);

        let user = user_repository
            .find_by_id(claims.sub)
            .await?
            .ok_or(Error::Unauthenticated)?;

        if user.status != UserStatus::Active {
            return Err(Error::Unauthenticated);
        }

        Ok(AuthUser(user))
    }
}
