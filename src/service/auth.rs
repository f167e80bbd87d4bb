use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Header};
use rand::{distr::Alphanumeric, Rng};
use sea_orm::{ActiveEnum, DatabaseConnection};

use entity::sea_orm_active_enums::{RequestStatus, Role};
use entity::sim_user;

use crate::{
    data::user::{NewUser, UserRepository},
    error::Error,
    model::{
        app::AuthKeys,
        auth::Claims,
        user::{Permissions, RegisterDto, RoleChangeRequestDto},
    },
};

/// Validity window for password reset tokens
pub const RESET_TOKEN_TTL_HOURS: i64 = 1;

pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| Error::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Signs a bearer token for the user
pub fn issue_token(keys: &AuthKeys, user_id: i32) -> Result<String, Error> {
    let token = encode(&Header::default(), &Claims::for_user(user_id), &keys.encoding)?;

    Ok(token)
}

/// Opaque single-use token mailed out in password reset links
pub fn generate_reset_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// At least 8 characters with uppercase, lowercase, digit, and a special
/// character
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

pub fn parse_role(value: &str) -> Result<Role, Error> {
    Role::try_from_value(&value.to_string())
        .map_err(|_| Error::Validation(format!("Invalid role: {}", value)))
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    /// Creates a new instance of [`AuthService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new account. Permission flags are derived from the
    /// requested role.
    pub async fn register(&self, input: RegisterDto) -> Result<sim_user::Model, Error> {
        let name = input
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| Error::Validation("Please provide a name".to_string()))?;
        let email = input
            .email
            .ok_or_else(|| Error::Validation("Please provide an email".to_string()))?
            .trim()
            .to_lowercase();
        let password = input
            .password
            .ok_or_else(|| Error::Validation("Please provide a password".to_string()))?;
        let role = parse_role(
            &input
                .role
                .ok_or_else(|| Error::Validation("Please provide a role".to_string()))?,
        )?;
        let department = input
            .department
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| Error::Validation("Please provide a department".to_string()))?;

        if !is_valid_email(&email) {
            return Err(Error::Validation("Please provide a valid email".to_string()));
        }

        let user_repository = UserRepository::new(self.db);

        if user_repository.find_by_email(&email).await?.is_some() {
            return Err(Error::Validation("User already exists".to_string()));
        }

        let user = user_repository
            .create(
                NewUser {
                    name,
                    email,
                    password_hash: hash_password(&password)?,
                    role,
                    department,
                },
                Permissions::for_role(role),
            )
            .await?;

        Ok(user)
    }

    /// Verifies credentials, returning the user on success
    pub async fn login(&self, email: &str, password: &str) -> Result<sim_user::Model, Error> {
        let user_repository = UserRepository::new(self.db);

        let user = user_repository
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(Error::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(Error::InvalidCredentials);
        }

        Ok(user)
    }

    /// Stores a reset token for the account, if one exists. Returns the
    /// user and plaintext token so the caller can mail the reset link;
    /// `None` when the email is unknown (the response must not reveal
    /// which).
    pub async fn forgot_password(
        &self,
        email: &str,
    ) -> Result<Option<(sim_user::Model, String)>, Error> {
        let user_repository = UserRepository::new(self.db);

        let Some(user) = user_repository
            .find_by_email(&email.trim().to_lowercase())
            .await?
        else {
            return Ok(None);
        };

        let token = generate_reset_token();
        let expires = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

        let user = user_repository
            .set_reset_token(user, token.clone(), expires)
            .await?;

        Ok(Some((user, token)))
    }

    /// Consumes an unexpired reset token and stores the new password
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), Error> {
        let user_repository = UserRepository::new(self.db);

        let user = user_repository
            .find_by_reset_token(token, Utc::now())
            .await?
            .ok_or_else(|| {
                Error::Validation("Invalid or expired password reset token".to_string())
            })?;

        user_repository
            .set_password(user, hash_password(password)?)
            .await?;

        Ok(())
    }

    /// Files a role-change request for the caller; a department manager
    /// resolves it later
    pub async fn request_role_change(
        &self,
        caller: sim_user::Model,
        input: RoleChangeRequestDto,
    ) -> Result<(), Error> {
        let requested_role = parse_role(
            &input
                .requested_role
                .ok_or_else(|| Error::Validation("Invalid role requested".to_string()))?,
        )?;

        let reason = input
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| r.len() >= 10)
            .ok_or_else(|| {
                Error::Validation(
                    "Please provide a detailed reason (minimum 10 characters)".to_string(),
                )
            })?;

        if caller.role_request_status == Some(RequestStatus::Pending)
            && caller.requested_role.is_some()
        {
            return Err(Error::Validation(
                "You already have a pending role request".to_string(),
            ));
        }

        let user_repository = UserRepository::new(self.db);

        user_repository
            .store_role_request(caller, requested_role, reason)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod password_tests {
        use super::super::{hash_password, is_strong_password, verify_password};

        /// Expect a hashed password to verify against the original and
        /// fail against anything else
        #[test]
        fn test_password_hash_round_trip() {
            let hash = hash_password("Str0ng!pass").unwrap();

            assert_ne!(hash, "Str0ng!pass");
            assert!(verify_password("Str0ng!pass", &hash).unwrap());
            assert!(!verify_password("wrong", &hash).unwrap());
        }

        #[test]
        fn test_password_strength_rules() {
            assert!(is_strong_password("Str0ng!pass"));
            assert!(!is_strong_password("Sh0rt!A"));
            assert!(is_strong_password("Sh0rt!Ab"));
            assert!(!is_strong_password("alllowercase1!"));
            assert!(!is_strong_password("ALLUPPERCASE1!"));
            assert!(!is_strong_password("NoDigits!!"));
            assert!(!is_strong_password("NoSpecial11"));
        }
    }

    mod email_tests {
        use super::super::is_valid_email;

        #[test]
        fn test_email_format() {
            assert!(is_valid_email("ops@example.com"));
            assert!(is_valid_email("first.last@sub.example.com"));
            assert!(!is_valid_email("not-an-email"));
            assert!(!is_valid_email("missing@domain"));
            assert!(!is_valid_email("@example.com"));
            assert!(!is_valid_email("spaced name@example.com"));
        }
    }

    mod token_tests {
        use jsonwebtoken::{decode, Validation};

        use crate::model::{app::AuthKeys, auth::Claims};
        use crate::service::auth::issue_token;

        /// Expect an issued token to decode with the same key and carry
        /// the user ID
        #[test]
        fn test_token_round_trip() {
            let keys = AuthKeys::from_secret(b"test-secret");

            let token = issue_token(&keys, 42).unwrap();

            let claims =
                decode::<Claims>(&token, &keys.decoding, &Validation::default()).unwrap();

            assert_eq!(claims.claims.sub, 42);
        }

        /// Expect a token signed with a different secret to be rejected
        #[test]
        fn test_token_wrong_secret() {
            let keys = AuthKeys::from_secret(b"test-secret");
            let other = AuthKeys::from_secret(b"other-secret");

            let token = issue_token(&keys, 42).unwrap();

            let result = decode::<Claims>(&token, &other.decoding, &Validation::default());

            assert!(result.is_err());
        }
    }

    mod register_tests {
        use crate::model::user::RegisterDto;
        use crate::service::auth::AuthService;
        use crate::util::test::setup::{create_tables, test_setup};

        fn register_input() -> RegisterDto {
            RegisterDto {
                name: Some("Avery Quinn".to_string()),
                email: Some("Avery.Quinn@Example.com".to_string()),
                password: Some("Str0ng!pass".to_string()),
                role: Some("P2".to_string()),
                department: Some("Ops".to_string()),
            }
        }

        /// Expect registration to lowercase the email and derive
        /// P-tier permission flags
        #[tokio::test]
        async fn test_register_success() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let service = AuthService::new(&test.state.db);

            let user = service.register(register_input()).await.unwrap();

            assert_eq!(user.email, "avery.quinn@example.com");
            assert!(!user.can_manage_users);
            assert!(user.can_manage_bookings);
            assert!(user.can_view_bookings);
            assert!(!user.can_view_reports);
        }

        /// Expect a duplicate email to be rejected
        #[tokio::test]
        async fn test_register_duplicate_email() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let service = AuthService::new(&test.state.db);

            service.register(register_input()).await.unwrap();
            let result = service.register(register_input()).await;

            assert!(result.is_err());
        }

        /// Expect login to succeed with the registered password only
        #[tokio::test]
        async fn test_login_round_trip() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let service = AuthService::new(&test.state.db);
            service.register(register_input()).await.unwrap();

            assert!(service
                .login("avery.quinn@example.com", "Str0ng!pass")
                .await
                .is_ok());
            assert!(service
                .login("avery.quinn@example.com", "wrong")
                .await
                .is_err());
        }
    }

    mod reset_password_tests {
        use crate::service::auth::{verify_password, AuthService};
        use crate::util::test::setup::{create_tables, create_user, test_setup};

        /// Expect the forgot/reset flow to rotate the password and
        /// consume the token
        #[tokio::test]
        async fn test_reset_password_flow() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let user = create_user(&test.state.db, "Avery", "avery@example.com", "P2", "Ops")
                .await
                .unwrap();

            let service = AuthService::new(&test.state.db);

            let (_, token) = service
                .forgot_password(&user.email)
                .await
                .unwrap()
                .expect("existing user should get a token");

            service.reset_password(&token, "N3w!passwd").await.unwrap();

            let updated = crate::data::user::UserRepository::new(&test.state.db)
                .find_by_id(user.id)
                .await
                .unwrap()
                .unwrap();

            assert!(verify_password("N3w!passwd", &updated.password_hash).unwrap());
            assert!(updated.reset_password_token.is_none());

            // Token is single-use
            let again = service.reset_password(&token, "An0ther!pw").await;
            assert!(again.is_err());
        }

        /// Expect an unknown email to produce no token rather than an error
        #[tokio::test]
        async fn test_forgot_password_unknown_email() {
            let test = test_setup().await;
            create_tables(&test.state.db).await.unwrap();

            let service = AuthService::new(&test.state.db);

            let result = service.forgot_password("nobody@example.com").await.unwrap();

            assert!(result.is_none());
        }
    }
}
