//! Authentication service: registration, sessions and token checks.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{
    AdminProfile, NewUser, Password, Role, SalonOwner, Staff, User, UserResponse,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// JWT claims carried by both access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Tokens issued at login
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// The caller's account with whichever role profiles it holds.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salon_owner: Option<SalonOwner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<Staff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminProfile>,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Self-registration always creates a CUSTOMER.
    async fn register(&self, registration: Registration) -> AppResult<User>;

    async fn login(&self, email: String, password: String) -> AppResult<Session>;

    /// Exchange a refresh token for a new token pair.
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair>;

    async fn change_password(
        &self,
        user_id: Uuid,
        old_password: String,
        new_password: String,
    ) -> AppResult<()>;

    async fn me(&self, user_id: Uuid) -> AppResult<AccountProfile>;

    /// Verify an access token and reload its user.
    ///
    /// Unknown, deleted and non-ACTIVE accounts are rejected even while
    /// their token is still valid.
    async fn authenticate(&self, access_token: &str) -> AppResult<User>;

    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn sign(user: &User, lifetime: Duration, secret: &[u8]) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: (now + lifetime).timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}

fn verify(token: &str, secret: &[u8]) -> AppResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

fn ensure_active(user: &User) -> AppResult<()> {
    if user.can_authenticate() {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Your account is {}",
            user.status.as_str().to_lowercase()
        )))
    }
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    fn issue(&self, user: &User) -> AppResult<TokenPair> {
        let access_lifetime = Duration::minutes(self.config.access_token_minutes);
        Ok(TokenPair {
            access_token: sign(user, access_lifetime, self.config.jwt_secret_bytes())?,
            refresh_token: sign(
                user,
                Duration::days(self.config.refresh_token_days),
                self.config.refresh_secret_bytes(),
            )?,
            expires_in: access_lifetime.num_seconds(),
        })
    }

    async fn active_user(&self, id: Uuid) -> AppResult<User> {
        let user = self
            .uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::forbidden("User no longer exists"))?;
        ensure_active(&user)?;
        Ok(user)
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        let email = registration.email.trim().to_lowercase();
        if self
            .uow
            .users()
            .find_by_email_with_deleted(&email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("User already exists with this email"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash,
                name: registration.name,
                phone: registration.phone,
                role: Role::Customer,
            })
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::conflict("User already exists with this email")
                } else {
                    e
                }
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<Session> {
        let found = self
            .uow
            .users()
            .find_by_email(&email.trim().to_lowercase())
            .await?;

        // Verify against a dummy hash when the account is missing so both
        // paths cost the same.
        let dummy_hash = "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$ZHVtbXloYXNoMTIzNDU2Nzg5MDEyMzQ1Njc4OTAxMg";
        let hash = found
            .as_ref()
            .map_or(dummy_hash, |user| user.password_hash.as_str());
        let password_valid = Password::from_hash(hash).verify(&password);

        let user = match found {
            Some(user) if password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };
        ensure_active(&user)?;

        let tokens = self.issue(&user)?;
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(Session { user, tokens })
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = verify(refresh_token, self.config.refresh_secret_bytes())?;
        let user = self.active_user(claims.sub).await?;
        self.issue(&user)
    }

    async fn change_password(
        &self,
        user_id: Uuid,
        old_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;

        if !Password::from_hash(user.password_hash.as_str()).verify(&old_password) {
            return Err(AppError::validation("Old password is incorrect"));
        }

        let password_hash = Password::new(&new_password)?.into_string();
        self.uow
            .users()
            .update_password(user_id, password_hash)
            .await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    async fn me(&self, user_id: Uuid) -> AppResult<AccountProfile> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;

        let (salon_owner, staff, admin) = match user.role {
            Role::SalonOwner => (
                self.uow.profiles().find_owner_by_user(user.id).await?,
                None,
                None,
            ),
            Role::Staff => (None, self.uow.staff().find_by_user(user.id).await?, None),
            Role::Admin => (
                None,
                None,
                self.uow.profiles().find_admin_by_user(user.id).await?,
            ),
            Role::Customer => (None, None, None),
        };

        Ok(AccountProfile {
            user: user.into(),
            salon_owner,
            staff,
            admin,
        })
    }

    async fn authenticate(&self, access_token: &str) -> AppResult<User> {
        let claims = self.verify_token(access_token)?;
        self.active_user(claims.sub).await
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify(token, self.config.jwt_secret_bytes())
    }
}
