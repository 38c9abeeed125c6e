//! Authentication handlers.

use axum::{extract::State, routing::{get, post}, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{ACCESS_COOKIE_DAYS, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::domain::{UserResponse, PHONE_PATTERN};
use crate::errors::{AppError, AppResult};
use crate::services::{AccountProfile, Registration, TokenPair};
use crate::types::{ApiResponse, Created};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(regex(path = *PHONE_PATTERN, message = "Invalid phone number"))]
    #[schema(example = "+8801712345678")]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Falls back to the `refreshToken` cookie when absent
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route("/logout", post(logout))
}

/// Routes that need an authenticated caller
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/change-password", post(change_password))
        .route("/me", get(me))
}

fn token_cookie(
    name: &'static str,
    value: String,
    max_age: time::Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// Register a customer account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .services
        .auth()
        .register(Registration {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            phone: payload.phone,
        })
        .await?;

    Ok(Created::new("User registered successfully", user.into()))
}

/// Log in and receive tokens (also set as http-only cookies)
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is not active")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, ApiResponse<LoginResponse>)> {
    let session = state
        .services
        .auth()
        .login(payload.email, payload.password)
        .await?;

    let secure = state.config.secure_cookies;
    let jar = jar
        .add(token_cookie(
            ACCESS_TOKEN_COOKIE,
            session.tokens.access_token.clone(),
            time::Duration::days(ACCESS_COOKIE_DAYS),
            secure,
        ))
        .add(token_cookie(
            REFRESH_TOKEN_COOKIE,
            session.tokens.refresh_token.clone(),
            time::Duration::days(state.config.refresh_token_days),
            secure,
        ));

    Ok((
        jar,
        ApiResponse::ok(
            "User logged in successfully",
            LoginResponse {
                user: session.user.into(),
                tokens: session.tokens,
            },
        ),
    ))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = TokenPair),
        (status = 401, description = "Missing or invalid refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Option<axum::Json<RefreshRequest>>,
) -> AppResult<(CookieJar, ApiResponse<TokenPair>)> {
    let token = payload
        .and_then(|axum::Json(body)| body.refresh_token)
        .or_else(|| jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string()))
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let tokens = state.services.auth().refresh(&token).await?;
    let jar = jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        time::Duration::days(ACCESS_COOKIE_DAYS),
        state.config.secure_cookies,
    ));

    Ok((jar, ApiResponse::ok("Access token refreshed", tokens)))
}

/// Clear the session cookies
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    responses((status = 200, description = "Logged out"))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiResponse<()>) {
    let jar = jar
        .remove(expired_cookie(ACCESS_TOKEN_COOKIE))
        .remove(expired_cookie(REFRESH_TOKEN_COOKIE));
    (jar, ApiResponse::message("User logged out successfully"))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Old password is incorrect"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .services
        .auth()
        .change_password(user.id, payload.old_password, payload.new_password)
        .await?;
    Ok(ApiResponse::message("Password changed successfully"))
}

/// The caller's account and role profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current account", body = AccountProfile),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> AppResult<ApiResponse<AccountProfile>> {
    let profile = state.services.auth().me(user.id).await?;
    Ok(ApiResponse::ok("Profile retrieved successfully", profile))
}
