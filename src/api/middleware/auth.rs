//! Access-token authentication.
//!
//! Tokens come from the `Authorization` header (with or without the
//! `Bearer ` prefix) or from the `accessToken` cookie. Every request reloads
//! the account, so deleted or suspended users lose access immediately.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{ACCESS_TOKEN_COOKIE, BEARER_TOKEN_PREFIX};
use crate::domain::{Action, Actor, Role};
use crate::errors::{AppError, AppResult};

/// The authenticated caller.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }

    /// The caller as an `Actor`, if its role allows `action`.
    pub fn permit(&self, action: Action) -> AppResult<Actor> {
        let actor = self.actor();
        actor.require(action)?;
        Ok(actor)
    }
}

/// Pull the raw access token out of the request headers.
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|value| {
            value
                .strip_prefix(BEARER_TOKEN_PREFIX)
                .unwrap_or(value)
                .trim()
                .to_string()
        })
        .filter(|token| !token.is_empty());

    from_header.or_else(|| {
        CookieJar::from_headers(headers)
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> AppResult<CurrentUser> {
    let token = access_token(headers).ok_or(AppError::Unauthorized)?;
    let user = state.services.auth().authenticate(&token).await?;
    Ok(CurrentUser {
        id: user.id,
        email: user.email,
        role: user.role,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = authenticate(state, &parts.headers).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Reject unauthenticated requests for a whole router and stash the
/// `CurrentUser` for the handlers behind it.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    #[test]
    fn bearer_prefix_is_optional() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(access_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("abc.def"));
        assert_eq!(access_token(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn cookie_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("accessToken=from-cookie"));
        assert_eq!(access_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn missing_token_is_none() {
        assert!(access_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn permit_checks_the_role() {
        let user = CurrentUser {
            id: Uuid::new_v4(),
            email: "staff@example.com".into(),
            role: Role::Staff,
        };
        assert!(user.permit(Action::ViewAppointments).is_ok());
        assert!(matches!(
            user.permit(Action::BookAppointment),
            Err(AppError::Forbidden(_))
        ));
    }
}
