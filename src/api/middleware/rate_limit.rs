//! Fixed-window rate limiting backed by Redis.
//!
//! Skipped entirely when no Redis is configured. With Redis configured but
//! unreachable, requests are denied.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_WINDOW_SECONDS,
};

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::RETRY_AFTER, HeaderValue::from(self.retry_after));
        headers.insert(REMAINING_HEADER, HeaderValue::from(0u64));

        let body = json!({
            "success": false,
            "message": "Too many requests. Please try again later.",
            "errorDetails": { "retryAfter": self.retry_after },
        });
        (StatusCode::TOO_MANY_REQUESTS, headers, Json(body)).into_response()
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    scope: &'static str,
    max_requests: u64,
    seconds: u64,
}

const GENERAL: Window = Window {
    scope: "general",
    max_requests: RATE_LIMIT_REQUESTS,
    seconds: RATE_LIMIT_WINDOW_SECONDS,
};

const AUTH: Window = Window {
    scope: "auth",
    max_requests: RATE_LIMIT_AUTH_REQUESTS,
    seconds: RATE_LIMIT_AUTH_WINDOW_SECONDS,
};

/// Client identity for counting: first proxy hop, then the socket peer.
fn client_identifier(request: &Request) -> String {
    let headers = request.headers();
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|chain| chain.split(',').next())
    {
        return ip.trim().to_string();
    }

    if let Some(ip) = headers.get("x-real-ip").and_then(|h| h.to_str().ok()) {
        return ip.trim().to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn enforce(
    state: &AppState,
    window: Window,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let Some(cache) = state.cache.as_ref() else {
        return Ok(next.run(request).await);
    };

    let client = client_identifier(&request);
    let key = format!("{}:{}", window.scope, client);
    let (count, allowed) = match cache
        .check_rate_limit(&key, window.max_requests, window.seconds)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, scope = window.scope, "Rate limit check failed, denying request");
            return Err(RateLimitError {
                retry_after: window.seconds,
            });
        }
    };

    if !allowed {
        tracing::warn!(client = %client, count, scope = window.scope, "Rate limit exceeded");
        return Err(RateLimitError {
            retry_after: window.seconds,
        });
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(LIMIT_HEADER, HeaderValue::from(window.max_requests));
    headers.insert(
        REMAINING_HEADER,
        HeaderValue::from(window.max_requests.saturating_sub(count)),
    );
    Ok(response)
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(&state, GENERAL, request, next).await
}

/// Stricter limit for credential endpoints.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(&state, AUTH, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn rejection_is_429_with_retry_after() {
        let response = RateLimitError { retry_after: 60 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "60");
    }

    #[test]
    fn forwarded_for_wins() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "10.0.0.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_identifier(&request), "203.0.113.7");
    }

    #[test]
    fn unknown_without_any_source() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_identifier(&request), "unknown");
    }
}
