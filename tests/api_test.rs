//! HTTP tests driving the full router with `tower::ServiceExt::oneshot`.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use salon_booking::api::{create_router, AppState};
use salon_booking::config::Config;
use salon_booking::domain::User;
use salon_booking::errors::{AppError, AppResult};
use salon_booking::infra::Database;
use salon_booking::services::{
    AccountProfile, AuthService, Claims, MockServiceContainer, Registration, Session, TokenPair,
};

use common::{ADMIN_EMAIL, ADMIN_PASSWORD};

async fn app() -> Router {
    let db = common::connect().await;
    let state = AppState::from_config(
        Arc::new(Database::from_connection(db)),
        None,
        Config::default(),
    );
    state
        .services
        .users()
        .seed_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    create_router(state)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["accessToken"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_reports_redis_disabled() {
    let app = app().await;
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
    assert_eq!(body["services"]["redis"]["status"], "disabled");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app().await;
    let response = app
        .oneshot(get("/api-docs/openapi.json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/v1/appointments"].is_object());
}

#[tokio::test]
async fn register_then_login_sets_cookies() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            json!({
                "name": "Alice",
                "email": "alice@salon.test",
                "password": "password123"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "CUSTOMER");
    assert!(body["data"].get("passwordHash").is_none());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "email": "alice@salon.test", "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));

    let access = cookies
        .iter()
        .find(|c| c.starts_with("accessToken="))
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    // The cookie alone authenticates
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/me")
                .header(header::COOKIE, access)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "alice@salon.test");
}

#[tokio::test]
async fn invalid_payloads_list_every_field() {
    let app = app().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            json!({ "name": "", "email": "not-an-email", "password": "short" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    let paths: Vec<&str> = body["errorDetails"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"email"));
    assert!(paths.contains(&"password"));
    assert!(paths.contains(&"name"));
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = app().await;
    for uri in [
        "/api/v1/users",
        "/api/v1/appointments",
        "/api/v1/payments",
        "/api/v1/dashboard-stats/admin",
        "/api/v1/auth/me",
    ] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let response = app
        .clone()
        .oneshot(get("/api/v1/appointments", Some("garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Public reads stay open, writes do not
    let response = app.clone().oneshot(get("/api/v1/salons", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .oneshot(json_request("POST", "/api/v1/salons", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn roles_gate_the_dashboards() {
    let app = app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/dashboard-stats/admin", Some(&admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["totalUsers"], 1);

    let response = app
        .oneshot(get("/api/v1/dashboard-stats/customer", Some(&admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_records_are_404() {
    let app = app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let uri = format!("/api/v1/appointments/{}", Uuid::new_v4());
    let response = app.oneshot(get(&uri, Some(&admin))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Auth service that turns every caller away.
struct ClosedDoor;

#[async_trait]
impl AuthService for ClosedDoor {
    async fn register(&self, _registration: Registration) -> AppResult<User> {
        Err(AppError::forbidden("Registration is closed"))
    }

    async fn login(&self, _email: String, _password: String) -> AppResult<Session> {
        Err(AppError::InvalidCredentials)
    }

    async fn refresh(&self, _refresh_token: &str) -> AppResult<TokenPair> {
        Err(AppError::Unauthorized)
    }

    async fn change_password(&self, _user_id: Uuid, _old: String, _new: String) -> AppResult<()> {
        Err(AppError::Unauthorized)
    }

    async fn me(&self, _user_id: Uuid) -> AppResult<AccountProfile> {
        Err(AppError::Unauthorized)
    }

    async fn authenticate(&self, _access_token: &str) -> AppResult<User> {
        Err(AppError::Unauthorized)
    }

    fn verify_token(&self, _token: &str) -> AppResult<Claims> {
        Err(AppError::Unauthorized)
    }
}

#[tokio::test]
async fn handlers_go_through_the_service_container() {
    let mut services = MockServiceContainer::new();
    services
        .expect_auth()
        .returning(|| Arc::new(ClosedDoor));

    let db = common::connect().await;
    let state = AppState::new(
        Arc::new(services),
        None,
        Arc::new(Database::from_connection(db)),
        Config::default(),
    );
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "email": "alice@salon.test", "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let response = app
        .oneshot(get("/api/v1/appointments", Some("any-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
