//! HTTP surface of the booking API.
//!
//! Handlers are grouped per resource under `/api/v1`. Requests pass through
//! bearer/cookie authentication and the Redis-backed rate limiter before
//! reaching a handler; request bodies are checked by `ValidatedJson`.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
