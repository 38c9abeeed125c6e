use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::{Paginated, PaginationMeta};

/// Standard response envelope: `{ success, message, meta?, data }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            meta: None,
            data: Some(data),
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn paginated(message: impl Into<String>, page: Paginated<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            meta: Some(page.meta),
            data: Some(page.data),
        }
    }
}

impl ApiResponse<()> {
    /// Envelope whose `data` is null
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            meta: None,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Created response helper for POST endpoints
pub struct Created<T: Serialize>(pub ApiResponse<T>);

impl<T: Serialize> Created<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self(ApiResponse::ok(message, data))
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaginationParams;

    #[test]
    fn message_only_envelope_has_null_data() {
        let value = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "done");
        assert!(value["data"].is_null());
        assert!(value.get("meta").is_none());
    }

    #[test]
    fn paginated_envelope_carries_meta() {
        let page = Paginated::new(vec![1, 2], PaginationParams::new(2, 2), 5);
        let value = serde_json::to_value(ApiResponse::paginated("list", page)).unwrap();
        assert_eq!(value["meta"]["page"], 2);
        assert_eq!(value["meta"]["limit"], 2);
        assert_eq!(value["meta"]["total"], 5);
        assert_eq!(value["data"].as_array().map(Vec::len), Some(2));
    }
}
