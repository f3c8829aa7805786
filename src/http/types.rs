//! Response envelope and the error-to-status mapping for the API surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::todo_service::ServiceError;
use crate::domain::todo::PageMeta;
use crate::http::validation::ValidationError;

/// Uniform wrapper around every response body:
/// `{ success, data?, message?, meta? }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self { success: true, data: Some(data), message: None, meta: None }
    }

    pub fn data_with_message(data: T, message: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
            meta: None,
        }
    }

    pub fn page(data: T, meta: PageMeta) -> Self {
        Self { success: true, data: Some(data), message: None, meta: Some(meta) }
    }

    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
            meta: None,
        }
    }
}

/// Everything a handler can fail with. Raw detail is logged here and never
/// reaches the response body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("todo not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::OperationFailed(source) => ApiError::Internal(source),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(err) => {
                tracing::warn!(error = %err, "request validation failed");
                (StatusCode::UNPROCESSABLE_ENTITY, err.first_message().to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Todo not found".to_string()),
            ApiError::Internal(source) => {
                tracing::error!(error = ?source, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong".to_string())
            }
        };
        let body = Envelope::<()> {
            success: false,
            data: None,
            message: Some(message),
            meta: None,
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_empty_fields() {
        let json = serde_json::to_value(Envelope::data(serde_json::json!({"id": 1}))).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("message").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn page_envelope_carries_camel_case_meta() {
        let meta = PageMeta::compute(5, 2, 10);
        let json = serde_json::to_value(Envelope::page(Vec::<u8>::new(), meta)).unwrap();
        assert_eq!(json["meta"]["total"], 5);
        assert_eq!(json["meta"]["perPage"], 10);
        assert_eq!(json["meta"]["currentPage"], 2);
        assert_eq!(json["meta"]["lastPage"], 1);
    }
}
