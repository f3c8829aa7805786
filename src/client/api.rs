//! HTTP client for the todos API: parses the response envelope and turns
//! `success == false` into an error carrying the server's message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::todo::{PageMeta, Todo, TodoId, TodoStatus};

#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The server answered with an envelope and refused the operation.
    #[error("{0}")]
    Api(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Form data the UI submits. Fields left `None` are omitted from the body,
/// which is what gives updates their merge semantics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TodoDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TodoStatus>,
}

/// Client-side view of the response envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
    meta: Option<PageMeta>,
}

impl<T> ApiEnvelope<T> {
    fn into_data(self, context: &str) -> Result<T, ApiClientError> {
        if !self.success {
            return Err(ApiClientError::Api(
                self.message.unwrap_or_else(|| context.to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiClientError::Api(format!("{context}: empty response")))
    }
}

#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self, page: u32, limit: u32) -> Result<(Vec<Todo>, PageMeta), ApiClientError>;
    async fn create(&self, draft: TodoDraft) -> Result<Todo, ApiClientError>;
    async fn update(&self, id: TodoId, draft: TodoDraft) -> Result<Todo, ApiClientError>;
    async fn delete(&self, id: TodoId) -> Result<(), ApiClientError>;
}

#[derive(Clone)]
pub struct HttpTodoApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTodoApi {
    /// `base_url` includes the versioned prefix, e.g.
    /// `http://127.0.0.1:3000/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self, page: u32, limit: u32) -> Result<(Vec<Todo>, PageMeta), ApiClientError> {
        let envelope: ApiEnvelope<Vec<Todo>> = self
            .http
            .get(self.url("/todos"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?
            .json()
            .await?;
        let ApiEnvelope { success, data, message, meta } = envelope;
        if !success {
            return Err(ApiClientError::Api(
                message.unwrap_or_else(|| "Failed to fetch todos".into()),
            ));
        }
        let items = data.ok_or_else(|| ApiClientError::Api("Failed to fetch todos".into()))?;
        let meta =
            meta.ok_or_else(|| ApiClientError::Api("Missing pagination metadata".into()))?;
        Ok((items, meta))
    }

    async fn create(&self, draft: TodoDraft) -> Result<Todo, ApiClientError> {
        let envelope: ApiEnvelope<Todo> = self
            .http
            .post(self.url("/todos"))
            .json(&draft)
            .send()
            .await?
            .json()
            .await?;
        envelope.into_data("Failed to create todo")
    }

    async fn update(&self, id: TodoId, draft: TodoDraft) -> Result<Todo, ApiClientError> {
        let envelope: ApiEnvelope<Todo> = self
            .http
            .put(self.url(&format!("/todos/{id}")))
            .json(&draft)
            .send()
            .await?
            .json()
            .await?;
        envelope.into_data("Failed to update todo")
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiClientError> {
        let envelope: ApiEnvelope<serde_json::Value> = self
            .http
            .delete(self.url(&format!("/todos/{id}")))
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(ApiClientError::Api(
                envelope
                    .message
                    .unwrap_or_else(|| "Failed to delete todo".into()),
            ));
        }
        Ok(())
    }
}
