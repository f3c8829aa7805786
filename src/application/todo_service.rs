use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, NewTodo, PageMeta, Todo, TodoId, UpdateTodo};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No active record for the given id. Soft-deleted ids land here too;
    /// a deleted record is indistinguishable from one that never existed.
    #[error("todo not found")]
    NotFound,
    #[error("storage operation failed")]
    OperationFailed(#[from] anyhow::Error),
}

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn list(&self, page: u32, limit: u32) -> Result<(Vec<Todo>, PageMeta), ServiceError>;
    async fn get(&self, id: TodoId) -> Result<Todo, ServiceError>;
    async fn create(&self, input: CreateTodo) -> Result<Todo, ServiceError>;
    async fn update(&self, id: TodoId, patch: UpdateTodo) -> Result<Todo, ServiceError>;
    async fn delete(&self, id: TodoId) -> Result<(), ServiceError>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    async fn find_active(&self, id: TodoId) -> Result<Todo, ServiceError> {
        self.repo
            .find_active(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn list(&self, page: u32, limit: u32) -> Result<(Vec<Todo>, PageMeta), ServiceError> {
        let offset = page.saturating_sub(1).saturating_mul(limit);
        let items = self.repo.list_active(offset, limit).await?;
        let total = self.repo.count_active().await?;
        Ok((items, PageMeta::compute(total, page, limit)))
    }

    async fn get(&self, id: TodoId) -> Result<Todo, ServiceError> {
        self.find_active(id).await
    }

    async fn create(&self, input: CreateTodo) -> Result<Todo, ServiceError> {
        let todo = self
            .repo
            .insert(NewTodo {
                title: input.title,
                description: input.description,
                status: input.status.unwrap_or_default(),
            })
            .await?;
        Ok(todo)
    }

    async fn update(&self, id: TodoId, patch: UpdateTodo) -> Result<Todo, ServiceError> {
        let mut todo = self.find_active(id).await?;
        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(description) = patch.description {
            todo.description = Some(description);
        }
        if let Some(status) = patch.status {
            todo.status = status;
        }
        todo.updated_at = Utc::now();
        self.repo.save(&todo).await?;
        Ok(todo)
    }

    async fn delete(&self, id: TodoId) -> Result<(), ServiceError> {
        let mut todo = self.find_active(id).await?;
        let now = Utc::now();
        todo.deleted_at = Some(now);
        todo.updated_at = now;
        self.repo.save(&todo).await?;
        Ok(())
    }
}
