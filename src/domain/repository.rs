use async_trait::async_trait;

use super::todo::{NewTodo, Todo, TodoId};

/// Storage primitives the service layer needs. Any store with filtered
/// queries, offset paging and insert-returning-id satisfies this; the
/// concrete adapter is `SqliteTodoRepository`, tests use an in-memory fake.
///
/// `find_active`/`list_active`/`count_active` only see rows whose
/// `deleted_at` is null. Soft-deleted rows are reachable through nothing
/// but `save` (which is how they became deleted in the first place).
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn insert(&self, input: NewTodo) -> anyhow::Result<Todo>;
    async fn find_active(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    /// Active rows, newest first, stable across pages of the same query.
    async fn list_active(&self, offset: u32, limit: u32) -> anyhow::Result<Vec<Todo>>;
    async fn count_active(&self) -> anyhow::Result<u64>;
    /// Writes every mutable field of an existing row, `deleted_at` included.
    async fn save(&self, todo: &Todo) -> anyhow::Result<()>;
}
