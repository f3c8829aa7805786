//! Client state store: mirrors the server's list/pagination shape and
//! orchestrates the async API calls the UI triggers.
//!
//! Every action follows the same transition: loading on and error cleared,
//! then either the success mutation or the failure message. A failed action
//! never touches the list it was about to change.

use crate::client::api::{TodoApi, TodoDraft};
use crate::domain::todo::{PageMeta, Todo, TodoId};
use crate::http::validation::{DEFAULT_LIMIT, DEFAULT_PAGE};

pub struct TodoStore<A: TodoApi> {
    api: A,
    pub todos: Vec<Todo>,
    pub meta: Option<PageMeta>,
    pub loading: bool,
    pub error: Option<String>,
    pub current_page: u32,
    pub limit: u32,
}

impl<A: TodoApi> TodoStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            todos: Vec::new(),
            meta: None,
            loading: false,
            error: None,
            current_page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Loads one page and replaces the list and metadata. On failure the
    /// previous list stays in place and only the error message changes.
    pub async fn fetch_list(&mut self, page: u32, limit: u32) {
        self.begin();
        match self.api.list(page, limit).await {
            Ok((todos, meta)) => {
                self.todos = todos;
                self.meta = Some(meta);
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.loading = false;
    }

    /// Creates a todo and prepends it to the in-memory list. Callers that
    /// care about exact pagination metadata refetch afterwards.
    pub async fn create(&mut self, draft: TodoDraft) {
        self.begin();
        match self.api.create(draft).await {
            Ok(todo) => self.todos.insert(0, todo),
            Err(err) => self.error = Some(err.to_string()),
        }
        self.loading = false;
    }

    /// Updates a todo and replaces the matching list entry in place. An id
    /// that is not currently displayed leaves the list unchanged.
    pub async fn update(&mut self, id: TodoId, draft: TodoDraft) {
        self.begin();
        match self.api.update(id, draft).await {
            Ok(todo) => {
                if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
                    *slot = todo;
                }
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.loading = false;
    }

    /// Deletes a todo and drops it from the in-memory list.
    pub async fn delete(&mut self, id: TodoId) {
        self.begin();
        match self.api.delete(id).await {
            Ok(()) => self.todos.retain(|t| t.id != id),
            Err(err) => self.error = Some(err.to_string()),
        }
        self.loading = false;
    }

    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    /// Changing the page size resets to page 1 so the user is never
    /// stranded on a page that no longer exists.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
        self.current_page = 1;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn last_page(&self) -> u32 {
        self.meta.map(|m| m.last_page).unwrap_or(1)
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::client::api::ApiClientError;
    use crate::domain::todo::TodoStatus;

    #[derive(Clone, Default)]
    struct FakeApi {
        todos: Arc<Mutex<Vec<Todo>>>,
        fail: Arc<Mutex<bool>>,
    }

    impl FakeApi {
        fn seed(&self, titles: &[&str]) {
            let mut todos = self.todos.lock().unwrap();
            for (i, title) in titles.iter().enumerate() {
                todos.push(sample(i as i64 + 1, title));
            }
        }

        fn fail_next(&self) {
            *self.fail.lock().unwrap() = true;
        }

        fn check(&self) -> Result<(), ApiClientError> {
            if *self.fail.lock().unwrap() {
                return Err(ApiClientError::Api("Something went wrong".into()));
            }
            Ok(())
        }
    }

    fn sample(id: i64, title: &str) -> Todo {
        let now = Utc::now();
        Todo {
            id: TodoId(id),
            title: title.into(),
            description: None,
            status: TodoStatus::Todo,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[async_trait]
    impl TodoApi for FakeApi {
        async fn list(
            &self,
            page: u32,
            limit: u32,
        ) -> Result<(Vec<Todo>, PageMeta), ApiClientError> {
            self.check()?;
            let todos = self.todos.lock().unwrap();
            let items: Vec<Todo> = todos
                .iter()
                .rev()
                .skip(((page - 1) * limit) as usize)
                .take(limit as usize)
                .cloned()
                .collect();
            Ok((items, PageMeta::compute(todos.len() as u64, page, limit)))
        }

        async fn create(&self, draft: TodoDraft) -> Result<Todo, ApiClientError> {
            self.check()?;
            let mut todos = self.todos.lock().unwrap();
            let id = todos.iter().map(|t| t.id.0).max().unwrap_or(0) + 1;
            let mut todo = sample(id, draft.title.as_deref().unwrap_or(""));
            todo.description = draft.description;
            todo.status = draft.status.unwrap_or_default();
            todos.push(todo.clone());
            Ok(todo)
        }

        async fn update(&self, id: TodoId, draft: TodoDraft) -> Result<Todo, ApiClientError> {
            self.check()?;
            let mut todos = self.todos.lock().unwrap();
            let todo = todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| ApiClientError::Api("Todo not found".into()))?;
            if let Some(title) = draft.title {
                todo.title = title;
            }
            if let Some(description) = draft.description {
                todo.description = Some(description);
            }
            if let Some(status) = draft.status {
                todo.status = status;
            }
            Ok(todo.clone())
        }

        async fn delete(&self, id: TodoId) -> Result<(), ApiClientError> {
            self.check()?;
            self.todos.lock().unwrap().retain(|t| t.id != id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn fetch_list_replaces_list_and_meta() {
        let api = FakeApi::default();
        api.seed(&["one", "two", "three"]);
        let mut store = TodoStore::new(api);

        store.fetch_list(1, 10).await;

        assert!(!store.loading);
        assert!(store.error.is_none());
        assert_eq!(store.todos.len(), 3);
        assert_eq!(store.todos[0].title, "three");
        assert_eq!(store.meta.unwrap().total, 3);
    }

    #[tokio::test]
    async fn fetch_list_failure_keeps_previous_list() {
        let api = FakeApi::default();
        api.seed(&["one", "two"]);
        let mut store = TodoStore::new(api.clone());
        store.fetch_list(1, 10).await;
        assert_eq!(store.todos.len(), 2);

        api.fail_next();
        store.fetch_list(2, 10).await;

        assert!(!store.loading);
        assert_eq!(store.error.as_deref(), Some("Something went wrong"));
        assert_eq!(store.todos.len(), 2);
    }

    #[tokio::test]
    async fn create_prepends_on_success() {
        let api = FakeApi::default();
        api.seed(&["existing"]);
        let mut store = TodoStore::new(api);
        store.fetch_list(1, 10).await;

        store
            .create(TodoDraft { title: Some("fresh".into()), ..Default::default() })
            .await;

        assert_eq!(store.todos[0].title, "fresh");
        assert_eq!(store.todos.len(), 2);
        assert!(store.error.is_none());
    }

    #[tokio::test]
    async fn update_replaces_matching_entry_in_place() {
        let api = FakeApi::default();
        api.seed(&["one", "two"]);
        let mut store = TodoStore::new(api);
        store.fetch_list(1, 10).await;
        let target = store.todos[1].id;

        store
            .update(
                target,
                TodoDraft { status: Some(TodoStatus::Done), ..Default::default() },
            )
            .await;

        let entry = store.todos.iter().find(|t| t.id == target).unwrap();
        assert_eq!(entry.status, TodoStatus::Done);
        assert_eq!(entry.title, "one");
        assert_eq!(store.todos.len(), 2);
    }

    #[tokio::test]
    async fn update_unknown_id_sets_error_and_leaves_list() {
        let api = FakeApi::default();
        api.seed(&["one"]);
        let mut store = TodoStore::new(api);
        store.fetch_list(1, 10).await;

        store
            .update(
                TodoId(404),
                TodoDraft { title: Some("ghost".into()), ..Default::default() },
            )
            .await;

        assert_eq!(store.error.as_deref(), Some("Todo not found"));
        assert_eq!(store.todos.len(), 1);
        assert_eq!(store.todos[0].title, "one");
    }

    #[tokio::test]
    async fn delete_removes_matching_entry() {
        let api = FakeApi::default();
        api.seed(&["one", "two"]);
        let mut store = TodoStore::new(api);
        store.fetch_list(1, 10).await;
        let target = store.todos[0].id;

        store.delete(target).await;

        assert_eq!(store.todos.len(), 1);
        assert!(store.todos.iter().all(|t| t.id != target));
    }

    #[tokio::test]
    async fn set_limit_resets_current_page() {
        let mut store = TodoStore::new(FakeApi::default());
        store.set_current_page(4);
        assert_eq!(store.current_page, 4);

        store.set_limit(25);

        assert_eq!(store.limit, 25);
        assert_eq!(store.current_page, 1);
    }
}
