use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row id assigned by the store on insert. Never reused, never mutated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TodoId(pub i64);

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Todo,
    InProgress,
    Pending,
    Done,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 4] = [
        TodoStatus::Todo,
        TodoStatus::InProgress,
        TodoStatus::Pending,
        TodoStatus::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::Todo => "todo",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Pending => "pending",
            TodoStatus::Done => "done",
        }
    }

    /// Parses a wire string. Anything outside the closed set is rejected;
    /// free-form strings never make it past the boundary.
    pub fn parse(s: &str) -> Option<TodoStatus> {
        match s {
            "todo" => Some(TodoStatus::Todo),
            "in_progress" => Some(TodoStatus::InProgress),
            "pending" => Some(TodoStatus::Pending),
            "done" => Some(TodoStatus::Done),
            _ => None,
        }
    }
}

impl Default for TodoStatus {
    fn default() -> Self {
        TodoStatus::Todo
    }
}

/// The entity. `deleted_at` is the soft-delete marker: a non-null value
/// makes the record invisible to every read and write path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Todo {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Validated create payload. Status is still optional here; the service
/// applies the `todo` default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
}

/// Validated partial-update payload. Only fields that are `Some` are
/// merged over the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
}

/// What the repository needs to insert a row: defaults already applied.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
}

/// Pagination metadata for a list query. Derived, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
}

impl PageMeta {
    pub fn compute(total: u64, page: u32, limit: u32) -> Self {
        let last_page = (total.div_ceil(u64::from(limit)) as u32).max(1);
        Self { total, per_page: limit, current_page: page, last_page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_wire_strings() {
        for status in TodoStatus::ALL {
            assert_eq!(TodoStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TodoStatus::parse("archived"), None);
        assert_eq!(TodoStatus::parse("DONE"), None);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TodoStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn page_meta_last_page_floors_at_one() {
        assert_eq!(PageMeta::compute(0, 1, 10).last_page, 1);
        assert_eq!(PageMeta::compute(5, 2, 10).last_page, 1);
        assert_eq!(PageMeta::compute(10, 1, 10).last_page, 1);
        assert_eq!(PageMeta::compute(11, 1, 10).last_page, 2);
        assert_eq!(PageMeta::compute(25, 3, 10).last_page, 3);
    }

    #[test]
    fn page_meta_echoes_request() {
        let meta = PageMeta::compute(42, 3, 7);
        assert_eq!(meta.per_page, 7);
        assert_eq!(meta.current_page, 3);
        assert_eq!(meta.total, 42);
    }
}
