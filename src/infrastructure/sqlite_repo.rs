use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, Todo, TodoId, TodoStatus},
};

/// SQLite adapter. Ids come from `INTEGER PRIMARY KEY AUTOINCREMENT`,
/// timestamps are stored as RFC 3339 TEXT, and soft deletion is a nullable
/// `deleted_at` column filtered by every query.
#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'todo',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                deleted_at TEXT
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, input: NewTodo) -> Result<Todo> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO todos (title, description, status, created_at, updated_at, deleted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.status.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&*self.pool)
        .await?;

        Ok(Todo {
            id: TodoId(result.last_insert_rowid()),
            title: input.title,
            description: input.description,
            status: input.status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    async fn find_active(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query(
            "SELECT id, title, description, status, created_at, updated_at, deleted_at
             FROM todos WHERE id = ?1 AND deleted_at IS NULL",
        )
        .bind(id.0)
        .fetch_optional(&*self.pool)
        .await?;
        row.map(row_to_todo).transpose()
    }

    async fn list_active(&self, offset: u32, limit: u32) -> Result<Vec<Todo>> {
        let rows = sqlx::query(
            "SELECT id, title, description, status, created_at, updated_at, deleted_at
             FROM todos WHERE deleted_at IS NULL
             ORDER BY id DESC LIMIT ?1 OFFSET ?2",
        )
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&*self.pool)
        .await?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn count_active(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM todos WHERE deleted_at IS NULL")
            .fetch_one(&*self.pool)
            .await?;
        let n: i64 = row.get("n");
        Ok(n as u64)
    }

    async fn save(&self, todo: &Todo) -> Result<()> {
        let result = sqlx::query(
            "UPDATE todos
             SET title = ?2, description = ?3, status = ?4, updated_at = ?5, deleted_at = ?6
             WHERE id = ?1",
        )
        .bind(todo.id.0)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.status.as_str())
        .bind(todo.updated_at.to_rfc3339())
        .bind(todo.deleted_at.map(|t| t.to_rfc3339()))
        .execute(&*self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(anyhow!("todo {} missing on save", todo.id));
        }
        Ok(())
    }
}

fn row_to_todo(row: SqliteRow) -> Result<Todo> {
    let status_str: String = row.get("status");
    let status = TodoStatus::parse(&status_str)
        .ok_or_else(|| anyhow!("unknown status in store: {status_str}"))?;
    let deleted_at: Option<String> = row.get("deleted_at");

    Ok(Todo {
        id: TodoId(row.get("id")),
        title: row.get("title"),
        description: row.get("description"),
        status,
        created_at: parse_timestamp(row.get("created_at"))?,
        updated_at: parse_timestamp(row.get("updated_at"))?,
        deleted_at: deleted_at.map(|s| parse_timestamp(s)).transpose()?,
    })
}

fn parse_timestamp(raw: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("bad timestamp in store: {raw}"))
}
