use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::todo::Todo;
use crate::domain::repository::TodoRepository;

/// TodoPostgresRepository は PostgreSQL ベースの Todo リポジトリ。
/// todo.todos テーブルに対する CRUD 操作を提供する。
pub struct TodoPostgresRepository {
    pool: PgPool,
}

impl TodoPostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// TodoRow は todo.todos テーブルの行を表す中間構造体。
#[derive(Debug, Clone, sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    owner_id: String,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TodoRepository for TodoPostgresRepository {
    async fn list_by_owner(&self, owner_id: &str) -> anyhow::Result<Vec<Todo>> {
        let rows: Vec<TodoRow> = sqlx::query_as(
            "SELECT id, owner_id, title, description, completed, created_at, updated_at \
             FROM todo.todos WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Todo>> {
        let row: Option<TodoRow> = sqlx::query_as(
            "SELECT id, owner_id, title, description, completed, created_at, updated_at \
             FROM todo.todos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, todo: &Todo) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO todo.todos \
             (id, owner_id, title, description, completed, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(todo.id)
        .bind(&todo.owner_id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, todo: &Todo) -> anyhow::Result<()> {
        let result = sqlx::query(
            "UPDATE todo.todos \
             SET title = $2, description = $3, completed = $4, updated_at = $5 \
             WHERE id = $1",
        )
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("todo not found: {}", todo.id));
        }

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM todo.todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_row_to_todo_conversion() {
        let now = Utc::now();
        let row = TodoRow {
            id: Uuid::new_v4(),
            owner_id: "user-sub-1234".to_string(),
            title: "buy milk".to_string(),
            description: None,
            completed: true,
            created_at: now,
            updated_at: now,
        };

        let todo: Todo = row.clone().into();
        assert_eq!(todo.id, row.id);
        assert_eq!(todo.owner_id, "user-sub-1234");
        assert_eq!(todo.title, "buy milk");
        assert!(todo.description.is_none());
        assert!(todo.completed);
    }
}
