//! 開発モード用のインメモリリポジトリ。データベース未設定時に使用する。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::todo::Todo;
use crate::domain::entity::user::User;
use crate::domain::repository::{TodoRepository, UserRepository};

/// InMemoryTodoRepository は開発用のインメモリ Todo リポジトリ。
pub struct InMemoryTodoRepository {
    todos: RwLock<HashMap<Uuid, Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self {
            todos: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list_by_owner(&self, owner_id: &str) -> anyhow::Result<Vec<Todo>> {
        let todos = self.todos.read().await;
        let mut owned: Vec<Todo> = todos
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.get(id).cloned())
    }

    async fn create(&self, todo: &Todo) -> anyhow::Result<()> {
        let mut todos = self.todos.write().await;
        todos.insert(todo.id, todo.clone());
        Ok(())
    }

    async fn update(&self, todo: &Todo) -> anyhow::Result<()> {
        let mut todos = self.todos.write().await;
        if !todos.contains_key(&todo.id) {
            anyhow::bail!("todo not found: {}", todo.id);
        }
        todos.insert(todo.id, todo.clone());
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> anyhow::Result<bool> {
        let mut todos = self.todos.write().await;
        Ok(todos.remove(id).is_some())
    }
}

/// InMemoryUserRepository は開発用のインメモリユーザーリポジトリ。
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn upsert(&self, user: &User) -> anyhow::Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }
}
