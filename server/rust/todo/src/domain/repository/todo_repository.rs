use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entity::todo::Todo;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn list_by_owner(&self, owner_id: &str) -> anyhow::Result<Vec<Todo>>;
    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Todo>>;
    async fn create(&self, todo: &Todo) -> anyhow::Result<()>;
    async fn update(&self, todo: &Todo) -> anyhow::Result<()>;
    async fn delete(&self, id: &Uuid) -> anyhow::Result<bool>;
}
