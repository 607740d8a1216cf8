use std::sync::Arc;

use crate::domain::entity::todo::Todo;
use crate::domain::repository::TodoRepository;

#[derive(Debug, thiserror::Error)]
pub enum ListTodosError {
    #[error("internal error: {0}")]
    Internal(String),
}

/// ListTodosUseCase は認証済みユーザーが所有する Todo の一覧取得ユースケース。
pub struct ListTodosUseCase {
    repo: Arc<dyn TodoRepository>,
}

impl ListTodosUseCase {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, owner_id: &str) -> Result<Vec<Todo>, ListTodosError> {
        self.repo
            .list_by_owner(owner_id)
            .await
            .map_err(|e| ListTodosError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::todo_repository::MockTodoRepository;

    #[tokio::test]
    async fn success() {
        let mut mock = MockTodoRepository::new();
        mock.expect_list_by_owner()
            .withf(|owner| owner == "user-1")
            .returning(|owner| {
                Ok(vec![Todo::new(
                    owner.to_string(),
                    "buy milk".to_string(),
                    None,
                    false,
                )])
            });

        let uc = ListTodosUseCase::new(Arc::new(mock));
        let todos = uc.execute("user-1").await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].owner_id, "user-1");
    }

    #[tokio::test]
    async fn repository_failure() {
        let mut mock = MockTodoRepository::new();
        mock.expect_list_by_owner()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let uc = ListTodosUseCase::new(Arc::new(mock));
        let result = uc.execute("user-1").await;
        assert!(matches!(result.unwrap_err(), ListTodosError::Internal(_)));
    }
}
