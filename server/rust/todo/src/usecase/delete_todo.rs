use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repository::TodoRepository;

#[derive(Debug, thiserror::Error)]
pub enum DeleteTodoError {
    #[error("todo not found: {0}")]
    NotFound(Uuid),

    #[error("internal error: {0}")]
    Internal(String),
}

/// DeleteTodoUseCase は Todo の削除ユースケース。
/// 所有者でない場合は NotFound として扱う。
pub struct DeleteTodoUseCase {
    repo: Arc<dyn TodoRepository>,
}

impl DeleteTodoUseCase {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &Uuid, owner_id: &str) -> Result<(), DeleteTodoError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DeleteTodoError::Internal(e.to_string()))?;

        match existing {
            Some(t) if t.owner_id == owner_id => {}
            _ => return Err(DeleteTodoError::NotFound(*id)),
        }

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DeleteTodoError::Internal(e.to_string()))?;

        if !deleted {
            return Err(DeleteTodoError::NotFound(*id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::todo::Todo;
    use crate::domain::repository::todo_repository::MockTodoRepository;

    #[tokio::test]
    async fn success() {
        let todo = Todo::new("user-1".to_string(), "buy milk".to_string(), None, false);
        let id = todo.id;

        let mut mock = MockTodoRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(todo.clone())));
        mock.expect_delete()
            .withf(move |got| *got == id)
            .returning(|_| Ok(true));

        let uc = DeleteTodoUseCase::new(Arc::new(mock));
        assert!(uc.execute(&id, "user-1").await.is_ok());
    }

    #[tokio::test]
    async fn not_found() {
        let mut mock = MockTodoRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(None));

        let uc = DeleteTodoUseCase::new(Arc::new(mock));
        let result = uc.execute(&Uuid::new_v4(), "user-1").await;
        assert!(matches!(result.unwrap_err(), DeleteTodoError::NotFound(_)));
    }

    #[tokio::test]
    async fn other_owner_is_not_found() {
        let todo = Todo::new("user-2".to_string(), "theirs".to_string(), None, false);
        let id = todo.id;

        let mut mock = MockTodoRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(todo.clone())));

        let uc = DeleteTodoUseCase::new(Arc::new(mock));
        let result = uc.execute(&id, "user-1").await;
        assert!(matches!(result.unwrap_err(), DeleteTodoError::NotFound(_)));
    }
}
