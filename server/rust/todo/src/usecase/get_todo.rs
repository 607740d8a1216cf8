use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::todo::Todo;
use crate::domain::repository::TodoRepository;

#[derive(Debug, thiserror::Error)]
pub enum GetTodoError {
    #[error("todo not found: {0}")]
    NotFound(Uuid),

    #[error("internal error: {0}")]
    Internal(String),
}

/// GetTodoUseCase は Todo の単体取得ユースケース。
/// 他ユーザーの Todo は存在を漏らさないために NotFound として扱う。
pub struct GetTodoUseCase {
    repo: Arc<dyn TodoRepository>,
}

impl GetTodoUseCase {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &Uuid, owner_id: &str) -> Result<Todo, GetTodoError> {
        let todo = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| GetTodoError::Internal(e.to_string()))?;

        match todo {
            Some(t) if t.owner_id == owner_id => Ok(t),
            _ => Err(GetTodoError::NotFound(*id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::todo_repository::MockTodoRepository;

    fn make_todo(owner: &str) -> Todo {
        Todo::new(owner.to_string(), "buy milk".to_string(), None, false)
    }

    #[tokio::test]
    async fn success() {
        let todo = make_todo("user-1");
        let id = todo.id;

        let mut mock = MockTodoRepository::new();
        let returned = todo.clone();
        mock.expect_find_by_id()
            .withf(move |got| *got == id)
            .returning(move |_| Ok(Some(returned.clone())));

        let uc = GetTodoUseCase::new(Arc::new(mock));
        let found = uc.execute(&id, "user-1").await.unwrap();
        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn not_found() {
        let mut mock = MockTodoRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(None));

        let uc = GetTodoUseCase::new(Arc::new(mock));
        let result = uc.execute(&Uuid::new_v4(), "user-1").await;
        assert!(matches!(result.unwrap_err(), GetTodoError::NotFound(_)));
    }

    #[tokio::test]
    async fn other_owner_is_not_found() {
        let todo = make_todo("user-1");
        let id = todo.id;

        let mut mock = MockTodoRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(todo.clone())));

        let uc = GetTodoUseCase::new(Arc::new(mock));
        let result = uc.execute(&id, "user-2").await;
        assert!(matches!(result.unwrap_err(), GetTodoError::NotFound(_)));
    }
}
