use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entity::todo::{validate_description, validate_title, Todo};
use crate::domain::repository::TodoRepository;

/// 部分更新の入力。None のフィールドは変更しない。
#[derive(Debug, Clone)]
pub struct UpdateTodoInput {
    pub id: Uuid,
    pub owner_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateTodoError {
    #[error("todo not found: {0}")]
    NotFound(Uuid),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// UpdateTodoUseCase は Todo の部分更新ユースケース。
/// 所有者でない場合は NotFound として扱う。
pub struct UpdateTodoUseCase {
    repo: Arc<dyn TodoRepository>,
}

impl UpdateTodoUseCase {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: &UpdateTodoInput) -> Result<Todo, UpdateTodoError> {
        if let Some(ref title) = input.title {
            validate_title(title).map_err(UpdateTodoError::Validation)?;
        }
        validate_description(input.description.as_deref())
            .map_err(UpdateTodoError::Validation)?;

        let existing = self
            .repo
            .find_by_id(&input.id)
            .await
            .map_err(|e| UpdateTodoError::Internal(e.to_string()))?;

        let mut todo = match existing {
            Some(t) if t.owner_id == input.owner_id => t,
            _ => return Err(UpdateTodoError::NotFound(input.id)),
        };

        if let Some(ref title) = input.title {
            todo.title = title.clone();
        }
        if let Some(ref description) = input.description {
            todo.description = Some(description.clone());
        }
        if let Some(completed) = input.completed {
            todo.completed = completed;
        }
        todo.updated_at = Utc::now();

        self.repo
            .update(&todo)
            .await
            .map_err(|e| UpdateTodoError::Internal(e.to_string()))?;

        Ok(todo)
    }
}
