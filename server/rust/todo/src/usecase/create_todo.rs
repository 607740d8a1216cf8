use std::sync::Arc;

use crate::domain::entity::todo::{validate_description, validate_title, Todo};
use crate::domain::repository::TodoRepository;

#[derive(Debug, Clone)]
pub struct CreateTodoInput {
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateTodoError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// CreateTodoUseCase は Todo の作成ユースケース。
pub struct CreateTodoUseCase {
    repo: Arc<dyn TodoRepository>,
}

impl CreateTodoUseCase {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: &CreateTodoInput) -> Result<Todo, CreateTodoError> {
        validate_title(&input.title).map_err(CreateTodoError::Validation)?;
        validate_description(input.description.as_deref()).map_err(CreateTodoError::Validation)?;

        let todo = Todo::new(
            input.owner_id.clone(),
            input.title.clone(),
            input.description.clone(),
            input.completed,
        );

        self.repo
            .create(&todo)
            .await
            .map_err(|e| CreateTodoError::Internal(e.to_string()))?;

        Ok(todo)
    }
}
