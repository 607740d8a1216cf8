pub mod create_todo;
pub mod delete_todo;
pub mod get_todo;
pub mod list_todos;
pub mod reconcile_user;
pub mod update_todo;

pub use create_todo::CreateTodoUseCase;
pub use delete_todo::DeleteTodoUseCase;
pub use get_todo::GetTodoUseCase;
pub use list_todos::ListTodosUseCase;
pub use reconcile_user::ReconcileUserUseCase;
pub use update_todo::UpdateTodoUseCase;
