pub mod todo_handler;

use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

use crate::adapter::middleware::auth::{auth_middleware, AuthState};
use crate::domain::repository::{TodoRepository, UserRepository};
use crate::usecase::{
    CreateTodoUseCase, DeleteTodoUseCase, GetTodoUseCase, ListTodosUseCase, ReconcileUserUseCase,
    UpdateTodoUseCase,
};

/// AppState はアプリケーション全体の共有状態を表す。
#[derive(Clone)]
pub struct AppState {
    pub list_todos_uc: Arc<ListTodosUseCase>,
    pub get_todo_uc: Arc<GetTodoUseCase>,
    pub create_todo_uc: Arc<CreateTodoUseCase>,
    pub update_todo_uc: Arc<UpdateTodoUseCase>,
    pub delete_todo_uc: Arc<DeleteTodoUseCase>,
    pub reconcile_user_uc: Arc<ReconcileUserUseCase>,
    pub auth: Option<AuthState>,
    pub db_pool: Option<sqlx::PgPool>,
}

impl AppState {
    pub fn new(
        todo_repo: Arc<dyn TodoRepository>,
        user_repo: Arc<dyn UserRepository>,
        auth: Option<AuthState>,
        db_pool: Option<sqlx::PgPool>,
    ) -> Self {
        Self {
            list_todos_uc: Arc::new(ListTodosUseCase::new(todo_repo.clone())),
            get_todo_uc: Arc::new(GetTodoUseCase::new(todo_repo.clone())),
            create_todo_uc: Arc::new(CreateTodoUseCase::new(todo_repo.clone())),
            update_todo_uc: Arc::new(UpdateTodoUseCase::new(todo_repo.clone())),
            delete_todo_uc: Arc::new(DeleteTodoUseCase::new(todo_repo)),
            reconcile_user_uc: Arc::new(ReconcileUserUseCase::new(user_repo)),
            auth,
            db_pool,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        todo_handler::healthz,
        todo_handler::readyz,
        todo_handler::list_todos,
        todo_handler::get_todo,
        todo_handler::create_todo,
        todo_handler::update_todo,
        todo_handler::delete_todo,
    ),
    components(schemas(
        todo_handler::TodoResponse,
        todo_handler::CreateTodoRequest,
        todo_handler::UpdateTodoRequest,
    ))
)]
struct ApiDoc;

/// Build the REST API router.
pub fn router(state: AppState) -> Router {
    // Protected routes share auth_middleware for Bearer token validation
    let protected = Router::new()
        .route(
            "/api/v1/todos",
            get(todo_handler::list_todos).post(todo_handler::create_todo),
        )
        .route(
            "/api/v1/todos/{id}",
            get(todo_handler::get_todo)
                .put(todo_handler::update_todo)
                .delete(todo_handler::delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Public endpoints (no auth required)
    let public = Router::new()
        .route("/healthz", get(todo_handler::healthz))
        .route("/readyz", get(todo_handler::readyz))
        .route("/api/v1/openapi.json", get(openapi));

    Router::new().merge(protected).merge(public).with_state(state)
}

async fn openapi() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}

/// ErrorResponse は統一エラーレスポンス。
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}
