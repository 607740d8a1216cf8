use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AppState, ErrorResponse};
use crate::domain::entity::identity::AuthenticatedIdentity;
use crate::domain::entity::todo::Todo;
use crate::usecase::create_todo::{CreateTodoError, CreateTodoInput};
use crate::usecase::delete_todo::DeleteTodoError;
use crate::usecase::get_todo::GetTodoError;
use crate::usecase::update_todo::{UpdateTodoError, UpdateTodoInput};

#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Health check OK"),
    )
)]
pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/readyz",
    responses(
        (status = 200, description = "Ready"),
        (status = 503, description = "Not ready"),
    )
)]
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let mut db_status = "skipped";
    let mut overall_ok = true;

    // DB check
    if let Some(ref pool) = state.db_pool {
        match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => db_status = "ok",
            Err(_) => {
                db_status = "error";
                overall_ok = false;
            }
        }
    }

    let status_code = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status_code,
        Json(serde_json::json!({
            "status": if overall_ok { "ready" } else { "not ready" },
            "checks": {
                "database": db_status
            }
        })),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/v1/todos",
    responses(
        (status = 200, description = "List todos owned by the authenticated user", body = [TodoResponse]),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> impl IntoResponse {
    match state.list_todos_uc.execute(&identity.id).await {
        Ok(todos) => {
            let items: Vec<TodoResponse> = todos.into_iter().map(TodoResponse::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            let err = ErrorResponse::new("TODO_LIST_FAILED", &e.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(err)).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = TodoResponse),
        (status = 404, description = "Todo not found"),
    )
)]
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.get_todo_uc.execute(&id, &identity.id).await {
        Ok(todo) => (StatusCode::OK, Json(TodoResponse::from(todo))).into_response(),
        Err(GetTodoError::NotFound(id)) => not_found(&id),
        Err(GetTodoError::Internal(msg)) => {
            let err = ErrorResponse::new("TODO_GET_FAILED", &msg);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(err)).into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Validation failed"),
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Json(req): Json<CreateTodoRequest>,
) -> impl IntoResponse {
    let input = CreateTodoInput {
        owner_id: identity.id,
        title: req.title,
        description: req.description,
        completed: req.completed.unwrap_or(false),
    };

    match state.create_todo_uc.execute(&input).await {
        Ok(todo) => (StatusCode::CREATED, Json(TodoResponse::from(todo))).into_response(),
        Err(CreateTodoError::Validation(msg)) => {
            let err = ErrorResponse::new("TODO_VALIDATION_FAILED", &msg);
            (StatusCode::BAD_REQUEST, Json(err)).into_response()
        }
        Err(CreateTodoError::Internal(msg)) => {
            let err = ErrorResponse::new("TODO_CREATE_FAILED", &msg);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(err)).into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Todo not found"),
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTodoRequest>,
) -> impl IntoResponse {
    let input = UpdateTodoInput {
        id,
        owner_id: identity.id,
        title: req.title,
        description: req.description,
        completed: req.completed,
    };

    match state.update_todo_uc.execute(&input).await {
        Ok(todo) => (StatusCode::OK, Json(TodoResponse::from(todo))).into_response(),
        Err(UpdateTodoError::NotFound(id)) => not_found(&id),
        Err(UpdateTodoError::Validation(msg)) => {
            let err = ErrorResponse::new("TODO_VALIDATION_FAILED", &msg);
            (StatusCode::BAD_REQUEST, Json(err)).into_response()
        }
        Err(UpdateTodoError::Internal(msg)) => {
            let err = ErrorResponse::new("TODO_UPDATE_FAILED", &msg);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(err)).into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "Todo not found"),
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.delete_todo_uc.execute(&id, &identity.id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(DeleteTodoError::NotFound(id)) => not_found(&id),
        Err(DeleteTodoError::Internal(msg)) => {
            let err = ErrorResponse::new("TODO_DELETE_FAILED", &msg);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(err)).into_response()
        }
    }
}

fn not_found(id: &Uuid) -> axum::response::Response {
    let err = ErrorResponse::new("TODO_NOT_FOUND", &format!("todo not found: {id}"));
    (StatusCode::NOT_FOUND, Json(err)).into_response()
}

// --- Request / Response types ---

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TodoResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id.to_string(),
            title: t.title,
            description: t.description,
            completed: t.completed,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}
