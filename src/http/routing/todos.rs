use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::application::todo_service::TodoService;
use crate::domain::todo::{Todo, TodoId};
use crate::http::types::{ApiError, Envelope};
use crate::http::validation::{
    self, CreateTodoBody, ListQuery, UpdateTodoBody,
};

#[derive(Clone)]
pub struct AppState<S: TodoService> {
    pub service: S,
}

pub fn router<S: TodoService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route(
            "/todos/:id",
            get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>),
        )
        .with_state(state)
}

async fn list_todos<S: TodoService>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Todo>>>, ApiError> {
    let params = validation::validate_list(query)?;
    let (items, meta) = state.service.list(params.page, params.limit).await?;
    Ok(Json(Envelope::page(items, meta)))
}

async fn get_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let todo = state.service.get(TodoId(id)).await?;
    Ok(Json(Envelope::data(todo)))
}

async fn create_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Json(body): Json<CreateTodoBody>,
) -> Result<(StatusCode, Json<Envelope<Todo>>), ApiError> {
    let payload = validation::validate_create(body)?;
    let todo = state.service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::data_with_message(todo, "Todo created successfully")),
    ))
}

async fn update_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTodoBody>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let patch = validation::validate_update(body)?;
    let todo = state.service.update(TodoId(id), patch).await?;
    Ok(Json(Envelope::data_with_message(todo, "Todo updated successfully")))
}

async fn delete_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<()>>, ApiError> {
    state.service.delete(TodoId(id)).await?;
    Ok(Json(Envelope::message("Todo deleted successfully")))
}
