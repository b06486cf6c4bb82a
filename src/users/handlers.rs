use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{DeleteConfirmation, UserPayload, UserRecord},
        id,
    },
};

// --- public routers ---

pub fn read_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
}

pub fn write_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", put(replace_user).delete(delete_user))
}

pub async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserRecord>>, ApiError> {
    let users = state.store.list_all().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    let id = path_id(id)?;
    let user = state.store.get(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<UserRecord>), ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let record = payload.into_record(id::new_id());
    state.store.put(&record).await?;
    info!(user_id = %record.id, "user created");
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state, payload))]
pub async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<UserRecord>, ApiError> {
    let id = path_id(id)?;
    let Json(payload) = payload.map_err(bad_body)?;
    // Full replacement: the id comes from the path, everything else from the
    // body, with absent fields at their zero values.
    let record = payload.into_record(id);
    state.store.put(&record).await?;
    info!(user_id = %record.id, "user replaced");
    Ok(Json(record))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConfirmation>, ApiError> {
    let id = path_id(id)?;
    state.store.delete(&id).await?;
    info!(user_id = %id, "user deleted");
    Ok(Json(DeleteConfirmation {
        message: "ID deleted successfully".into(),
    }))
}

fn path_id(id: String) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::Validation("missing user id in path".into()));
    }
    Ok(id)
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(rejection.body_text())
}
