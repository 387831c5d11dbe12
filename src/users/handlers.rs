use axum::{
    extract::{FromRequest, Request, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::ResultEnvelope,
    extractors::{JsonObject, UserIdPath},
    repo_types::User,
    services,
    validation::validate_user,
};
use crate::{auth::AdminAuth, error::ApiError, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip_all)]
pub async fn list_users(
    _auth: AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<ResultEnvelope<Vec<User>>>, ApiError> {
    let users = state.store.list_all().await?;
    Ok(Json(ResultEnvelope::new(users)))
}

#[instrument(skip(_auth, state))]
pub async fn get_user(
    UserIdPath(id): UserIdPath,
    _auth: AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<ResultEnvelope<Vec<User>>>, ApiError> {
    let user = services::load_user(state.store.as_ref(), &id).await?;
    Ok(Json(ResultEnvelope::new(vec![user])))
}

#[instrument(skip_all)]
pub async fn create_user(
    _auth: AdminAuth,
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<ResultEnvelope<User>>), ApiError> {
    let fields = validate_user(&body)
        .inspect_err(|e| warn!(error = %e, "create rejected"))?;
    let user = services::create_user(state.store.as_ref(), fields).await?;
    Ok((StatusCode::CREATED, Json(ResultEnvelope::new(user))))
}

/// The body is only read once the user is known to exist, so an unknown id
/// wins over a malformed body.
#[instrument(skip(_auth, state, req))]
pub async fn update_user(
    UserIdPath(id): UserIdPath,
    _auth: AdminAuth,
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<ResultEnvelope<User>>, ApiError> {
    services::load_user(state.store.as_ref(), &id).await?;
    let JsonObject(body) = JsonObject::from_request(req, &state).await?;
    let fields = validate_user(&body)
        .inspect_err(|e| warn!(error = %e, "update rejected"))?;
    let user = services::replace_user(state.store.as_ref(), &id, fields).await?;
    Ok(Json(ResultEnvelope::new(user)))
}

#[instrument(skip(_auth, state))]
pub async fn delete_user(
    UserIdPath(id): UserIdPath,
    _auth: AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<ResultEnvelope<String>>, ApiError> {
    services::load_user(state.store.as_ref(), &id).await?;
    services::delete_user(state.store.as_ref(), &id).await?;
    Ok(Json(ResultEnvelope::new(format!("User with ID {id} deleted."))))
}
