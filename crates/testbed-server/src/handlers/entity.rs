use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use testbed_core::error::Error;
use testbed_core::types::{Entity, EntityId, SaveEntity};

use crate::app_state::AppState;
use crate::error::ApiError;

/// Query string for the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: String,
    /// Match the name exactly instead of by case-insensitive substring.
    #[serde(default)]
    pub exact: bool,
}

/// Create a new entity. Any id in the body is ignored.
#[allow(clippy::missing_errors_doc)]
pub async fn create(
    State(state): State<AppState>,
    Json(mut entity): Json<SaveEntity>,
) -> Result<Json<Entity>, ApiError> {
    entity.id = None;
    let saved = state.store.save(entity).await?;
    tracing::info!(id = %saved.id, "created entity");
    Ok(Json(saved))
}

/// List every entity.
#[allow(clippy::missing_errors_doc)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Entity>>, ApiError> {
    let entities = state.store.find_all().await?;
    Ok(Json(entities))
}

#[allow(clippy::missing_errors_doc)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<Entity>, ApiError> {
    state
        .store
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Overwrite an existing entity. The path id wins over any id in the body.
#[allow(clippy::missing_errors_doc)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(mut entity): Json<SaveEntity>,
) -> Result<Json<Entity>, ApiError> {
    if !state.store.exists_by_id(id).await? {
        return Err(ApiError::NotFound);
    }

    entity.id = Some(id);
    let updated = state.store.save(entity).await?;
    Ok(Json(updated))
}

#[allow(clippy::missing_errors_doc)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<&'static str, ApiError> {
    if !state.store.exists_by_id(id).await.map_err(deletion_failed)? {
        return Err(ApiError::NotFound);
    }

    state.store.delete_by_id(id).await.map_err(deletion_failed)?;
    tracing::info!(%id, "deleted entity");
    Ok("Entity deleted successfully")
}

/// Search entities by name.
#[allow(clippy::missing_errors_doc)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Entity>>, ApiError> {
    let entities = if params.exact {
        state.store.find_by_name(&params.name).await?
    } else {
        state
            .store
            .find_by_name_containing_ignore_case(&params.name)
            .await?
    };

    Ok(Json(entities))
}

fn deletion_failed(err: Error) -> ApiError {
    ApiError::from(err).context("Error deleting entity")
}
