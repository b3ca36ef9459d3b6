use axum::extract::State;

use crate::app_state::AppState;
use crate::error::ApiError;

/// Health check endpoint. Reports the record count as proof of connectivity.
#[allow(clippy::missing_errors_doc)]
pub async fn health(State(state): State<AppState>) -> Result<String, ApiError> {
    let count = state
        .store
        .count()
        .await
        .map_err(|e| ApiError::from(e).context("Database connection failed"))?;

    Ok(format!("Database connection successful! Total records: {count}"))
}
