use axum::{extract::State, Json};

use crate::{
    error::AppError, models::InsertOutcome, repositories::patient::insert_seed_data,
    state::AppState,
};

/// `POST /api/v1/insert`
pub async fn insert_rows(State(state): State<AppState>) -> Result<Json<InsertOutcome>, AppError> {
    let outcome = insert_seed_data(state.admin_pool()).await?;
    Ok(Json(outcome))
}
