use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::AppError, seed, AppState};

#[derive(Serialize)]
pub struct InitDataResponse {
    pub message: &'static str,
    pub barbers_count: usize,
    pub services_count: usize,
}

pub async fn init_data(State(state): State<AppState>) -> Result<Json<InitDataResponse>, AppError> {
    // Seeding checks for empty tables before writing; two concurrent runs
    // would both see them empty.
    let _guard = state.booking_lock.lock().await;
    let summary = seed::initialize(state.store.as_ref(), &state.config.seed_staff_password).await?;
    Ok(Json(InitDataResponse {
        message: "Data initialized successfully",
        barbers_count: summary.barbers_count,
        services_count: summary.services_count,
    }))
}

#[derive(Serialize)]
pub struct InitServicesResponse {
    pub message: &'static str,
    pub services_initialized: bool,
}

/// Older clients call this before listing services.
pub async fn init_services(
    State(state): State<AppState>,
) -> Result<Json<InitServicesResponse>, AppError> {
    let Json(result) = init_data(State(state)).await?;
    Ok(Json(InitServicesResponse {
        message: result.message,
        services_initialized: true,
    }))
}
