use axum::{extract::State, Json};
use axum_session_middleware::AxumSession;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    authorization_policy::require_staff,
    error::AppError,
    extract::{AppJson, AppPath},
    models::Barber,
    validation, AppState,
};

pub(crate) async fn find_barber(state: &AppState, barber_id: Uuid) -> Result<Barber, AppError> {
    state
        .store
        .get_barber(barber_id)
        .await?
        .ok_or_else(|| AppError::not_found("Barber"))
}

pub async fn get_barbers(State(state): State<AppState>) -> Result<Json<Vec<Barber>>, AppError> {
    Ok(Json(state.store.list_barbers().await?))
}

pub async fn get_barber(
    State(state): State<AppState>,
    AppPath(barber_id): AppPath<Uuid>,
) -> Result<Json<Barber>, AppError> {
    Ok(Json(find_barber(&state, barber_id).await?))
}

fn default_available() -> bool {
    true
}

#[derive(Deserialize)]
pub struct BarberRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub experience_years: i32,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

pub async fn add_barber(
    State(state): State<AppState>,
    session: AxumSession,
    AppJson(req): AppJson<BarberRequest>,
) -> Result<Json<Barber>, AppError> {
    let staff = require_staff(&session)?;

    if req.experience_years < 0 {
        return Err(AppError::bad_request("experience_years must not be negative"));
    }

    let barber = Barber {
        id: Uuid::new_v4(),
        name: validation::required("name", &req.name)?,
        description: req.description.trim().to_owned(),
        experience_years: req.experience_years,
        specialties: req
            .specialties
            .iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect(),
        image_url: validation::optional(req.image_url),
        is_available: req.is_available,
    };
    state.store.insert_barber(&barber).await?;
    tracing::info!("barber {} added by {}", barber.name, staff.barber_name);

    Ok(Json(barber))
}
