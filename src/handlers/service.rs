use axum::{extract::State, Json};
use axum_session_middleware::AxumSession;
use bigdecimal::{BigDecimal, Zero};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    authorization_policy::require_staff,
    error::AppError,
    extract::{AppJson, AppQuery},
    models::{Service, ServiceCategory},
    price_format,
    store::StoreError,
    validation, AppState,
};

#[derive(Deserialize)]
pub struct ServicesQuery {
    pub category: Option<String>,
}

pub async fn get_services(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ServicesQuery>,
) -> Result<Json<Vec<Service>>, AppError> {
    let category = match params.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(category) => Some(
            category
                .parse::<ServiceCategory>()
                .map_err(AppError::BadRequest)?,
        ),
    };

    let services = state
        .store
        .list_services()
        .await?
        .into_iter()
        .filter(|s| category.map_or(true, |c| s.category == c))
        .collect();
    Ok(Json(services))
}

#[derive(Deserialize)]
pub struct ServiceRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub duration: i32,
    #[serde(alias = "base_price", with = "price_format")]
    pub price: BigDecimal,
    #[serde(default)]
    pub category: ServiceCategory,
}

pub async fn add_service(
    State(state): State<AppState>,
    session: AxumSession,
    AppJson(req): AppJson<ServiceRequest>,
) -> Result<Json<Service>, AppError> {
    require_staff(&session)?;

    let name = validation::required("name", &req.name)?;
    if req.duration <= 0 {
        return Err(AppError::bad_request("duration must be a positive number of minutes"));
    }
    if req.price < BigDecimal::zero() {
        return Err(AppError::bad_request("price must not be negative"));
    }
    if state.store.find_service_by_name(&name).await?.is_some() {
        return Err(AppError::Conflict(format!("Service '{name}' already exists")));
    }

    let service = Service {
        id: Uuid::new_v4(),
        name,
        description: req.description.trim().to_owned(),
        duration: req.duration,
        price: req.price,
        category: req.category,
    };
    state.store.insert_service(&service).await.map_err(|e| match e {
        StoreError::Duplicate(_) => {
            AppError::Conflict(format!("Service '{}' already exists", service.name))
        }
        e => e.into(),
    })?;
    tracing::info!("service {} added", service.name);

    Ok(Json(service))
}
