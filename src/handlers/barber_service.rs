use std::collections::HashMap;

use axum::{extract::State, Json};
use axum_session_middleware::AxumSession;
use bigdecimal::{BigDecimal, Zero};
use serde::Deserialize;
use uuid::Uuid;

use super::barber::find_barber;
use crate::{
    authorization_policy::require_staff,
    error::AppError,
    extract::{AppJson, AppPath},
    models::{BarberService, BarberServiceWithDetails, Service},
    price_format,
    store::StoreError,
    AppState,
};

/// Services a barber currently offers, joined with the service details.
pub async fn get_barber_services(
    State(state): State<AppState>,
    AppPath(barber_id): AppPath<Uuid>,
) -> Result<Json<Vec<BarberServiceWithDetails>>, AppError> {
    find_barber(&state, barber_id).await?;

    let services: HashMap<Uuid, Service> = state
        .store
        .list_services()
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let offers = state
        .store
        .list_barber_services(barber_id)
        .await?
        .into_iter()
        .filter(|offer| offer.is_available)
        .filter_map(|offer| {
            let service = services.get(&offer.service_id)?;
            Some(BarberServiceWithDetails::new(offer, service))
        })
        .collect();
    Ok(Json(offers))
}

fn default_available() -> bool {
    true
}

#[derive(Deserialize)]
pub struct BarberServiceRequest {
    pub barber_id: Uuid,
    pub service_id: Uuid,
    /// Defaults to the service's base price.
    #[serde(default, deserialize_with = "price_format::deserialize_option")]
    pub price: Option<BigDecimal>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

pub async fn add_barber_service(
    State(state): State<AppState>,
    session: AxumSession,
    AppJson(req): AppJson<BarberServiceRequest>,
) -> Result<Json<BarberServiceWithDetails>, AppError> {
    require_staff(&session)?;

    find_barber(&state, req.barber_id).await?;
    let service = state
        .store
        .get_service(req.service_id)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;

    if state
        .store
        .find_barber_service(req.barber_id, req.service_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "This barber already offers the service".into(),
        ));
    }

    let price = req.price.unwrap_or_else(|| service.price.clone());
    if price < BigDecimal::zero() {
        return Err(AppError::bad_request("price must not be negative"));
    }

    let offer = BarberService {
        id: Uuid::new_v4(),
        barber_id: req.barber_id,
        service_id: req.service_id,
        price,
        is_available: req.is_available,
    };
    state
        .store
        .insert_barber_service(&offer)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => {
                AppError::Conflict("This barber already offers the service".into())
            }
            e => e.into(),
        })?;

    Ok(Json(BarberServiceWithDetails::new(offer, &service)))
}
