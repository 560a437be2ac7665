use std::collections::HashMap;

use axum::{extract::State, Json};
use axum_session_middleware::AxumSession;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::AppJson,
    login_managers::{password_login::verify_login, BARBER_ID, BARBER_NAME},
    AppState,
};

#[derive(Deserialize)]
pub struct BarberLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub barber_id: Uuid,
    pub barber_name: String,
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".into())
}

pub async fn login(
    State(state): State<AppState>,
    mut session: AxumSession,
    AppJson(req): AppJson<BarberLoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let account = state
        .store
        .find_account_by_email(req.email.trim())
        .await?;

    if !verify_login(account.as_ref(), &req.password) {
        tracing::info!("failed login for {}", req.email.trim());
        return Err(invalid_credentials());
    }
    let account = account.ok_or_else(invalid_credentials)?;

    let barber = state
        .store
        .get_barber(account.barber_id)
        .await?
        .ok_or_else(invalid_credentials)?;

    let data = HashMap::from([
        (BARBER_ID.to_owned(), barber.id.to_string()),
        (BARBER_NAME.to_owned(), barber.name.clone()),
    ]);
    let token = session.sign_in(barber.id, data).await?;
    tracing::info!("barber {} signed in", barber.name);

    Ok(Json(LoginResponse {
        access_token: token.to_string(),
        token_type: "bearer",
        barber_id: barber.id,
        barber_name: barber.name,
    }))
}
