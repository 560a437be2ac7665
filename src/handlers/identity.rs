use axum::{extract::State, Json};
use axum_session_middleware::AxumSession;
use chrono::{DateTime, Local};
use serde::Serialize;

use super::MessageResponse;
use crate::{authorization_policy::require_staff, error::AppError, models::Barber, AppState};

pub async fn logout(mut session: AxumSession) -> Result<Json<MessageResponse>, AppError> {
    session.sign_out().await?;
    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

#[derive(Serialize)]
pub struct IdentityResponse {
    #[serde(flatten)]
    pub barber: Barber,
    pub session_expires_at: DateTime<Local>,
}

pub async fn get_current_identity(
    State(state): State<AppState>,
    session: AxumSession,
) -> Result<Json<IdentityResponse>, AppError> {
    let staff = require_staff(&session)?;
    let session_data = session.require_login()?;

    // The barber may have been removed after signing in.
    let barber = state
        .store
        .get_barber(staff.barber_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

    Ok(Json(IdentityResponse {
        barber,
        session_expires_at: session_data.expiry_time,
    }))
}
