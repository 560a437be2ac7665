use axum::{extract::State, Json};
use axum_session_middleware::AxumSession;
use chrono::Local;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    authorization_policy::require_staff, error::AppError, extract::AppJson,
    models::ContactMessage, validation, AppState,
};

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub async fn add_contact_message(
    State(state): State<AppState>,
    AppJson(req): AppJson<ContactRequest>,
) -> Result<Json<ContactMessage>, AppError> {
    let message = ContactMessage {
        id: Uuid::new_v4(),
        name: validation::required("name", &req.name)?,
        email: validation::email(&req.email)?,
        message: validation::required("message", &req.message)?,
        created_at: Local::now(),
    };
    state.store.insert_contact_message(&message).await?;
    tracing::info!("contact message {} from {}", message.id, message.email);

    Ok(Json(message))
}

pub async fn get_contact_messages(
    State(state): State<AppState>,
    session: AxumSession,
) -> Result<Json<Vec<ContactMessage>>, AppError> {
    require_staff(&session)?;
    Ok(Json(state.store.list_contact_messages().await?))
}
