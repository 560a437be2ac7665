use axum::{extract::State, Json};
use axum_session_middleware::AxumSession;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use super::{barber::find_barber, MessageResponse};
use crate::{
    authorization_policy::{require_same_barber, require_staff},
    error::AppError,
    extract::{AppJson, AppPath},
    models::Break,
    scheduling::{DayAgenda, TimeRange},
    store::AppointmentFilter,
    time_format, AppState,
};

pub async fn get_barber_breaks(
    State(state): State<AppState>,
    session: AxumSession,
    AppPath(barber_id): AppPath<Uuid>,
) -> Result<Json<Vec<Break>>, AppError> {
    require_staff(&session)?;
    find_barber(&state, barber_id).await?;

    Ok(Json(state.store.list_breaks(barber_id, None).await?))
}

#[derive(Deserialize)]
pub struct BreakRequest {
    /// Defaults to the signed-in barber.
    pub barber_id: Option<Uuid>,
    pub break_date: NaiveDate,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    #[serde(with = "time_format")]
    pub end_time: NaiveTime,
    pub title: Option<String>,
}

pub async fn add_break(
    State(state): State<AppState>,
    session: AxumSession,
    AppJson(req): AppJson<BreakRequest>,
) -> Result<Json<Break>, AppError> {
    let staff = require_staff(&session)?;
    let barber_id = req.barber_id.unwrap_or(staff.barber_id);
    require_same_barber(&staff, barber_id)?;

    if req.start_time >= req.end_time {
        return Err(AppError::bad_request("Break end time must be after its start time"));
    }
    find_barber(&state, barber_id).await?;

    let _guard = state.booking_lock.lock().await;

    let appointments = state
        .store
        .list_appointments(&AppointmentFilter::on_date(req.break_date).barber(barber_id))
        .await?;
    let agenda = DayAgenda::for_barber(barber_id, req.break_date, &appointments, &[]);
    let range = TimeRange::between(req.start_time, req.end_time);
    if let Some(appointment) = agenda
        .appointments
        .iter()
        .find(|a| TimeRange::new(a.appointment_time, a.duration).overlaps(&range))
    {
        return Err(AppError::Conflict(format!(
            "Break overlaps the appointment with {} at {}",
            appointment.customer_name,
            appointment.appointment_time.format("%H:%M")
        )));
    }

    let pause = Break {
        id: Uuid::new_v4(),
        barber_id,
        break_date: req.break_date,
        start_time: req.start_time,
        end_time: req.end_time,
        title: req
            .title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Break".into()),
        created_at: Local::now(),
    };
    state.store.insert_break(&pause).await?;
    tracing::info!(
        "break {} added for {} on {} {}-{}",
        pause.id,
        staff.barber_name,
        pause.break_date,
        pause.start_time,
        pause.end_time
    );

    Ok(Json(pause))
}

pub async fn delete_break(
    State(state): State<AppState>,
    session: AxumSession,
    AppPath(break_id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let staff = require_staff(&session)?;
    let pause = state
        .store
        .get_break(break_id)
        .await?
        .ok_or_else(|| AppError::not_found("Break"))?;
    require_same_barber(&staff, pause.barber_id)?;

    if !state.store.delete_break(break_id).await? {
        return Err(AppError::not_found("Break"));
    }

    Ok(Json(MessageResponse {
        message: "Break deleted successfully",
    }))
}
