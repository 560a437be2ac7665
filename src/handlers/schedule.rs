use axum::{extract::State, Json};
use axum_session_middleware::AxumSession;
use chrono::NaiveDate;
use serde::Deserialize;

use super::today;
use crate::{
    authorization_policy::require_staff,
    error::AppError,
    extract::AppQuery,
    scheduling::{self, DailySchedule},
    store::AppointmentFilter,
    AppState,
};

#[derive(Deserialize)]
pub struct ScheduleQuery {
    pub date: Option<NaiveDate>,
}

/// Multi-barber grid for one day, today unless `date` is given.
pub async fn get_schedule(
    State(state): State<AppState>,
    session: AxumSession,
    AppQuery(params): AppQuery<ScheduleQuery>,
) -> Result<Json<DailySchedule>, AppError> {
    require_staff(&session)?;
    let date = params.date.unwrap_or_else(today);

    let barbers = state.store.list_barbers().await?;
    let appointments = state
        .store
        .list_appointments(&AppointmentFilter::on_date(date))
        .await?;
    let breaks = state.store.list_breaks_on(date).await?;

    Ok(Json(scheduling::daily_schedule(
        &state.config.business_hours,
        date,
        &barbers,
        &appointments,
        &breaks,
    )))
}
