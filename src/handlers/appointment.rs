use axum::{extract::State, Json};
use axum_session_middleware::AxumSession;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{barber::find_barber, now, today, MessageResponse};
use crate::{
    authorization_policy::{require_same_barber, require_staff},
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    models::{Appointment, AppointmentStatus},
    scheduling::{self, DayAgenda, SlotAvailability, TimeRange},
    store::AppointmentFilter,
    time_format, validation, AppState,
};

async fn find_appointment(state: &AppState, appointment_id: Uuid) -> Result<Appointment, AppError> {
    state
        .store
        .get_appointment(appointment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Appointment"))
}

pub async fn get_appointments(State(state): State<AppState>) -> Result<Json<Vec<Appointment>>, AppError> {
    Ok(Json(
        state
            .store
            .list_appointments(&AppointmentFilter::default())
            .await?,
    ))
}

pub async fn get_today_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    Ok(Json(
        state
            .store
            .list_appointments(&AppointmentFilter::on_date(today()))
            .await?,
    ))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    AppPath(appointment_id): AppPath<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(find_appointment(&state, appointment_id).await?))
}

#[derive(Deserialize)]
pub struct BarberAppointmentsQuery {
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

pub async fn get_barber_appointments(
    State(state): State<AppState>,
    session: AxumSession,
    AppPath(barber_id): AppPath<Uuid>,
    AppQuery(params): AppQuery<BarberAppointmentsQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    require_staff(&session)?;
    find_barber(&state, barber_id).await?;

    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(status) => Some(status.parse::<AppointmentStatus>().map_err(AppError::BadRequest)?),
    };
    let filter = AppointmentFilter {
        barber_id: Some(barber_id),
        status,
        date_from: params.date_from,
        date_to: params.date_to,
    };
    Ok(Json(state.store.list_appointments(&filter).await?))
}

pub async fn get_barber_today_appointments(
    State(state): State<AppState>,
    session: AxumSession,
    AppPath(barber_id): AppPath<Uuid>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    require_staff(&session)?;
    find_barber(&state, barber_id).await?;

    let filter = AppointmentFilter::on_date(today()).barber(barber_id);
    Ok(Json(state.store.list_appointments(&filter).await?))
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub service_id: Option<Uuid>,
    /// Used when no service is given; defaults to one slot.
    pub duration: Option<i32>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub barber_id: Uuid,
    pub date: NaiveDate,
    pub duration: i32,
    pub is_open: bool,
    pub slots: Vec<SlotAvailability>,
}

pub async fn get_availability(
    State(state): State<AppState>,
    AppPath(barber_id): AppPath<Uuid>,
    AppQuery(params): AppQuery<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let barber = find_barber(&state, barber_id).await?;
    let hours = &state.config.business_hours;

    let duration = match params.service_id {
        Some(service_id) => {
            let service = state
                .store
                .get_service(service_id)
                .await?
                .ok_or_else(|| AppError::not_found("Service"))?;
            service.duration
        }
        None => params.duration.unwrap_or(hours.slot_minutes as i32),
    };
    if duration < scheduling::MIN_APPOINTMENT_MINUTES {
        return Err(AppError::bad_request("Duration must be at least 15 minutes"));
    }

    let slots = if barber.is_available {
        let appointments = state
            .store
            .list_appointments(&AppointmentFilter::on_date(params.date).barber(barber_id))
            .await?;
        let breaks = state.store.list_breaks(barber_id, Some(params.date)).await?;
        let agenda = DayAgenda::for_barber(barber_id, params.date, &appointments, &breaks);
        scheduling::available_slots(hours, &agenda, params.date, duration, now())
    } else {
        hours
            .slots()
            .into_iter()
            .map(|time| SlotAvailability {
                time,
                available: false,
            })
            .collect()
    };

    Ok(Json(AvailabilityResponse {
        barber_id,
        date: params.date,
        duration,
        is_open: hours.is_open_on(params.date),
        slots,
    }))
}

#[derive(Deserialize)]
pub struct AppointmentRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub service_id: Uuid,
    pub barber_id: Uuid,
    pub appointment_date: NaiveDate,
    #[serde(with = "time_format")]
    pub appointment_time: NaiveTime,
    pub notes: Option<String>,
}

/// Books an appointment. Names, duration and price come from the stored
/// barber and service; the slot must pass the booking rules.
pub async fn add_appointment(
    State(state): State<AppState>,
    AppJson(req): AppJson<AppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let customer_name = validation::required("customer_name", &req.customer_name)?;
    let customer_email = validation::email(&req.customer_email)?;
    let customer_phone = validation::phone(&req.customer_phone)?;

    let barber = find_barber(&state, req.barber_id).await?;
    if !barber.is_available {
        return Err(AppError::bad_request(format!(
            "{} is not taking appointments",
            barber.name
        )));
    }
    let service = state
        .store
        .get_service(req.service_id)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;
    let offer = state
        .store
        .find_barber_service(barber.id, service.id)
        .await?
        .filter(|offer| offer.is_available)
        .ok_or_else(|| {
            AppError::bad_request(format!("{} does not offer {}", barber.name, service.name))
        })?;

    let _guard = state.booking_lock.lock().await;

    let appointments = state
        .store
        .list_appointments(&AppointmentFilter::on_date(req.appointment_date).barber(barber.id))
        .await?;
    let breaks = state
        .store
        .list_breaks(barber.id, Some(req.appointment_date))
        .await?;
    let agenda = DayAgenda::for_barber(barber.id, req.appointment_date, &appointments, &breaks);
    scheduling::check_booking(
        &state.config.business_hours,
        &agenda,
        req.appointment_date,
        req.appointment_time,
        service.duration,
        now(),
    )?;

    let appointment = Appointment {
        id: Uuid::new_v4(),
        customer_name,
        customer_email,
        customer_phone,
        service_id: service.id,
        service_name: service.name,
        barber_id: barber.id,
        barber_name: barber.name,
        appointment_date: req.appointment_date,
        appointment_time: req.appointment_time,
        duration: service.duration,
        price: offer.price,
        notes: validation::optional(req.notes),
        status: AppointmentStatus::Pending,
        created_at: Local::now(),
    };
    state.store.insert_appointment(&appointment).await?;
    tracing::info!(
        "appointment {} booked with {} on {} at {}",
        appointment.id,
        appointment.barber_name,
        appointment.appointment_date,
        appointment.appointment_time
    );

    Ok(Json(appointment))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    pub status: AppointmentStatus,
}

async fn set_status(
    state: &AppState,
    session: &AxumSession,
    appointment_id: Uuid,
    status: &str,
) -> Result<Json<StatusResponse>, AppError> {
    let staff = require_staff(session)?;
    let status = status
        .trim()
        .parse::<AppointmentStatus>()
        .map_err(AppError::BadRequest)?;

    let appointment = find_appointment(state, appointment_id).await?;
    require_same_barber(&staff, appointment.barber_id)?;

    // A cancelled appointment gave up its time; taking it back needs the slot
    // to still be free. Hours and the past are not re-checked.
    let reactivating = !appointment.status.is_active() && status.is_active();
    let _guard = if reactivating {
        Some(state.booking_lock.lock().await)
    } else {
        None
    };
    if reactivating {
        let appointments = state
            .store
            .list_appointments(
                &AppointmentFilter::on_date(appointment.appointment_date).barber(appointment.barber_id),
            )
            .await?;
        let breaks = state
            .store
            .list_breaks(appointment.barber_id, Some(appointment.appointment_date))
            .await?;
        let agenda = DayAgenda::for_barber(
            appointment.barber_id,
            appointment.appointment_date,
            &appointments,
            &breaks,
        );
        let range = TimeRange::new(appointment.appointment_time, appointment.duration);
        if let Some(conflict) = agenda.conflict(&range) {
            return Err(conflict.into());
        }
    }

    if !state
        .store
        .update_appointment_status(appointment_id, status)
        .await?
    {
        return Err(AppError::not_found("Appointment"));
    }
    tracing::info!(
        "appointment {} status {} -> {}",
        appointment_id,
        appointment.status,
        status
    );

    Ok(Json(StatusResponse {
        message: "Appointment status updated successfully",
        status,
    }))
}

pub async fn update_status(
    State(state): State<AppState>,
    session: AxumSession,
    AppPath(appointment_id): AppPath<Uuid>,
    AppJson(req): AppJson<StatusRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    set_status(&state, &session, appointment_id, &req.status).await
}

pub async fn update_status_by_query(
    State(state): State<AppState>,
    session: AxumSession,
    AppPath(appointment_id): AppPath<Uuid>,
    AppQuery(params): AppQuery<StatusRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    set_status(&state, &session, appointment_id, &params.status).await
}

#[derive(Deserialize)]
pub struct DurationRequest {
    pub duration: i32,
}

pub async fn update_duration(
    State(state): State<AppState>,
    session: AxumSession,
    AppPath(appointment_id): AppPath<Uuid>,
    AppJson(req): AppJson<DurationRequest>,
) -> Result<Json<Appointment>, AppError> {
    let staff = require_staff(&session)?;
    let mut appointment = find_appointment(&state, appointment_id).await?;
    require_same_barber(&staff, appointment.barber_id)?;

    scheduling::validate_duration_change(appointment.duration, req.duration)?;

    if !state
        .store
        .update_appointment_duration(appointment_id, req.duration)
        .await?
    {
        return Err(AppError::not_found("Appointment"));
    }
    appointment.duration = req.duration;

    Ok(Json(appointment))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    session: AxumSession,
    AppPath(appointment_id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let staff = require_staff(&session)?;
    let appointment = find_appointment(&state, appointment_id).await?;
    require_same_barber(&staff, appointment.barber_id)?;

    if !state.store.delete_appointment(appointment_id).await? {
        return Err(AppError::not_found("Appointment"));
    }
    tracing::info!("appointment {} deleted by {}", appointment_id, staff.barber_name);

    Ok(Json(MessageResponse {
        message: "Appointment deleted successfully",
    }))
}
