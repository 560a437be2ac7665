//! Booking rules: business hours, slot availability, overlap detection and the
//! multi-barber daily grid.
//!
//! Everything here is pure. Callers fetch the barber's appointments and breaks
//! for the day and pass them in together with the current time.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{Appointment, Barber, Break},
    time_format,
};

pub const MIN_APPOINTMENT_MINUTES: i32 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessHours {
    pub opening: NaiveTime,
    pub closing: NaiveTime,
    pub slot_minutes: u32,
    pub closed_days: Vec<Weekday>,
}

impl Default for BusinessHours {
    fn default() -> Self {
        BusinessHours {
            opening: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            closing: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN),
            slot_minutes: 30,
            closed_days: vec![Weekday::Sun],
        }
    }
}

impl BusinessHours {
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        !self.closed_days.contains(&date.weekday())
    }

    /// Start times of bookable slots: from opening, every `slot_minutes`, as
    /// long as a whole slot fits before closing.
    pub fn slots(&self) -> Vec<NaiveTime> {
        let open = minute_of_day(self.opening);
        let close = minute_of_day(self.closing);
        let step = self.slot_minutes.max(1);

        let mut slots = Vec::new();
        let mut start = open;
        while start + step <= close {
            slots.push(time_from_minutes(start));
            start += step;
        }
        slots
    }
}

/// Half-open range `[start, end)` in minutes since midnight. `end` may run past
/// 24:00 for appointments that would cross midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

impl TimeRange {
    pub fn new(start: NaiveTime, duration_minutes: i32) -> Self {
        let start = minute_of_day(start);
        TimeRange {
            start,
            end: start + duration_minutes.max(0) as u32,
        }
    }

    pub fn between(start: NaiveTime, end: NaiveTime) -> Self {
        TimeRange {
            start: minute_of_day(start),
            end: minute_of_day(end),
        }
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_minute(&self, minute: u32) -> bool {
        self.start <= minute && minute < self.end
    }
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn time_from_minutes(minutes: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minutes / 60 % 24, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingConflict {
    #[error("The shop is closed on {0}")]
    ClosedDay(Weekday),

    #[error("Appointments cannot be booked in the past")]
    InPast,

    #[error("Appointment must start at or after {opening} and end by {closing}")]
    OutsideHours { opening: String, closing: String },

    #[error("The barber already has an appointment at that time")]
    OverlapsAppointment(Uuid),

    #[error("The barber is on a break at that time")]
    OverlapsBreak(Uuid),
}

impl BookingConflict {
    /// Overlaps are conflicts with existing data; everything else is a bad
    /// request.
    pub fn is_overlap(&self) -> bool {
        matches!(
            self,
            BookingConflict::OverlapsAppointment(_) | BookingConflict::OverlapsBreak(_)
        )
    }
}

/// One barber's commitments on a single day.
#[derive(Debug, Default)]
pub struct DayAgenda<'a> {
    pub appointments: Vec<&'a Appointment>,
    pub breaks: Vec<&'a Break>,
}

impl<'a> DayAgenda<'a> {
    pub fn for_barber(
        barber_id: Uuid,
        date: NaiveDate,
        appointments: &'a [Appointment],
        breaks: &'a [Break],
    ) -> Self {
        DayAgenda {
            appointments: appointments
                .iter()
                .filter(|a| a.barber_id == barber_id && a.appointment_date == date)
                .filter(|a| a.status.is_active())
                .collect(),
            breaks: breaks
                .iter()
                .filter(|b| b.barber_id == barber_id && b.break_date == date)
                .collect(),
        }
    }

    pub fn conflict(&self, range: &TimeRange) -> Option<BookingConflict> {
        if let Some(appointment) = self
            .appointments
            .iter()
            .find(|a| TimeRange::new(a.appointment_time, a.duration).overlaps(range))
        {
            return Some(BookingConflict::OverlapsAppointment(appointment.id));
        }
        self.breaks
            .iter()
            .find(|b| TimeRange::between(b.start_time, b.end_time).overlaps(range))
            .map(|b| BookingConflict::OverlapsBreak(b.id))
    }
}

pub fn check_booking(
    hours: &BusinessHours,
    agenda: &DayAgenda<'_>,
    date: NaiveDate,
    time: NaiveTime,
    duration: i32,
    now: NaiveDateTime,
) -> Result<(), BookingConflict> {
    if !hours.is_open_on(date) {
        return Err(BookingConflict::ClosedDay(date.weekday()));
    }
    if date.and_time(time) <= now {
        return Err(BookingConflict::InPast);
    }

    let range = TimeRange::new(time, duration);
    let open = TimeRange::between(hours.opening, hours.closing);
    if range.start < open.start || range.end > open.end {
        return Err(BookingConflict::OutsideHours {
            opening: hours.opening.format("%H:%M").to_string(),
            closing: hours.closing.format("%H:%M").to_string(),
        });
    }

    match agenda.conflict(&range) {
        Some(conflict) => Err(conflict),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SlotAvailability {
    #[serde(with = "time_format")]
    pub time: NaiveTime,
    pub available: bool,
}

pub fn available_slots(
    hours: &BusinessHours,
    agenda: &DayAgenda<'_>,
    date: NaiveDate,
    duration: i32,
    now: NaiveDateTime,
) -> Vec<SlotAvailability> {
    hours
        .slots()
        .into_iter()
        .map(|time| SlotAvailability {
            time,
            available: check_booking(hours, agenda, date, time, duration, now).is_ok(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationChangeError {
    #[error("Duration must be at least 15 minutes")]
    TooShort,

    #[error("You can only reduce the duration, not increase it")]
    Increase,
}

/// Staff may shorten an appointment, never lengthen it.
pub fn validate_duration_change(current: i32, requested: i32) -> Result<(), DurationChangeError> {
    if requested < MIN_APPOINTMENT_MINUTES {
        return Err(DurationChangeError::TooShort);
    }
    if requested > current {
        return Err(DurationChangeError::Increase);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleCell {
    Free,
    Appointment {
        appointment_id: Uuid,
        customer_name: String,
        service_name: String,
        starts_here: bool,
    },
    Break {
        break_id: Uuid,
        title: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleColumn {
    pub barber_id: Uuid,
    pub barber_name: String,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub appointment_count: usize,
    pub appointments: Vec<Appointment>,
    pub breaks: Vec<Break>,
    /// One entry per slot of `DailySchedule::slots`.
    pub cells: Vec<ScheduleCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub is_open: bool,
    pub total_appointments: usize,
    #[serde(serialize_with = "time_format::serialize_vec")]
    pub slots: Vec<NaiveTime>,
    pub barbers: Vec<ScheduleColumn>,
}

/// Builds the shop-wide grid for `date`: a column per barber, a row per slot.
/// Cancelled appointments are left out entirely.
pub fn daily_schedule(
    hours: &BusinessHours,
    date: NaiveDate,
    barbers: &[Barber],
    appointments: &[Appointment],
    breaks: &[Break],
) -> DailySchedule {
    let slots = hours.slots();
    let step = hours.slot_minutes.max(1);

    let barbers: Vec<ScheduleColumn> = barbers
        .iter()
        .map(|barber| {
            let agenda = DayAgenda::for_barber(barber.id, date, appointments, breaks);

            let mut day_appointments: Vec<Appointment> =
                agenda.appointments.iter().map(|a| (*a).clone()).collect();
            day_appointments.sort_by_key(|a| a.appointment_time);
            let mut day_breaks: Vec<Break> = agenda.breaks.iter().map(|b| (*b).clone()).collect();
            day_breaks.sort_by_key(|b| b.start_time);

            let cells = slots
                .iter()
                .map(|slot| {
                    let slot_range = TimeRange::new(*slot, step as i32);
                    if let Some(a) = day_appointments.iter().find(|a| {
                        TimeRange::new(a.appointment_time, a.duration).overlaps(&slot_range)
                    }) {
                        let start = TimeRange::new(a.appointment_time, a.duration).start;
                        return ScheduleCell::Appointment {
                            appointment_id: a.id,
                            customer_name: a.customer_name.clone(),
                            service_name: a.service_name.clone(),
                            starts_here: slot_range.contains_minute(start),
                        };
                    }
                    if let Some(b) = day_breaks.iter().find(|b| {
                        TimeRange::between(b.start_time, b.end_time).overlaps(&slot_range)
                    }) {
                        return ScheduleCell::Break {
                            break_id: b.id,
                            title: b.title.clone(),
                        };
                    }
                    ScheduleCell::Free
                })
                .collect();

            ScheduleColumn {
                barber_id: barber.id,
                barber_name: barber.name.clone(),
                image_url: barber.image_url.clone(),
                is_available: barber.is_available,
                appointment_count: day_appointments.len(),
                appointments: day_appointments,
                breaks: day_breaks,
                cells,
            }
        })
        .collect();

    DailySchedule {
        date,
        is_open: hours.is_open_on(date),
        total_appointments: barbers.iter().map(|b| b.appointment_count).sum(),
        slots,
        barbers,
    }
}
