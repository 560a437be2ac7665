use bigdecimal::BigDecimal;
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use diesel::prelude::*;
use uuid::Uuid;

use super::StoreError;
use crate::models::{
    Appointment, Barber, BarberService, Break, ContactMessage, Service, StaffAccount,
};
use crate::schema::*;

#[derive(Queryable)]
pub struct BarberRow {
    pub id: i64,
    pub barber_id: Uuid,
    pub name: String,
    pub description: String,
    pub experience_years: i32,
    /// JSON array of strings.
    pub specialties: String,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
}

impl TryFrom<BarberRow> for Barber {
    type Error = StoreError;

    fn try_from(row: BarberRow) -> Result<Self, Self::Error> {
        let specialties = serde_json::from_str(&row.specialties)
            .map_err(|e| StoreError::Corrupt(format!("barber {} specialties: {e}", row.barber_id)))?;
        Ok(Barber {
            id: row.barber_id,
            name: row.name,
            description: row.description,
            experience_years: row.experience_years,
            specialties,
            image_url: row.image_url,
            is_available: row.is_available,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name=barbers)]
pub struct NewBarber<'a> {
    pub barber_id: &'a Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub experience_years: i32,
    pub specialties: String,
    pub image_url: Option<&'a str>,
    pub is_available: bool,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
}

impl<'a> NewBarber<'a> {
    pub fn new(barber: &'a Barber) -> Result<Self, StoreError> {
        let specialties = serde_json::to_string(&barber.specialties)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(NewBarber {
            barber_id: &barber.id,
            name: &barber.name,
            description: &barber.description,
            experience_years: barber.experience_years,
            specialties,
            image_url: barber.image_url.as_deref(),
            is_available: barber.is_available,
            create_time: Local::now(),
            update_time: Local::now(),
        })
    }
}

#[derive(Queryable)]
pub struct StaffAccountRow {
    pub id: i64,
    pub barber_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub enabled: bool,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
}

impl From<StaffAccountRow> for StaffAccount {
    fn from(row: StaffAccountRow) -> Self {
        StaffAccount {
            barber_id: row.barber_id,
            email: row.email,
            password_hash: row.password_hash,
            enabled: row.enabled,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name=staff_accounts)]
pub struct NewStaffAccount<'a> {
    pub barber_id: &'a Uuid,
    pub email: String,
    pub password_hash: &'a str,
    pub enabled: bool,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
}

#[derive(Queryable)]
pub struct ServiceRow {
    pub id: i64,
    pub service_id: Uuid,
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub price: BigDecimal,
    pub category: String,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
}

impl TryFrom<ServiceRow> for Service {
    type Error = StoreError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        Ok(Service {
            category: row.category.parse().map_err(StoreError::Corrupt)?,
            id: row.service_id,
            name: row.name,
            description: row.description,
            duration: row.duration,
            price: row.price,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name=services)]
pub struct NewService<'a> {
    pub service_id: &'a Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub duration: i32,
    pub price: &'a BigDecimal,
    pub category: &'static str,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
}

#[derive(Queryable)]
pub struct BarberServiceRow {
    pub id: i64,
    pub barber_service_id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub price: BigDecimal,
    pub is_available: bool,
    pub create_time: DateTime<Local>,
}

impl From<BarberServiceRow> for BarberService {
    fn from(row: BarberServiceRow) -> Self {
        BarberService {
            id: row.barber_service_id,
            barber_id: row.barber_id,
            service_id: row.service_id,
            price: row.price,
            is_available: row.is_available,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name=barber_services)]
pub struct NewBarberService<'a> {
    pub barber_service_id: &'a Uuid,
    pub barber_id: &'a Uuid,
    pub service_id: &'a Uuid,
    pub price: &'a BigDecimal,
    pub is_available: bool,
    pub create_time: DateTime<Local>,
}

#[derive(Queryable)]
pub struct AppointmentRow {
    pub id: i64,
    pub appointment_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub service_id: Uuid,
    pub service_name: String,
    pub barber_id: Uuid,
    pub barber_name: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub duration: i32,
    pub price: BigDecimal,
    pub notes: Option<String>,
    pub status: String,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = StoreError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Appointment {
            status: row.status.parse().map_err(StoreError::Corrupt)?,
            id: row.appointment_id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            service_id: row.service_id,
            service_name: row.service_name,
            barber_id: row.barber_id,
            barber_name: row.barber_name,
            appointment_date: row.appointment_date,
            appointment_time: row.appointment_time,
            duration: row.duration,
            price: row.price,
            notes: row.notes,
            created_at: row.create_time,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name=appointments)]
pub struct NewAppointment<'a> {
    pub appointment_id: &'a Uuid,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: &'a str,
    pub service_id: &'a Uuid,
    pub service_name: &'a str,
    pub barber_id: &'a Uuid,
    pub barber_name: &'a str,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub duration: i32,
    pub price: &'a BigDecimal,
    pub notes: Option<&'a str>,
    pub status: &'static str,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
}

impl<'a> From<&'a Appointment> for NewAppointment<'a> {
    fn from(a: &'a Appointment) -> Self {
        NewAppointment {
            appointment_id: &a.id,
            customer_name: &a.customer_name,
            customer_email: &a.customer_email,
            customer_phone: &a.customer_phone,
            service_id: &a.service_id,
            service_name: &a.service_name,
            barber_id: &a.barber_id,
            barber_name: &a.barber_name,
            appointment_date: a.appointment_date,
            appointment_time: a.appointment_time,
            duration: a.duration,
            price: &a.price,
            notes: a.notes.as_deref(),
            status: a.status.as_str(),
            create_time: a.created_at,
            update_time: a.created_at,
        }
    }
}

#[derive(Queryable)]
pub struct BreakRow {
    pub id: i64,
    pub break_id: Uuid,
    pub barber_id: Uuid,
    pub break_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub title: String,
    pub create_time: DateTime<Local>,
}

impl From<BreakRow> for Break {
    fn from(row: BreakRow) -> Self {
        Break {
            id: row.break_id,
            barber_id: row.barber_id,
            break_date: row.break_date,
            start_time: row.start_time,
            end_time: row.end_time,
            title: row.title,
            created_at: row.create_time,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name=breaks)]
pub struct NewBreak<'a> {
    pub break_id: &'a Uuid,
    pub barber_id: &'a Uuid,
    pub break_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub title: &'a str,
    pub create_time: DateTime<Local>,
}

#[derive(Queryable)]
pub struct ContactMessageRow {
    pub id: i64,
    pub message_id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub create_time: DateTime<Local>,
}

impl From<ContactMessageRow> for ContactMessage {
    fn from(row: ContactMessageRow) -> Self {
        ContactMessage {
            id: row.message_id,
            name: row.name,
            email: row.email,
            message: row.message,
            created_at: row.create_time,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name=contact_messages)]
pub struct NewContactMessage<'a> {
    pub message_id: &'a Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub message: &'a str,
    pub create_time: DateTime<Local>,
}

#[derive(Queryable)]
pub struct SessionRow {
    pub id: i64,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub init_time: DateTime<Local>,
    pub expiry_time: DateTime<Local>,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
    pub data: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name=sessions)]
pub struct NewSession<'a> {
    pub session_id: &'a Uuid,
    pub user_id: &'a Uuid,
    pub init_time: DateTime<Local>,
    pub expiry_time: DateTime<Local>,
    pub create_time: DateTime<Local>,
    pub update_time: DateTime<Local>,
    pub data: Option<&'a str>,
}
