mod memory;
mod postgres;
pub(crate) mod rows;

pub use memory::MemoryStore;
pub use postgres::{PgPool, PgStore};

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::result::DatabaseErrorKind;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentStatus, Barber, BarberService, Break, ContactMessage, Service,
    StaffAccount,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("query error: {0}")]
    Query(diesel::result::Error),

    /// A unique constraint rejected the write.
    #[error("duplicate row: {0}")]
    Duplicate(String),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Duplicate(info.message().to_owned())
            }
            e => StoreError::Query(e),
        }
    }
}

/// Appointment query used by the staff views. Results are ordered by date,
/// then time.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub barber_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl AppointmentFilter {
    pub fn on_date(date: NaiveDate) -> Self {
        AppointmentFilter {
            date_from: Some(date),
            date_to: Some(date),
            ..Default::default()
        }
    }

    pub fn barber(mut self, barber_id: Uuid) -> Self {
        self.barber_id = Some(barber_id);
        self
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.barber_id.map_or(true, |id| appointment.barber_id == id)
            && self.status.map_or(true, |s| appointment.status == s)
            && self.date_from.map_or(true, |d| appointment.appointment_date >= d)
            && self.date_to.map_or(true, |d| appointment.appointment_date <= d)
    }
}

#[async_trait]
pub trait BarbershopStore: Send + Sync + std::fmt::Debug {
    async fn list_barbers(&self) -> Result<Vec<Barber>, StoreError>;
    async fn get_barber(&self, barber_id: Uuid) -> Result<Option<Barber>, StoreError>;
    async fn insert_barber(&self, barber: &Barber) -> Result<(), StoreError>;

    async fn insert_account(&self, account: &StaffAccount) -> Result<(), StoreError>;
    /// `email` is compared lowercase.
    async fn find_account_by_email(&self, email: &str) -> Result<Option<StaffAccount>, StoreError>;

    async fn list_services(&self) -> Result<Vec<Service>, StoreError>;
    async fn get_service(&self, service_id: Uuid) -> Result<Option<Service>, StoreError>;
    async fn find_service_by_name(&self, name: &str) -> Result<Option<Service>, StoreError>;
    async fn insert_service(&self, service: &Service) -> Result<(), StoreError>;

    async fn list_barber_services(&self, barber_id: Uuid) -> Result<Vec<BarberService>, StoreError>;
    async fn find_barber_service(
        &self,
        barber_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<BarberService>, StoreError>;
    async fn insert_barber_service(&self, offer: &BarberService) -> Result<(), StoreError>;

    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, StoreError>;
    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>, StoreError>;
    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), StoreError>;
    /// Returns whether a row was updated.
    async fn update_appointment_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<bool, StoreError>;
    async fn update_appointment_duration(&self, appointment_id: Uuid, duration: i32) -> Result<bool, StoreError>;
    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<bool, StoreError>;

    /// Breaks of a barber ordered by date, then start time; optionally limited
    /// to one day.
    async fn list_breaks(&self, barber_id: Uuid, date: Option<NaiveDate>) -> Result<Vec<Break>, StoreError>;
    async fn list_breaks_on(&self, date: NaiveDate) -> Result<Vec<Break>, StoreError>;
    async fn get_break(&self, break_id: Uuid) -> Result<Option<Break>, StoreError>;
    async fn insert_break(&self, pause: &Break) -> Result<(), StoreError>;
    async fn delete_break(&self, break_id: Uuid) -> Result<bool, StoreError>;

    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<(), StoreError>;
    /// Newest first.
    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, StoreError>;
}
