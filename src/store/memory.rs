use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum_session_middleware::{AxumDatabasePool, SessionData};
use chrono::{DateTime, Local, NaiveDate};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AppointmentFilter, BarbershopStore, StoreError};
use crate::models::{
    Appointment, AppointmentStatus, Barber, BarberService, Break, ContactMessage, Service,
    StaffAccount,
};

#[derive(Debug, Default)]
struct Tables {
    barbers: Vec<Barber>,
    accounts: Vec<StaffAccount>,
    services: Vec<Service>,
    barber_services: Vec<BarberService>,
    appointments: Vec<Appointment>,
    breaks: Vec<Break>,
    contact_messages: Vec<ContactMessage>,
    sessions: HashMap<Uuid, SessionData>,
}

/// Process-local store for development (`STORE=memory`) and tests. Lists keep
/// insertion order, like the Postgres store's `id` ordering.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_appointments(appointments: &mut [Appointment]) {
    appointments.sort_by_key(|a| (a.appointment_date, a.appointment_time));
}

#[async_trait]
impl BarbershopStore for MemoryStore {
    async fn list_barbers(&self) -> Result<Vec<Barber>, StoreError> {
        Ok(self.tables.read().await.barbers.clone())
    }

    async fn get_barber(&self, barber_id: Uuid) -> Result<Option<Barber>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.barbers.iter().find(|b| b.id == barber_id).cloned())
    }

    async fn insert_barber(&self, barber: &Barber) -> Result<(), StoreError> {
        self.tables.write().await.barbers.push(barber.clone());
        Ok(())
    }

    async fn insert_account(&self, account: &StaffAccount) -> Result<(), StoreError> {
        let mut account = account.clone();
        account.email = account.email.to_lowercase();
        self.tables.write().await.accounts.push(account);
        Ok(())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<StaffAccount>, StoreError> {
        let email = email.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.enabled && a.email == email)
            .cloned())
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        Ok(self.tables.read().await.services.clone())
    }

    async fn get_service(&self, service_id: Uuid) -> Result<Option<Service>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.services.iter().find(|s| s.id == service_id).cloned())
    }

    async fn find_service_by_name(&self, name: &str) -> Result<Option<Service>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.services.iter().find(|s| s.name == name).cloned())
    }

    async fn insert_service(&self, service: &Service) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.services.iter().any(|s| s.name == service.name) {
            return Err(StoreError::Duplicate(format!("service name {}", service.name)));
        }
        tables.services.push(service.clone());
        Ok(())
    }

    async fn list_barber_services(&self, barber_id: Uuid) -> Result<Vec<BarberService>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .barber_services
            .iter()
            .filter(|o| o.barber_id == barber_id)
            .cloned()
            .collect())
    }

    async fn find_barber_service(
        &self,
        barber_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<BarberService>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .barber_services
            .iter()
            .find(|o| o.barber_id == barber_id && o.service_id == service_id)
            .cloned())
    }

    async fn insert_barber_service(&self, offer: &BarberService) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .barber_services
            .iter()
            .any(|o| o.barber_id == offer.barber_id && o.service_id == offer.service_id)
        {
            return Err(StoreError::Duplicate(format!(
                "barber service {}/{}",
                offer.barber_id, offer.service_id
            )));
        }
        tables.barber_services.push(offer.clone());
        Ok(())
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        sort_appointments(&mut appointments);
        Ok(appointments)
    }

    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .appointments
            .iter()
            .find(|a| a.id == appointment_id)
            .cloned())
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), StoreError> {
        self.tables.write().await.appointments.push(appointment.clone());
        Ok(())
    }

    async fn update_appointment_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.appointments.iter_mut().find(|a| a.id == appointment_id) {
            Some(appointment) => {
                appointment.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_appointment_duration(&self, appointment_id: Uuid, duration: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.appointments.iter_mut().find(|a| a.id == appointment_id) {
            Some(appointment) => {
                appointment.duration = duration;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.appointments.len();
        tables.appointments.retain(|a| a.id != appointment_id);
        Ok(tables.appointments.len() != before)
    }

    async fn list_breaks(&self, barber_id: Uuid, date: Option<NaiveDate>) -> Result<Vec<Break>, StoreError> {
        let tables = self.tables.read().await;
        let mut breaks: Vec<Break> = tables
            .breaks
            .iter()
            .filter(|b| b.barber_id == barber_id && date.map_or(true, |d| b.break_date == d))
            .cloned()
            .collect();
        breaks.sort_by_key(|b| (b.break_date, b.start_time));
        Ok(breaks)
    }

    async fn list_breaks_on(&self, date: NaiveDate) -> Result<Vec<Break>, StoreError> {
        let tables = self.tables.read().await;
        let mut breaks: Vec<Break> = tables
            .breaks
            .iter()
            .filter(|b| b.break_date == date)
            .cloned()
            .collect();
        breaks.sort_by_key(|b| b.start_time);
        Ok(breaks)
    }

    async fn get_break(&self, break_id: Uuid) -> Result<Option<Break>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.breaks.iter().find(|b| b.id == break_id).cloned())
    }

    async fn insert_break(&self, pause: &Break) -> Result<(), StoreError> {
        self.tables.write().await.breaks.push(pause.clone());
        Ok(())
    }

    async fn delete_break(&self, break_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.breaks.len();
        tables.breaks.retain(|b| b.id != break_id);
        Ok(tables.breaks.len() != before)
    }

    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<(), StoreError> {
        self.tables.write().await.contact_messages.push(message.clone());
        Ok(())
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.contact_messages.iter().rev().cloned().collect())
    }
}

#[async_trait]
impl AxumDatabasePool for MemoryStore {
    async fn store(&self, session_data: &SessionData) -> Result<(), anyhow::Error> {
        self.tables
            .write()
            .await
            .sessions
            .insert(session_data.session_id, session_data.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Uuid) -> Result<Option<SessionData>, anyhow::Error> {
        Ok(self.tables.read().await.sessions.get(session_id).cloned())
    }

    async fn delete(&self, session_id: &Uuid) -> Result<(), anyhow::Error> {
        self.tables.write().await.sessions.remove(session_id);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Local>) -> Result<usize, anyhow::Error> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_k, v| !v.is_expired(now));
        Ok(before - tables.sessions.len())
    }
}
