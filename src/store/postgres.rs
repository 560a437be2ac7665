use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use uuid::Uuid;

use super::rows::*;
use super::{AppointmentFilter, BarbershopStore, StoreError};
use crate::models::{
    Appointment, AppointmentStatus, Barber, BarberService, Break, ContactMessage, Service,
    StaffAccount,
};
use crate::schema::*;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct PgStore {
    pub pool: PgPool,
}

impl std::fmt::Debug for PgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Runs `f` with a pooled connection on the blocking thread pool.
    pub(crate) async fn run<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await?
    }
}

#[async_trait]
impl BarbershopStore for PgStore {
    async fn list_barbers(&self) -> Result<Vec<Barber>, StoreError> {
        self.run(|conn| {
            barbers::table
                .order(barbers::id.asc())
                .load::<BarberRow>(conn)?
                .into_iter()
                .map(Barber::try_from)
                .collect()
        })
        .await
    }

    async fn get_barber(&self, barber_id: Uuid) -> Result<Option<Barber>, StoreError> {
        self.run(move |conn| {
            barbers::table
                .filter(barbers::barber_id.eq(barber_id))
                .first::<BarberRow>(conn)
                .optional()?
                .map(Barber::try_from)
                .transpose()
        })
        .await
    }

    async fn insert_barber(&self, barber: &Barber) -> Result<(), StoreError> {
        let barber = barber.clone();
        self.run(move |conn| {
            diesel::insert_into(barbers::table)
                .values(&NewBarber::new(&barber)?)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn insert_account(&self, account: &StaffAccount) -> Result<(), StoreError> {
        let account = account.clone();
        self.run(move |conn| {
            let new_account = NewStaffAccount {
                barber_id: &account.barber_id,
                email: account.email.to_lowercase(),
                password_hash: &account.password_hash,
                enabled: account.enabled,
                create_time: Local::now(),
                update_time: Local::now(),
            };
            diesel::insert_into(staff_accounts::table)
                .values(&new_account)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<StaffAccount>, StoreError> {
        let email = email.to_lowercase();
        self.run(move |conn| {
            Ok(staff_accounts::table
                .filter(staff_accounts::email.eq(email))
                .filter(staff_accounts::enabled.eq(true))
                .first::<StaffAccountRow>(conn)
                .optional()?
                .map(StaffAccount::from))
        })
        .await
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        self.run(|conn| {
            services::table
                .order(services::id.asc())
                .load::<ServiceRow>(conn)?
                .into_iter()
                .map(Service::try_from)
                .collect()
        })
        .await
    }

    async fn get_service(&self, service_id: Uuid) -> Result<Option<Service>, StoreError> {
        self.run(move |conn| {
            services::table
                .filter(services::service_id.eq(service_id))
                .first::<ServiceRow>(conn)
                .optional()?
                .map(Service::try_from)
                .transpose()
        })
        .await
    }

    async fn find_service_by_name(&self, name: &str) -> Result<Option<Service>, StoreError> {
        let name = name.to_owned();
        self.run(move |conn| {
            services::table
                .filter(services::name.eq(name))
                .first::<ServiceRow>(conn)
                .optional()?
                .map(Service::try_from)
                .transpose()
        })
        .await
    }

    async fn insert_service(&self, service: &Service) -> Result<(), StoreError> {
        let service = service.clone();
        self.run(move |conn| {
            let new_service = NewService {
                service_id: &service.id,
                name: &service.name,
                description: &service.description,
                duration: service.duration,
                price: &service.price,
                category: service.category.as_str(),
                create_time: Local::now(),
                update_time: Local::now(),
            };
            diesel::insert_into(services::table)
                .values(&new_service)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn list_barber_services(&self, barber_id: Uuid) -> Result<Vec<BarberService>, StoreError> {
        self.run(move |conn| {
            Ok(barber_services::table
                .filter(barber_services::barber_id.eq(barber_id))
                .order(barber_services::id.asc())
                .load::<BarberServiceRow>(conn)?
                .into_iter()
                .map(BarberService::from)
                .collect())
        })
        .await
    }

    async fn find_barber_service(
        &self,
        barber_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<BarberService>, StoreError> {
        self.run(move |conn| {
            Ok(barber_services::table
                .filter(barber_services::barber_id.eq(barber_id))
                .filter(barber_services::service_id.eq(service_id))
                .first::<BarberServiceRow>(conn)
                .optional()?
                .map(BarberService::from))
        })
        .await
    }

    async fn insert_barber_service(&self, offer: &BarberService) -> Result<(), StoreError> {
        let offer = offer.clone();
        self.run(move |conn| {
            let new_offer = NewBarberService {
                barber_service_id: &offer.id,
                barber_id: &offer.barber_id,
                service_id: &offer.service_id,
                price: &offer.price,
                is_available: offer.is_available,
                create_time: Local::now(),
            };
            diesel::insert_into(barber_services::table)
                .values(&new_offer)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, StoreError> {
        let filter = filter.clone();
        self.run(move |conn| {
            let mut query = appointments::table.into_boxed();
            if let Some(barber_id) = filter.barber_id {
                query = query.filter(appointments::barber_id.eq(barber_id));
            }
            if let Some(status) = filter.status {
                query = query.filter(appointments::status.eq(status.as_str()));
            }
            if let Some(date_from) = filter.date_from {
                query = query.filter(appointments::appointment_date.ge(date_from));
            }
            if let Some(date_to) = filter.date_to {
                query = query.filter(appointments::appointment_date.le(date_to));
            }
            query
                .order((
                    appointments::appointment_date.asc(),
                    appointments::appointment_time.asc(),
                ))
                .load::<AppointmentRow>(conn)?
                .into_iter()
                .map(Appointment::try_from)
                .collect()
        })
        .await
    }

    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>, StoreError> {
        self.run(move |conn| {
            appointments::table
                .filter(appointments::appointment_id.eq(appointment_id))
                .first::<AppointmentRow>(conn)
                .optional()?
                .map(Appointment::try_from)
                .transpose()
        })
        .await
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), StoreError> {
        let appointment = appointment.clone();
        self.run(move |conn| {
            diesel::insert_into(appointments::table)
                .values(&NewAppointment::from(&appointment))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn update_appointment_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<bool, StoreError> {
        self.run(move |conn| {
            let updated = diesel::update(
                appointments::table.filter(appointments::appointment_id.eq(appointment_id)),
            )
            .set((
                appointments::status.eq(status.as_str()),
                appointments::update_time.eq(Local::now()),
            ))
            .execute(conn)?;
            Ok(updated > 0)
        })
        .await
    }

    async fn update_appointment_duration(&self, appointment_id: Uuid, duration: i32) -> Result<bool, StoreError> {
        self.run(move |conn| {
            let updated = diesel::update(
                appointments::table.filter(appointments::appointment_id.eq(appointment_id)),
            )
            .set((
                appointments::duration.eq(duration),
                appointments::update_time.eq(Local::now()),
            ))
            .execute(conn)?;
            Ok(updated > 0)
        })
        .await
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<bool, StoreError> {
        self.run(move |conn| {
            let deleted = diesel::delete(
                appointments::table.filter(appointments::appointment_id.eq(appointment_id)),
            )
            .execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn list_breaks(&self, barber_id: Uuid, date: Option<NaiveDate>) -> Result<Vec<Break>, StoreError> {
        self.run(move |conn| {
            let mut query = breaks::table
                .filter(breaks::barber_id.eq(barber_id))
                .into_boxed();
            if let Some(date) = date {
                query = query.filter(breaks::break_date.eq(date));
            }
            Ok(query
                .order((breaks::break_date.asc(), breaks::start_time.asc()))
                .load::<BreakRow>(conn)?
                .into_iter()
                .map(Break::from)
                .collect())
        })
        .await
    }

    async fn list_breaks_on(&self, date: NaiveDate) -> Result<Vec<Break>, StoreError> {
        self.run(move |conn| {
            Ok(breaks::table
                .filter(breaks::break_date.eq(date))
                .order(breaks::start_time.asc())
                .load::<BreakRow>(conn)?
                .into_iter()
                .map(Break::from)
                .collect())
        })
        .await
    }

    async fn get_break(&self, break_id: Uuid) -> Result<Option<Break>, StoreError> {
        self.run(move |conn| {
            Ok(breaks::table
                .filter(breaks::break_id.eq(break_id))
                .first::<BreakRow>(conn)
                .optional()?
                .map(Break::from))
        })
        .await
    }

    async fn insert_break(&self, pause: &Break) -> Result<(), StoreError> {
        let pause = pause.clone();
        self.run(move |conn| {
            let new_break = NewBreak {
                break_id: &pause.id,
                barber_id: &pause.barber_id,
                break_date: pause.break_date,
                start_time: pause.start_time,
                end_time: pause.end_time,
                title: &pause.title,
                create_time: pause.created_at,
            };
            diesel::insert_into(breaks::table)
                .values(&new_break)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn delete_break(&self, break_id: Uuid) -> Result<bool, StoreError> {
        self.run(move |conn| {
            let deleted = diesel::delete(breaks::table.filter(breaks::break_id.eq(break_id)))
                .execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn insert_contact_message(&self, message: &ContactMessage) -> Result<(), StoreError> {
        let message = message.clone();
        self.run(move |conn| {
            let new_message = NewContactMessage {
                message_id: &message.id,
                name: &message.name,
                email: &message.email,
                message: &message.message,
                create_time: message.created_at,
            };
            diesel::insert_into(contact_messages::table)
                .values(&new_message)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, StoreError> {
        self.run(|conn| {
            Ok(contact_messages::table
                .order(contact_messages::id.desc())
                .load::<ContactMessageRow>(conn)?
                .into_iter()
                .map(ContactMessage::from)
                .collect())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::get_connection_pool;

    /// Needs a migrated database in `DATABASE_URL`.
    #[tokio::test]
    #[ignore]
    async fn contact_messages_newest_first() {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").unwrap();
        let store = PgStore::new(get_connection_pool(&url).unwrap());

        let mut ids = Vec::new();
        for text in ["first", "second"] {
            let message = ContactMessage {
                id: Uuid::new_v4(),
                name: "Sam".into(),
                email: "sam@example.com".into(),
                message: text.into(),
                created_at: Local::now(),
            };
            store.insert_contact_message(&message).await.unwrap();
            ids.push(message.id);
        }

        let listed = store.list_contact_messages().await.unwrap();
        assert_eq!(listed[0].id, ids[1]);
        assert_eq!(listed[1].id, ids[0]);
    }
}
