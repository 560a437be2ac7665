pub mod authorization_policy;
pub mod axum_pg_pool;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod login_managers;
pub mod models;
pub mod scheduling;
pub mod schema;
pub mod seed;
pub mod store;
pub mod utils;
pub mod validation;

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{delete, get, patch, post},
    Router,
};
use axum_session_middleware::{AxumSessionLayer, AxumSessionStore};
use tokio::sync::Mutex;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{Config, CorsOrigins},
    handlers::*,
    store::BarbershopStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BarbershopStore>,
    pub config: Arc<Config>,
    /// Held while checking a barber's agenda and writing to it, so two
    /// requests cannot both claim the same slot. Seeding holds it too.
    pub booking_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn BarbershopStore>, config: Config) -> Self {
        AppState {
            store,
            config: Arc::new(config),
            booking_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn app(state: AppState, session_store: AxumSessionStore) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let api = Router::new()
        .route("/", get(root::root))
        .route("/health", get(root::health))

        .route("/auth/login", post(login::login))
        .route("/auth/logout", post(identity::logout))
        .route("/auth/me", get(identity::get_current_identity))

        .route("/barbers", get(barber::get_barbers).post(barber::add_barber))
        .route("/barbers/:barber_id", get(barber::get_barber))
        .route("/barbers/:barber_id/services", get(barber_service::get_barber_services))
        .route("/barbers/:barber_id/availability", get(appointment::get_availability))
        .route("/barbers/:barber_id/appointments", get(appointment::get_barber_appointments))
        .route("/barbers/:barber_id/appointments/today", get(appointment::get_barber_today_appointments))
        .route("/barbers/:barber_id/breaks", get(break_time::get_barber_breaks))

        .route("/services", get(service::get_services).post(service::add_service))
        .route("/barber-services", post(barber_service::add_barber_service))

        .route("/appointments", get(appointment::get_appointments).post(appointment::add_appointment))
        .route("/appointments/today", get(appointment::get_today_appointments))
        .route(
            "/appointments/:appointment_id",
            get(appointment::get_appointment)
                .patch(appointment::update_status)
                .delete(appointment::delete_appointment),
        )
        .route("/appointments/:appointment_id/status", patch(appointment::update_status_by_query))
        .route("/appointments/:appointment_id/duration", patch(appointment::update_duration))

        .route("/breaks", post(break_time::add_break))
        .route("/breaks/:break_id", delete(break_time::delete_break))

        .route("/schedule", get(schedule::get_schedule))

        .route("/contact", get(contact::get_contact_messages).post(contact::add_contact_message))

        .route("/init-data", post(init_data::init_data))
        .route("/init-services", post(init_data::init_services))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .fallback(root::not_found)
        .layer(cors)
        .layer(AxumSessionLayer::new(session_store))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(list) => layer.allow_origin(AllowOrigin::list(list.clone())),
    }
}

/// `NaiveTime` as `HH:MM:SS`; `HH:MM` is accepted on input.
pub mod time_format {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M:%S";
    const SHORT_FORMAT: &str = "%H:%M";

    pub fn parse(s: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(s, FORMAT).or_else(|_| NaiveTime::parse_from_str(s, SHORT_FORMAT))
    }

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn serialize_vec<S>(times: &[NaiveTime], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(times.iter().map(|t| t.format(FORMAT).to_string()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(s.trim()).map_err(serde::de::Error::custom)
    }
}

/// Prices are exact decimals in storage and plain JSON numbers on the wire.
/// Input may be a number or a numeric string.
pub mod price_format {
    use std::str::FromStr;

    use bigdecimal::{BigDecimal, ToPrimitive};
    use serde::{self, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(serde_json::Number),
        Text(String),
    }

    pub fn serialize<S>(price: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match price.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => Err(serde::ser::Error::custom(format!("price {price} is out of range"))),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        parse_raw(RawPrice::deserialize(deserializer)?)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<RawPrice>::deserialize(deserializer)?
            .map(parse_raw)
            .transpose()
    }

    fn parse_raw<E: serde::de::Error>(raw: RawPrice) -> Result<BigDecimal, E> {
        let text = match raw {
            RawPrice::Number(n) => n.to_string(),
            RawPrice::Text(s) => s,
        };
        BigDecimal::from_str(text.trim()).map_err(E::custom)
    }
}
