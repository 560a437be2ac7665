use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use axum_session_middleware::AxumSessionStore;
use serde_json::{json, Value};
use tower::ServiceExt;

use barbershop_backend::{
    app,
    config::Config,
    models::{Appointment, AppointmentStatus},
    store::{BarbershopStore, MemoryStore},
    AppState,
};
use chrono::{Local, NaiveTime};
use uuid::Uuid;

const MONDAY: &str = "2030-01-07";
const SUNDAY: &str = "2030-01-06";

fn test_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::new(Arc::new(store.clone()), Config::default());
    let app = app(state, AxumSessionStore::new(Arc::new(store.clone())));
    (app, store)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn id_named(list: &Value, name: &str) -> String {
    list.as_array()
        .unwrap()
        .iter()
        .find(|item| item["name"] == name)
        .unwrap_or_else(|| panic!("{name} missing"))["id"]
        .as_str()
        .unwrap()
        .to_owned()
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "changeme" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_owned()
}

struct Seeded {
    app: Router,
    store: MemoryStore,
    oxy: String,
    helga: String,
    haircut: String,
}

async fn seeded() -> Seeded {
    let (app, store) = test_app();
    let (status, body) = send(&app, Method::POST, "/api/init-data", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["barbers_count"], 2);
    assert_eq!(body["services_count"], 7);

    let (_, barbers) = send(&app, Method::GET, "/api/barbers", None, None).await;
    let (_, services) = send(&app, Method::GET, "/api/services", None, None).await;
    Seeded {
        oxy: id_named(&barbers, "Oxy"),
        helga: id_named(&barbers, "Helga"),
        haircut: id_named(&services, "Classic Haircut"),
        app,
        store,
    }
}

fn booking(barber_id: &str, service_id: &str, date: &str, time: &str) -> Value {
    json!({
        "customer_name": "Jane Smith",
        "customer_email": "jane.smith@example.com",
        "customer_phone": "(555) 123-4567",
        "service_id": service_id,
        "barber_id": barber_id,
        "appointment_date": date,
        "appointment_time": time,
        "notes": "first visit",
    })
}

#[tokio::test]
async fn root_health_and_fallback() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::GET, "/api/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Oxy'ss Barbershop API");

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not Found");
}

#[tokio::test]
async fn init_data_is_idempotent() {
    let s = seeded().await;

    let (status, _) = send(&s.app, Method::POST, "/api/init-data", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, barbers) = send(&s.app, Method::GET, "/api/barbers", None, None).await;
    assert_eq!(barbers.as_array().unwrap().len(), 2);

    let (_, offers) = send(
        &s.app,
        Method::GET,
        &format!("/api/barbers/{}/services", s.oxy),
        None,
        None,
    )
    .await;
    assert_eq!(offers.as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn services_filter_by_category() {
    let s = seeded().await;

    let (status, kids) = send(&s.app, Method::GET, "/api/services?category=Children", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let kids = kids.as_array().unwrap();
    assert_eq!(kids.len(), 1);
    assert_eq!(kids[0]["name"], "Kids Haircut");
    assert_eq!(kids[0]["price"], 20.0);

    let (status, body) = send(&s.app, Method::GET, "/api/services?category=Pets", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Invalid category"));
}

#[tokio::test]
async fn login_session_lifecycle() {
    let s = seeded().await;

    let (status, body) = send(
        &s.app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "oxy@oxyssbarbershop.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid email or password");

    let token = login(&s.app, "OXY@oxyssbarbershop.com").await;
    let (status, me) = send(&s.app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Oxy");

    let (status, _) = send(&s.app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&s.app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Not authenticated");
}

#[tokio::test]
async fn booking_rules() {
    let s = seeded().await;

    let (status, appointment) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.oxy, &s.haircut, MONDAY, "10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{appointment}");
    assert_eq!(appointment["status"], "pending");
    assert_eq!(appointment["duration"], 45);
    assert_eq!(appointment["barber_name"], "Oxy");
    assert_eq!(appointment["appointment_time"], "10:00:00");

    // 10:30 falls inside the 45 minute haircut.
    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.oxy, &s.haircut, MONDAY, "10:30")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Another barber is unaffected.
    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.helga, &s.haircut, MONDAY, "10:30")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for (date, time) in [(SUNDAY, "10:00"), (MONDAY, "19:30"), (MONDAY, "08:30"), ("2020-01-06", "10:00")] {
        let (status, body) = send(
            &s.app,
            Method::POST,
            "/api/appointments",
            None,
            Some(booking(&s.oxy, &s.haircut, date, time)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{date} {time}: {body}");
    }

    let mut bad_phone = booking(&s.oxy, &s.haircut, MONDAY, "14:00");
    bad_phone["customer_phone"] = json!("call me");
    let (status, body) = send(&s.app, Method::POST, "/api/appointments", None, Some(bad_phone)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid phone number");

    let (_, availability) = send(
        &s.app,
        Method::GET,
        &format!("/api/barbers/{}/availability?date={MONDAY}&service_id={}", s.oxy, s.haircut),
        None,
        None,
    )
    .await;
    let slots = availability["slots"].as_array().unwrap();
    let slot = |time: &str| {
        slots
            .iter()
            .find(|slot| slot["time"] == time)
            .unwrap()["available"]
            .as_bool()
            .unwrap()
    };
    assert!(slot("09:00:00"));
    assert!(!slot("09:30:00"));
    assert!(!slot("10:00:00"));
    assert!(!slot("10:30:00"));
    assert!(slot("11:00:00"));
    assert!(!slot("19:30:00"));
}

#[tokio::test]
async fn staff_manage_their_own_appointments() {
    let s = seeded().await;
    let (_, appointment) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.oxy, &s.haircut, MONDAY, "10:00")),
    )
    .await;
    let id = appointment["id"].as_str().unwrap().to_owned();
    let duration_uri = format!("/api/appointments/{id}/duration");

    let (status, _) = send(&s.app, Method::PATCH, &duration_uri, None, Some(json!({ "duration": 30 }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let helga = login(&s.app, "helga@oxyssbarbershop.com").await;
    let (status, _) = send(&s.app, Method::PATCH, &duration_uri, Some(&helga), Some(json!({ "duration": 30 }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let oxy = login(&s.app, "oxy@oxyssbarbershop.com").await;
    let (status, body) = send(&s.app, Method::PATCH, &duration_uri, Some(&oxy), Some(json!({ "duration": 60 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "You can only reduce the duration, not increase it");
    let (status, _) = send(&s.app, Method::PATCH, &duration_uri, Some(&oxy), Some(json!({ "duration": 10 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = send(&s.app, Method::PATCH, &duration_uri, Some(&oxy), Some(json!({ "duration": 30 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duration"], 30);

    // The shortened appointment frees 10:30.
    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.oxy, &s.haircut, MONDAY, "10:30")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &s.app,
        Method::PATCH,
        &format!("/api/appointments/{id}/status?status=confirmed"),
        Some(&oxy),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    let (status, _) = send(
        &s.app,
        Method::PATCH,
        &format!("/api/appointments/{id}"),
        Some(&oxy),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listed) = send(
        &s.app,
        Method::GET,
        &format!("/api/barbers/{}/appointments?status=confirmed", s.oxy),
        Some(&oxy),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&s.app, Method::DELETE, &format!("/api/appointments/{id}"), Some(&oxy), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&s.app, Method::GET, &format!("/api/appointments/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn breaks_block_bookings() {
    let s = seeded().await;
    let oxy = login(&s.app, "oxy@oxyssbarbershop.com").await;
    send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.oxy, &s.haircut, MONDAY, "10:00")),
    )
    .await;

    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/breaks",
        Some(&oxy),
        Some(json!({ "break_date": MONDAY, "start_time": "10:30", "end_time": "11:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/breaks",
        Some(&oxy),
        Some(json!({ "break_date": MONDAY, "start_time": "13:00", "end_time": "12:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/breaks",
        Some(&oxy),
        Some(json!({ "barber_id": s.helga, "break_date": MONDAY, "start_time": "12:00", "end_time": "13:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, lunch) = send(
        &s.app,
        Method::POST,
        "/api/breaks",
        Some(&oxy),
        Some(json!({ "break_date": MONDAY, "start_time": "12:00", "end_time": "13:00", "title": "Lunch" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lunch["title"], "Lunch");

    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.oxy, &s.haircut, MONDAY, "11:30")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, schedule) = send(
        &s.app,
        Method::GET,
        &format!("/api/schedule?date={MONDAY}"),
        Some(&oxy),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schedule["total_appointments"], 1);
    assert_eq!(schedule["barbers"].as_array().unwrap().len(), 2);

    let oxy_column = schedule["barbers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|column| column["barber_name"] == "Oxy")
        .unwrap();
    let cells = oxy_column["cells"].as_array().unwrap();
    assert_eq!(schedule["slots"][2], "10:00:00");
    assert_eq!(cells[0]["kind"], "free");
    assert_eq!(cells[2]["kind"], "appointment");
    assert_eq!(cells[2]["customer_name"], "Jane Smith");
    assert_eq!(cells[2]["starts_here"], true);
    assert_eq!(cells[3]["kind"], "appointment");
    assert_eq!(cells[3]["starts_here"], false);
    assert_eq!(cells[4]["kind"], "free");
    assert_eq!(cells[6]["kind"], "break");
    assert_eq!(cells[6]["title"], "Lunch");
    assert_eq!(oxy_column["appointment_count"], 1);

    let break_uri = format!("/api/breaks/{}", lunch["id"].as_str().unwrap());
    let (status, _) = send(&s.app, Method::DELETE, &break_uri, Some(&oxy), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&s.app, Method::DELETE, &break_uri, Some(&oxy), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contact_messages_are_staff_only() {
    let s = seeded().await;

    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/contact",
        None,
        Some(json!({
            "name": "Sam",
            "email": "sam@example.com",
            "message": "Do you take walk-ins?",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&s.app, Method::GET, "/api/contact", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let oxy = login(&s.app, "oxy@oxyssbarbershop.com").await;
    let (status, messages) = send(&s.app, Method::GET, "/api/contact", Some(&oxy), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(messages[0]["message"], "Do you take walk-ins?");
}

#[tokio::test]
async fn concurrent_init_data_seeds_once() {
    let (app, _) = test_app();

    let (first, second) = tokio::join!(
        send(&app, Method::POST, "/api/init-data", None, None),
        send(&app, Method::POST, "/api/init-data", None, None),
    );
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);

    let (_, barbers) = send(&app, Method::GET, "/api/barbers", None, None).await;
    assert_eq!(barbers.as_array().unwrap().len(), 2);
    let (_, services) = send(&app, Method::GET, "/api/services", None, None).await;
    assert_eq!(services.as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn reactivating_a_cancelled_appointment_needs_its_slot() {
    let s = seeded().await;
    let oxy = login(&s.app, "oxy@oxyssbarbershop.com").await;

    let (_, first) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.oxy, &s.haircut, MONDAY, "10:00")),
    )
    .await;
    let first_uri = format!("/api/appointments/{}", first["id"].as_str().unwrap());
    let (status, _) = send(&s.app, Method::PATCH, &first_uri, Some(&oxy), Some(json!({ "status": "cancelled" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.oxy, &s.haircut, MONDAY, "10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&s.app, Method::PATCH, &first_uri, Some(&oxy), Some(json!({ "status": "pending" }))).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    let (_, still) = send(&s.app, Method::GET, &first_uri, None, None).await;
    assert_eq!(still["status"], "cancelled");

    let (_, active) = send(
        &s.app,
        Method::GET,
        &format!("/api/barbers/{}/appointments?status=pending", s.oxy),
        Some(&oxy),
        None,
    )
    .await;
    assert_eq!(active.as_array().unwrap().len(), 1);

    // Once the newer booking is cancelled the old one can come back.
    let second_uri = format!("/api/appointments/{}", second["id"].as_str().unwrap());
    send(&s.app, Method::PATCH, &second_uri, Some(&oxy), Some(json!({ "status": "cancelled" }))).await;
    let (status, _) = send(&s.app, Method::PATCH, &first_uri, Some(&oxy), Some(json!({ "status": "confirmed" }))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_services_and_offers_are_conflicts() {
    let s = seeded().await;
    let oxy = login(&s.app, "oxy@oxyssbarbershop.com").await;

    let (status, body) = send(
        &s.app,
        Method::POST,
        "/api/services",
        Some(&oxy),
        Some(json!({ "name": "Classic Haircut", "duration": 30, "price": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Service 'Classic Haircut' already exists");

    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/barber-services",
        Some(&oxy),
        Some(json!({ "barber_id": s.oxy, "service_id": s.haircut })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn booking_needs_an_available_barber_offering_the_service() {
    let s = seeded().await;
    let oxy = login(&s.app, "oxy@oxyssbarbershop.com").await;

    let new_barber = json!({ "name": "Sven", "experience_years": 2, "is_available": false });
    let (status, _) = send(&s.app, Method::POST, "/api/barbers", None, Some(new_barber.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/barbers",
        Some(&oxy),
        Some(json!({ "name": "Sven", "experience_years": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, sven) = send(&s.app, Method::POST, "/api/barbers", Some(&oxy), Some(new_barber)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sven["is_available"], false);
    let (_, barbers) = send(&s.app, Method::GET, "/api/barbers", None, None).await;
    assert_eq!(barbers.as_array().unwrap().len(), 3);

    let (status, _) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(sven["id"].as_str().unwrap(), &s.haircut, MONDAY, "10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, dye) = send(
        &s.app,
        Method::POST,
        "/api/services",
        Some(&oxy),
        Some(json!({ "name": "Beard Dye", "duration": 30, "base_price": "15", "category": "Men" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let dye_id = dye["id"].as_str().unwrap();

    let (status, body) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.oxy, dye_id, MONDAY, "10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Oxy does not offer Beard Dye");

    let (status, offer) = send(
        &s.app,
        Method::POST,
        "/api/barber-services",
        Some(&oxy),
        Some(json!({ "barber_id": s.oxy, "service_id": dye_id, "price": "18.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(offer["price"], 18.5);

    let (status, appointment) = send(
        &s.app,
        Method::POST,
        "/api/appointments",
        None,
        Some(booking(&s.oxy, dye_id, MONDAY, "10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(appointment["price"], 18.5);
    assert_eq!(appointment["service_name"], "Beard Dye");
}

#[tokio::test]
async fn appointment_date_filters_and_today_lists() {
    let s = seeded().await;
    let oxy = login(&s.app, "oxy@oxyssbarbershop.com").await;

    for date in [MONDAY, "2030-01-08", "2030-01-14"] {
        let (status, _) = send(
            &s.app,
            Method::POST,
            "/api/appointments",
            None,
            Some(booking(&s.oxy, &s.haircut, date, "10:00")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let listed = |query: &'static str| {
        let app = s.app.clone();
        let uri = format!("/api/barbers/{}/appointments?{query}", s.oxy);
        let token = oxy.clone();
        async move {
            let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::OK);
            body.as_array()
                .unwrap()
                .iter()
                .map(|a| a["appointment_date"].as_str().unwrap().to_owned())
                .collect::<Vec<_>>()
        }
    };
    assert_eq!(listed("date_from=2030-01-08").await, ["2030-01-08", "2030-01-14"]);
    assert_eq!(listed("date_to=2030-01-07").await, [MONDAY]);
    assert_eq!(listed("date_from=2030-01-08&date_to=2030-01-08").await, ["2030-01-08"]);

    // Bookings for today depend on the clock, so put one in directly.
    let today = Appointment {
        id: Uuid::new_v4(),
        customer_name: "Walk In".into(),
        customer_email: "walk.in@example.com".into(),
        customer_phone: "(555) 987-6543".into(),
        service_id: s.haircut.parse().unwrap(),
        service_name: "Classic Haircut".into(),
        barber_id: s.oxy.parse().unwrap(),
        barber_name: "Oxy".into(),
        appointment_date: Local::now().date_naive(),
        appointment_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        duration: 45,
        price: "35".parse().unwrap(),
        notes: None,
        status: AppointmentStatus::Confirmed,
        created_at: Local::now(),
    };
    s.store.insert_appointment(&today).await.unwrap();

    let (status, shop_today) = send(&s.app, Method::GET, "/api/appointments/today", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let shop_today = shop_today.as_array().unwrap();
    assert_eq!(shop_today.len(), 1);
    assert_eq!(shop_today[0]["id"], today.id.to_string());

    let (status, oxy_today) = send(
        &s.app,
        Method::GET,
        &format!("/api/barbers/{}/appointments/today", s.oxy),
        Some(&oxy),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(oxy_today.as_array().unwrap().len(), 1);

    let (_, helga_today) = send(
        &s.app,
        Method::GET,
        &format!("/api/barbers/{}/appointments/today", s.helga),
        Some(&oxy),
        None,
    )
    .await;
    assert!(helga_today.as_array().unwrap().is_empty());

    let (status, _) = send(
        &s.app,
        Method::GET,
        &format!("/api/barbers/{}/appointments/today", s.oxy),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
