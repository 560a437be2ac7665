pub mod appointment;
pub mod barber;
pub mod barber_service;
pub mod break_time;
pub mod contact;
pub mod identity;
pub mod init_data;
pub mod login;
pub mod root;
pub mod schedule;
pub mod service;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Plain acknowledgement body.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
