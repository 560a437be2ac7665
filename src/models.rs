use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{price_format, time_format};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Barber {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub experience_years: i32,
    pub specialties: Vec<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
}

/// Login credentials of a barber.
#[derive(Debug, Clone)]
pub struct StaffAccount {
    pub barber_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ServiceCategory {
    #[default]
    Men,
    Women,
    Children,
}

impl ServiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Men => "Men",
            ServiceCategory::Women => "Women",
            ServiceCategory::Children => "Children",
        }
    }
}

impl FromStr for ServiceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Men" => Ok(ServiceCategory::Men),
            "Women" => Ok(ServiceCategory::Women),
            "Children" => Ok(ServiceCategory::Children),
            other => Err(format!(
                "Invalid category '{other}'. Must be one of: Men, Women, Children"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Minutes.
    pub duration: i32,
    #[serde(with = "price_format")]
    pub price: BigDecimal,
    pub category: ServiceCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarberService {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
    #[serde(with = "price_format")]
    pub price: BigDecimal,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarberServiceWithDetails {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
    #[serde(with = "price_format")]
    pub price: BigDecimal,
    pub is_available: bool,
    pub service_name: String,
    pub service_description: String,
    pub duration: i32,
    pub category: ServiceCategory,
}

impl BarberServiceWithDetails {
    pub fn new(offer: BarberService, service: &Service) -> Self {
        BarberServiceWithDetails {
            id: offer.id,
            barber_id: offer.barber_id,
            service_id: offer.service_id,
            price: offer.price,
            is_available: offer.is_available,
            service_name: service.name.clone(),
            service_description: service.description.clone(),
            duration: service.duration,
            category: service.category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the appointment still occupies the barber's time.
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid status. Must be one of: {}",
                    AppointmentStatus::ALL.map(|s| s.as_str()).join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub service_id: Uuid,
    pub service_name: String,
    pub barber_id: Uuid,
    pub barber_name: String,
    pub appointment_date: NaiveDate,
    #[serde(with = "time_format")]
    pub appointment_time: NaiveTime,
    /// Minutes.
    pub duration: i32,
    #[serde(with = "price_format")]
    pub price: BigDecimal,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Break {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub break_date: NaiveDate,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    #[serde(with = "time_format")]
    pub end_time: NaiveTime,
    pub title: String,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Local>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_parsing_lists_valid_values() {
        assert_eq!("confirmed".parse::<AppointmentStatus>(), Ok(AppointmentStatus::Confirmed));
        let err = "done".parse::<AppointmentStatus>().unwrap_err();
        assert_eq!(err, "Invalid status. Must be one of: pending, confirmed, completed, cancelled");
    }

    #[test]
    fn appointment_wire_format() {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            customer_name: "John Doe".into(),
            customer_email: "john.doe@example.com".into(),
            customer_phone: "(555) 123-4567".into(),
            service_id: Uuid::new_v4(),
            service_name: "Classic Haircut".into(),
            barber_id: Uuid::new_v4(),
            barber_name: "Oxy".into(),
            appointment_date: NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(),
            appointment_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            duration: 45,
            price: "35.50".parse().unwrap(),
            notes: None,
            status: AppointmentStatus::Pending,
            created_at: Local::now(),
        };

        let json = serde_json::to_value(&appointment).unwrap();
        assert_eq!(json["appointment_date"], "2024-12-20");
        assert_eq!(json["appointment_time"], "14:30:00");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["price"], 35.5);

        let back: Appointment = serde_json::from_value(json).unwrap();
        assert_eq!(back.price, appointment.price);
    }
}
