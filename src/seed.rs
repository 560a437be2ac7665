use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::{
    config::DEFAULT_STAFF_PASSWORD,
    login_managers::password_login,
    models::{Barber, BarberService, Service, ServiceCategory, StaffAccount},
    store::{BarbershopStore, StoreError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub barbers_count: usize,
    pub services_count: usize,
}

struct DefaultBarber {
    name: &'static str,
    email: &'static str,
    description: &'static str,
    experience_years: i32,
    specialties: [&'static str; 4],
    image_url: &'static str,
}

const DEFAULT_BARBERS: [DefaultBarber; 2] = [
    DefaultBarber {
        name: "Oxy",
        email: "oxy@oxyssbarbershop.com",
        description: "Master barber and founder with exceptional skills in classic and modern cuts",
        experience_years: 15,
        specialties: ["Classic cuts", "Fades", "Beard styling", "Hot towel shaves"],
        image_url: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=400&h=400&fit=crop&crop=face",
    },
    DefaultBarber {
        name: "Helga",
        email: "helga@oxyssbarbershop.com",
        description: "Expert stylist specializing in modern cuts and precision beard work",
        experience_years: 8,
        specialties: ["Modern styles", "Precision cuts", "Beard trimming", "Hair treatments"],
        image_url: "https://images.unsplash.com/photo-1594736797933-d0401ba5fe65?w=400&h=400&fit=crop&crop=face",
    },
];

/// (name, description, minutes, price, category)
const DEFAULT_SERVICES: [(&str, &str, i32, &str, ServiceCategory); 7] = [
    ("Classic Haircut", "Traditional men's haircut with wash and style", 45, "35.00", ServiceCategory::Men),
    ("Beard Trim & Style", "Professional beard trimming and styling", 30, "25.00", ServiceCategory::Men),
    ("Premium Cut & Beard", "Complete grooming package with haircut and beard service", 75, "55.00", ServiceCategory::Men),
    ("Hot Towel Shave", "Traditional hot towel shave with premium products", 45, "40.00", ServiceCategory::Men),
    ("Senior Haircut", "Haircut for seniors (65+)", 45, "28.00", ServiceCategory::Men),
    ("Women's Cut & Style", "Wash, precision cut and blow-dry", 60, "45.00", ServiceCategory::Women),
    ("Kids Haircut", "Haircut for children under 12", 30, "20.00", ServiceCategory::Children),
];

/// Inserts the default barbers (with staff accounts) and services when their
/// tables are empty, then offers every newly seeded service for every barber
/// and every service for every newly seeded barber. Safe to run repeatedly.
pub async fn initialize(
    store: &dyn BarbershopStore,
    staff_password: &str,
) -> Result<SeedSummary, StoreError> {
    let mut barbers = store.list_barbers().await?;
    let mut seeded_barbers = Vec::new();
    if barbers.is_empty() {
        if staff_password == DEFAULT_STAFF_PASSWORD {
            tracing::warn!(
                "SEED_STAFF_PASSWORD not set. Seeded staff accounts use the default password '{}'. Set SEED_STAFF_PASSWORD in production.",
                DEFAULT_STAFF_PASSWORD
            );
        }
        let password_hash = password_login::hash_password(staff_password)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        for default in DEFAULT_BARBERS.iter() {
            let barber = Barber {
                id: Uuid::new_v4(),
                name: default.name.into(),
                description: default.description.into(),
                experience_years: default.experience_years,
                specialties: default.specialties.iter().map(|s| s.to_string()).collect(),
                image_url: Some(default.image_url.into()),
                is_available: true,
            };
            store.insert_barber(&barber).await?;
            store
                .insert_account(&StaffAccount {
                    barber_id: barber.id,
                    email: default.email.into(),
                    password_hash: password_hash.clone(),
                    enabled: true,
                })
                .await?;
            tracing::info!("seeded barber {} <{}>", barber.name, default.email);
            seeded_barbers.push(barber.id);
        }
        barbers = store.list_barbers().await?;
    }

    let mut services = store.list_services().await?;
    let mut seeded_services = Vec::new();
    if services.is_empty() {
        for (name, description, duration, price, category) in DEFAULT_SERVICES {
            let service = Service {
                id: Uuid::new_v4(),
                name: name.into(),
                description: description.into(),
                duration,
                price: price
                    .parse::<BigDecimal>()
                    .map_err(|e| StoreError::Corrupt(e.to_string()))?,
                category,
            };
            store.insert_service(&service).await?;
            seeded_services.push(service.id);
        }
        tracing::info!("seeded {} services", seeded_services.len());
        services = store.list_services().await?;
    }

    for barber in &barbers {
        for service in &services {
            if !seeded_barbers.contains(&barber.id) && !seeded_services.contains(&service.id) {
                continue;
            }
            if store.find_barber_service(barber.id, service.id).await?.is_some() {
                continue;
            }
            store
                .insert_barber_service(&BarberService {
                    id: Uuid::new_v4(),
                    barber_id: barber.id,
                    service_id: service.id,
                    price: service.price.clone(),
                    is_available: true,
                })
                .await?;
        }
    }

    Ok(SeedSummary {
        barbers_count: barbers.len(),
        services_count: services.len(),
    })
}
