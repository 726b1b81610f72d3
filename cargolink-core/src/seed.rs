//! Mock data loaded at startup

use crate::{
    auth,
    db::{
        self,
        Store,
    },
    error::CargoLinkError,
    models::*,
    utils,
};
use log::info;

struct MockCarrier {
    name: &'static str,
    country: &'static str,
    destinations: &'static [&'static str],
    modes: &'static [TransportMode],
    rating: f64,
    price_per_kg: f64,
    contact_email: &'static str,
    phone: &'static str,
}

const MOCK_CARRIERS: [MockCarrier; 8] = [
    MockCarrier {
        name: "Sahel Freight Lines",
        country: "Nigeria",
        destinations: &["Lagos", "Abuja", "Accra", "Dakar"],
        modes: &[TransportMode::Road],
        rating: 4.6,
        price_per_kg: 0.85,
        contact_email: "bookings@sahelfreight.ng",
        phone: "+234 1 555 0101",
    },
    MockCarrier {
        name: "Kilimanjaro Logistics",
        country: "Kenya",
        destinations: &["Nairobi", "Dar es Salaam", "Kampala", "Kigali"],
        modes: &[TransportMode::Road, TransportMode::Rail],
        rating: 4.3,
        price_per_kg: 0.70,
        contact_email: "ops@kililogistics.co.ke",
        phone: "+254 20 555 0102",
    },
    MockCarrier {
        name: "Cape Cargo Express",
        country: "South Africa",
        destinations: &["Johannesburg", "Cape Town", "Durban", "Gaborone", "Harare"],
        modes: &[TransportMode::Road, TransportMode::Air],
        rating: 4.8,
        price_per_kg: 1.40,
        contact_email: "hello@capecargo.co.za",
        phone: "+27 21 555 0103",
    },
    MockCarrier {
        name: "Nile Delta Shipping",
        country: "Egypt",
        destinations: &["Cairo", "Alexandria", "Khartoum"],
        modes: &[TransportMode::Sea, TransportMode::Road],
        rating: 4.1,
        price_per_kg: 0.60,
        contact_email: "cargo@niledelta.eg",
        phone: "+20 2 555 0104",
    },
    MockCarrier {
        name: "Atlas Transport",
        country: "Morocco",
        destinations: &["Casablanca", "Algiers", "Dakar"],
        modes: &[TransportMode::Sea, TransportMode::Road],
        rating: 3.9,
        price_per_kg: 0.75,
        contact_email: "contact@atlastransport.ma",
        phone: "+212 522 555 0105",
    },
    MockCarrier {
        name: "Congo River Haulage",
        country: "DR Congo",
        destinations: &["Kinshasa", "Brazzaville", "Luanda"],
        modes: &[TransportMode::Road, TransportMode::Sea],
        rating: 3.6,
        price_per_kg: 0.55,
        contact_email: "fret@congoriver.cd",
        phone: "+243 81 555 0106",
    },
    MockCarrier {
        name: "Horn of Africa Air Cargo",
        country: "Ethiopia",
        destinations: &["Addis Ababa", "Nairobi", "Cairo", "Lagos", "Johannesburg"],
        modes: &[TransportMode::Air],
        rating: 4.7,
        price_per_kg: 2.10,
        contact_email: "freight@hornaircargo.et",
        phone: "+251 11 555 0107",
    },
    MockCarrier {
        name: "West Coast Rail & Road",
        country: "Ghana",
        destinations: &["Accra", "Kumasi", "Abidjan", "Lagos"],
        modes: &[TransportMode::Road, TransportMode::Rail],
        rating: 4.0,
        price_per_kg: 0.65,
        contact_email: "dispatch@westcoastrr.com.gh",
        phone: "+233 30 555 0108",
    },
];

/// Verified carrier listings available on every fresh start
pub fn mock_carriers() -> Vec<Carrier> {
    let created = utils::now();
    MOCK_CARRIERS
        .iter()
        .map(|m| Carrier {
            cid: utils::generate_id(crate::CARRIER_DB_KEY),
            name: String::from(m.name),
            country: String::from(m.country),
            destinations: m.destinations.iter().map(|d| String::from(*d)).collect(),
            transport_modes: m.modes.to_vec(),
            rating: m.rating,
            price_per_kg: m.price_per_kg,
            verified: true,
            contact_email: String::from(m.contact_email),
            phone: String::from(m.phone),
            created,
        })
        .collect()
}

/// Load the mock carriers into the store
pub fn carriers(store: &Store) -> Result<(), CargoLinkError> {
    let mut carriers = db::write(&store.carriers)?;
    let mock = mock_carriers();
    info!("seeding {} carriers", mock.len());
    carriers.extend(mock);
    Ok(())
}

/// Bootstrap an admin account
pub fn admin(store: &Store, email: &str, password: &str) -> Result<User, CargoLinkError> {
    if password.len() < crate::MIN_PASSWORD_LENGTH {
        return Err(CargoLinkError::Validation(format!(
            "{} must be at least {} characters",
            crate::CARGOLINK_ADMIN_PASSWORD,
            crate::MIN_PASSWORD_LENGTH
        )));
    }
    let email = email.trim().to_lowercase();
    let mut users = db::write(&store.users)?;
    if users.iter().any(|u| u.email == email) {
        return Err(CargoLinkError::Conflict(String::from(
            "email is already registered",
        )));
    }
    let admin = User {
        uid: utils::generate_id(crate::USER_DB_KEY),
        email,
        name: String::from("Administrator"),
        role: Role::Admin,
        company: String::from(crate::APP_NAME),
        carrier_id: None,
        password_hash: auth::hash_password(password),
        created: utils::now(),
    };
    info!("seeded admin {}", admin.uid);
    users.push(admin.clone());
    Ok(admin)
}

// Tests
//-------------------------------------------------------------------------------
