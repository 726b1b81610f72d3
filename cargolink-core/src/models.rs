use rocket::serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    str::FromStr,
};

use crate::error::CargoLinkError;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum Role {
    #[default]
    Shipper,
    Carrier,
    Admin,
}

impl FromStr for Role {
    type Err = CargoLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shipper" => Ok(Role::Shipper),
            "carrier" => Ok(Role::Carrier),
            "admin" => Ok(Role::Admin),
            _ => Err(CargoLinkError::Validation(format!("unknown role: {}", s))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Road,
    Rail,
    Sea,
    Air,
}

impl TransportMode {
    /// Factor applied to the rate subtotal
    pub fn rate_multiplier(&self) -> f64 {
        match *self {
            TransportMode::Road => 1.0,
            TransportMode::Rail => 0.85,
            TransportMode::Sea => 0.7,
            TransportMode::Air => 2.2,
        }
    }

    /// Kilometres covered per day of transit
    pub fn daily_range_km(&self) -> f64 {
        match *self {
            TransportMode::Road => 500.0,
            TransportMode::Rail => 400.0,
            TransportMode::Sea => 350.0,
            TransportMode::Air => 5000.0,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            TransportMode::Road => "road",
            TransportMode::Rail => "rail",
            TransportMode::Sea => "sea",
            TransportMode::Air => "air",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TransportMode {
    type Err = CargoLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "road" => Ok(TransportMode::Road),
            "rail" => Ok(TransportMode::Rail),
            "sea" => Ok(TransportMode::Sea),
            "air" => Ok(TransportMode::Air),
            _ => Err(CargoLinkError::Validation(format!(
                "unknown transport mode: {}",
                s
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[default]
    Pending,
    Assigned,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
}

impl FromStr for ShipmentStatus {
    type Err = CargoLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ShipmentStatus::Pending),
            "assigned" => Ok(ShipmentStatus::Assigned),
            "picked_up" => Ok(ShipmentStatus::PickedUp),
            "in_transit" => Ok(ShipmentStatus::InTransit),
            "delivered" => Ok(ShipmentStatus::Delivered),
            "cancelled" => Ok(ShipmentStatus::Cancelled),
            _ => Err(CargoLinkError::Validation(format!(
                "unknown shipment status: {}",
                s
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(crate = "rocket::serde", rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
}

impl AssignmentStatus {
    /// Still holds the shipment
    pub fn is_active(&self) -> bool {
        !matches!(
            *self,
            AssignmentStatus::Declined | AssignmentStatus::Delivered | AssignmentStatus::Cancelled
        )
    }
}

impl FromStr for AssignmentStatus {
    type Err = CargoLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(AssignmentStatus::Pending),
            "accepted" => Ok(AssignmentStatus::Accepted),
            "declined" => Ok(AssignmentStatus::Declined),
            "picked_up" => Ok(AssignmentStatus::PickedUp),
            "in_transit" => Ok(AssignmentStatus::InTransit),
            "delivered" => Ok(AssignmentStatus::Delivered),
            "cancelled" => Ok(AssignmentStatus::Cancelled),
            _ => Err(CargoLinkError::Validation(format!(
                "unknown assignment status: {}",
                s
            ))),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct User {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub company: String,
    /// Set for carrier users only
    pub carrier_id: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Carrier {
    pub cid: String,
    pub name: String,
    pub country: String,
    /// Cities the carrier delivers to
    pub destinations: Vec<String>,
    pub transport_modes: Vec<TransportMode>,
    /// 0.0 - 5.0
    pub rating: f64,
    /// USD
    pub price_per_kg: f64,
    pub verified: bool,
    pub contact_email: String,
    pub phone: String,
    pub created: i64,
}

impl Carrier {
    pub fn serves(&self, city: &str) -> bool {
        let city = city.trim();
        self.destinations.iter().any(|d| d.eq_ignore_ascii_case(city))
    }

    pub fn supports(&self, mode: TransportMode) -> bool {
        self.transport_modes.contains(&mode)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct TrackingEvent {
    pub status: ShipmentStatus,
    pub location: String,
    pub note: String,
    pub timestamp: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Shipment {
    pub sid: String,
    pub tracking_number: String,
    /// Shipper uid
    pub uid: String,
    pub origin: String,
    pub destination: String,
    pub weight_kg: f64,
    pub transport_mode: TransportMode,
    pub description: String,
    pub status: ShipmentStatus,
    pub carrier_id: Option<String>,
    /// USD, from the rate calculator at creation
    pub estimated_cost: f64,
    pub transit_days: u32,
    pub created: i64,
    pub updated: i64,
    pub events: Vec<TrackingEvent>,
}

impl Shipment {
    /// Move to `status` and record it in the tracking history
    pub fn push_event(&mut self, status: ShipmentStatus, location: &str, note: &str, now: i64) {
        self.status = status;
        self.updated = now;
        self.events.push(TrackingEvent {
            status,
            location: String::from(location),
            note: String::from(note),
            timestamp: now,
        });
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ApiKeyRecord {
    pub kid: String,
    pub name: String,
    /// Leading characters of the key so owners can tell keys apart
    pub prefix: String,
    #[serde(skip_serializing, default)]
    pub key_hash: String,
    pub uid: String,
    pub created: i64,
    pub last_used: Option<i64>,
    pub revoked: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ShipmentAssignment {
    pub asid: String,
    pub sid: String,
    pub cid: String,
    pub status: AssignmentStatus,
    #[serde(skip_serializing, default)]
    pub qr_token: String,
    pub decline_reason: Option<String>,
    pub created: i64,
    pub responded: Option<i64>,
}
