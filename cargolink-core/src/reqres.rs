//! Structs for all http requests

use serde::{
    Deserialize,
    Serialize,
};

use crate::models::*;

// All http requests and responses are here.
// Request fields are optional so missing ones are reported by the
// services as validation errors instead of body rejections.

/// Envelope around every JSON response
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
}

// START auth structs
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    /// carrier registrations only
    pub country: Option<String>,
    pub destinations: Option<Vec<String>>,
    pub transport_modes: Option<Vec<String>>,
    pub price_per_kg: Option<f64>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// unix timestamp
    pub expires: i64,
    pub user: User,
}
// END auth structs

// START rate structs
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RateRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub weight_kg: Option<f64>,
    pub transport_mode: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RateQuote {
    pub origin: String,
    pub destination: String,
    pub distance_km: u32,
    /// true when the route is not in the distance table
    pub estimated_distance: bool,
    pub weight_kg: f64,
    pub transport_mode: TransportMode,
    pub base_fee: f64,
    pub distance_cost: f64,
    pub weight_cost: f64,
    pub mode_multiplier: f64,
    pub total: f64,
    pub currency: String,
    pub transit_days: u32,
}
// END rate structs

// START selection structs
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectionRequest {
    pub destination: Option<String>,
    pub weight_kg: Option<f64>,
    pub transport_mode: Option<String>,
    pub strategy: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ScoredCarrier {
    pub carrier: Carrier,
    pub estimated_price: f64,
    pub price_score: f64,
    pub rating_score: f64,
    pub destination_score: f64,
    pub score: f64,
}
// END selection structs

// START shipment structs
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ShipmentRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub weight_kg: Option<f64>,
    pub transport_mode: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TrackingResponse {
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub origin: String,
    pub destination: String,
    pub transport_mode: TransportMode,
    pub carrier_name: Option<String>,
    /// unix timestamp
    pub estimated_delivery: i64,
    pub events: Vec<TrackingEvent>,
}
// END shipment structs

// START api key structs
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiKeyRequest {
    pub name: Option<String>,
}

/// The plaintext key is only ever returned here
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiKeyCreated {
    pub key: String,
    pub record: ApiKeyRecord,
}
// END api key structs

// START assignment structs
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AssignmentRequest {
    pub sid: Option<String>,
    pub cid: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DeclineRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
    pub location: Option<String>,
    pub note: Option<String>,
}

/// Contents encoded in an assignment's QR code
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct QrPayload {
    pub asid: String,
    pub sid: String,
    pub token: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QrPayloadResponse {
    pub payload: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanRequest {
    pub payload: Option<String>,
    pub location: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanAction {
    Pickup,
    Delivery,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ScanResponse {
    pub action: ScanAction,
    pub assignment: ShipmentAssignment,
    pub shipment_status: ShipmentStatus,
}
// END assignment structs
