use rocket::{
    catch,
    delete,
    get,
    http::{
        ContentType,
        Status,
    },
    patch,
    post,
    response::status::Custom,
    serde::{
        json::Json,
        Serialize,
    },
    State,
};

use cargolink_core::{
    args::Args,
    auth::{
        BearerToken,
        Principal,
    },
    db::Store,
    error::CargoLinkError,
    models::*,
    reqres::*,
    *,
};
use log::error;
use std::str::FromStr;

// JSON APIs

type ApiResult<T> = Custom<Json<ApiResponse<T>>>;

/// Wrap a service result in the response envelope
fn respond<T: Serialize>(status: Status, result: Result<T, CargoLinkError>) -> ApiResult<T> {
    match result {
        Ok(data) => Custom(status, Json(ApiResponse::ok(data))),
        Err(e) => {
            if let CargoLinkError::Internal(detail) = &e {
                error!("internal error: {}", detail);
            }
            Custom(e.status(), Json(ApiResponse::failure(e.to_string())))
        }
    }
}

fn failure(status: Status, error: &str) -> ApiResult<()> {
    Custom(status, Json(ApiResponse::failure(String::from(error))))
}

/// Name and version of the running app
///
/// This also functions as a health check
#[get("/version")]
pub async fn get_version() -> ApiResult<VersionResponse> {
    let version = VersionResponse {
        name: String::from(APP_NAME),
        version: String::from(APP_VERSION),
    };
    respond(Status::Ok, Ok(version))
}

// Auth APIs
//-----------------------------------------------

/// Register a shipper or carrier account
#[post("/register", data = "<r_user>")]
pub async fn register(r_user: Json<RegisterRequest>, store: &State<Store>) -> ApiResult<User> {
    respond(Status::Created, user::register(store, &r_user))
}

#[post("/login", data = "<r_login>")]
pub async fn login(
    r_login: Json<LoginRequest>,
    store: &State<Store>,
    args: &State<Args>,
) -> ApiResult<LoginResponse> {
    respond(
        Status::Ok,
        user::login(store, &r_login, args.token_timeout),
    )
}

/// Profile of the session owner
///
/// Protected: true
#[get("/me")]
pub async fn me(token: BearerToken, store: &State<Store>) -> ApiResult<User> {
    respond(Status::Ok, user::me(store, token.principal()))
}

// Carrier and rate APIs
//-----------------------------------------------

/// Browse carrier listings
#[get("/?<country>&<mode>&<destination>")]
pub async fn get_carriers(
    country: Option<String>,
    mode: Option<String>,
    destination: Option<String>,
    store: &State<Store>,
) -> ApiResult<Vec<Carrier>> {
    let mode = match mode.as_deref() {
        Some(m) if !m.trim().is_empty() => match TransportMode::from_str(m) {
            Ok(m) => Some(m),
            Err(e) => return respond(Status::Ok, Err(e)),
        },
        _ => None,
    };
    let filter = carrier::CarrierFilter {
        country: country.filter(|c| !c.trim().is_empty()),
        mode,
        destination: destination.filter(|d| !d.trim().is_empty()),
    };
    respond(Status::Ok, carrier::find_all(store, &filter))
}

#[get("/<cid>")]
pub async fn get_carrier(cid: String, store: &State<Store>) -> ApiResult<Carrier> {
    respond(Status::Ok, carrier::find(store, &cid))
}

/// Cities with known distances
#[get("/cities")]
pub async fn get_cities() -> ApiResult<Vec<String>> {
    respond(Status::Ok, Ok(rate::cities()))
}

#[post("/", data = "<r_rate>")]
pub async fn calculate_rate(r_rate: Json<RateRequest>) -> ApiResult<RateQuote> {
    respond(Status::Ok, rate::calculate(&r_rate))
}

/// Rank carriers for a shipment
#[post("/", data = "<r_selection>")]
pub async fn select_carriers(
    r_selection: Json<SelectionRequest>,
    store: &State<Store>,
    args: &State<Args>,
) -> ApiResult<Vec<ScoredCarrier>> {
    respond(
        Status::Ok,
        selection::select(store, &r_selection, args.selection_limit),
    )
}

// Shipment APIs
//-----------------------------------------------

/// Create a shipment
///
/// Protected: true, session token or api key
#[post("/", data = "<r_shipment>")]
pub async fn create_shipment(
    r_shipment: Json<ShipmentRequest>,
    principal: Principal,
    store: &State<Store>,
) -> ApiResult<Shipment> {
    respond(
        Status::Created,
        shipment::create(store, &principal, &r_shipment),
    )
}

/// Shipments visible to the caller
///
/// Protected: true, session token or api key
#[get("/?<status>")]
pub async fn get_shipments(
    status: Option<String>,
    principal: Principal,
    store: &State<Store>,
) -> ApiResult<Vec<Shipment>> {
    respond(
        Status::Ok,
        shipment::find_all(store, &principal, status.as_deref()),
    )
}

#[get("/<sid>")]
pub async fn get_shipment(sid: String, principal: Principal, store: &State<Store>) -> ApiResult<Shipment> {
    respond(Status::Ok, shipment::find(store, &principal, &sid))
}

#[patch("/<sid>/cancel")]
pub async fn cancel_shipment(
    sid: String,
    principal: Principal,
    store: &State<Store>,
) -> ApiResult<Shipment> {
    respond(Status::Ok, shipment::cancel(store, &principal, &sid))
}

/// Public tracking page
#[get("/<tracking_number>")]
pub async fn track_shipment(
    tracking_number: String,
    store: &State<Store>,
) -> ApiResult<TrackingResponse> {
    respond(Status::Ok, shipment::track(store, &tracking_number))
}

// API key management
//-----------------------------------------------

/// The plaintext key is only returned by this call
///
/// Protected: true
#[post("/", data = "<r_key>")]
pub async fn create_api_key(
    r_key: Json<ApiKeyRequest>,
    token: BearerToken,
    store: &State<Store>,
) -> ApiResult<ApiKeyCreated> {
    respond(
        Status::Created,
        api_key::create(store, token.principal(), &r_key),
    )
}

#[get("/")]
pub async fn get_api_keys(token: BearerToken, store: &State<Store>) -> ApiResult<Vec<ApiKeyRecord>> {
    respond(Status::Ok, api_key::find_all(store, token.principal()))
}

#[delete("/<kid>")]
pub async fn revoke_api_key(
    kid: String,
    token: BearerToken,
    store: &State<Store>,
) -> ApiResult<ApiKeyRecord> {
    respond(Status::Ok, api_key::revoke(store, token.principal(), &kid))
}

// Assignment and QR APIs
//-----------------------------------------------

/// Offer a pending shipment to a carrier
///
/// Protected: true
#[post("/", data = "<r_assignment>")]
pub async fn create_assignment(
    r_assignment: Json<AssignmentRequest>,
    token: BearerToken,
    store: &State<Store>,
) -> ApiResult<ShipmentAssignment> {
    respond(
        Status::Created,
        assignment::create(store, token.principal(), &r_assignment),
    )
}

#[get("/")]
pub async fn get_assignments(
    token: BearerToken,
    store: &State<Store>,
) -> ApiResult<Vec<ShipmentAssignment>> {
    respond(Status::Ok, assignment::find_all(store, token.principal()))
}

#[get("/<asid>")]
pub async fn get_assignment(
    asid: String,
    token: BearerToken,
    store: &State<Store>,
) -> ApiResult<ShipmentAssignment> {
    respond(Status::Ok, assignment::find(store, token.principal(), &asid))
}

#[post("/<asid>/accept")]
pub async fn accept_assignment(
    asid: String,
    token: BearerToken,
    store: &State<Store>,
) -> ApiResult<ShipmentAssignment> {
    respond(
        Status::Ok,
        assignment::accept(store, token.principal(), &asid),
    )
}

/// Body is optional, `{"reason": "..."}`
#[post("/<asid>/decline", data = "<r_decline>")]
pub async fn decline_assignment(
    asid: String,
    r_decline: Option<Json<DeclineRequest>>,
    token: BearerToken,
    store: &State<Store>,
) -> ApiResult<ShipmentAssignment> {
    let r_decline = r_decline.map(|r| r.into_inner()).unwrap_or_default();
    respond(
        Status::Ok,
        assignment::decline(store, token.principal(), &asid, &r_decline),
    )
}

/// Carrier progress report: picked_up, in_transit or delivered
#[patch("/<asid>/status", data = "<r_status>")]
pub async fn update_assignment_status(
    asid: String,
    r_status: Json<StatusUpdateRequest>,
    token: BearerToken,
    store: &State<Store>,
) -> ApiResult<ShipmentAssignment> {
    respond(
        Status::Ok,
        assignment::update_status(store, token.principal(), &asid, &r_status),
    )
}

/// QR code to print on the package, as SVG
#[get("/<asid>/qr")]
pub async fn get_qr_code(
    asid: String,
    token: BearerToken,
    store: &State<Store>,
) -> Result<(ContentType, String), ApiResult<()>> {
    match assignment::qr_svg(store, token.principal(), &asid) {
        Ok(svg) => Ok((ContentType::SVG, svg)),
        Err(e) => Err(respond(Status::Ok, Err(e))),
    }
}

/// Raw text encoded in the QR code
#[get("/<asid>/qr/payload")]
pub async fn get_qr_payload(
    asid: String,
    token: BearerToken,
    store: &State<Store>,
) -> ApiResult<QrPayloadResponse> {
    let payload = assignment::qr_payload(store, token.principal(), &asid);
    respond(Status::Ok, payload.map(|payload| QrPayloadResponse { payload }))
}

/// Carrier scanned a package: pickup or delivery
#[post("/scan", data = "<r_scan>")]
pub async fn scan_qr_code(
    r_scan: Json<ScanRequest>,
    token: BearerToken,
    store: &State<Store>,
) -> ApiResult<ScanResponse> {
    respond(Status::Ok, assignment::scan(store, token.principal(), &r_scan))
}

// Catchers
//----------------------------------------------------------------

#[catch(400)]
pub fn bad_request() -> ApiResult<()> {
    failure(Status::BadRequest, "Malformed request")
}

#[catch(401)]
pub fn unauthorized() -> ApiResult<()> {
    failure(Status::Unauthorized, "Unauthorized")
}

#[catch(404)]
pub fn not_found() -> ApiResult<()> {
    failure(Status::NotFound, "Resource does not exist")
}

/// Body didn't match the expected JSON shape
#[catch(422)]
pub fn unprocessable_entity() -> ApiResult<()> {
    failure(Status::BadRequest, "Malformed request body")
}

#[catch(500)]
pub fn internal_error() -> ApiResult<()> {
    failure(Status::InternalServerError, "Internal server error")
}
