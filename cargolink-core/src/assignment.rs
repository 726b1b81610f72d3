//! Carrier assignment and QR workflow.
//!
//! A shipper assigns a carrier to a pending shipment. The carrier accepts or
//! declines, then moves the load along by status updates or by scanning the
//! QR code printed on the package at pickup and again at delivery.

use crate::{
    auth::Principal,
    carrier,
    db::{
        self,
        Store,
    },
    error::CargoLinkError,
    models::*,
    reqres,
    shipment::Scope,
    utils,
};
use log::{
    debug,
    error,
    info,
};
use qrcode::{
    render::svg,
    QrCode,
};
use std::str::FromStr;

/// Minimum edge of the rendered QR code in pixels
const QR_MIN_DIMENSION: u32 = 256;

fn is_visible(scope: &Scope, a: &ShipmentAssignment, shipments: &[Shipment]) -> bool {
    is_carrier_of(scope, a)
        || shipments
            .iter()
            .any(|s| s.sid == a.sid && scope.can_manage(s))
}

fn is_carrier_of(scope: &Scope, a: &ShipmentAssignment) -> bool {
    scope.is_admin() || scope.carrier_id() == Some(a.cid.as_str())
}

/// Shipment status mirrored for an assignment status
fn mirrored(status: AssignmentStatus) -> Option<ShipmentStatus> {
    match status {
        AssignmentStatus::PickedUp => Some(ShipmentStatus::PickedUp),
        AssignmentStatus::InTransit => Some(ShipmentStatus::InTransit),
        AssignmentStatus::Delivered => Some(ShipmentStatus::Delivered),
        _ => None,
    }
}

/// Legal moves once a carrier has accepted
pub fn can_transition(from: AssignmentStatus, to: AssignmentStatus) -> bool {
    use AssignmentStatus::*;
    matches!(
        (from, to),
        (Accepted, PickedUp)
            | (PickedUp, InTransit)
            | (InTransit, InTransit)
            | (PickedUp, Delivered)
            | (InTransit, Delivered)
    )
}

/// Find an assignment and its shipment for mutation
fn locate<'a>(
    assignments: &'a mut [ShipmentAssignment],
    shipments: &'a mut [Shipment],
    scope: &Scope,
    asid: &str,
) -> Result<(&'a mut ShipmentAssignment, &'a mut Shipment), CargoLinkError> {
    let a = assignments
        .iter_mut()
        .find(|a| a.asid == asid)
        .ok_or(CargoLinkError::NotFound("assignment"))?;
    if !is_visible(scope, a, shipments) {
        return Err(CargoLinkError::NotFound("assignment"));
    }
    let s = shipments
        .iter_mut()
        .find(|s| s.sid == a.sid)
        .ok_or_else(|| {
            error!("assignment {} points at missing shipment {}", a.asid, a.sid);
            CargoLinkError::Internal(String::from("dangling assignment"))
        })?;
    Ok((a, s))
}

fn require_carrier(scope: &Scope, a: &ShipmentAssignment) -> Result<(), CargoLinkError> {
    if !is_carrier_of(scope, a) {
        return Err(CargoLinkError::Forbidden(String::from(
            "only the assigned carrier can do this",
        )));
    }
    Ok(())
}

/// Move an accepted assignment and its shipment to `to`
fn advance(
    a: &mut ShipmentAssignment,
    s: &mut Shipment,
    to: AssignmentStatus,
    location: &str,
    note: &str,
    now: i64,
) -> Result<(), CargoLinkError> {
    if !can_transition(a.status, to) {
        return Err(CargoLinkError::Conflict(format!(
            "assignment can't move from {:?} to {:?}",
            a.status, to
        )));
    }
    let shipment_status = mirrored(to).ok_or_else(|| {
        CargoLinkError::Validation(format!("{:?} is not a carrier status update", to))
    })?;
    let location = if location.is_empty() {
        match to {
            AssignmentStatus::Delivered => s.destination.clone(),
            _ => s.origin.clone(),
        }
    } else {
        String::from(location)
    };
    a.status = to;
    s.push_event(shipment_status, &location, note, now);
    info!("assignment {} is now {:?}", a.asid, to);
    Ok(())
}

/// Pair a carrier with a pending shipment
pub fn create(
    store: &Store,
    principal: &Principal,
    r: &reqres::AssignmentRequest,
) -> Result<ShipmentAssignment, CargoLinkError> {
    let sid = utils::required(&r.sid, "sid")?;
    let cid = utils::required(&r.cid, "cid")?;
    let scope = Scope::of(store, principal)?;
    let m_carrier = carrier::find(store, &cid)?;
    let mut shipments = db::write(&store.shipments)?;
    let shipment = shipments
        .iter_mut()
        .find(|s| s.sid == sid && scope.can_see(s))
        .ok_or(CargoLinkError::NotFound("shipment"))?;
    if !scope.can_manage(shipment) {
        return Err(CargoLinkError::Forbidden(String::from(
            "only the shipper can assign a carrier",
        )));
    }
    if shipment.status != ShipmentStatus::Pending {
        return Err(CargoLinkError::Conflict(format!(
            "shipment is {:?}, only pending shipments can be assigned",
            shipment.status
        )));
    }
    if !m_carrier.supports(shipment.transport_mode) {
        return Err(CargoLinkError::Validation(format!(
            "{} does not offer {} transport",
            m_carrier.name, shipment.transport_mode
        )));
    }
    let mut assignments = db::write(&store.assignments)?;
    if assignments
        .iter()
        .any(|a| a.sid == sid && a.status.is_active())
    {
        return Err(CargoLinkError::Conflict(String::from(
            "shipment already has an active assignment",
        )));
    }
    let now = utils::now();
    let new_assignment = ShipmentAssignment {
        asid: utils::generate_id(crate::ASSIGNMENT_DB_KEY),
        sid: String::from(&sid),
        cid: String::from(&cid),
        status: AssignmentStatus::Pending,
        qr_token: utils::generate_rnd(),
        decline_reason: None,
        created: now,
        responded: None,
    };
    debug!("insert assignment: {:?}", &new_assignment.asid);
    assignments.push(new_assignment.clone());
    shipment.carrier_id = Some(cid);
    let origin = shipment.origin.clone();
    let note = format!("assigned to {}", m_carrier.name);
    shipment.push_event(ShipmentStatus::Assigned, &origin, &note, now);
    info!("assigned shipment {} to carrier {}", sid, m_carrier.cid);
    Ok(new_assignment)
}

/// Assignments visible to the caller
pub fn find_all(store: &Store, principal: &Principal) -> Result<Vec<ShipmentAssignment>, CargoLinkError> {
    let scope = Scope::of(store, principal)?;
    let shipments = db::read(&store.shipments)?;
    let assignments = db::read(&store.assignments)?;
    Ok(assignments
        .iter()
        .filter(|a| is_visible(&scope, a, &shipments))
        .cloned()
        .collect())
}

/// Assignment lookup
pub fn find(store: &Store, principal: &Principal, asid: &str) -> Result<ShipmentAssignment, CargoLinkError> {
    let scope = Scope::of(store, principal)?;
    let shipments = db::read(&store.shipments)?;
    let assignments = db::read(&store.assignments)?;
    assignments
        .iter()
        .find(|a| a.asid == asid && is_visible(&scope, a, &shipments))
        .cloned()
        .ok_or(CargoLinkError::NotFound("assignment"))
}

/// Carrier takes the job
pub fn accept(store: &Store, principal: &Principal, asid: &str) -> Result<ShipmentAssignment, CargoLinkError> {
    respond(store, principal, asid, None)
}

/// Carrier turns the job down. The shipment goes back to pending.
pub fn decline(
    store: &Store,
    principal: &Principal,
    asid: &str,
    r: &reqres::DeclineRequest,
) -> Result<ShipmentAssignment, CargoLinkError> {
    let reason = utils::optional(&r.reason);
    respond(store, principal, asid, Some(reason))
}

/// `decline_reason` of `None` accepts
fn respond(
    store: &Store,
    principal: &Principal,
    asid: &str,
    decline_reason: Option<String>,
) -> Result<ShipmentAssignment, CargoLinkError> {
    let scope = Scope::of(store, principal)?;
    let mut shipments = db::write(&store.shipments)?;
    let mut assignments = db::write(&store.assignments)?;
    let (a, s) = locate(&mut assignments, &mut shipments, &scope, asid)?;
    require_carrier(&scope, a)?;
    if a.status != AssignmentStatus::Pending {
        return Err(CargoLinkError::Conflict(format!(
            "assignment was already {:?}",
            a.status
        )));
    }
    let now = utils::now();
    a.responded = Some(now);
    let origin = s.origin.clone();
    match decline_reason {
        None => {
            a.status = AssignmentStatus::Accepted;
            s.push_event(ShipmentStatus::Assigned, &origin, "carrier accepted", now);
            info!("assignment {} accepted", asid);
        }
        Some(reason) => {
            a.status = AssignmentStatus::Declined;
            let note = if reason.is_empty() {
                String::from("carrier declined")
            } else {
                format!("carrier declined: {}", reason)
            };
            a.decline_reason = Some(reason).filter(|r| !r.is_empty());
            s.carrier_id = None;
            s.push_event(ShipmentStatus::Pending, &origin, &note, now);
            info!("assignment {} declined", asid);
        }
    }
    Ok(a.clone())
}

/// Carrier reported progress
pub fn update_status(
    store: &Store,
    principal: &Principal,
    asid: &str,
    r: &reqres::StatusUpdateRequest,
) -> Result<ShipmentAssignment, CargoLinkError> {
    let to = AssignmentStatus::from_str(&utils::required(&r.status, "status")?)?;
    let location = utils::optional(&r.location);
    let note = utils::optional(&r.note);
    let scope = Scope::of(store, principal)?;
    let mut shipments = db::write(&store.shipments)?;
    let mut assignments = db::write(&store.assignments)?;
    let (a, s) = locate(&mut assignments, &mut shipments, &scope, asid)?;
    require_carrier(&scope, a)?;
    advance(a, s, to, &location, &note, utils::now())?;
    Ok(a.clone())
}

/// Text encoded in the assignment's QR code. Shipper or admin only.
pub fn qr_payload(store: &Store, principal: &Principal, asid: &str) -> Result<String, CargoLinkError> {
    let scope = Scope::of(store, principal)?;
    let shipments = db::read(&store.shipments)?;
    let assignments = db::read(&store.assignments)?;
    let a = assignments
        .iter()
        .find(|a| a.asid == asid && is_visible(&scope, a, &shipments))
        .ok_or(CargoLinkError::NotFound("assignment"))?;
    let owner = shipments
        .iter()
        .any(|s| s.sid == a.sid && scope.can_manage(s));
    if !owner {
        return Err(CargoLinkError::Forbidden(String::from(
            "only the shipper can print the qr code",
        )));
    }
    let payload = reqres::QrPayload {
        asid: String::from(&a.asid),
        sid: String::from(&a.sid),
        token: String::from(&a.qr_token),
    };
    serde_json::to_string(&payload).map_err(|e| {
        error!("failed to encode qr payload: {:?}", e);
        CargoLinkError::Internal(String::from("qr payload encoding failed"))
    })
}

/// The assignment's QR code as an SVG document
pub fn qr_svg(store: &Store, principal: &Principal, asid: &str) -> Result<String, CargoLinkError> {
    let payload = qr_payload(store, principal, asid)?;
    let code = QrCode::new(payload.as_bytes()).map_err(|e| {
        error!("failed to render qr code: {:?}", e);
        CargoLinkError::Internal(String::from("qr rendering failed"))
    })?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .build())
}

/// Handle a scanned QR code: pickup when accepted, delivery once moving
pub fn scan(
    store: &Store,
    principal: &Principal,
    r: &reqres::ScanRequest,
) -> Result<reqres::ScanResponse, CargoLinkError> {
    let raw = utils::required(&r.payload, "payload")?;
    let payload: reqres::QrPayload = serde_json::from_str(&raw)
        .map_err(|_| CargoLinkError::Validation(String::from("invalid qr payload")))?;
    let location = utils::optional(&r.location);
    let scope = Scope::of(store, principal)?;
    let mut shipments = db::write(&store.shipments)?;
    let mut assignments = db::write(&store.assignments)?;
    let (a, s) = locate(&mut assignments, &mut shipments, &scope, &payload.asid)?;
    require_carrier(&scope, a)?;
    if a.qr_token != payload.token || a.sid != payload.sid {
        error!("qr token mismatch for assignment {}", a.asid);
        return Err(CargoLinkError::Forbidden(String::from(
            "qr code does not match this assignment",
        )));
    }
    let (action, to, note) = match a.status {
        AssignmentStatus::Accepted => (
            reqres::ScanAction::Pickup,
            AssignmentStatus::PickedUp,
            "picked up (qr scan)",
        ),
        AssignmentStatus::PickedUp | AssignmentStatus::InTransit => (
            reqres::ScanAction::Delivery,
            AssignmentStatus::Delivered,
            "delivered (qr scan)",
        ),
        other => {
            return Err(CargoLinkError::Conflict(format!(
                "nothing to scan for a {:?} assignment",
                other
            )))
        }
    };
    advance(a, s, to, &location, note, utils::now())?;
    Ok(reqres::ScanResponse {
        action,
        assignment: a.clone(),
        shipment_status: s.status,
    })
}

// Tests
//-------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::AuthMethod,
        shipment,
    };

    const SHIPPER: &str = "u-shipper";
    const OTHER_SHIPPER: &str = "u-other";
    const DRIVER: &str = "u-driver";
    const AIR_DRIVER: &str = "u-air";

    fn principal(uid: &str, role: Role) -> Principal {
        Principal {
            uid: String::from(uid),
            role,
            method: AuthMethod::Bearer,
        }
    }

    fn shipper() -> Principal {
        principal(SHIPPER, Role::Shipper)
    }

    fn driver() -> Principal {
        principal(DRIVER, Role::Carrier)
    }

    /// Store with two shippers, a road carrier and an air carrier
    fn setup() -> Result<(Store, Shipment), CargoLinkError> {
        let store = Store::new(String::new());
        {
            let mut users = db::write(&store.users)?;
            let mut carriers = db::write(&store.carriers)?;
            for (uid, role, cid, mode) in [
                (SHIPPER, Role::Shipper, None, None),
                (OTHER_SHIPPER, Role::Shipper, None, None),
                (DRIVER, Role::Carrier, Some("c-road"), Some(TransportMode::Road)),
                (AIR_DRIVER, Role::Carrier, Some("c-air"), Some(TransportMode::Air)),
            ] {
                users.push(User {
                    uid: String::from(uid),
                    role,
                    carrier_id: cid.map(String::from),
                    ..Default::default()
                });
                if let (Some(cid), Some(mode)) = (cid, mode) {
                    carriers.push(Carrier {
                        cid: String::from(cid),
                        name: String::from(cid),
                        transport_modes: vec![mode],
                        ..Default::default()
                    });
                }
            }
        }
        let r = reqres::ShipmentRequest {
            origin: Some(String::from("Nairobi")),
            destination: Some(String::from("Kampala")),
            weight_kg: Some(250.0),
            ..Default::default()
        };
        let s = shipment::create(&store, &shipper(), &r)?;
        Ok((store, s))
    }

    fn assign(store: &Store, sid: &str, cid: &str) -> Result<ShipmentAssignment, CargoLinkError> {
        let r = reqres::AssignmentRequest {
            sid: Some(String::from(sid)),
            cid: Some(String::from(cid)),
        };
        create(store, &shipper(), &r)
    }

    fn scan_with(store: &Store, payload: &str) -> Result<reqres::ScanResponse, CargoLinkError> {
        let r = reqres::ScanRequest {
            payload: Some(String::from(payload)),
            location: None,
        };
        scan(store, &driver(), &r)
    }

    #[test]
    fn create_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        let a = assign(&store, &s.sid, "c-road")?;
        assert_eq!(a.status, AssignmentStatus::Pending);
        assert!(!a.qr_token.is_empty());
        let m_shipment = shipment::find(&store, &driver(), &s.sid)?;
        assert_eq!(m_shipment.status, ShipmentStatus::Assigned);
        assert_eq!(m_shipment.carrier_id.as_deref(), Some("c-road"));
        // a second carrier can't be assigned while the first holds it
        let again = assign(&store, &s.sid, "c-road");
        assert!(matches!(again, Err(CargoLinkError::Conflict(_))));
        Ok(())
    }

    #[test]
    fn create_validation_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        assert!(matches!(
            assign(&store, &s.sid, "c-air"),
            Err(CargoLinkError::Validation(_))
        ));
        assert_eq!(
            assign(&store, &s.sid, "c-missing").err(),
            Some(CargoLinkError::NotFound("carrier"))
        );
        let r = reqres::AssignmentRequest {
            sid: Some(String::from(&s.sid)),
            cid: Some(String::from("c-road")),
        };
        assert_eq!(
            create(&store, &principal(OTHER_SHIPPER, Role::Shipper), &r).err(),
            Some(CargoLinkError::NotFound("shipment"))
        );
        assert_eq!(
            create(&store, &shipper(), &reqres::AssignmentRequest::default()).err(),
            Some(CargoLinkError::missing("sid"))
        );
        Ok(())
    }

    #[test]
    fn accept_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        let a = assign(&store, &s.sid, "c-road")?;
        // only the assigned carrier may answer
        assert!(matches!(
            accept(&store, &shipper(), &a.asid),
            Err(CargoLinkError::Forbidden(_))
        ));
        assert_eq!(
            accept(&store, &principal(AIR_DRIVER, Role::Carrier), &a.asid).err(),
            Some(CargoLinkError::NotFound("assignment"))
        );
        let accepted = accept(&store, &driver(), &a.asid)?;
        assert_eq!(accepted.status, AssignmentStatus::Accepted);
        assert!(accepted.responded.is_some());
        assert!(matches!(
            accept(&store, &driver(), &a.asid),
            Err(CargoLinkError::Conflict(_))
        ));
        Ok(())
    }

    #[test]
    fn decline_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        let a = assign(&store, &s.sid, "c-road")?;
        let r = reqres::DeclineRequest {
            reason: Some(String::from("no trucks this week")),
        };
        let declined = decline(&store, &driver(), &a.asid, &r)?;
        assert_eq!(declined.status, AssignmentStatus::Declined);
        assert_eq!(declined.decline_reason.as_deref(), Some("no trucks this week"));
        let m_shipment = shipment::find(&store, &shipper(), &s.sid)?;
        assert_eq!(m_shipment.status, ShipmentStatus::Pending);
        assert!(m_shipment.carrier_id.is_none());
        // the shipment can be offered again
        assert!(assign(&store, &s.sid, "c-road").is_ok());
        Ok(())
    }

    #[test]
    fn cancel_cascade_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        let a = assign(&store, &s.sid, "c-road")?;
        let cancelled = shipment::cancel(&store, &shipper(), &s.sid)?;
        assert_eq!(cancelled.status, ShipmentStatus::Cancelled);
        assert!(cancelled.carrier_id.is_none());
        let m_assignment = find(&store, &driver(), &a.asid)?;
        assert_eq!(m_assignment.status, AssignmentStatus::Cancelled);
        assert!(matches!(
            accept(&store, &driver(), &a.asid),
            Err(CargoLinkError::Conflict(_))
        ));
        Ok(())
    }

    #[test]
    fn cancel_after_pickup_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        let a = assign(&store, &s.sid, "c-road")?;
        accept(&store, &driver(), &a.asid)?;
        let r = reqres::StatusUpdateRequest {
            status: Some(String::from("picked_up")),
            ..Default::default()
        };
        update_status(&store, &driver(), &a.asid, &r)?;
        assert!(matches!(
            shipment::cancel(&store, &shipper(), &s.sid),
            Err(CargoLinkError::Conflict(_))
        ));
        assert_eq!(find(&store, &shipper(), &a.asid)?.status, AssignmentStatus::PickedUp);
        Ok(())
    }

    #[test]
    fn transition_test() {
        use AssignmentStatus::*;
        assert!(can_transition(Accepted, PickedUp));
        assert!(can_transition(InTransit, InTransit));
        assert!(can_transition(PickedUp, Delivered));
        assert!(!can_transition(Pending, PickedUp));
        assert!(!can_transition(Accepted, Delivered));
        assert!(!can_transition(Delivered, InTransit));
        assert!(!can_transition(Declined, Accepted));
    }

    #[test]
    fn update_status_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        let a = assign(&store, &s.sid, "c-road")?;
        let update = |status: &str, location: &str| reqres::StatusUpdateRequest {
            status: Some(String::from(status)),
            location: Some(String::from(location)),
            note: None,
        };
        // pending assignments can't move yet
        assert!(matches!(
            update_status(&store, &driver(), &a.asid, &update("picked_up", "")),
            Err(CargoLinkError::Conflict(_))
        ));
        accept(&store, &driver(), &a.asid)?;
        update_status(&store, &driver(), &a.asid, &update("picked_up", ""))?;
        update_status(&store, &driver(), &a.asid, &update("in_transit", "Busia border"))?;
        update_status(&store, &driver(), &a.asid, &update("in_transit", "Jinja"))?;
        let done = update_status(&store, &driver(), &a.asid, &update("delivered", ""))?;
        assert_eq!(done.status, AssignmentStatus::Delivered);
        let t = shipment::track(&store, &s.tracking_number)?;
        assert_eq!(t.status, ShipmentStatus::Delivered);
        assert_eq!(t.carrier_name.as_deref(), Some("c-road"));
        let last = t.events.last().map(|e| e.location.clone());
        assert_eq!(last.as_deref(), Some("Kampala"));
        assert!(t.events.iter().any(|e| e.location == "Busia border"));
        assert!(matches!(
            update_status(&store, &driver(), &a.asid, &update("accepted", "")),
            Err(CargoLinkError::Conflict(_))
        ));
        Ok(())
    }

    #[test]
    fn qr_scan_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        let a = assign(&store, &s.sid, "c-road")?;
        let payload = qr_payload(&store, &shipper(), &a.asid)?;
        // nothing to pick up before the carrier accepts
        assert!(matches!(
            scan_with(&store, &payload),
            Err(CargoLinkError::Conflict(_))
        ));
        accept(&store, &driver(), &a.asid)?;
        let pickup = scan_with(&store, &payload)?;
        assert_eq!(pickup.action, reqres::ScanAction::Pickup);
        assert_eq!(pickup.shipment_status, ShipmentStatus::PickedUp);
        let delivery = scan_with(&store, &payload)?;
        assert_eq!(delivery.action, reqres::ScanAction::Delivery);
        assert_eq!(delivery.shipment_status, ShipmentStatus::Delivered);
        assert!(matches!(
            scan_with(&store, &payload),
            Err(CargoLinkError::Conflict(_))
        ));
        Ok(())
    }

    #[test]
    fn qr_forged_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        let a = assign(&store, &s.sid, "c-road")?;
        accept(&store, &driver(), &a.asid)?;
        let forged = serde_json::to_string(&reqres::QrPayload {
            asid: String::from(&a.asid),
            sid: String::from(&s.sid),
            token: utils::generate_rnd(),
        })
        .map_err(|_| CargoLinkError::Internal(String::new()))?;
        assert!(matches!(
            scan_with(&store, &forged),
            Err(CargoLinkError::Forbidden(_))
        ));
        assert!(matches!(
            scan_with(&store, "not json"),
            Err(CargoLinkError::Validation(_))
        ));
        Ok(())
    }

    #[test]
    fn qr_svg_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        let a = assign(&store, &s.sid, "c-road")?;
        let svg = qr_svg(&store, &shipper(), &a.asid)?;
        assert!(svg.contains("<svg"));
        // the carrier scans the code, it doesn't print it
        assert!(matches!(
            qr_payload(&store, &driver(), &a.asid),
            Err(CargoLinkError::Forbidden(_))
        ));
        Ok(())
    }

    #[test]
    fn find_all_test() -> Result<(), CargoLinkError> {
        let (store, s) = setup()?;
        assign(&store, &s.sid, "c-road")?;
        assert_eq!(find_all(&store, &shipper())?.len(), 1);
        assert_eq!(find_all(&store, &driver())?.len(), 1);
        assert!(find_all(&store, &principal(AIR_DRIVER, Role::Carrier))?.is_empty());
        assert!(find_all(&store, &principal(OTHER_SHIPPER, Role::Shipper))?.is_empty());
        Ok(())
    }
}
