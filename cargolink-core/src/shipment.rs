//! Shipment logic module

use crate::{
    auth::Principal,
    db::{
        self,
        Store,
    },
    error::CargoLinkError,
    models::*,
    rate,
    reqres,
    user,
    utils,
};
use log::{
    debug,
    info,
};
use std::str::FromStr;

const TRACKING_NUMBER_LENGTH: usize = 10;

/// What part of the shipment list a caller may see
#[derive(Debug)]
pub struct Scope {
    uid: String,
    admin: bool,
    carrier_id: Option<String>,
}

impl Scope {
    pub fn of(store: &Store, principal: &Principal) -> Result<Self, CargoLinkError> {
        Ok(Scope {
            uid: String::from(&principal.uid),
            admin: principal.is_admin(),
            carrier_id: user::carrier_of(store, principal)?,
        })
    }

    /// Shipper that owns it, its assigned carrier or an admin
    pub fn can_see(&self, s: &Shipment) -> bool {
        self.admin
            || s.uid == self.uid
            || (self.carrier_id.is_some() && s.carrier_id == self.carrier_id)
    }

    /// Shipper that owns it or an admin
    pub fn can_manage(&self, s: &Shipment) -> bool {
        self.admin || s.uid == self.uid
    }

    /// Carrier the caller operates
    pub fn carrier_id(&self) -> Option<&str> {
        self.carrier_id.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

fn generate_tracking_number() -> String {
    let rnd: String = utils::generate_rnd()
        .chars()
        .take(TRACKING_NUMBER_LENGTH)
        .collect();
    format!("{}{}", crate::TRACKING_NUMBER_PREFIX, rnd.to_uppercase())
}

/// Create a shipment for the caller, priced by the rate calculator
pub fn create(
    store: &Store,
    principal: &Principal,
    r: &reqres::ShipmentRequest,
) -> Result<Shipment, CargoLinkError> {
    if principal.role == Role::Carrier {
        return Err(CargoLinkError::Forbidden(String::from(
            "carriers cannot create shipments",
        )));
    }
    let origin = utils::required(&r.origin, "origin")?;
    let destination = utils::required(&r.destination, "destination")?;
    let weight_kg = r.weight_kg.ok_or(CargoLinkError::missing("weight_kg"))?;
    let mode = match r.transport_mode.as_deref() {
        Some(m) if !m.trim().is_empty() => TransportMode::from_str(m)?,
        _ => TransportMode::Road,
    };
    let quote = rate::quote(&origin, &destination, weight_kg, mode)?;
    let now = utils::now();
    let mut new_shipment = Shipment {
        sid: utils::generate_id(crate::SHIPMENT_DB_KEY),
        tracking_number: generate_tracking_number(),
        uid: String::from(&principal.uid),
        origin,
        destination,
        weight_kg: quote.weight_kg,
        transport_mode: mode,
        description: utils::optional(&r.description),
        status: ShipmentStatus::Pending,
        carrier_id: None,
        estimated_cost: quote.total,
        transit_days: quote.transit_days,
        created: now,
        updated: now,
        events: Vec::new(),
    };
    let origin = new_shipment.origin.clone();
    new_shipment.push_event(ShipmentStatus::Pending, &origin, "shipment created", now);
    debug!("insert shipment: {:?}", &new_shipment);
    db::write(&store.shipments)?.push(new_shipment.clone());
    info!(
        "created shipment {} ({})",
        new_shipment.sid, new_shipment.tracking_number
    );
    Ok(new_shipment)
}

/// Shipments visible to the caller, optionally filtered by status
pub fn find_all(
    store: &Store,
    principal: &Principal,
    status: Option<&str>,
) -> Result<Vec<Shipment>, CargoLinkError> {
    let status = match status {
        Some(s) if !s.trim().is_empty() => Some(ShipmentStatus::from_str(s)?),
        _ => None,
    };
    let scope = Scope::of(store, principal)?;
    let shipments = db::read(&store.shipments)?;
    Ok(shipments
        .iter()
        .filter(|s| scope.can_see(s) && status.map_or(true, |st| s.status == st))
        .cloned()
        .collect())
}

/// Shipment lookup. Shipments the caller can't see are reported missing.
pub fn find(store: &Store, principal: &Principal, sid: &str) -> Result<Shipment, CargoLinkError> {
    let scope = Scope::of(store, principal)?;
    let shipments = db::read(&store.shipments)?;
    shipments
        .iter()
        .find(|s| s.sid == sid && scope.can_see(s))
        .cloned()
        .ok_or(CargoLinkError::NotFound("shipment"))
}

/// Cancel a shipment that hasn't been picked up yet
pub fn cancel(store: &Store, principal: &Principal, sid: &str) -> Result<Shipment, CargoLinkError> {
    let scope = Scope::of(store, principal)?;
    let mut shipments = db::write(&store.shipments)?;
    let shipment = shipments
        .iter_mut()
        .find(|s| s.sid == sid && scope.can_see(s))
        .ok_or(CargoLinkError::NotFound("shipment"))?;
    if !scope.can_manage(shipment) {
        return Err(CargoLinkError::Forbidden(String::from(
            "only the shipper can cancel a shipment",
        )));
    }
    if !matches!(
        shipment.status,
        ShipmentStatus::Pending | ShipmentStatus::Assigned
    ) {
        return Err(CargoLinkError::Conflict(format!(
            "shipment can't be cancelled once {:?}",
            shipment.status
        )));
    }
    let now = utils::now();
    {
        let mut assignments = db::write(&store.assignments)?;
        for a in assignments
            .iter_mut()
            .filter(|a| a.sid == sid && a.status.is_active())
        {
            a.status = AssignmentStatus::Cancelled;
            a.responded = Some(now);
        }
    }
    shipment.carrier_id = None;
    let origin = shipment.origin.clone();
    shipment.push_event(ShipmentStatus::Cancelled, &origin, "cancelled by shipper", now);
    info!("cancelled shipment {}", sid);
    Ok(shipment.clone())
}

/// Public tracking lookup
pub fn track(store: &Store, tracking_number: &str) -> Result<reqres::TrackingResponse, CargoLinkError> {
    let tracking_number = tracking_number.trim().to_uppercase();
    let shipment = {
        let shipments = db::read(&store.shipments)?;
        shipments
            .iter()
            .find(|s| s.tracking_number == tracking_number)
            .cloned()
            .ok_or(CargoLinkError::NotFound("shipment"))?
    };
    let carrier_name = match &shipment.carrier_id {
        Some(cid) => {
            let carriers = db::read(&store.carriers)?;
            carriers.iter().find(|c| &c.cid == cid).map(|c| c.name.clone())
        }
        None => None,
    };
    Ok(reqres::TrackingResponse {
        tracking_number: shipment.tracking_number,
        status: shipment.status,
        origin: shipment.origin,
        destination: shipment.destination,
        transport_mode: shipment.transport_mode,
        carrier_name,
        estimated_delivery: shipment.created
            + shipment.transit_days as i64 * crate::SECONDS_PER_DAY,
        events: shipment.events,
    })
}

// Tests
//-------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthMethod;

    fn principal(uid: &str, role: Role) -> Principal {
        Principal {
            uid: String::from(uid),
            role,
            method: AuthMethod::Bearer,
        }
    }

    fn request() -> reqres::ShipmentRequest {
        reqres::ShipmentRequest {
            origin: Some(String::from("Lagos")),
            destination: Some(String::from("Accra")),
            weight_kg: Some(10.0),
            transport_mode: None,
            description: Some(String::from("bolts of ankara fabric")),
        }
    }

    fn store() -> Result<Store, CargoLinkError> {
        let store = Store::new(String::new());
        let mut users = db::write(&store.users)?;
        for (uid, role) in [("u1", Role::Shipper), ("u2", Role::Shipper), ("u9", Role::Admin)] {
            users.push(User {
                uid: String::from(uid),
                role,
                ..Default::default()
            });
        }
        drop(users);
        Ok(store)
    }

    #[test]
    fn create_test() -> Result<(), CargoLinkError> {
        let store = store()?;
        let s = create(&store, &principal("u1", Role::Shipper), &request())?;
        assert!(s.tracking_number.starts_with(crate::TRACKING_NUMBER_PREFIX));
        assert_eq!(s.tracking_number.len(), 12);
        assert_eq!(s.status, ShipmentStatus::Pending);
        assert_eq!(s.transport_mode, TransportMode::Road);
        assert_eq!(s.estimated_cost, 201.0);
        assert_eq!(s.events.len(), 1);
        Ok(())
    }

    #[test]
    fn create_validation_test() -> Result<(), CargoLinkError> {
        let store = store()?;
        let r = reqres::ShipmentRequest {
            destination: None,
            ..request()
        };
        assert_eq!(
            create(&store, &principal("u1", Role::Shipper), &r).err(),
            Some(CargoLinkError::missing("destination"))
        );
        let r = create(&store, &principal("u5", Role::Carrier), &request());
        assert!(matches!(r, Err(CargoLinkError::Forbidden(_))));
        Ok(())
    }

    #[test]
    fn visibility_test() -> Result<(), CargoLinkError> {
        let store = store()?;
        let s = create(&store, &principal("u1", Role::Shipper), &request())?;
        create(&store, &principal("u2", Role::Shipper), &request())?;
        assert_eq!(find_all(&store, &principal("u1", Role::Shipper), None)?.len(), 1);
        assert_eq!(find_all(&store, &principal("u9", Role::Admin), None)?.len(), 2);
        assert_eq!(
            find_all(&store, &principal("u9", Role::Admin), Some("delivered"))?.len(),
            0
        );
        assert_eq!(
            find(&store, &principal("u2", Role::Shipper), &s.sid).err(),
            Some(CargoLinkError::NotFound("shipment"))
        );
        assert_eq!(find(&store, &principal("u1", Role::Shipper), &s.sid)?.sid, s.sid);
        Ok(())
    }

    #[test]
    fn cancel_test() -> Result<(), CargoLinkError> {
        let store = store()?;
        let s = create(&store, &principal("u1", Role::Shipper), &request())?;
        assert!(cancel(&store, &principal("u2", Role::Shipper), &s.sid).is_err());
        let c = cancel(&store, &principal("u1", Role::Shipper), &s.sid)?;
        assert_eq!(c.status, ShipmentStatus::Cancelled);
        assert_eq!(c.events.len(), 2);
        let again = cancel(&store, &principal("u1", Role::Shipper), &s.sid);
        assert!(matches!(again, Err(CargoLinkError::Conflict(_))));
        Ok(())
    }

    #[test]
    fn track_test() -> Result<(), CargoLinkError> {
        let store = store()?;
        let s = create(&store, &principal("u1", Role::Shipper), &request())?;
        let t = track(&store, &s.tracking_number.to_lowercase())?;
        assert_eq!(t.status, ShipmentStatus::Pending);
        assert_eq!(t.estimated_delivery, s.created + crate::SECONDS_PER_DAY);
        assert!(t.carrier_name.is_none());
        assert_eq!(
            track(&store, "CL0000000000").err(),
            Some(CargoLinkError::NotFound("shipment"))
        );
        Ok(())
    }
}
