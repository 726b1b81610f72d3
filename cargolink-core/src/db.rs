#![deny(missing_docs)]

//! In-memory storage. Every collection lives in process memory and is
//! discarded when the server stops.
//!
//! Operations touching more than one collection must take the locks in
//! field order: users, carriers, shipments, api_keys, assignments.

use log::{
    error,
    info,
};
use std::sync::{
    RwLock,
    RwLockReadGuard,
    RwLockWriteGuard,
};

use crate::{
    error::CargoLinkError,
    models::*,
};

/// Shared state handed to rocket as managed state.
pub struct Store {
    /// Registered accounts
    pub users: RwLock<Vec<User>>,
    /// Carrier listings
    pub carriers: RwLock<Vec<Carrier>>,
    /// Shipments and their tracking history
    pub shipments: RwLock<Vec<Shipment>>,
    /// Hashed api keys
    pub api_keys: RwLock<Vec<ApiKeyRecord>>,
    /// Carrier to shipment pairings
    pub assignments: RwLock<Vec<ShipmentAssignment>>,
    jwt_secret_key: String,
}

impl Store {
    /// Empty store signing tokens with `jwt_secret_key`
    pub fn new(jwt_secret_key: String) -> Self {
        info!("opening in-memory store");
        Store {
            users: RwLock::new(Vec::new()),
            carriers: RwLock::new(Vec::new()),
            shipments: RwLock::new(Vec::new()),
            api_keys: RwLock::new(Vec::new()),
            assignments: RwLock::new(Vec::new()),
            jwt_secret_key,
        }
    }

    /// Secret for signing session tokens
    pub fn jwt_secret_key(&self) -> &str {
        &self.jwt_secret_key
    }
}

/// Acquire a read guard, reporting a poisoned lock as an internal error
pub fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, CargoLinkError> {
    lock.read().map_err(|_| {
        error!("failed to acquire read lock");
        CargoLinkError::Internal(String::from("poisoned read lock"))
    })
}

/// Acquire a write guard, reporting a poisoned lock as an internal error
pub fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, CargoLinkError> {
    lock.write().map_err(|_| {
        error!("failed to acquire write lock");
        CargoLinkError::Internal(String::from("poisoned write lock"))
    })
}
