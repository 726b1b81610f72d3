//! Api keys for shipper integrations. Only a digest of each key is kept.

use crate::{
    auth::{
        AuthMethod,
        Principal,
    },
    db::{
        self,
        Store,
    },
    error::CargoLinkError,
    models::*,
    reqres,
    utils,
};
use log::{
    debug,
    error,
    info,
};
use rocket::{
    http::Status,
    outcome::Outcome,
    request,
    request::FromRequest,
    Request,
};
use sha2::{
    Digest,
    Sha256,
};

/// Characters of the plaintext key kept for display
const DISPLAY_PREFIX_LENGTH: usize = 12;

fn hash_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Create a new api key for the caller. The plaintext key is returned once.
pub fn create(
    store: &Store,
    principal: &Principal,
    r: &reqres::ApiKeyRequest,
) -> Result<reqres::ApiKeyCreated, CargoLinkError> {
    if principal.method != AuthMethod::Bearer {
        return Err(CargoLinkError::Forbidden(String::from(
            "api keys can only be managed with a session token",
        )));
    }
    let name = utils::required(&r.name, "name")?;
    let key = format!("{}{}", crate::API_KEY_PREFIX, utils::generate_rnd());
    let mut keys = db::write(&store.api_keys)?;
    let active = keys
        .iter()
        .filter(|k| k.uid == principal.uid && !k.revoked)
        .count();
    if active >= crate::MAX_API_KEYS_PER_USER {
        return Err(CargoLinkError::Conflict(format!(
            "at most {} active api keys are allowed",
            crate::MAX_API_KEYS_PER_USER
        )));
    }
    let record = ApiKeyRecord {
        kid: utils::generate_id(crate::API_KEY_DB_KEY),
        name,
        prefix: key.chars().take(DISPLAY_PREFIX_LENGTH).collect(),
        key_hash: hash_key(&key),
        uid: String::from(&principal.uid),
        created: utils::now(),
        last_used: None,
        revoked: false,
    };
    info!("created api key {} for {}", record.kid, record.uid);
    keys.push(record.clone());
    Ok(reqres::ApiKeyCreated { key, record })
}

/// Keys owned by the caller, all keys for admins
pub fn find_all(store: &Store, principal: &Principal) -> Result<Vec<ApiKeyRecord>, CargoLinkError> {
    let keys = db::read(&store.api_keys)?;
    Ok(keys
        .iter()
        .filter(|k| principal.is_admin() || k.uid == principal.uid)
        .cloned()
        .collect())
}

/// Revoke a key. Revoking twice is harmless.
pub fn revoke(store: &Store, principal: &Principal, kid: &str) -> Result<ApiKeyRecord, CargoLinkError> {
    let mut keys = db::write(&store.api_keys)?;
    let record = keys
        .iter_mut()
        .find(|k| k.kid == kid && (principal.is_admin() || k.uid == principal.uid))
        .ok_or(CargoLinkError::NotFound("api key"))?;
    record.revoked = true;
    info!("revoked api key {}", kid);
    Ok(record.clone())
}

/// Resolve a plaintext key to its owner, recording the use
pub fn authenticate(store: &Store, key: &str) -> Result<Principal, ApiKeyError> {
    let hash = hash_key(key);
    let uid = {
        let mut keys = db::write(&store.api_keys).map_err(|_| ApiKeyError::Invalid)?;
        let record = keys
            .iter_mut()
            .find(|k| k.key_hash == hash)
            .ok_or(ApiKeyError::Invalid)?;
        if record.revoked {
            debug!("revoked api key {} used", record.kid);
            return Err(ApiKeyError::Revoked);
        }
        record.last_used = Some(utils::now());
        String::from(&record.uid)
    };
    let users = db::read(&store.users).map_err(|_| ApiKeyError::Invalid)?;
    let owner = users
        .iter()
        .find(|u| u.uid == uid)
        .ok_or(ApiKeyError::Invalid)?;
    Ok(Principal {
        uid,
        role: owner.role,
        method: AuthMethod::ApiKey,
    })
}

/// Api key from the `x-api-key` header
#[derive(Debug)]
pub struct ApiKeyAuth(Principal);

impl ApiKeyAuth {
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

#[derive(Debug, PartialEq)]
pub enum ApiKeyError {
    Missing,
    Invalid,
    Revoked,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ApiKeyAuth {
    type Error = ApiKeyError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let store = match request.rocket().state::<Store>() {
            Some(s) => s,
            None => {
                error!("store is not managed");
                return Outcome::Error((Status::InternalServerError, ApiKeyError::Invalid));
            }
        };
        match request.headers().get_one(crate::API_KEY_HEADER) {
            Some(key) => match authenticate(store, key.trim()) {
                Ok(p) => Outcome::Success(ApiKeyAuth(p)),
                Err(e) => Outcome::Error((Status::Unauthorized, e)),
            },
            None => Outcome::Error((Status::Unauthorized, ApiKeyError::Missing)),
        }
    }
}

// Tests
//-------------------------------------------------------------------------------
