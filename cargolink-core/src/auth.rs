//! Internal authorization module that uses JWTs

use crate::{
    api_key,
    db::Store,
    error::CargoLinkError,
    models::*,
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

use hmac::{
    Hmac,
    Mac,
};
use jwt::*;
use sha2::{
    Digest,
    Sha256,
    Sha384,
};
use std::{
    collections::BTreeMap,
    str::FromStr,
};

const SALT_LENGTH: usize = 16;
const CLAIM_UID: &str = "uid";
const CLAIM_ROLE: &str = "role";
const CLAIM_EXPIRATION: &str = "expiration";

/// Salted digest of a password, stored as `salt$hex`
pub fn hash_password(password: &str) -> String {
    let salt: String = utils::generate_rnd().chars().take(SALT_LENGTH).collect();
    format!("{}${}", salt, digest_password(&salt, password))
}

/// Check a password against the stored `salt$hex` value
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hash)) => {
            constant_time_eq(digest_password(salt, password).as_bytes(), hash.as_bytes())
        }
        None => false,
    }
}

/// Compare without exiting early on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn signing_key(secret: &str) -> Result<Hmac<Sha384>, CargoLinkError> {
    Hmac::new_from_slice(secret.as_bytes()).map_err(|_| {
        error!("invalid jwt secret key");
        CargoLinkError::Internal(String::from("invalid jwt secret key"))
    })
}

/// Sign a session token for `user` valid until `expiration`
pub fn create_token(secret: &str, user: &User, expiration: i64) -> Result<String, CargoLinkError> {
    let key = signing_key(secret)?;
    let header = Header {
        algorithm: AlgorithmType::Hs384,
        ..Default::default()
    };
    let mut claims = BTreeMap::new();
    claims.insert(CLAIM_UID, user.uid.clone());
    claims.insert(CLAIM_ROLE, format!("{:?}", user.role).to_lowercase());
    claims.insert(CLAIM_EXPIRATION, expiration.to_string());
    let token = Token::new(header, claims).sign_with_key(&key).map_err(|e| {
        error!("failed to sign token: {:?}", e);
        CargoLinkError::Internal(String::from("token signing failed"))
    })?;
    Ok(String::from(token.as_str()))
}

/// Verify signature and expiration of a session token
pub fn verify_token(secret: &str, token: &str, now: i64) -> Result<Principal, BearerTokenError> {
    let key = signing_key(secret).map_err(|_| BearerTokenError::Invalid)?;
    let claims: BTreeMap<String, String> = token
        .verify_with_key(&key)
        .map_err(|_| BearerTokenError::Invalid)?;
    let expire = claims
        .get(CLAIM_EXPIRATION)
        .and_then(|e| e.parse::<i64>().ok())
        .unwrap_or(0);
    if now > expire {
        return Err(BearerTokenError::Expired);
    }
    let uid = claims.get(CLAIM_UID).cloned().unwrap_or_default();
    let role = claims
        .get(CLAIM_ROLE)
        .and_then(|r| Role::from_str(r).ok())
        .ok_or(BearerTokenError::Invalid)?;
    if uid.is_empty() {
        return Err(BearerTokenError::Invalid);
    }
    debug!("claim uid: {}", uid);
    Ok(Principal {
        uid,
        role,
        method: AuthMethod::Bearer,
    })
}

/// How a request was authenticated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMethod {
    Bearer,
    ApiKey,
}

/// The authenticated caller handed to the services
#[derive(Clone, Debug, PartialEq)]
pub struct Principal {
    pub uid: String,
    pub role: Role,
    pub method: AuthMethod,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Session token from `Authorization: Bearer <jwt>`
#[derive(Debug)]
pub struct BearerToken(Principal);

impl BearerToken {
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

#[derive(Debug, PartialEq)]
pub enum BearerTokenError {
    Expired,
    Missing,
    Invalid,
}

fn bearer_value<'r>(request: &'r Request<'_>) -> Option<&'r str> {
    request
        .headers()
        .get_one("Authorization")
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = BearerTokenError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let store = match request.rocket().state::<Store>() {
            Some(s) => s,
            None => {
                error!("store is not managed");
                return Outcome::Error((Status::InternalServerError, BearerTokenError::Invalid));
            }
        };
        match bearer_value(request) {
            Some(token) => match verify_token(store.jwt_secret_key(), token, utils::now()) {
                Ok(p) => Outcome::Success(BearerToken(p)),
                Err(e) => {
                    info!("rejected bearer token: {:?}", e);
                    Outcome::Error((Status::Unauthorized, e))
                }
            },
            None => Outcome::Error((Status::Unauthorized, BearerTokenError::Missing)),
        }
    }
}

/// Either a session token or an api key. The session token wins when both are sent.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for Principal {
    type Error = BearerTokenError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match request.guard::<BearerToken>().await {
            Outcome::Success(t) => Outcome::Success(t.0),
            Outcome::Error((_, BearerTokenError::Missing)) => {
                match request.guard::<api_key::ApiKeyAuth>().await {
                    Outcome::Success(k) => Outcome::Success(k.principal().clone()),
                    Outcome::Error((s, api_key::ApiKeyError::Missing)) => {
                        Outcome::Error((s, BearerTokenError::Missing))
                    }
                    Outcome::Error((s, _)) => Outcome::Error((s, BearerTokenError::Invalid)),
                    Outcome::Forward(s) => Outcome::Forward(s),
                }
            }
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Forward(s) => Outcome::Forward(s),
        }
    }
}

// Tests
//-------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn test_user() -> User {
        User {
            uid: String::from("u123"),
            email: String::from("ada@shipper.ng"),
            role: Role::Shipper,
            ..Default::default()
        }
    }

    #[test]
    fn constant_time_eq_test() {
        assert!(constant_time_eq(b"abc123", b"abc123"));
        assert!(!constant_time_eq(b"abc123", b"abc124"));
        assert!(!constant_time_eq(b"abc", b"abc123"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn password_test() {
        let stored = hash_password("correct horse");
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
        assert!(!verify_password("correct horse", "no-separator"));
        // salted, so the same password never hashes the same twice
        assert_ne!(stored, hash_password("correct horse"));
    }

    #[test]
    fn create_token_test() -> Result<(), CargoLinkError> {
        let now = utils::now();
        let token = create_token(SECRET, &test_user(), now + 60)?;
        let p = verify_token(SECRET, &token, now).map_err(|_| CargoLinkError::Unauthorized)?;
        assert_eq!(p.uid, "u123");
        assert_eq!(p.role, Role::Shipper);
        assert_eq!(p.method, AuthMethod::Bearer);
        Ok(())
    }

    #[test]
    fn expired_token_test() -> Result<(), CargoLinkError> {
        let now = utils::now();
        let token = create_token(SECRET, &test_user(), now - 1)?;
        assert_eq!(
            verify_token(SECRET, &token, now),
            Err(BearerTokenError::Expired)
        );
        Ok(())
    }

    #[test]
    fn wrong_secret_test() -> Result<(), CargoLinkError> {
        let now = utils::now();
        let token = create_token(SECRET, &test_user(), now + 60)?;
        assert_eq!(
            verify_token("other-secret", &token, now),
            Err(BearerTokenError::Invalid)
        );
        assert_eq!(
            verify_token(SECRET, "not.a.token", now),
            Err(BearerTokenError::Invalid)
        );
        Ok(())
    }
}
