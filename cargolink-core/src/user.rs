//! Accounts for shippers, carriers and admins

use crate::{
    auth::{
        self,
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
    warn,
};
use std::str::FromStr;

/// Create a new user. Carrier accounts also get a carrier listing.
pub fn register(store: &Store, r: &reqres::RegisterRequest) -> Result<User, CargoLinkError> {
    let email = utils::required(&r.email, "email")?.to_lowercase();
    let password = r
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or(CargoLinkError::missing("password"))?;
    let name = utils::required(&r.name, "name")?;
    let role = Role::from_str(&utils::required(&r.role, "role")?)?;
    validate_email(&email)?;
    if password.len() < crate::MIN_PASSWORD_LENGTH {
        return Err(CargoLinkError::Validation(format!(
            "password must be at least {} characters",
            crate::MIN_PASSWORD_LENGTH
        )));
    }
    if role == Role::Admin {
        return Err(CargoLinkError::Validation(String::from(
            "admin accounts cannot be registered",
        )));
    }
    let company = utils::optional(&r.company);
    let uid = utils::generate_id(crate::USER_DB_KEY);
    let created = utils::now();
    let mut users = db::write(&store.users)?;
    if users.iter().any(|u| u.email == email) {
        return Err(CargoLinkError::Conflict(String::from(
            "email is already registered",
        )));
    }
    let carrier_id = if role == Role::Carrier {
        let carrier = carrier_listing(r, &email, created)?;
        let cid = String::from(&carrier.cid);
        debug!("insert carrier: {:?}", &carrier);
        db::write(&store.carriers)?.push(carrier);
        Some(cid)
    } else {
        None
    };
    let new_user = User {
        uid,
        email,
        name,
        role,
        company,
        carrier_id,
        password_hash: auth::hash_password(password),
        created,
    };
    info!("registered {:?} {}", new_user.role, new_user.uid);
    users.push(new_user.clone());
    Ok(new_user)
}

fn validate_email(email: &str) -> Result<(), CargoLinkError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(CargoLinkError::Validation(String::from("invalid email address")));
    }
    Ok(())
}

/// Listing created alongside a carrier account
fn carrier_listing(
    r: &reqres::RegisterRequest,
    email: &str,
    created: i64,
) -> Result<Carrier, CargoLinkError> {
    let name = utils::required(&r.company, "company")?;
    let country = utils::required(&r.country, "country")?;
    let transport_modes = match &r.transport_modes {
        Some(modes) if !modes.is_empty() => {
            let mut parsed: Vec<TransportMode> = Vec::new();
            for m in modes.iter().take(utils::list_limit()) {
                let mode = TransportMode::from_str(m)?;
                if !parsed.contains(&mode) {
                    parsed.push(mode);
                }
            }
            parsed
        }
        _ => vec![TransportMode::Road],
    };
    let price_per_kg = r.price_per_kg.unwrap_or(1.0);
    if !price_per_kg.is_finite() || price_per_kg <= 0.0 {
        return Err(CargoLinkError::Validation(String::from(
            "price_per_kg must be greater than zero",
        )));
    }
    let destinations: Vec<String> = r
        .destinations
        .iter()
        .flatten()
        .take(utils::list_limit())
        .map(|d| d.trim())
        .filter(|d| !d.is_empty() && d.len() < utils::string_limit())
        .map(String::from)
        .collect();
    Ok(Carrier {
        cid: utils::generate_id(crate::CARRIER_DB_KEY),
        name,
        country,
        destinations,
        transport_modes,
        rating: 0.0,
        price_per_kg,
        verified: false,
        contact_email: String::from(email),
        phone: utils::optional(&r.phone),
        created,
    })
}

/// Exchange credentials for a session token valid `timeout` minutes
pub fn login(
    store: &Store,
    r: &reqres::LoginRequest,
    timeout: i64,
) -> Result<reqres::LoginResponse, CargoLinkError> {
    let email = utils::required(&r.email, "email")?.to_lowercase();
    let password = r
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or(CargoLinkError::missing("password"))?;
    let user = {
        let users = db::read(&store.users)?;
        users.iter().find(|u| u.email == email).cloned()
    };
    let user = match user {
        Some(u) if auth::verify_password(password, &u.password_hash) => u,
        _ => {
            warn!("failed login for {}", email);
            return Err(CargoLinkError::InvalidCredentials);
        }
    };
    let expires = timeout
        .checked_mul(60)
        .and_then(|secs| utils::now().checked_add(secs))
        .ok_or_else(|| {
            error!("token timeout of {} minutes is out of range", timeout);
            CargoLinkError::Internal(String::from("token timeout overflow"))
        })?;
    let token = auth::create_token(store.jwt_secret_key(), &user, expires)?;
    info!("login {}", user.uid);
    Ok(reqres::LoginResponse {
        token,
        expires,
        user,
    })
}

/// User lookup
pub fn find(store: &Store, uid: &str) -> Result<User, CargoLinkError> {
    let users = db::read(&store.users)?;
    users
        .iter()
        .find(|u| u.uid == uid)
        .cloned()
        .ok_or(CargoLinkError::NotFound("user"))
}

/// Profile of the caller
pub fn me(store: &Store, principal: &Principal) -> Result<User, CargoLinkError> {
    find(store, &principal.uid)
}

/// Carrier listing operated by the caller
pub fn carrier_of(store: &Store, principal: &Principal) -> Result<Option<String>, CargoLinkError> {
    if principal.role != Role::Carrier {
        return Ok(None);
    }
    Ok(find(store, &principal.uid)?.carrier_id)
}

// Tests
//-------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn shipper_request() -> reqres::RegisterRequest {
        reqres::RegisterRequest {
            email: Some(String::from("Ada@Shipper.ng")),
            password: Some(String::from("lagos-2024")),
            name: Some(String::from("Ada Obi")),
            role: Some(String::from("shipper")),
            company: Some(String::from("Obi Textiles")),
            ..Default::default()
        }
    }

    #[test]
    fn register_test() -> Result<(), CargoLinkError> {
        let store = Store::new(String::from("secret"));
        let user = register(&store, &shipper_request())?;
        assert_eq!(user.email, "ada@shipper.ng");
        assert_eq!(user.role, Role::Shipper);
        assert!(user.carrier_id.is_none());
        assert_ne!(user.password_hash, "lagos-2024");
        assert_eq!(find(&store, &user.uid)?.name, "Ada Obi");
        Ok(())
    }

    #[test]
    fn register_duplicate_test() -> Result<(), CargoLinkError> {
        let store = Store::new(String::from("secret"));
        register(&store, &shipper_request())?;
        let r = register(&store, &shipper_request());
        assert!(matches!(r, Err(CargoLinkError::Conflict(_))));
        Ok(())
    }

    #[test]
    fn register_validation_test() {
        let store = Store::new(String::from("secret"));
        let no_email = reqres::RegisterRequest {
            email: None,
            ..shipper_request()
        };
        assert_eq!(
            register(&store, &no_email).err(),
            Some(CargoLinkError::missing("email"))
        );
        let short = reqres::RegisterRequest {
            password: Some(String::from("short")),
            ..shipper_request()
        };
        assert!(matches!(
            register(&store, &short),
            Err(CargoLinkError::Validation(_))
        ));
        let bad_email = reqres::RegisterRequest {
            email: Some(String::from("ada.shipper.ng")),
            ..shipper_request()
        };
        assert!(register(&store, &bad_email).is_err());
        let admin = reqres::RegisterRequest {
            role: Some(String::from("admin")),
            ..shipper_request()
        };
        assert!(register(&store, &admin).is_err());
    }

    #[test]
    fn register_carrier_test() -> Result<(), CargoLinkError> {
        let store = Store::new(String::from("secret"));
        let r = reqres::RegisterRequest {
            email: Some(String::from("dispatch@savanna.co.ke")),
            role: Some(String::from("carrier")),
            company: Some(String::from("Savanna Movers")),
            country: Some(String::from("Kenya")),
            destinations: Some(vec![String::from("Nairobi"), String::from(" Kampala ")]),
            transport_modes: Some(vec![String::from("road"), String::from("Rail")]),
            price_per_kg: Some(0.9),
            ..shipper_request()
        };
        let user = register(&store, &r)?;
        let cid = user.carrier_id.ok_or(CargoLinkError::NotFound("carrier"))?;
        let carriers = db::read(&store.carriers)?;
        let carrier = carriers
            .iter()
            .find(|c| c.cid == cid)
            .ok_or(CargoLinkError::NotFound("carrier"))?;
        assert_eq!(carrier.name, "Savanna Movers");
        assert!(carrier.serves("kampala"));
        assert!(carrier.supports(TransportMode::Rail));
        assert!(!carrier.verified);
        Ok(())
    }

    #[test]
    fn register_carrier_requires_company_test() {
        let store = Store::new(String::from("secret"));
        let r = reqres::RegisterRequest {
            role: Some(String::from("carrier")),
            company: None,
            country: Some(String::from("Kenya")),
            ..shipper_request()
        };
        assert_eq!(
            register(&store, &r).err(),
            Some(CargoLinkError::missing("company"))
        );
    }

    #[test]
    fn login_test() -> Result<(), CargoLinkError> {
        let store = Store::new(String::from("secret"));
        let user = register(&store, &shipper_request())?;
        let r = reqres::LoginRequest {
            email: Some(String::from("ADA@shipper.ng")),
            password: Some(String::from("lagos-2024")),
        };
        let res = login(&store, &r, 60)?;
        assert_eq!(res.user.uid, user.uid);
        let p = auth::verify_token(store.jwt_secret_key(), &res.token, utils::now())
            .map_err(|_| CargoLinkError::Unauthorized)?;
        assert_eq!(p.uid, user.uid);
        let wrong = reqres::LoginRequest {
            password: Some(String::from("lagos-2025")),
            ..r
        };
        assert_eq!(
            login(&store, &wrong, 60).err(),
            Some(CargoLinkError::InvalidCredentials)
        );
        Ok(())
    }

    #[test]
    fn login_unknown_email_test() -> Result<(), CargoLinkError> {
        let store = Store::new(String::from("secret"));
        register(&store, &shipper_request())?;
        let r = reqres::LoginRequest {
            email: Some(String::from("nobody@shipper.ng")),
            password: Some(String::from("lagos-2024")),
        };
        let e = login(&store, &r, 60).err();
        assert_eq!(e, Some(CargoLinkError::InvalidCredentials));
        assert_eq!(e.map(|e| e.to_string()).as_deref(), Some("invalid credentials"));
        Ok(())
    }

    #[test]
    fn login_timeout_overflow_test() -> Result<(), CargoLinkError> {
        let store = Store::new(String::from("secret"));
        register(&store, &shipper_request())?;
        let r = reqres::LoginRequest {
            email: Some(String::from("ada@shipper.ng")),
            password: Some(String::from("lagos-2024")),
        };
        assert!(matches!(
            login(&store, &r, i64::MAX),
            Err(CargoLinkError::Internal(_))
        ));
        Ok(())
    }
}
