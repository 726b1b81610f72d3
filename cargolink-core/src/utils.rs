use crate::{
    args,
    db::Store,
    error::CargoLinkError,
    seed,
};
use log::{
    info,
    warn,
};
use rand::RngCore;

#[derive(Debug, PartialEq)]
pub enum ReleaseEnvironment {
    Development,
    Production,
}

impl ReleaseEnvironment {
    pub fn value(&self) -> String {
        match *self {
            ReleaseEnvironment::Development => String::from("development"),
            ReleaseEnvironment::Production => String::from("production"),
        }
    }
}

/// Random data generation for tokens / primary keys
pub fn generate_rnd() -> String {
    let mut data = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut data);
    hex::encode(data)
}

/// Prefixed primary key, e.g. `s4f0c…` for shipments
pub fn generate_id(prefix: &str) -> String {
    format!("{}{}", prefix, generate_rnd())
}

/// Current unix timestamp
pub fn now() -> i64 {
    chrono::offset::Utc::now().timestamp()
}

/// Helper for separation of dev and prod concerns
pub fn get_release_env(args: &args::Args) -> ReleaseEnvironment {
    if args.release_env == "prod" {
        ReleaseEnvironment::Production
    } else {
        ReleaseEnvironment::Development
    }
}

/// Round a USD amount to cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Trimmed, non-empty value of a required request field
pub fn required(value: &Option<String>, field: &str) -> Result<String, CargoLinkError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => {
            if v.len() >= string_limit() {
                return Err(CargoLinkError::Validation(format!(
                    "{} is too long",
                    field
                )));
            }
            Ok(String::from(v))
        }
        _ => Err(CargoLinkError::missing(field)),
    }
}

/// Trimmed value of an optional request field, empty when absent
pub fn optional(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .chars()
        .take(string_limit())
        .collect()
}

// DoS prevention
pub const fn string_limit() -> usize {
    512
}
pub const fn list_limit() -> usize {
    64
}

/// Secret for signing session tokens, random unless injected via env
fn get_jwt_secret_key() -> String {
    match std::env::var(crate::CARGOLINK_JWT_SECRET_KEY) {
        Ok(k) if !k.is_empty() => k,
        _ => {
            warn!(
                "{} not set, sessions will not survive a restart",
                crate::CARGOLINK_JWT_SECRET_KEY
            );
            generate_rnd()
        }
    }
}

/// Build the store and load the mock data
pub fn start_up(args: &args::Args) -> Store {
    info!("cargolink is starting up");
    let env = get_release_env(args);
    info!("release environment: {}", env.value());
    let store = Store::new(get_jwt_secret_key());
    if !args.skip_seed {
        if let Err(e) = seed::carriers(&store) {
            warn!("failed to seed carriers: {}", e);
        }
    }
    if let Some(email) = &args.admin_email {
        let password = std::env::var(crate::CARGOLINK_ADMIN_PASSWORD).unwrap_or_default();
        if let Err(e) = seed::admin(&store, email, &password) {
            warn!("failed to seed admin {}: {}", email, e);
        }
    }
    store
}

// Tests
//-------------------------------------------------------------------------------
