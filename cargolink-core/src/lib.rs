pub mod api_key;
pub mod args;
pub mod assignment;
pub mod auth;
pub mod carrier;
pub mod db;
pub mod error;
pub mod models;
pub mod rate;
pub mod reqres;
pub mod seed;
pub mod selection;
pub mod shipment;
pub mod user;
pub mod utils;

pub const APP_NAME: &str = "cargolink";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CARGOLINK_JWT_SECRET_KEY: &str = "CARGOLINK_JWT_SECRET_KEY";
pub const CARGOLINK_ADMIN_PASSWORD: &str = "CARGOLINK_ADMIN_PASSWORD";

// Id prefixes
pub const API_KEY_DB_KEY:       &str = "k";
pub const ASSIGNMENT_DB_KEY:    &str = "as";
pub const CARRIER_DB_KEY:       &str = "c";
pub const SHIPMENT_DB_KEY:      &str = "s";
pub const USER_DB_KEY:          &str = "u";
// End id prefixes

/// Prefix of every plaintext api key handed out
pub const API_KEY_PREFIX: &str = "clk_";
/// Prefix of every tracking number
pub const TRACKING_NUMBER_PREFIX: &str = "CL";
/// Header carrying an api key
pub const API_KEY_HEADER: &str = "x-api-key";
/// Active api keys a single user may hold
pub const MAX_API_KEYS_PER_USER: usize = 10;
/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Default app port
pub const DEFAULT_APP_PORT: u16 = 9000;
/// Seconds in a day, used for delivery estimates
pub const SECONDS_PER_DAY: i64 = 60 * 60 * 24;
// DO NOT EDIT BELOW THIS LINE
