//! Shipping rate calculation over a static distance table

use crate::{
    error::CargoLinkError,
    models::TransportMode,
    reqres,
    utils,
};
use lazy_static::lazy_static;
use log::debug;
use std::{
    collections::HashMap,
    str::FromStr,
};

/// Flat booking fee in USD
pub const BASE_FEE: f64 = 25.0;
/// USD per kilometre
pub const RATE_PER_KM: f64 = 0.35;
/// USD per kilogram before weight breaks
pub const RATE_PER_KG: f64 = 0.80;
/// Distance used when origin and destination are the same city
pub const INTRA_CITY_DISTANCE_KM: u32 = 50;
/// Distance used for routes missing from the table
pub const DEFAULT_DISTANCE_KM: u32 = 1500;
pub const MAX_WEIGHT_KG: f64 = 30_000.0;
pub const CURRENCY: &str = "USD";

/// Approximate road distances in km. Keys are lower-case city names.
const ROUTES: &[(&str, &str, u32)] = &[
    ("lagos", "abuja", 760),
    ("lagos", "accra", 480),
    ("lagos", "abidjan", 990),
    ("lagos", "kumasi", 730),
    ("lagos", "dakar", 3200),
    ("lagos", "kinshasa", 3600),
    ("lagos", "nairobi", 4900),
    ("lagos", "johannesburg", 6300),
    ("lagos", "cairo", 4700),
    ("lagos", "addis ababa", 4200),
    ("abuja", "accra", 1200),
    ("accra", "kumasi", 250),
    ("accra", "abidjan", 550),
    ("accra", "dakar", 2700),
    ("abidjan", "dakar", 2100),
    ("dakar", "casablanca", 2800),
    ("casablanca", "algiers", 1100),
    ("algiers", "cairo", 3300),
    ("cairo", "alexandria", 220),
    ("cairo", "khartoum", 1900),
    ("cairo", "addis ababa", 3600),
    ("cairo", "nairobi", 5600),
    ("khartoum", "addis ababa", 1600),
    ("addis ababa", "nairobi", 1600),
    ("nairobi", "kampala", 660),
    ("nairobi", "kigali", 1180),
    ("nairobi", "dar es salaam", 870),
    ("nairobi", "johannesburg", 3900),
    ("kampala", "kigali", 530),
    ("dar es salaam", "kigali", 1450),
    ("dar es salaam", "harare", 2100),
    ("kinshasa", "brazzaville", 10),
    ("kinshasa", "luanda", 850),
    ("luanda", "johannesburg", 2900),
    ("johannesburg", "cape town", 1400),
    ("johannesburg", "durban", 570),
    ("johannesburg", "gaborone", 360),
    ("johannesburg", "harare", 1100),
    ("cape town", "durban", 1650),
    ("gaborone", "harare", 950),
];

lazy_static! {
    /// Both directions of every route
    static ref DISTANCES: HashMap<(String, String), u32> = {
        let mut m = HashMap::new();
        for (a, b, km) in ROUTES.iter() {
            m.insert((String::from(*a), String::from(*b)), *km);
            m.insert((String::from(*b), String::from(*a)), *km);
        }
        m
    };
}

fn normalize(city: &str) -> String {
    city.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

/// Distance between two cities and whether it is a fallback estimate
pub fn distance(origin: &str, destination: &str) -> (u32, bool) {
    let key = (normalize(origin), normalize(destination));
    if key.0 == key.1 {
        return (INTRA_CITY_DISTANCE_KM, false);
    }
    match DISTANCES.get(&key) {
        Some(km) => (*km, false),
        None => {
            debug!(
                "no route between {} and {}, using default distance",
                key.0, key.1
            );
            (DEFAULT_DISTANCE_KM, true)
        }
    }
}

/// Cities present in the distance table
pub fn cities() -> Vec<String> {
    let mut v: Vec<String> = ROUTES
        .iter()
        .flat_map(|(a, b, _)| [*a, *b])
        .map(title_case)
        .collect();
    v.sort();
    v.dedup();
    v
}

fn title_case(city: &str) -> String {
    city.split(' ')
        .map(|w| {
            // lower-case particles stay lower case, e.g. "Dar es Salaam"
            if w == "es" {
                return String::from(w);
            }
            let mut c = w.chars();
            match c.next() {
                Some(f) => f.to_uppercase().chain(c).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Discount factor applied to the per-kilogram rate
pub fn weight_break(weight_kg: f64) -> f64 {
    if weight_kg <= 50.0 {
        1.0
    } else if weight_kg <= 500.0 {
        0.9
    } else if weight_kg <= 2000.0 {
        0.8
    } else {
        0.7
    }
}

pub fn validate_weight(weight_kg: f64) -> Result<f64, CargoLinkError> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 || weight_kg > MAX_WEIGHT_KG {
        return Err(CargoLinkError::Validation(format!(
            "weight_kg must be greater than 0 and at most {}",
            MAX_WEIGHT_KG
        )));
    }
    Ok(weight_kg)
}

/// Price a route for a given weight and mode
pub fn quote(
    origin: &str,
    destination: &str,
    weight_kg: f64,
    mode: TransportMode,
) -> Result<reqres::RateQuote, CargoLinkError> {
    let weight_kg = validate_weight(weight_kg)?;
    let (distance_km, estimated_distance) = distance(origin, destination);
    let distance_cost = distance_km as f64 * RATE_PER_KM;
    let weight_cost = weight_kg * RATE_PER_KG * weight_break(weight_kg);
    let mode_multiplier = mode.rate_multiplier();
    // the breakdown is rounded for display only
    let total = utils::round_cents((BASE_FEE + distance_cost + weight_cost) * mode_multiplier);
    let transit_days = ((distance_km as f64 / mode.daily_range_km()).ceil() as u32).max(1);
    Ok(reqres::RateQuote {
        origin: String::from(origin),
        destination: String::from(destination),
        distance_km,
        estimated_distance,
        weight_kg,
        transport_mode: mode,
        base_fee: BASE_FEE,
        distance_cost: utils::round_cents(distance_cost),
        weight_cost: utils::round_cents(weight_cost),
        mode_multiplier,
        total,
        currency: String::from(CURRENCY),
        transit_days,
    })
}

/// Validate a rate request and price it. Mode defaults to road.
pub fn calculate(r: &reqres::RateRequest) -> Result<reqres::RateQuote, CargoLinkError> {
    let origin = utils::required(&r.origin, "origin")?;
    let destination = utils::required(&r.destination, "destination")?;
    let weight_kg = r.weight_kg.ok_or(CargoLinkError::missing("weight_kg"))?;
    let mode = match r.transport_mode.as_deref() {
        Some(m) if !m.trim().is_empty() => TransportMode::from_str(m)?,
        _ => TransportMode::Road,
    };
    quote(&origin, &destination, weight_kg, mode)
}

// Tests
//-------------------------------------------------------------------------------
