//! Smart carrier selection. Carriers are ranked by a weighted sum of
//! min-max normalized price, rating and destination match.

use crate::{
    db::{
        self,
        Store,
    },
    error::CargoLinkError,
    models::*,
    rate,
    reqres,
    utils,
};
use log::debug;
use std::{
    cmp::Ordering,
    str::FromStr,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    Cheapest,
    BestRated,
    #[default]
    Balanced,
    DestinationFocused,
}

/// Weights for price, rating and destination match
#[derive(Debug, PartialEq)]
pub struct Weights {
    pub price: f64,
    pub rating: f64,
    pub destination: f64,
}

impl Strategy {
    pub fn weights(&self) -> Weights {
        let (price, rating, destination) = match *self {
            Strategy::Cheapest => (0.6, 0.2, 0.2),
            Strategy::BestRated => (0.2, 0.6, 0.2),
            Strategy::Balanced => (0.34, 0.33, 0.33),
            Strategy::DestinationFocused => (0.2, 0.2, 0.6),
        };
        Weights {
            price,
            rating,
            destination,
        }
    }
}

impl FromStr for Strategy {
    type Err = CargoLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cheapest" => Ok(Strategy::Cheapest),
            "best_rated" => Ok(Strategy::BestRated),
            "balanced" => Ok(Strategy::Balanced),
            "destination_focused" => Ok(Strategy::DestinationFocused),
            _ => Err(CargoLinkError::Validation(format!("unknown strategy: {}", s))),
        }
    }
}

/// Min-max normalization. A flat range scores everyone 1.0.
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max - min <= f64::EPSILON {
        1.0
    } else {
        (value - min) / (max - min)
    }
}

/// Like `normalize` but lower values score higher
fn normalize_inverted(value: f64, min: f64, max: f64) -> f64 {
    if max - min <= f64::EPSILON {
        1.0
    } else {
        (max - value) / (max - min)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Score and rank `candidates` for a shipment of `weight_kg` to `destination`
pub fn rank(
    candidates: &[Carrier],
    destination: &str,
    weight_kg: f64,
    strategy: Strategy,
) -> Vec<reqres::ScoredCarrier> {
    let w = strategy.weights();
    let (min_price, max_price) = bounds(candidates.iter().map(|c| c.price_per_kg * weight_kg));
    let (min_rating, max_rating) = bounds(candidates.iter().map(|c| c.rating));
    let mut scored: Vec<reqres::ScoredCarrier> = candidates
        .iter()
        .map(|c| {
            let price = c.price_per_kg * weight_kg;
            let price_score = normalize_inverted(price, min_price, max_price);
            let rating_score = normalize(c.rating, min_rating, max_rating);
            let destination_score = if c.serves(destination) { 1.0 } else { 0.0 };
            let score = w.price * price_score
                + w.rating * rating_score
                + w.destination * destination_score;
            reqres::ScoredCarrier {
                carrier: c.clone(),
                estimated_price: utils::round_cents(price),
                price_score,
                rating_score,
                destination_score,
                score,
            }
        })
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.estimated_price
                    .partial_cmp(&b.estimated_price)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.carrier.cid.cmp(&b.carrier.cid))
    });
    scored
}

/// Rank carriers for a selection request. `default_limit` applies when the
/// request doesn't carry one.
pub fn select(
    store: &Store,
    r: &reqres::SelectionRequest,
    default_limit: usize,
) -> Result<Vec<reqres::ScoredCarrier>, CargoLinkError> {
    let destination = utils::required(&r.destination, "destination")?;
    let weight_kg = rate::validate_weight(r.weight_kg.unwrap_or(1.0))?;
    let mode = match r.transport_mode.as_deref() {
        Some(m) if !m.trim().is_empty() => Some(TransportMode::from_str(m)?),
        _ => None,
    };
    let strategy = match r.strategy.as_deref() {
        Some(s) if !s.trim().is_empty() => Strategy::from_str(s)?,
        _ => Strategy::default(),
    };
    let limit = r.limit.unwrap_or(default_limit);
    if limit == 0 {
        return Err(CargoLinkError::Validation(String::from(
            "limit must be greater than zero",
        )));
    }
    let candidates: Vec<Carrier> = {
        let carriers = db::read(&store.carriers)?;
        carriers
            .iter()
            .filter(|c| mode.map_or(true, |m| c.supports(m)))
            .cloned()
            .collect()
    };
    debug!(
        "ranking {} carriers to {} with {:?}",
        candidates.len(),
        destination,
        strategy
    );
    let mut ranked = rank(&candidates, &destination, weight_kg, strategy);
    ranked.truncate(limit);
    Ok(ranked)
}

// Tests
//-------------------------------------------------------------------------------
