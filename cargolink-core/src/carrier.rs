// Carrier listing repo/service layer
use crate::{
    db::{
        self,
        Store,
    },
    error::CargoLinkError,
    models::*,
};
use log::debug;
use std::cmp::Ordering;

/// Optional filters for the carrier listing page
#[derive(Debug, Default)]
pub struct CarrierFilter {
    pub country: Option<String>,
    pub mode: Option<TransportMode>,
    pub destination: Option<String>,
}

impl CarrierFilter {
    fn matches(&self, c: &Carrier) -> bool {
        let country = self
            .country
            .as_deref()
            .map_or(true, |country| c.country.eq_ignore_ascii_case(country.trim()));
        let mode = self.mode.map_or(true, |m| c.supports(m));
        let destination = self.destination.as_deref().map_or(true, |d| c.serves(d));
        country && mode && destination
    }
}

/// Highest rated first, then by name
pub fn by_rating(a: &Carrier, b: &Carrier) -> Ordering {
    b.rating
        .partial_cmp(&a.rating)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.name.cmp(&b.name))
}

/// Carrier lookup for all matching `filter`
pub fn find_all(store: &Store, filter: &CarrierFilter) -> Result<Vec<Carrier>, CargoLinkError> {
    debug!("carrier lookup: {:?}", filter);
    let carriers = db::read(&store.carriers)?;
    let mut found: Vec<Carrier> = carriers
        .iter()
        .filter(|c| filter.matches(c))
        .cloned()
        .collect();
    found.sort_by(by_rating);
    Ok(found)
}

/// Single carrier lookup
pub fn find(store: &Store, cid: &str) -> Result<Carrier, CargoLinkError> {
    let carriers = db::read(&store.carriers)?;
    carriers
        .iter()
        .find(|c| c.cid == cid)
        .cloned()
        .ok_or(CargoLinkError::NotFound("carrier"))
}

// Tests
//-------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Result<Store, CargoLinkError> {
        let store = Store::new(String::new());
        crate::seed::carriers(&store)?;
        Ok(store)
    }

    #[test]
    fn find_all_test() -> Result<(), CargoLinkError> {
        let store = store()?;
        let all = find_all(&store, &CarrierFilter::default())?;
        assert_eq!(all.len(), crate::seed::mock_carriers().len());
        assert!(all.windows(2).all(|w| w[0].rating >= w[1].rating));
        Ok(())
    }

    #[test]
    fn filter_test() -> Result<(), CargoLinkError> {
        let store = store()?;
        let filter = CarrierFilter {
            country: Some(String::from("kenya")),
            ..Default::default()
        };
        let kenyan = find_all(&store, &filter)?;
        assert!(!kenyan.is_empty());
        assert!(kenyan.iter().all(|c| c.country == "Kenya"));
        let filter = CarrierFilter {
            mode: Some(TransportMode::Air),
            destination: Some(String::from("NAIROBI")),
            ..Default::default()
        };
        let air = find_all(&store, &filter)?;
        assert!(!air.is_empty());
        assert!(air
            .iter()
            .all(|c| c.supports(TransportMode::Air) && c.serves("Nairobi")));
        Ok(())
    }

    #[test]
    fn find_test() -> Result<(), CargoLinkError> {
        let store = store()?;
        let first = find_all(&store, &CarrierFilter::default())?.remove(0);
        assert_eq!(find(&store, &first.cid)?.name, first.name);
        assert_eq!(
            find(&store, "c-missing").err(),
            Some(CargoLinkError::NotFound("carrier"))
        );
        Ok(())
    }
}
