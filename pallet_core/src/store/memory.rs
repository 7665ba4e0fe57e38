//! In-memory stores.

use std::collections::BTreeMap;

use crate::errors::{QuoteError, QuoteResult};
use crate::ids::{IdGenerator, SequentialIds};
use crate::location::ShippingLocation;
use crate::quote::{Draft, Quote};
use crate::settings::{latest, GlobalSettings};
use crate::store::{DraftRepository, LocationStore, QuoteStore, SettingsStore};

/// Settings history held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    versions: Vec<GlobalSettings>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: GlobalSettings) -> Self {
        MemorySettingsStore {
            versions: vec![settings],
        }
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn current_settings(&self) -> QuoteResult<Option<GlobalSettings>> {
        Ok(latest(&self.versions).cloned())
    }

    fn save_settings(&mut self, settings: GlobalSettings) -> QuoteResult<()> {
        self.versions.push(settings);
        Ok(())
    }
}

/// Locations held in memory, ids `loc-1`, `loc-2`, ...
#[derive(Debug, Clone)]
pub struct MemoryLocationStore {
    locations: Vec<ShippingLocation>,
    ids: SequentialIds,
}

impl Default for MemoryLocationStore {
    fn default() -> Self {
        MemoryLocationStore {
            locations: Vec::new(),
            ids: SequentialIds::new("loc"),
        }
    }
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locations(locations: Vec<ShippingLocation>) -> Self {
        let mut ids = SequentialIds::new("loc");
        ids.resume_after(locations.iter().map(|l| l.id.as_str()));
        MemoryLocationStore { locations, ids }
    }
}

impl LocationStore for MemoryLocationStore {
    fn list_locations(&self) -> QuoteResult<Vec<ShippingLocation>> {
        Ok(self.locations.clone())
    }

    fn add_location(&mut self, name: &str, address: &str, distance_miles: f64) -> QuoteResult<ShippingLocation> {
        validate_location(name, distance_miles)?;
        let location = ShippingLocation::new(self.ids.next_id(), name.trim(), address.trim(), distance_miles);
        self.locations.push(location.clone());
        Ok(location)
    }
}

/// Shared input checks for new locations.
pub(crate) fn validate_location(name: &str, distance_miles: f64) -> QuoteResult<()> {
    if name.trim().is_empty() {
        return Err(QuoteError::invalid_input("name", name, "Location name is required"));
    }
    if !distance_miles.is_finite() || distance_miles < 0.0 {
        return Err(QuoteError::invalid_input(
            "distance_miles",
            distance_miles.to_string(),
            "Distance must be zero or more miles",
        ));
    }
    Ok(())
}

/// Quotes held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryQuoteStore {
    quotes: BTreeMap<String, Quote>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl QuoteStore for MemoryQuoteStore {
    fn save_quote(&mut self, quote: &Quote) -> QuoteResult<String> {
        self.quotes.insert(quote.id.clone(), quote.clone());
        Ok(quote.id.clone())
    }

    fn load_quote(&self, id: &str) -> QuoteResult<Option<Quote>> {
        Ok(self.quotes.get(id).cloned())
    }

    fn list_quote_ids(&self) -> QuoteResult<Vec<String>> {
        Ok(self.quotes.keys().cloned().collect())
    }
}

/// Draft held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftRepository {
    draft: Option<Draft>,
}

impl MemoryDraftRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftRepository for MemoryDraftRepository {
    fn load_draft(&self) -> QuoteResult<Option<Draft>> {
        Ok(self.draft.clone())
    }

    fn save_draft(&mut self, draft: &Draft) -> QuoteResult<()> {
        self.draft = Some(draft.clone());
        Ok(())
    }

    fn clear_draft(&mut self) -> QuoteResult<()> {
        self.draft = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::QuoteInput;
    use chrono::{Duration, Utc};

    #[test]
    fn test_settings_latest_wins() {
        let mut store = MemorySettingsStore::new();
        assert!(store.current_settings().unwrap().is_none());

        let mut first = GlobalSettings::default();
        first.updated_at = Utc::now() - Duration::days(2);
        first.lumber_processing_cost = 0.02;
        let mut second = GlobalSettings::default();
        second.updated_at = Utc::now();
        second.lumber_processing_cost = 0.07;

        store.save_settings(second).unwrap();
        store.save_settings(first).unwrap();
        assert_eq!(store.version_count(), 2);
        assert_eq!(store.current_settings().unwrap().unwrap().lumber_processing_cost, 0.07);
    }

    #[test]
    fn test_add_location_assigns_ids() {
        let mut store = MemoryLocationStore::with_locations(vec![ShippingLocation::new("loc-4", "Plant", "", 10.0)]);
        let added = store.add_location("  Warehouse ", "2 Dock St", 50.0).unwrap();
        assert_eq!(added.id, "loc-5");
        assert_eq!(added.name, "Warehouse");
        assert_eq!(store.list_locations().unwrap().len(), 2);
    }

    #[test]
    fn test_add_location_rejects_bad_input() {
        let mut store = MemoryLocationStore::new();
        assert!(store.add_location("", "", 10.0).is_err());
        assert!(store.add_location("Yard", "", -1.0).is_err());
        assert!(store.add_location("Yard", "", f64::NAN).is_err());
    }

    #[test]
    fn test_draft_repository_cycle() {
        let mut repo = MemoryDraftRepository::new();
        assert!(repo.load_draft().unwrap().is_none());
        repo.save_draft(&Draft::new(QuoteInput::default())).unwrap();
        assert!(repo.load_draft().unwrap().is_some());
        repo.clear_draft().unwrap();
        assert!(repo.load_draft().unwrap().is_none());
    }
}
