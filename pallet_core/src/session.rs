//! # Quote Session
//!
//! The state behind one quoting form: the pallets being edited, the
//! settings and shipping locations fetched once when the session opens, and
//! the last computed summary.
//!
//! ## Lifecycle
//!
//! 1. [`QuoteSession::load`] reads the current settings (required) and the
//!    location list
//! 2. Pallets are added, edited and removed; any edit clears stale results
//! 3. [`QuoteSession::calculate`] validates and prices every pallet
//! 4. [`QuoteSession::save_quote`] persists the priced quote; if the save
//!    fails the results stay in memory so it can be retried
//!
//! ## Example
//!
//! ```rust
//! use pallet_core::pallet::Board;
//! use pallet_core::session::QuoteSession;
//! use pallet_core::settings::GlobalSettings;
//! use pallet_core::location::ShippingLocation;
//! use pallet_core::store::MemoryQuoteStore;
//!
//! let settings = GlobalSettings::default()
//!     .with_delivery_fee("Flatbed", 200.0)
//!     .with_per_mile_charge(2.0);
//! let locations = vec![ShippingLocation::new("loc-1", "Plant", "", 50.0)];
//! let mut session = QuoteSession::new(settings, locations);
//!
//! let id = session.add_pallet("48x40");
//! let pallet = session.pallet_mut(&id)?;
//! pallet.deck_boards.push(Board::new(7, 0.625, 3.5, 48.0, "SYP"));
//! pallet.location_id = Some("loc-1".into());
//! pallet.transportation_type = Some("Flatbed".into());
//!
//! session.calculate()?;
//! let mut quotes = MemoryQuoteStore::new();
//! let quote_id = session.save_quote(&mut quotes)?;
//! assert_eq!(session.saved_quote_id(), Some(quote_id.as_str()));
//! # Ok::<(), pallet_core::errors::QuoteError>(())
//! ```

use tracing::{debug, info, warn};

use crate::errors::{QuoteError, QuoteResult};
use crate::ids::{IdGenerator, SequentialIds, UuidIds};
use crate::load_plan::{best_load_plan, LoadPlan, PalletFootprint};
use crate::location::{find_location, ShippingLocation};
use crate::pallet::{BuildOptions, Pallet};
use crate::pricing::{
    basic_fastener_cost, compute_quote, compute_results, pallet_issues, CalculationResults, QuoteInput, QuoteSummary,
};
use crate::quote::{Draft, Quote};
use crate::settings::GlobalSettings;
use crate::store::{DraftRepository, LocationStore, QuoteStore, SettingsStore};

/// Basic-calculator output for one pallet.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePalletQuote {
    pub results: CalculationResults,
    /// Shown beside the results, not included in them
    pub fastener_cost: f64,
}

/// In-memory quoting state.
pub struct QuoteSession<G: IdGenerator = SequentialIds> {
    settings: GlobalSettings,
    locations: Vec<ShippingLocation>,
    input: QuoteInput,
    pallet_ids: G,
    quote_ids: UuidIds,
    default_transportation_type: Option<String>,
    summary: Option<QuoteSummary>,
    saved_quote_id: Option<String>,
}

impl QuoteSession<SequentialIds> {
    /// Session with `pallet-N` ids.
    pub fn new(settings: GlobalSettings, locations: Vec<ShippingLocation>) -> Self {
        Self::with_id_generator(settings, locations, SequentialIds::new("pallet"))
    }

    /// Open a session from the stores.
    ///
    /// Fails with [`QuoteError::ConfigurationMissing`] when no settings have
    /// been saved; defaults are never substituted for a missing document.
    pub fn load(settings_store: &dyn SettingsStore, location_store: &dyn LocationStore) -> QuoteResult<Self> {
        let settings = settings_store
            .current_settings()?
            .ok_or_else(|| QuoteError::configuration_missing("global settings"))?;
        let locations = location_store.list_locations()?;
        info!(
            settings_updated_at = %settings.updated_at,
            locations = locations.len(),
            "quote session opened"
        );
        Ok(Self::new(settings, locations))
    }
}

impl<G: IdGenerator> QuoteSession<G> {
    pub fn with_id_generator(settings: GlobalSettings, locations: Vec<ShippingLocation>, pallet_ids: G) -> Self {
        QuoteSession {
            settings,
            locations,
            input: QuoteInput::default(),
            pallet_ids,
            quote_ids: UuidIds,
            default_transportation_type: None,
            summary: None,
            saved_quote_id: None,
        }
    }

    /// Transportation type pre-selected on new pallets.
    pub fn with_default_transportation_type(mut self, vehicle_type: Option<String>) -> Self {
        self.default_transportation_type = vehicle_type;
        self
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn locations(&self) -> &[ShippingLocation] {
        &self.locations
    }

    pub fn input(&self) -> &QuoteInput {
        &self.input
    }

    pub fn pallets(&self) -> &[Pallet] {
        &self.input.pallets
    }

    /// Last successful calculation, cleared by any edit.
    pub fn summary(&self) -> Option<&QuoteSummary> {
        self.summary.as_ref()
    }

    pub fn saved_quote_id(&self) -> Option<&str> {
        self.saved_quote_id.as_deref()
    }

    fn invalidate(&mut self) {
        self.summary = None;
        self.saved_quote_id = None;
    }

    /// Append an empty pallet and return its id.
    pub fn add_pallet(&mut self, name: impl Into<String>) -> String {
        let id = self.pallet_ids.next_id();
        let mut pallet = Pallet::new(id.clone(), name);
        pallet.transportation_type = self.default_transportation_type.clone();
        self.input.pallets.push(pallet);
        self.invalidate();
        debug!(pallet = %id, "pallet added");
        id
    }

    /// Add an already-built pallet, assigning a fresh id if it has none or
    /// its id is taken.
    pub fn insert_pallet(&mut self, mut pallet: Pallet) -> String {
        if pallet.id.is_empty() || self.pallet(&pallet.id).is_ok() {
            pallet.id = self.pallet_ids.next_id();
        } else {
            self.pallet_ids.observe(&pallet.id);
        }
        pallet.invalidate();
        let id = pallet.id.clone();
        self.input.pallets.push(pallet);
        self.invalidate();
        id
    }

    pub fn remove_pallet(&mut self, id: &str) -> QuoteResult<Pallet> {
        let index = self
            .input
            .pallets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| QuoteError::not_found("Pallet", id))?;
        self.invalidate();
        debug!(pallet = %id, "pallet removed");
        Ok(self.input.pallets.remove(index))
    }

    pub fn pallet(&self, id: &str) -> QuoteResult<&Pallet> {
        self.input
            .pallets
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| QuoteError::not_found("Pallet", id))
    }

    /// Mutable access for editing; the pallet's result snapshot is cleared.
    pub fn pallet_mut(&mut self, id: &str) -> QuoteResult<&mut Pallet> {
        self.invalidate();
        let pallet = self
            .input
            .pallets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| QuoteError::not_found("Pallet", id))?;
        pallet.invalidate();
        Ok(pallet)
    }

    pub fn set_build_options(&mut self, options: BuildOptions) {
        self.input.build_options = options;
        self.invalidate();
    }

    pub fn set_delivery_fee(&mut self, fee: f64) {
        self.input.delivery_fee = fee;
        self.invalidate();
    }

    pub fn set_labor_build_price(&mut self, price: f64) {
        self.input.labor_build_price = price;
        self.invalidate();
    }

    /// Create a location in the store and add it to the cached list.
    pub fn add_location(
        &mut self,
        store: &mut dyn LocationStore,
        name: &str,
        address: &str,
        distance_miles: f64,
    ) -> QuoteResult<ShippingLocation> {
        let location = store.add_location(name, address, distance_miles)?;
        self.locations.push(location.clone());
        Ok(location)
    }

    /// Validate and price every pallet, attaching a fresh result snapshot
    /// to each.
    pub fn calculate(&mut self) -> QuoteResult<&QuoteSummary> {
        let summary = compute_quote(&self.input, &self.settings, &self.locations).inspect_err(|e| {
            debug!(error = %e, "calculation blocked");
        })?;

        for pallet in &mut self.input.pallets {
            pallet.results = summary.pallet(&pallet.id).map(|b| b.results.clone());
        }
        info!(
            pallets = summary.pallets.len(),
            net_revenue_price_30 = summary.net_revenue_price_30,
            "quote calculated"
        );
        self.saved_quote_id = None;
        Ok(&*self.summary.insert(summary))
    }

    /// Basic calculator for one pallet.
    ///
    /// Blocked with [`QuoteError::ValidationFailed`] until the pallet has a
    /// known shipping location and a transportation type. `Ok(None)` when
    /// the pallet's lumber type has no price curve.
    pub fn calculate_single(&self, id: &str) -> QuoteResult<Option<SinglePalletQuote>> {
        let index = self
            .input
            .pallets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| QuoteError::not_found("Pallet", id))?;
        let pallet = &self.input.pallets[index];
        if let Some(issue) = pallet_issues(pallet, index, &self.locations).into_iter().next() {
            debug!(error = %issue, "calculation blocked");
            return Err(issue);
        }

        let location_id = pallet.location_id.as_deref().unwrap_or_default();
        let location =
            find_location(&self.locations, location_id).ok_or_else(|| QuoteError::not_found("ShippingLocation", location_id))?;
        Ok(compute_results(pallet, &self.settings, location).map(|results| SinglePalletQuote {
            results,
            fastener_cost: basic_fastener_cost(pallet, &self.settings),
        }))
    }

    /// Best truck load for a pallet on its selected vehicle.
    ///
    /// `Ok(None)` when the pallet has no stringers or boards yet, or the
    /// vehicle has no dimensions in settings.
    pub fn suggest_load_plan(&self, id: &str) -> QuoteResult<Option<LoadPlan>> {
        let pallet = self.pallet(id)?;
        let vehicle = pallet
            .transportation_type
            .as_deref()
            .and_then(|t| self.settings.vehicle(t));
        Ok(match (PalletFootprint::from_pallet(pallet), vehicle) {
            (Some(footprint), Some(vehicle)) => Some(best_load_plan(&footprint, vehicle)),
            _ => None,
        })
    }

    /// Locations referenced by the current pallets.
    fn referenced_locations(&self) -> Vec<ShippingLocation> {
        self.locations
            .iter()
            .filter(|l| self.input.pallets.iter().any(|p| p.location_id.as_deref() == Some(l.id.as_str())))
            .cloned()
            .collect()
    }

    /// Persist the calculated quote and return its id.
    ///
    /// Calculates first if needed. A store failure is reported as
    /// [`QuoteError::PersistenceFailed`] and leaves results in place.
    pub fn save_quote(&mut self, store: &mut dyn QuoteStore) -> QuoteResult<String> {
        let summary = match self.summary.clone() {
            Some(summary) => summary,
            None => self.calculate()?.clone(),
        };

        let quote = Quote::new(
            self.quote_ids.next_id(),
            self.input.clone(),
            summary,
            self.settings.clone(),
            self.referenced_locations(),
        );

        match store.save_quote(&quote) {
            Ok(id) => {
                info!(quote = %id, "quote saved");
                self.saved_quote_id = Some(id.clone());
                Ok(id)
            }
            Err(e) => {
                warn!(error = %e, "quote save failed, results kept");
                Err(match e {
                    QuoteError::PersistenceFailed { .. } => e,
                    other => QuoteError::persistence_failed("save quote", other.to_string()),
                })
            }
        }
    }

    /// Build the quote document without saving it.
    pub fn preview_quote(&self) -> Option<Quote> {
        let summary = self.summary.clone()?;
        Some(Quote::new(
            "preview",
            self.input.clone(),
            summary,
            self.settings.clone(),
            self.referenced_locations(),
        ))
    }

    pub fn save_draft(&self, repo: &mut dyn DraftRepository) -> QuoteResult<()> {
        repo.save_draft(&Draft::new(self.input.clone()))
    }

    /// Replace the form with the saved draft. Returns `false` if there was
    /// none. Restored pallets carry no results; settings may have changed.
    pub fn restore_draft(&mut self, repo: &dyn DraftRepository) -> QuoteResult<bool> {
        let Some(draft) = repo.load_draft()? else {
            return Ok(false);
        };
        let mut input = draft.input;
        for pallet in &mut input.pallets {
            pallet.invalidate();
            self.pallet_ids.observe(&pallet.id);
        }
        info!(pallets = input.pallets.len(), saved_at = %draft.saved_at, "draft restored");
        self.input = input;
        self.invalidate();
        Ok(true)
    }

    pub fn clear_draft(&self, repo: &mut dyn DraftRepository) -> QuoteResult<()> {
        repo.clear_draft()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pallet::{Board, FastenerType, Stringer};
    use crate::settings::{LumberPriceCurve, VehicleDimensions};
    use crate::store::{MemoryDraftRepository, MemoryLocationStore, MemoryQuoteStore, MemorySettingsStore};

    fn settings() -> GlobalSettings {
        GlobalSettings::default()
            .with_lumber_price("SYP", LumberPriceCurve::new(10.0, 60.0, 350.0))
            .with_delivery_fee("Flatbed", 200.0)
            .with_per_mile_charge(2.0)
            .with_vehicle("Flatbed", VehicleDimensions::new(53.0, 8.5, 9.0, 45_000.0))
    }

    fn locations() -> Vec<ShippingLocation> {
        vec![ShippingLocation::new("loc-1", "Plant", "1 Mill Rd", 50.0)]
    }

    fn session_with_pallet() -> (QuoteSession, String) {
        let mut session = QuoteSession::new(settings(), locations());
        let id = session.add_pallet("48x40");
        let pallet = session.pallet_mut(&id).unwrap();
        pallet.deck_boards.push(Board::new(7, 0.625, 3.5, 48.0, "SYP"));
        pallet.lead_boards.push(Board::new(2, 0.625, 5.5, 48.0, "SYP"));
        pallet.stringers.push(Stringer::new(3, 3.5, 1.5, 40.0, "SYP"));
        pallet.fastener_type = FastenerType::Standard;
        pallet.location_id = Some("loc-1".to_string());
        pallet.transportation_type = Some("Flatbed".to_string());
        pallet.pallets_per_truck = Some(10);
        (session, id)
    }

    struct FailingQuoteStore;

    impl QuoteStore for FailingQuoteStore {
        fn save_quote(&mut self, _quote: &Quote) -> QuoteResult<String> {
            Err(QuoteError::file_error("write", "/readonly/q.json", "permission denied"))
        }

        fn load_quote(&self, _id: &str) -> QuoteResult<Option<Quote>> {
            Ok(None)
        }

        fn list_quote_ids(&self) -> QuoteResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_load_requires_settings() {
        let err = QuoteSession::load(&MemorySettingsStore::new(), &MemoryLocationStore::new())
            .err()
            .unwrap();
        assert_eq!(err.error_code(), "CONFIGURATION_MISSING");

        let session = QuoteSession::load(
            &MemorySettingsStore::with_settings(settings()),
            &MemoryLocationStore::with_locations(locations()),
        )
        .unwrap();
        assert_eq!(session.locations().len(), 1);
    }

    #[test]
    fn test_pallet_ids_are_session_scoped() {
        let mut a = QuoteSession::new(settings(), locations());
        let mut b = QuoteSession::new(settings(), locations());
        assert_eq!(a.add_pallet("A"), "pallet-1");
        assert_eq!(a.add_pallet("B"), "pallet-2");
        assert_eq!(b.add_pallet("C"), "pallet-1");
    }

    #[test]
    fn test_calculate_attaches_results() {
        let (mut session, id) = session_with_pallet();
        let summary = session.calculate().unwrap();
        assert_eq!(summary.pallets.len(), 1);
        assert_eq!(summary.pallets[0].transportation_cost, 30.0);

        let pallet = session.pallet(&id).unwrap();
        assert!(pallet.results.is_some());
    }

    #[test]
    fn test_calculate_is_idempotent() {
        let (mut session, _) = session_with_pallet();
        let first = session.calculate().unwrap().clone();
        let second = session.calculate().unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_edit_clears_results() {
        let (mut session, id) = session_with_pallet();
        session.calculate().unwrap();
        session.pallet_mut(&id).unwrap().name = "Renamed".to_string();
        assert!(session.summary().is_none());
        assert!(session.pallet(&id).unwrap().results.is_none());
    }

    #[test]
    fn test_calculate_blocked_without_transport() {
        let (mut session, id) = session_with_pallet();
        session.pallet_mut(&id).unwrap().transportation_type = None;
        let err = session.calculate().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert!(session.summary().is_none());
    }

    #[test]
    fn test_remove_pallet() {
        let (mut session, id) = session_with_pallet();
        assert_eq!(session.remove_pallet(&id).unwrap().name, "48x40");
        assert!(session.pallets().is_empty());
        assert_eq!(session.remove_pallet(&id).unwrap_err().error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_insert_pallet_resolves_id_clash() {
        let (mut session, id) = session_with_pallet();
        let copy = session.pallet(&id).unwrap().clone();
        let new_id = session.insert_pallet(copy);
        assert_ne!(new_id, id);
        assert_eq!(session.pallets().len(), 2);
    }

    #[test]
    fn test_calculate_single_uses_basic_pricing() {
        let (session, id) = session_with_pallet();
        let single = session.calculate_single(&id).unwrap().unwrap();
        assert_eq!(single.results.mode, crate::pricing::CalculatorMode::Basic);
        assert_eq!(single.results.transportation_cost, 300.0);
        assert!(single.fastener_cost > 0.0);
    }

    #[test]
    fn test_calculate_single_requires_transport() {
        let (mut session, id) = session_with_pallet();
        session.pallet_mut(&id).unwrap().transportation_type = Some("  ".to_string());
        let err = session.calculate_single(&id).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");

        session.pallet_mut(&id).unwrap().transportation_type = None;
        assert_eq!(session.calculate_single(&id).unwrap_err().error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_calculate_single_labels_unnamed_pallet() {
        let (mut session, _) = session_with_pallet();
        let id = session.add_pallet("");
        match session.calculate_single(&id).unwrap_err() {
            QuoteError::ValidationFailed { pallet, field, .. } => {
                assert_eq!(pallet, "Pallet 2");
                assert_eq!(field, "location_id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_calculate_single_without_curve() {
        let (mut session, id) = session_with_pallet();
        for board in &mut session.pallet_mut(&id).unwrap().deck_boards {
            board.lumber_type = "Cedar".to_string();
        }
        assert!(session.calculate_single(&id).unwrap().is_none());
    }

    #[test]
    fn test_save_quote_success() {
        let (mut session, id) = session_with_pallet();
        let mut store = MemoryQuoteStore::new();
        let quote_id = session.save_quote(&mut store).unwrap();
        assert_eq!(session.saved_quote_id(), Some(quote_id.as_str()));

        let saved = store.load_quote(&quote_id).unwrap().unwrap();
        assert_eq!(saved.locations.len(), 1);
        assert!(saved.input.pallets[0].results.is_some());
        assert_eq!(saved.summary.pallet(&id).unwrap().pallet_name, "48x40");
    }

    #[test]
    fn test_save_failure_keeps_results() {
        let (mut session, id) = session_with_pallet();
        session.calculate().unwrap();

        let err = session.save_quote(&mut FailingQuoteStore).unwrap_err();
        assert_eq!(err.error_code(), "PERSISTENCE_FAILED");
        assert!(err.is_recoverable());
        assert!(session.summary().is_some());
        assert!(session.pallet(&id).unwrap().results.is_some());
        assert!(session.saved_quote_id().is_none());

        let mut store = MemoryQuoteStore::new();
        assert!(session.save_quote(&mut store).is_ok());
    }

    #[test]
    fn test_draft_roundtrip_invalidates_results() {
        let (mut session, _) = session_with_pallet();
        session.set_delivery_fee(150.0);
        session.calculate().unwrap();

        let mut drafts = MemoryDraftRepository::new();
        session.save_draft(&mut drafts).unwrap();

        let mut restored = QuoteSession::new(settings(), locations());
        assert!(restored.restore_draft(&drafts).unwrap());
        assert_eq!(restored.input().delivery_fee, 150.0);
        assert!(restored.pallets()[0].results.is_none());
        assert_eq!(restored.add_pallet("Next"), "pallet-2");

        restored.clear_draft(&mut drafts).unwrap();
        assert!(!restored.restore_draft(&drafts).unwrap());
    }

    #[test]
    fn test_add_location_updates_cache() {
        let mut session = QuoteSession::new(settings(), Vec::new());
        let mut store = MemoryLocationStore::new();
        let location = session.add_location(&mut store, "Dock 4", "", 12.0).unwrap();
        assert_eq!(session.locations(), std::slice::from_ref(&location));
    }

    #[test]
    fn test_suggest_load_plan() {
        let (session, id) = session_with_pallet();
        let plan = session.suggest_load_plan(&id).unwrap().unwrap();
        assert!(plan.pallets_per_truck > 0);

        let empty_id = {
            let mut s = QuoteSession::new(settings(), locations());
            let id = s.add_pallet("Empty");
            s.suggest_load_plan(&id).unwrap()
        };
        assert!(empty_id.is_none());
    }
}
