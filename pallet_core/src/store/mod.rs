//! # Stores
//!
//! Interfaces to the collaborators that hold settings, shipping locations,
//! saved quotes and drafts. The engine never talks to storage directly; a
//! [`QuoteSession`](crate::session::QuoteSession) reads through these traits
//! once and then works from memory.
//!
//! ## Implementations
//!
//! - [`memory`] - in-process stores for tests and embedding
//! - [`json`] - a data directory of JSON files with atomic saves and locks

pub mod json;
pub mod memory;

pub use json::JsonDataDir;
pub use memory::{MemoryDraftRepository, MemoryLocationStore, MemoryQuoteStore, MemorySettingsStore};

use crate::errors::QuoteResult;
use crate::location::ShippingLocation;
use crate::quote::{Draft, Quote};
use crate::settings::GlobalSettings;

/// Versioned global settings. The most recently updated version is current.
pub trait SettingsStore {
    /// `Ok(None)` when no settings document has ever been saved.
    fn current_settings(&self) -> QuoteResult<Option<GlobalSettings>>;

    /// Store a new settings version.
    fn save_settings(&mut self, settings: GlobalSettings) -> QuoteResult<()>;
}

/// Shipping destinations.
pub trait LocationStore {
    fn list_locations(&self) -> QuoteResult<Vec<ShippingLocation>>;

    /// Create a location and return it with its assigned id.
    fn add_location(&mut self, name: &str, address: &str, distance_miles: f64) -> QuoteResult<ShippingLocation>;
}

/// Saved quotes.
pub trait QuoteStore {
    /// Persist a quote and return its id.
    fn save_quote(&mut self, quote: &Quote) -> QuoteResult<String>;

    fn load_quote(&self, id: &str) -> QuoteResult<Option<Quote>>;

    /// Ids of all saved quotes
    fn list_quote_ids(&self) -> QuoteResult<Vec<String>>;
}

/// Unsaved form state, regardless of backing store.
pub trait DraftRepository {
    fn load_draft(&self) -> QuoteResult<Option<Draft>>;
    fn save_draft(&mut self, draft: &Draft) -> QuoteResult<()>;
    fn clear_draft(&mut self) -> QuoteResult<()>;
}
