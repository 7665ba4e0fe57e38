//! # Quotes and Drafts
//!
//! A [`Quote`] is what gets persisted when the user saves: the priced
//! pallets, the aggregate summary, and the exact settings and locations the
//! prices were computed from, so a saved quote can be re-read without
//! depending on today's settings.
//!
//! A [`Draft`] is unsaved form state that survives restarts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::file_io::SCHEMA_VERSION;
use crate::location::ShippingLocation;
use crate::pricing::{QuoteInput, QuoteSummary};
use crate::settings::GlobalSettings;

/// A saved, priced quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    /// Schema version (for migration compatibility)
    pub version: String,
    pub created_at: DateTime<Utc>,
    /// Pallets (with their result snapshots) and quote-level inputs
    pub input: QuoteInput,
    pub summary: QuoteSummary,
    /// Settings the quote was priced with
    pub settings: GlobalSettings,
    /// Locations referenced by the pallets
    pub locations: Vec<ShippingLocation>,
}

impl Quote {
    pub fn new(
        id: impl Into<String>,
        input: QuoteInput,
        summary: QuoteSummary,
        settings: GlobalSettings,
        locations: Vec<ShippingLocation>,
    ) -> Self {
        Quote {
            id: id.into(),
            version: SCHEMA_VERSION.to_string(),
            created_at: Utc::now(),
            input,
            summary,
            settings,
            locations,
        }
    }

    pub fn pallet_count(&self) -> usize {
        self.input.pallets.len()
    }
}

/// Unsaved form state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub input: QuoteInput,
}

impl Draft {
    pub fn new(input: QuoteInput) -> Self {
        Draft {
            version: SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            input,
        }
    }
}
