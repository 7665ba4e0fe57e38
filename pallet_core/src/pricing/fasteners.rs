//! # Fastener Cost
//!
//! Stringer pallets take two nails per deck board per stringer and three per
//! lead board per stringer. The basic calculator works from counts typed
//! into the form; the advanced calculator derives the counts from a
//! pallet's component rows. Both are kept as separate entry points.
//!
//! Display of the resulting dollar amount is handled by
//! [`crate::format::format_fastener_cost`].

use serde::{Deserialize, Serialize};

use crate::pallet::{FastenerType, Pallet};
use crate::settings::FastenerCosts;

/// Nails per deck board per stringer
pub const NAILS_PER_DECK_JOINT: u64 = 2;

/// Nails per lead board per stringer
pub const NAILS_PER_LEAD_JOINT: u64 = 3;

/// Piece counts used by the fastener formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FastenerCounts {
    pub deck_board_count: u64,
    pub lead_board_count: u64,
    pub stringer_count: u64,
}

impl FastenerCounts {
    pub fn new(deck_board_count: u64, lead_board_count: u64, stringer_count: u64) -> Self {
        FastenerCounts {
            deck_board_count,
            lead_board_count,
            stringer_count,
        }
    }

    /// Summed component counts of a pallet
    pub fn from_pallet(pallet: &Pallet) -> Self {
        FastenerCounts {
            deck_board_count: pallet.deck_board_count(),
            lead_board_count: pallet.lead_board_count(),
            stringer_count: pallet.stringer_count(),
        }
    }

    /// Number of nails, saturating at `u64::MAX`
    pub fn fastener_count(&self) -> u64 {
        let stringers = self.stringer_count;
        let deck = self.deck_board_count.saturating_mul(stringers).saturating_mul(NAILS_PER_DECK_JOINT);
        let lead = self.lead_board_count.saturating_mul(stringers).saturating_mul(NAILS_PER_LEAD_JOINT);
        deck.saturating_add(lead)
    }
}

/// Basic calculator: fastener dollars from form-entered counts.
///
/// # Example
///
/// ```rust
/// use pallet_core::pallet::FastenerType;
/// use pallet_core::pricing::{fastener_cost, FastenerCounts};
/// use pallet_core::settings::FastenerCosts;
///
/// let cost = fastener_cost(FastenerCounts::new(2, 1, 3), FastenerType::Standard, &FastenerCosts::default());
/// assert!((cost - 0.0966).abs() < 1e-12);
/// ```
pub fn fastener_cost(counts: FastenerCounts, fastener_type: FastenerType, costs: &FastenerCosts) -> f64 {
    counts.fastener_count() as f64 * costs.unit_cost(fastener_type)
}

/// Advanced calculator: nails needed for one pallet.
pub fn pallet_fastener_count(pallet: &Pallet) -> u64 {
    FastenerCounts::from_pallet(pallet).fastener_count()
}

/// Advanced calculator: fastener dollars for one pallet.
pub fn pallet_fastener_cost(pallet: &Pallet, costs: &FastenerCosts) -> f64 {
    pallet_fastener_count(pallet) as f64 * costs.unit_cost(pallet.fastener_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_fastener_cost;
    use crate::pallet::{Board, Stringer};

    #[test]
    fn test_fastener_count_formula() {
        assert_eq!(FastenerCounts::new(2, 1, 3).fastener_count(), 21);
        assert_eq!(FastenerCounts::new(7, 2, 0).fastener_count(), 0);
    }

    #[test]
    fn test_basic_cost_and_display() {
        let cost = fastener_cost(FastenerCounts::new(2, 1, 3), FastenerType::Standard, &FastenerCosts::default());
        assert!((cost - 0.0966).abs() < 1e-12);
        assert_eq!(format_fastener_cost(cost), "0.097");
    }

    #[test]
    fn test_pallet_counts_are_summed_per_category() {
        let pallet = Pallet::new("p", "48x40")
            .with_deck_board(Board::new(1, 0.625, 3.5, 40.0, "SYP"))
            .with_deck_board(Board::new(1, 0.625, 5.5, 40.0, "SYP"))
            .with_lead_board(Board::new(1, 0.625, 5.5, 40.0, "SYP"))
            .with_stringer(Stringer::new(2, 3.5, 1.5, 48.0, "SYP"))
            .with_stringer(Stringer::new(1, 3.5, 1.5, 48.0, "SYP"))
            .with_fastener(FastenerType::SpecialtyNail);
        assert_eq!(pallet_fastener_count(&pallet), 21);
        assert!((pallet_fastener_cost(&pallet, &FastenerCosts::default()) - 0.21).abs() < 1e-12);
    }

    #[test]
    fn test_large_row_counts_do_not_overflow() {
        let pallet = Pallet::new("p", "bulk")
            .with_deck_board(Board::new(3_000_000_000, 0.625, 3.5, 40.0, "SYP"))
            .with_deck_board(Board::new(3_000_000_000, 0.625, 3.5, 40.0, "SYP"))
            .with_stringer(Stringer::new(3, 3.5, 1.5, 48.0, "SYP"));
        assert_eq!(pallet.deck_board_count(), 6_000_000_000);
        assert_eq!(pallet_fastener_count(&pallet), 36_000_000_000);
        assert_eq!(FastenerCounts::new(u64::MAX, 1, 2).fastener_count(), u64::MAX);
    }

    #[test]
    fn test_settings_override_unit_cost() {
        let costs = FastenerCosts {
            automatic: 0.1,
            ..Default::default()
        };
        let cost = fastener_cost(FastenerCounts::new(2, 1, 3), FastenerType::AutomaticNail, &costs);
        assert!((cost - 2.1).abs() < 1e-12);
        assert_eq!(format_fastener_cost(cost), "2.10");
    }
}
