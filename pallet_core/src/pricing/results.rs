//! Computed price snapshot.

use serde::{Deserialize, Serialize};

use crate::pricing::margins::{price_per_board_foot, profit_margin, walkaway_price_15, walkaway_price_20};

/// Which calculator produced a snapshot.
///
/// The two modes use different walkaway multipliers (see
/// [`crate::pricing::margins`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculatorMode {
    /// Single pallet, lumber curve, full trip, 20% walkaway
    Basic,
    /// Per pallet within a quote, lumber table, allocated trip, 15% walkaway
    Advanced,
}

impl CalculatorMode {
    pub fn walkaway_price(&self, total_cost_with_transport: f64) -> f64 {
        match self {
            CalculatorMode::Basic => walkaway_price_20(total_cost_with_transport),
            CalculatorMode::Advanced => walkaway_price_15(total_cost_with_transport),
        }
    }
}

/// Immutable result of one calculation. Recompute rather than edit.
///
/// Values are unrounded; round with [`crate::format`] when displaying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
    pub mode: CalculatorMode,
    /// Board feet the prices are spread over
    pub board_feet: f64,
    /// Cost before transportation
    pub total_cost: f64,
    /// Lumber dollars per thousand board feet
    pub cost_per_mbf: f64,
    pub walkaway_price: f64,
    pub price_per_board_foot: f64,
    pub profit_margin_20: f64,
    pub profit_margin_25: f64,
    pub profit_margin_30: f64,
    pub profit_margin_35: f64,
    pub transportation_cost: f64,
    pub total_cost_with_transport: f64,
}

impl CalculationResults {
    /// Derive walkaway, per-foot price and margin tiers from the cost inputs.
    pub fn derive(
        mode: CalculatorMode,
        total_cost: f64,
        transportation_cost: f64,
        board_feet: f64,
        cost_per_mbf: f64,
    ) -> Self {
        let total_cost_with_transport = total_cost + transportation_cost;
        let walkaway_price = mode.walkaway_price(total_cost_with_transport);

        CalculationResults {
            mode,
            board_feet,
            total_cost,
            cost_per_mbf,
            walkaway_price,
            price_per_board_foot: price_per_board_foot(walkaway_price, board_feet),
            profit_margin_20: profit_margin(total_cost_with_transport, 20),
            profit_margin_25: profit_margin(total_cost_with_transport, 25),
            profit_margin_30: profit_margin(total_cost_with_transport, 30),
            profit_margin_35: profit_margin(total_cost_with_transport, 35),
            transportation_cost,
            total_cost_with_transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_basic() {
        let results = CalculationResults::derive(CalculatorMode::Basic, 70.0, 30.0, 50.0, 1290.0);
        assert_eq!(results.total_cost_with_transport, 100.0);
        assert!((results.walkaway_price - 120.0).abs() < 1e-9);
        assert!((results.price_per_board_foot - 2.4).abs() < 1e-9);
        assert!((results.profit_margin_30 - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_derive_advanced_uses_15_percent() {
        let results = CalculationResults::derive(CalculatorMode::Advanced, 70.0, 30.0, 50.0, 400.0);
        assert!((results.walkaway_price - 115.0).abs() < 1e-9);
    }

    #[test]
    fn test_result_serialization() {
        let results = CalculationResults::derive(CalculatorMode::Basic, 10.0, 5.0, 2.0, 350.0);
        let json = serde_json::to_string_pretty(&results).unwrap();
        assert!(json.contains("walkaway_price"));
        assert!(json.contains("\"mode\": \"Basic\""));
        let roundtrip: CalculationResults = serde_json::from_str(&json).unwrap();
        assert_eq!(results, roundtrip);
    }
}
