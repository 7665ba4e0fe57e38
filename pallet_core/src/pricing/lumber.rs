//! # Lumber Cost
//!
//! Two pricing strategies exist side by side:
//!
//! - **Curve** (basic calculator): the whole pallet's footage is priced on
//!   the V-shaped curve `|a * bf - b| + c` for one lumber type.
//! - **Table** (advanced calculator): every component row is priced at the
//!   table's flat `c` for its own lumber type, with a 350/MBF fallback.
//!
//! Table totals are accumulated without intermediate rounding.

use serde::{Deserialize, Serialize};

use crate::pallet::{LumberComponent, Pallet};
use crate::pricing::board_feet::board_feet;
use crate::settings::{GlobalSettings, LumberPriceCurve};

/// Output of the curve strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveCost {
    /// Dollars per thousand board feet at this footage
    pub price_per_mbf: f64,
    /// Lumber dollars for the whole footage
    pub lumber_cost: f64,
}

/// Price `board_feet` on a lumber curve.
///
/// # Example
///
/// ```rust
/// use pallet_core::pricing::lumber_curve_cost;
/// use pallet_core::settings::LumberPriceCurve;
///
/// let cost = lumber_curve_cost(&LumberPriceCurve::new(10.0, 60.0, 350.0), 100.0);
/// assert_eq!(cost.price_per_mbf, 1290.0);
/// assert_eq!(cost.lumber_cost, 129.0);
/// ```
pub fn lumber_curve_cost(curve: &LumberPriceCurve, board_feet: f64) -> CurveCost {
    let price_per_mbf = (curve.a * board_feet - curve.b).abs() + curve.c;
    let lumber_cost = if board_feet == 0.0 {
        0.0
    } else {
        price_per_mbf / 1000.0 * board_feet
    };
    CurveCost {
        price_per_mbf,
        lumber_cost,
    }
}

/// Table price of one component row.
pub fn component_lumber_cost(component: &dyn LumberComponent, settings: &GlobalSettings) -> f64 {
    let price_per_mbf = settings.price_per_mbf(component.lumber_type());
    board_feet(component) * price_per_mbf / 1000.0
}

/// Table price of a whole pallet (sum of its component rows).
pub fn pallet_lumber_price(pallet: &Pallet, settings: &GlobalSettings) -> f64 {
    pallet
        .components()
        .map(|c| component_lumber_cost(c, settings))
        .sum()
}

/// Table price across all pallets of a quote.
pub fn total_lumber_price<'a>(pallets: impl IntoIterator<Item = &'a Pallet>, settings: &GlobalSettings) -> f64 {
    pallets
        .into_iter()
        .map(|p| pallet_lumber_price(p, settings))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pallet::{Board, Stringer};

    #[test]
    fn test_curve_example() {
        let cost = lumber_curve_cost(&LumberPriceCurve::new(10.0, 60.0, 350.0), 100.0);
        assert_eq!(cost.price_per_mbf, 1290.0);
        assert_eq!(cost.lumber_cost, 129.0);
    }

    #[test]
    fn test_curve_is_v_shaped() {
        let curve = LumberPriceCurve::new(10.0, 60.0, 350.0);
        let below = lumber_curve_cost(&curve, 4.0).price_per_mbf;
        let at = lumber_curve_cost(&curve, 6.0).price_per_mbf;
        let above = lumber_curve_cost(&curve, 8.0).price_per_mbf;
        assert_eq!(at, 350.0);
        assert_eq!(below, 370.0);
        assert_eq!(above, 370.0);
    }

    #[test]
    fn test_zero_footage_costs_nothing() {
        let cost = lumber_curve_cost(&LumberPriceCurve::new(10.0, 60.0, 350.0), 0.0);
        assert_eq!(cost.lumber_cost, 0.0);
        assert_eq!(cost.price_per_mbf, 410.0);
    }

    #[test]
    fn test_table_price_with_fallback() {
        let settings = GlobalSettings::default()
            .with_lumber_price("Oak", LumberPriceCurve::new(0.0, 0.0, 800.0));

        // 27.5 bf of Oak at 800/MBF = 22.0
        let oak = Board::new(10, 1.5, 5.5, 48.0, "Oak");
        assert_eq!(component_lumber_cost(&oak, &settings), 22.0);

        // Unset lumber type falls back to 350/MBF: 5.25 * 350 / 1000 = 1.8375
        let unset = Stringer::new(3, 3.5, 1.5, 48.0, "");
        assert!((component_lumber_cost(&unset, &settings) - 1.8375).abs() < 1e-12);

        let pallet = Pallet::new("p", "mixed").with_deck_board(oak).with_stringer(unset);
        let price = pallet_lumber_price(&pallet, &settings);
        assert!((price - 23.8375).abs() < 1e-12);
        assert!((total_lumber_price([&pallet, &pallet], &settings) - 47.675).abs() < 1e-12);
    }
}
