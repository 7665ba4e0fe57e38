//! # Basic Calculator
//!
//! Prices one pallet on its primary lumber type's cost curve, adds option
//! and labor costs, and charges one full delivery trip.
//!
//! ```text
//! base = curve lumber cost + additional options + intricacy labor
//! total with transport = base + (delivery fee + miles * per-mile)
//! walkaway = total with transport * 1.20
//! ```

use tracing::debug;

use crate::location::ShippingLocation;
use crate::pallet::Pallet;
use crate::pricing::board_feet::pallet_board_feet;
use crate::pricing::fasteners::{fastener_cost, FastenerCounts};
use crate::pricing::lumber::lumber_curve_cost;
use crate::pricing::options::additional_options_cost;
use crate::pricing::results::{CalculationResults, CalculatorMode};
use crate::pricing::transport::trip_transportation_cost;
use crate::settings::GlobalSettings;

/// Compute the basic price snapshot for one pallet.
///
/// Returns `None` when the pallet has no lumber type or the settings have
/// no curve for it; that is the only case with no numeric fallback.
///
/// # Example
///
/// ```rust
/// use pallet_core::location::ShippingLocation;
/// use pallet_core::pallet::{Board, Pallet};
/// use pallet_core::pricing::compute_results;
/// use pallet_core::settings::{GlobalSettings, LumberPriceCurve};
///
/// let settings = GlobalSettings::default()
///     .with_lumber_price("SYP", LumberPriceCurve::new(10.0, 60.0, 350.0))
///     .with_delivery_fee("Flatbed", 200.0)
///     .with_per_mile_charge(2.0);
/// let location = ShippingLocation::new("loc-1", "Plant", "", 50.0);
/// let pallet = Pallet::new("p-1", "Deck only")
///     .with_deck_board(Board::new(10, 1.5, 5.5, 48.0, "SYP"))
///     .with_shipping("loc-1", "Flatbed");
///
/// let results = compute_results(&pallet, &settings, &location).unwrap();
/// assert_eq!(results.board_feet, 27.5);
/// assert_eq!(results.transportation_cost, 300.0);
/// ```
pub fn compute_results(
    pallet: &Pallet,
    settings: &GlobalSettings,
    location: &ShippingLocation,
) -> Option<CalculationResults> {
    let lumber_type = pallet.primary_lumber_type()?;
    let Some(curve) = settings.lumber_curve(lumber_type) else {
        debug!(pallet = %pallet.id, lumber_type, "no price curve for lumber type");
        return None;
    };

    let board_feet = pallet_board_feet(pallet);
    let lumber = lumber_curve_cost(curve, board_feet);
    let additional = additional_options_cost(&pallet.build_options, &settings.additional_costs);
    let intricacy = settings.intricacy_cost(pallet.build_intricacy);
    let total_cost = lumber.lumber_cost + additional + intricacy;

    let vehicle_type = pallet.transportation_type.as_deref().unwrap_or_default();
    let transportation_cost = trip_transportation_cost(settings, vehicle_type, location.distance_miles);

    debug!(
        pallet = %pallet.id,
        board_feet,
        lumber_cost = lumber.lumber_cost,
        additional,
        intricacy,
        transportation_cost,
        "basic pricing computed"
    );

    Some(CalculationResults::derive(
        CalculatorMode::Basic,
        total_cost,
        transportation_cost,
        board_feet,
        lumber.price_per_mbf,
    ))
}

/// Fastener dollars shown beside the basic results (not part of the total).
pub fn basic_fastener_cost(pallet: &Pallet, settings: &GlobalSettings) -> f64 {
    fastener_cost(
        FastenerCounts::from_pallet(pallet),
        pallet.fastener_type,
        &settings.fastener_costs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pallet::{Board, BuildIntricacy, BuildOptions, Stringer};
    use crate::settings::LumberPriceCurve;

    fn settings() -> GlobalSettings {
        GlobalSettings::default()
            .with_lumber_price("SYP", LumberPriceCurve::new(10.0, 60.0, 350.0))
            .with_delivery_fee("Flatbed", 200.0)
            .with_per_mile_charge(2.0)
            .with_intricacy_cost(BuildIntricacy::ManualEasy, 5.0)
    }

    fn location() -> ShippingLocation {
        ShippingLocation::new("loc-1", "Plant", "1 Mill Rd", 50.0)
    }

    fn hundred_board_feet() -> Pallet {
        // 4 rows of 25 bf each: 10 * 1.5 * 6 * 40 / 144 = 25
        let mut pallet = Pallet::new("p-1", "Heavy").with_shipping("loc-1", "Flatbed");
        for _ in 0..4 {
            pallet = pallet.with_deck_board(Board::new(10, 1.5, 6.0, 40.0, "SYP"));
        }
        pallet
    }

    #[test]
    fn test_full_breakdown() {
        let pallet = hundred_board_feet()
            .with_options(BuildOptions {
                painted: true,
                bands: true,
                ..Default::default()
            })
            .with_intricacy(BuildIntricacy::ManualEasy);

        let results = compute_results(&pallet, &settings(), &location()).unwrap();
        assert_eq!(results.board_feet, 100.0);
        assert_eq!(results.cost_per_mbf, 1290.0);
        // 129 lumber + 1.00 options + 5 labor
        assert!((results.total_cost - 135.0).abs() < 1e-9);
        assert_eq!(results.transportation_cost, 300.0);
        assert!((results.total_cost_with_transport - 435.0).abs() < 1e-9);
        assert!((results.walkaway_price - 522.0).abs() < 1e-9);
        assert!((results.price_per_board_foot - 5.22).abs() < 1e-9);
        assert_eq!(results.mode, CalculatorMode::Basic);
    }

    #[test]
    fn test_missing_curve_returns_none() {
        let pallet = Pallet::new("p", "Oak").with_deck_board(Board::new(1, 1.0, 1.0, 1.0, "Oak"));
        assert!(compute_results(&pallet, &settings(), &location()).is_none());

        let untyped = Pallet::new("p", "untyped").with_deck_board(Board::new(1, 1.0, 1.0, 1.0, ""));
        assert!(compute_results(&untyped, &settings(), &location()).is_none());
    }

    #[test]
    fn test_unknown_vehicle_charges_mileage_only() {
        let mut pallet = hundred_board_feet();
        pallet.transportation_type = Some("Sprinter".to_string());
        let results = compute_results(&pallet, &settings(), &location()).unwrap();
        assert_eq!(results.transportation_cost, 100.0);
    }

    #[test]
    fn test_idempotent() {
        let pallet = hundred_board_feet().with_stringer(Stringer::new(3, 3.5, 1.5, 48.0, "SYP"));
        let first = compute_results(&pallet, &settings(), &location());
        let second = compute_results(&pallet, &settings(), &location());
        assert_eq!(first, second);
    }

    #[test]
    fn test_margin_tiers_ordered() {
        let results = compute_results(&hundred_board_feet(), &settings(), &location()).unwrap();
        assert!(results.profit_margin_25 < results.profit_margin_30);
        assert!(results.profit_margin_30 < results.profit_margin_35);
    }

    #[test]
    fn test_basic_fastener_cost() {
        let pallet = Pallet::new("p", "nails")
            .with_deck_board(Board::new(2, 1.0, 1.0, 1.0, "SYP"))
            .with_lead_board(Board::new(1, 1.0, 1.0, 1.0, "SYP"))
            .with_stringer(Stringer::new(3, 1.0, 1.0, 1.0, "SYP"));
        assert!((basic_fastener_cost(&pallet, &settings()) - 0.0966).abs() < 1e-12);
    }
}
