//! # Advanced (Multi-Pallet) Calculator
//!
//! Prices every pallet of a quote on the lumber price table, allocates each
//! pallet's delivery trip across its truck, and rolls the quote up into an
//! aggregate "30% net revenue" price.
//!
//! Per pallet:
//!
//! ```text
//! total cost = table lumber price + intricacy + processing + fasteners
//! transportation = (delivery fee + miles * per-mile) / pallets per truck
//! walkaway = (total cost + transportation) * 1.15
//! ```
//!
//! For the quote:
//!
//! ```text
//! net revenue 30 = (lumber + processing + options) * 1.3 + delivery fee + labor
//! ```
//!
//! Every pallet must name a known shipping location and a transportation
//! type before anything is priced.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{QuoteError, QuoteResult};
use crate::location::{find_location, ShippingLocation};
use crate::pallet::{BuildOptions, Pallet};
use crate::pricing::board_feet::{pallet_board_feet, total_board_feet};
use crate::pricing::fasteners::{pallet_fastener_cost, pallet_fastener_count};
use crate::pricing::lumber::pallet_lumber_price;
use crate::pricing::margins::net_revenue_price_30;
use crate::pricing::options::{additional_options_cost, lumber_processing_cost, pallet_processing_cost};
use crate::pricing::results::{CalculationResults, CalculatorMode};
use crate::pricing::transport::allocated_transportation_cost;
use crate::settings::GlobalSettings;

/// Everything the advanced calculator needs besides settings and locations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteInput {
    pub pallets: Vec<Pallet>,

    /// Finishing options for the whole pallet set
    #[serde(default)]
    pub build_options: BuildOptions,

    /// Flat delivery fee entered once for the quote
    #[serde(default)]
    pub delivery_fee: f64,

    /// Flat labor price entered once for the quote
    #[serde(default)]
    pub labor_build_price: f64,
}

/// Cost lines for one pallet of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalletBreakdown {
    pub pallet_id: String,
    pub pallet_name: String,
    pub board_feet: f64,
    pub lumber_price: f64,
    pub processing_cost: f64,
    pub fastener_count: u64,
    pub fastener_cost: f64,
    /// Labor tier cost from `build_intricacy`
    #[serde(default)]
    pub intricacy_cost: f64,
    pub transportation_cost: f64,
    pub results: CalculationResults,
}

/// Aggregate result of a multi-pallet quote.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub pallets: Vec<PalletBreakdown>,
    pub total_board_feet: f64,
    pub lumber_price: f64,
    pub processing_cost: f64,
    pub additional_options_cost: f64,
    pub fastener_cost: f64,
    /// Sum of the per-pallet allocated transportation
    pub transportation_cost: f64,
    pub delivery_fee: f64,
    pub labor_build_price: f64,
    pub net_revenue_price_30: f64,
}

impl QuoteSummary {
    /// Breakdown for one pallet id
    pub fn pallet(&self, pallet_id: &str) -> Option<&PalletBreakdown> {
        self.pallets.iter().find(|p| p.pallet_id == pallet_id)
    }
}

fn pallet_label(pallet: &Pallet, index: usize) -> String {
    if pallet.name.trim().is_empty() {
        format!("Pallet {}", index + 1)
    } else {
        pallet.name.clone()
    }
}

/// Every blocking problem across the pallets, in pallet order.
pub fn validation_issues(pallets: &[Pallet], locations: &[ShippingLocation]) -> Vec<QuoteError> {
    pallets
        .iter()
        .enumerate()
        .flat_map(|(index, pallet)| pallet_issues(pallet, index, locations))
        .collect()
}

/// Blocking problems for the pallet at `index` on the form. Unnamed
/// pallets are labelled by position.
pub fn pallet_issues(pallet: &Pallet, index: usize, locations: &[ShippingLocation]) -> Vec<QuoteError> {
    let mut issues = Vec::new();
    let label = pallet_label(pallet, index);

    match pallet.location_id.as_deref().filter(|id| !id.is_empty()) {
        None => issues.push(QuoteError::validation_failed(
            label.clone(),
            "location_id",
            "Select a shipping location",
        )),
        Some(id) if find_location(locations, id).is_none() => issues.push(QuoteError::validation_failed(
            label.clone(),
            "location_id",
            format!("Shipping location '{}' no longer exists", id),
        )),
        Some(_) => {}
    }

    if pallet
        .transportation_type
        .as_deref()
        .map_or(true, |t| t.trim().is_empty())
    {
        issues.push(QuoteError::validation_failed(
            label,
            "transportation_type",
            "Select a transportation type",
        ));
    }

    issues
}

/// Fail with the first blocking problem, if any.
pub fn validate_pallets(pallets: &[Pallet], locations: &[ShippingLocation]) -> QuoteResult<()> {
    match validation_issues(pallets, locations).into_iter().next() {
        Some(issue) => Err(issue),
        None => Ok(()),
    }
}

/// Price one pallet of a validated quote.
pub fn price_pallet(pallet: &Pallet, settings: &GlobalSettings, location: &ShippingLocation) -> PalletBreakdown {
    let board_feet = pallet_board_feet(pallet);
    let lumber_price = pallet_lumber_price(pallet, settings);
    let processing_cost = pallet_processing_cost(pallet, settings);
    let fastener_count = pallet_fastener_count(pallet);
    let fastener_cost = pallet_fastener_cost(pallet, &settings.fastener_costs);
    let intricacy_cost = settings.intricacy_cost(pallet.build_intricacy);

    let transportation_type = pallet.transportation_type.as_deref().unwrap_or_default();
    let transportation_cost = allocated_transportation_cost(
        settings,
        transportation_type,
        location.distance_miles,
        pallet.pallets_per_truck,
    );

    let cost_per_mbf = if board_feet == 0.0 {
        0.0
    } else {
        lumber_price / board_feet * 1000.0
    };
    let total_cost = lumber_price + intricacy_cost + processing_cost + fastener_cost;

    PalletBreakdown {
        pallet_id: pallet.id.clone(),
        pallet_name: pallet.name.clone(),
        board_feet,
        lumber_price,
        processing_cost,
        fastener_count,
        fastener_cost,
        intricacy_cost,
        transportation_cost,
        results: CalculationResults::derive(
            CalculatorMode::Advanced,
            total_cost,
            transportation_cost,
            board_feet,
            cost_per_mbf,
        ),
    }
}

/// Validate and price a whole quote.
///
/// # Example
///
/// ```rust
/// use pallet_core::location::ShippingLocation;
/// use pallet_core::pallet::{Board, Pallet};
/// use pallet_core::pricing::{compute_quote, QuoteInput};
/// use pallet_core::settings::GlobalSettings;
///
/// let settings = GlobalSettings::default()
///     .with_delivery_fee("Flatbed", 200.0)
///     .with_per_mile_charge(2.0);
/// let locations = vec![ShippingLocation::new("loc-1", "Plant", "", 50.0)];
/// let input = QuoteInput {
///     pallets: vec![Pallet::new("p-1", "48x40")
///         .with_deck_board(Board::new(10, 1.5, 5.5, 48.0, "SYP"))
///         .with_shipping("loc-1", "Flatbed")
///         .with_pallets_per_truck(10)],
///     ..Default::default()
/// };
///
/// let summary = compute_quote(&input, &settings, &locations).unwrap();
/// assert_eq!(summary.pallets[0].transportation_cost, 30.0);
/// ```
pub fn compute_quote(
    input: &QuoteInput,
    settings: &GlobalSettings,
    locations: &[ShippingLocation],
) -> QuoteResult<QuoteSummary> {
    validate_pallets(&input.pallets, locations)?;

    let mut breakdowns = Vec::with_capacity(input.pallets.len());
    for pallet in &input.pallets {
        let location_id = pallet.location_id.as_deref().unwrap_or_default();
        let location = find_location(locations, location_id)
            .ok_or_else(|| QuoteError::not_found("ShippingLocation", location_id))?;
        breakdowns.push(price_pallet(pallet, settings, location));
    }

    let lumber_price: f64 = breakdowns.iter().map(|b| b.lumber_price).sum();
    let processing_cost = lumber_processing_cost(&input.pallets, settings);
    let additional = additional_options_cost(&input.build_options, &settings.additional_costs);
    let fastener_cost: f64 = breakdowns.iter().map(|b| b.fastener_cost).sum();
    let transportation_cost: f64 = breakdowns.iter().map(|b| b.transportation_cost).sum();

    let net_revenue = net_revenue_price_30(
        lumber_price,
        processing_cost,
        additional,
        input.delivery_fee,
        input.labor_build_price,
    );

    debug!(
        pallets = breakdowns.len(),
        lumber_price,
        processing_cost,
        additional,
        net_revenue,
        "quote priced"
    );

    Ok(QuoteSummary {
        total_board_feet: total_board_feet(&input.pallets),
        pallets: breakdowns,
        lumber_price,
        processing_cost,
        additional_options_cost: additional,
        fastener_cost,
        transportation_cost,
        delivery_fee: input.delivery_fee,
        labor_build_price: input.labor_build_price,
        net_revenue_price_30: net_revenue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pallet::{Board, BuildIntricacy, FastenerType, Stringer};
    use crate::settings::LumberPriceCurve;

    fn settings() -> GlobalSettings {
        GlobalSettings::default()
            .with_lumber_price("Oak", LumberPriceCurve::new(0.0, 0.0, 800.0))
            .with_delivery_fee("Flatbed", 200.0)
            .with_per_mile_charge(2.0)
    }

    fn locations() -> Vec<ShippingLocation> {
        vec![ShippingLocation::new("loc-1", "Plant", "1 Mill Rd", 50.0)]
    }

    fn oak_pallet(id: &str) -> Pallet {
        Pallet::new(id, format!("Pallet {}", id))
            .with_deck_board(Board::new(2, 1.5, 5.5, 48.0, "Oak"))
            .with_lead_board(Board::new(1, 1.5, 5.5, 48.0, "Oak"))
            .with_stringer(Stringer::new(3, 3.5, 1.5, 48.0, "Oak"))
            .with_fastener(FastenerType::Standard)
            .with_shipping("loc-1", "Flatbed")
            .with_pallets_per_truck(10)
    }

    #[test]
    fn test_validation_requires_location_and_transport() {
        let mut missing = Pallet::new("p-1", "");
        missing.location_id = Some(String::new());
        let unknown = Pallet::new("p-2", "Ghost").with_shipping("loc-9", "Flatbed");

        let issues = validation_issues(&[missing.clone(), unknown], &locations());
        assert_eq!(issues.len(), 3);
        assert_eq!(
            issues[0],
            QuoteError::validation_failed("Pallet 1", "location_id", "Select a shipping location")
        );
        assert!(matches!(&issues[1], QuoteError::ValidationFailed { field, .. } if field == "transportation_type"));
        assert!(matches!(&issues[2], QuoteError::ValidationFailed { pallet, .. } if pallet == "Ghost"));

        let input = QuoteInput {
            pallets: vec![missing],
            ..Default::default()
        };
        let err = compute_quote(&input, &settings(), &locations()).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_per_pallet_breakdown() {
        let summary = compute_quote(
            &QuoteInput {
                pallets: vec![oak_pallet("a")],
                ..Default::default()
            },
            &settings(),
            &locations(),
        )
        .unwrap();
        let line = summary.pallet("a").unwrap();

        // deck 2*1.5*5.5*48/144 = 5.5, lead 2.75, stringers 5.25
        assert_eq!(line.board_feet, 13.5);
        assert!((line.lumber_price - 10.8).abs() < 1e-9);
        // 6 pieces * 0.05
        assert!((line.processing_cost - 0.3).abs() < 1e-9);
        assert_eq!(line.fastener_count, 21);
        assert!((line.fastener_cost - 0.0966).abs() < 1e-12);
        assert_eq!(line.transportation_cost, 30.0);
        assert!((line.results.cost_per_mbf - 800.0).abs() < 1e-9);

        let total = 10.8 + 0.3 + 0.0966 + 30.0;
        assert!((line.results.total_cost_with_transport - total).abs() < 1e-9);
        assert!((line.results.walkaway_price - total * 1.15).abs() < 1e-9);
        assert_eq!(line.results.mode, CalculatorMode::Advanced);
    }

    #[test]
    fn test_intricacy_adds_to_pallet_cost() {
        let settings = settings().with_intricacy_cost(BuildIntricacy::ManualIntricate, 10.0);
        let plain = price_pallet(&oak_pallet("a"), &settings, &locations()[0]);
        let intricate = price_pallet(
            &oak_pallet("b").with_intricacy(BuildIntricacy::ManualIntricate),
            &settings,
            &locations()[0],
        );

        assert_eq!(plain.intricacy_cost, 0.0);
        assert_eq!(intricate.intricacy_cost, 10.0);
        assert!((intricate.results.total_cost_with_transport - plain.results.total_cost_with_transport - 10.0).abs() < 1e-9);
        assert!(intricate.results.walkaway_price > plain.results.walkaway_price);
    }

    #[test]
    fn test_aggregate_net_revenue() {
        let input = QuoteInput {
            pallets: vec![oak_pallet("a"), oak_pallet("b")],
            build_options: BuildOptions {
                heat_treated: true,
                ..Default::default()
            },
            delivery_fee: 250.0,
            labor_build_price: 400.0,
        };
        let summary = compute_quote(&input, &settings(), &locations()).unwrap();

        assert_eq!(summary.total_board_feet, 27.0);
        assert!((summary.lumber_price - 21.6).abs() < 1e-9);
        assert!((summary.processing_cost - 0.6).abs() < 1e-9);
        assert_eq!(summary.additional_options_cost, 1.0);
        assert_eq!(summary.transportation_cost, 60.0);

        // (21.6 + 0.6 + 1.0) * 1.3 + 250 + 400, per-pallet transport excluded
        let expected = (21.6 + 0.6 + 1.0) * 1.3 + 650.0;
        assert!((summary.net_revenue_price_30 - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_lumber_uses_fallback_price() {
        let pallet = Pallet::new("p", "untyped")
            .with_deck_board(Board::new(10, 1.5, 5.5, 48.0, ""))
            .with_shipping("loc-1", "Flatbed");
        let summary = compute_quote(
            &QuoteInput {
                pallets: vec![pallet],
                ..Default::default()
            },
            &settings(),
            &locations(),
        )
        .unwrap();
        // 27.5 bf * 350 / 1000, no processing for untyped rows
        assert!((summary.lumber_price - 9.625).abs() < 1e-9);
        assert_eq!(summary.processing_cost, 0.0);
        // No capacity given: the whole trip lands on this pallet
        assert_eq!(summary.transportation_cost, 300.0);
    }

    #[test]
    fn test_empty_quote() {
        let summary = compute_quote(&QuoteInput::default(), &settings(), &locations()).unwrap();
        assert!(summary.pallets.is_empty());
        assert_eq!(summary.net_revenue_price_30, 0.0);
    }
}
