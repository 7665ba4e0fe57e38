//! Finishing add-ons and lumber processing charges.

use crate::pallet::{BuildOptions, Pallet};
use crate::settings::{AdditionalCosts, GlobalSettings, BANDS_COST};

/// Lumber type that skips processing
pub const GREEN_PINE: &str = "Green Pine";

/// Flat add-on cost for the selected options.
///
/// Charged once per pallet set; never scaled by footage or count. Bands are
/// always [`BANDS_COST`].
///
/// # Example
///
/// ```rust
/// use pallet_core::pallet::BuildOptions;
/// use pallet_core::pricing::additional_options_cost;
/// use pallet_core::settings::AdditionalCosts;
///
/// let options = BuildOptions { painted: true, bands: true, ..Default::default() };
/// assert_eq!(additional_options_cost(&options, &AdditionalCosts::default()), 1.0);
/// ```
pub fn additional_options_cost(options: &BuildOptions, costs: &AdditionalCosts) -> f64 {
    let painted = if options.painted { costs.painted } else { 0.0 };
    let notched = if options.notched { costs.notched } else { 0.0 };
    let heat_treated = if options.heat_treated { costs.heat_treated } else { 0.0 };
    let bands = if options.bands { BANDS_COST } else { 0.0 };
    painted + notched + heat_treated + bands
}

/// Pieces that go through processing on one pallet.
///
/// Counts rows with a lumber type set, other than Green Pine, and a
/// positive count. Rows with no lumber type are skipped, not defaulted.
pub fn processed_piece_count(pallet: &Pallet) -> u64 {
    pallet
        .components()
        .filter(|c| {
            let lumber_type = c.lumber_type();
            !lumber_type.is_empty() && lumber_type != GREEN_PINE && c.count() > 0
        })
        .map(|c| u64::from(c.count()))
        .sum()
}

/// Processing cost for one pallet.
pub fn pallet_processing_cost(pallet: &Pallet, settings: &GlobalSettings) -> f64 {
    processed_piece_count(pallet) as f64 * settings.lumber_processing_cost
}

/// Processing cost across all pallets: total piece count times the rate.
pub fn lumber_processing_cost<'a>(pallets: impl IntoIterator<Item = &'a Pallet>, settings: &GlobalSettings) -> f64 {
    let pieces: u64 = pallets.into_iter().map(processed_piece_count).sum();
    pieces as f64 * settings.lumber_processing_cost
}
