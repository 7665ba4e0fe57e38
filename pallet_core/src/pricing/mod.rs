//! # Pricing Engine
//!
//! Pure cost derivation from a pallet's bill of materials and a settings
//! snapshot. Nothing here performs I/O or mutates its inputs, so calling a
//! calculator twice with the same inputs yields identical results.
//!
//! ## Calculators
//!
//! - [`basic`] - one pallet, lumber curve, full delivery trip, 20% walkaway
//! - [`advanced`] - many pallets, lumber table, trip allocated per truck,
//!   15% walkaway per pallet, aggregate 30% net revenue price
//!
//! ## Building Blocks
//!
//! - [`board_feet`] - footage per row and per pallet
//! - [`lumber`] - curve and table lumber pricing
//! - [`options`] - finishing add-ons and processing
//! - [`fasteners`] - nail count and cost
//! - [`transport`] - trip and allocated delivery cost
//! - [`margins`] - walkaway, margin tiers, net revenue price
//! - [`results`] - the [`CalculationResults`] snapshot

pub mod advanced;
pub mod basic;
pub mod board_feet;
pub mod fasteners;
pub mod lumber;
pub mod margins;
pub mod options;
pub mod results;
pub mod transport;

// Re-export commonly used types and functions
pub use advanced::{compute_quote, pallet_issues, price_pallet, validate_pallets, validation_issues, PalletBreakdown, QuoteInput, QuoteSummary};
pub use basic::{basic_fastener_cost, compute_results};
pub use board_feet::{board_feet, pallet_board_feet, total_board_feet};
pub use fasteners::{fastener_cost, pallet_fastener_cost, pallet_fastener_count, FastenerCounts};
pub use lumber::{component_lumber_cost, lumber_curve_cost, pallet_lumber_price, total_lumber_price, CurveCost};
pub use margins::{net_revenue_price_30, price_per_board_foot, profit_margin, walkaway_price_15, walkaway_price_20};
pub use options::{additional_options_cost, lumber_processing_cost, pallet_processing_cost, processed_piece_count};
pub use results::{CalculationResults, CalculatorMode};
pub use transport::{allocated_transportation_cost, effective_pallets_per_truck, trip_transportation_cost};
