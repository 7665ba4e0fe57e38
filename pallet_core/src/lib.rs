//! # pallet_core - Pallet Quote Pricing Engine
//!
//! `pallet_core` prices custom wooden pallets for manufacturing quotes:
//! board footage from component dimensions, lumber cost from per-species
//! price curves or a flat price table, fastener and processing costs,
//! delivery cost per trip or per pallet, and the margin tiers quoted to the
//! customer. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure pricing**: the [`pricing`] functions take pallets and settings
//!   and return numbers; they never touch storage
//! - **Explicit collaborators**: settings, locations, quotes and drafts come
//!   through the traits in [`store`]
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use pallet_core::pallet::{Board, Pallet};
//! use pallet_core::pricing::pallet_board_feet;
//!
//! let pallet = Pallet::new("pallet-1", "48x40")
//!     .with_deck_board(Board::new(10, 1.5, 5.5, 48.0, "SYP"));
//! assert_eq!(pallet_board_feet(&pallet), 27.5);
//! ```
//!
//! ## Modules
//!
//! - [`pallet`] - Pallet bill of materials: boards, stringers, options
//! - [`settings`] - Global pricing settings
//! - [`location`] - Shipping destinations
//! - [`pricing`] - Basic and advanced calculators
//! - [`load_plan`] - Pallets-per-truck suggestions
//! - [`session`] - Form state, calculation and saving
//! - [`store`] - Store traits with in-memory and JSON-file implementations
//! - [`pdf`] - Quote sheet rendering
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic saves and locking

pub mod config;
pub mod errors;
pub mod file_io;
pub mod format;
pub mod ids;
pub mod load_plan;
pub mod location;
pub mod pallet;
pub mod pdf;
pub mod pricing;
pub mod quote;
pub mod session;
pub mod settings;
pub mod store;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use config::{load_config, AppConfig};
pub use errors::{QuoteError, QuoteResult};
pub use file_io::FileLock;
pub use location::ShippingLocation;
pub use pallet::{Board, Pallet, Stringer};
pub use pricing::{compute_quote, compute_results, CalculationResults, QuoteInput, QuoteSummary};
pub use quote::{Draft, Quote};
pub use session::QuoteSession;
pub use settings::GlobalSettings;
