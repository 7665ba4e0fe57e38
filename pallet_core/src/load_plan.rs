//! # Truck Load Planning
//!
//! Suggests a `pallets_per_truck` value from a pallet's footprint and a
//! vehicle's interior, for the three floor patterns used on the dock.
//!
//! ## Patterns
//!
//! - **Loaded long**: pallet length runs along the trailer
//! - **Loaded wide**: pallet length runs across the trailer
//! - **Pinwheeled**: one long and one wide pallet side by side, with the
//!   next row mirrored so rows nest. Two rows of four pallets consume
//!   `length + width` of trailer.
//!
//! ## Example
//!
//! ```rust
//! use pallet_core::load_plan::{plan_load, LoadingPattern, PalletFootprint};
//! use pallet_core::settings::VehicleDimensions;
//! use pallet_core::units::Inches;
//!
//! let footprint = PalletFootprint::new(Inches(48.0), Inches(40.0), Inches(60.0));
//! let trailer = VehicleDimensions::new(53.0, 8.5, 9.0, 45_000.0);
//!
//! let plan = plan_load(&footprint, &trailer, LoadingPattern::LoadedWide);
//! assert_eq!(plan.per_layer, 30);
//! assert_eq!(plan.pallets_per_truck, 30);
//! ```

use serde::{Deserialize, Serialize};

use crate::pallet::{LumberComponent, Pallet};
use crate::settings::VehicleDimensions;
use crate::units::{Inches, Pounds};

/// Floor loading pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadingPattern {
    LoadedLong,
    LoadedWide,
    Pinwheeled,
}

impl LoadingPattern {
    pub const ALL: [LoadingPattern; 3] = [
        LoadingPattern::LoadedLong,
        LoadingPattern::LoadedWide,
        LoadingPattern::Pinwheeled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LoadingPattern::LoadedLong => "Loaded Long",
            LoadingPattern::LoadedWide => "Loaded Wide",
            LoadingPattern::Pinwheeled => "Pinwheeled",
        }
    }
}

/// Outside dimensions of a built pallet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PalletFootprint {
    /// Along the stringers
    pub length: Inches,
    /// Along the deck boards
    pub width: Inches,
    pub height: Inches,
    /// Shipping weight of one pallet, when known
    #[serde(default)]
    pub weight: Option<Pounds>,
}

impl PalletFootprint {
    pub fn new(length: Inches, width: Inches, height: Inches) -> Self {
        PalletFootprint {
            length,
            width,
            height,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: Pounds) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Derive a footprint from the bill of materials.
    ///
    /// Length is the longest stringer, width the longest deck or lead
    /// board, height the tallest stringer plus two of the thickest deck
    /// board (top and bottom deck). `None` without stringers or boards.
    pub fn from_pallet(pallet: &Pallet) -> Option<Self> {
        let length = max_of(pallet.stringers.iter().map(|s| s.length_in()))?;
        let width = max_of(
            pallet
                .deck_boards
                .iter()
                .chain(pallet.lead_boards.iter())
                .map(|b| b.length_in()),
        )?;
        let stringer_height = max_of(pallet.stringers.iter().map(|s| s.thickness_in())).unwrap_or(0.0);
        let deck_thickness = max_of(pallet.deck_boards.iter().map(|b| b.thickness_in())).unwrap_or(0.0);

        Some(PalletFootprint::new(
            Inches(length),
            Inches(width),
            Inches(stringer_height + 2.0 * deck_thickness),
        ))
    }
}

fn max_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values
        .filter(|v| *v > 0.0)
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

/// How many pallets a vehicle carries in one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadPlan {
    pub pattern: LoadingPattern,
    /// Pallets on the trailer floor
    pub per_layer: u32,
    /// Stacked layers that fit under the roof
    pub layers: u32,
    /// Cap imposed by payload, if a pallet weight was given
    pub weight_limit: Option<u32>,
    pub pallets_per_truck: u32,
}

fn pinwheel_per_layer(trailer_length: Inches, trailer_width: Inches, length: Inches, width: Inches) -> u32 {
    if length + width > trailer_width {
        return 0;
    }
    let block = length + width;
    let blocks = trailer_length.fits(block);
    let remainder = trailer_length - block * f64::from(blocks);
    let tail = if remainder.0 >= length.0.max(width.0) { 2 } else { 0 };
    blocks.saturating_mul(4).saturating_add(tail)
}

/// Plan one pattern.
pub fn plan_load(footprint: &PalletFootprint, vehicle: &VehicleDimensions, pattern: LoadingPattern) -> LoadPlan {
    let trailer_length: Inches = vehicle.length.into();
    let trailer_width: Inches = vehicle.width.into();
    let trailer_height: Inches = vehicle.height.into();
    let (length, width) = (footprint.length, footprint.width);

    let per_layer = match pattern {
        LoadingPattern::LoadedLong => trailer_length.fits(length).saturating_mul(trailer_width.fits(width)),
        LoadingPattern::LoadedWide => trailer_length.fits(width).saturating_mul(trailer_width.fits(length)),
        LoadingPattern::Pinwheeled => pinwheel_per_layer(trailer_length, trailer_width, length, width),
    };

    let layers = if footprint.height.0 <= 0.0 {
        1
    } else {
        trailer_height.fits(footprint.height)
    };

    let weight_limit = match footprint.weight {
        Some(weight) if weight.0 > 0.0 && vehicle.max_weight.0 > 0.0 => Some(vehicle.max_weight.fits(weight)),
        _ => None,
    };

    let stacked = per_layer.saturating_mul(layers);
    let pallets_per_truck = weight_limit.map_or(stacked, |cap| stacked.min(cap));

    LoadPlan {
        pattern,
        per_layer,
        layers,
        weight_limit,
        pallets_per_truck,
    }
}

/// The pattern that carries the most pallets (first listed wins ties).
pub fn best_load_plan(footprint: &PalletFootprint, vehicle: &VehicleDimensions) -> LoadPlan {
    LoadingPattern::ALL
        .iter()
        .map(|&pattern| plan_load(footprint, vehicle, pattern))
        .fold(None::<LoadPlan>, |best, plan| match best {
            Some(b) if b.pallets_per_truck >= plan.pallets_per_truck => Some(b),
            _ => Some(plan),
        })
        .unwrap_or_else(|| plan_load(footprint, vehicle, LoadingPattern::LoadedLong))
}

/// The pattern that carries the most pallets.
pub fn best_pattern(footprint: &PalletFootprint, vehicle: &VehicleDimensions) -> LoadingPattern {
    best_load_plan(footprint, vehicle).pattern
}
