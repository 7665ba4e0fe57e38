//! # Global Pricing Settings
//!
//! One settings document drives every calculation: lumber price curves,
//! labor tiers, option add-ons, delivery fees, vehicle dimensions, fastener
//! unit costs and the processing rate.
//!
//! Nested keys that are absent from a stored document are filled with the
//! declared defaults below when the document is deserialized, so formulas
//! never carry their own fallback constants. A missing document as a whole
//! is a [`QuoteError::ConfigurationMissing`](crate::errors::QuoteError)
//! and is never replaced with defaults.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "updated_at": "2026-10-01T12:00:00Z",
//!   "lumber_prices": { "SYP": { "a": 0.2, "b": 300.0, "c": 420.0 } },
//!   "build_intricacy_costs": { "Automated": 0.5, "Manual Easy": 1.25 },
//!   "additional_costs": { "painted": 0.75 },
//!   "transportation_costs": { "base_delivery_fee": { "Flatbed": 200.0 }, "per_mile_charge": 2.0 },
//!   "lumber_processing_cost": 0.05
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pallet_core::settings::{GlobalSettings, LumberPriceCurve, DEFAULT_LUMBER_PRICE_PER_MBF};
//!
//! let settings = GlobalSettings::default()
//!     .with_lumber_price("SYP", LumberPriceCurve::new(0.2, 300.0, 420.0));
//!
//! assert_eq!(settings.price_per_mbf("SYP"), 420.0);
//! assert_eq!(settings.price_per_mbf("Walnut"), DEFAULT_LUMBER_PRICE_PER_MBF);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::file_io::SCHEMA_VERSION;
use crate::pallet::{BuildIntricacy, FastenerType};
use crate::units::{Feet, Pounds};

/// Price per MBF when a lumber type is unset or absent from the table
pub const DEFAULT_LUMBER_PRICE_PER_MBF: f64 = 350.0;

/// Banding is always this flat amount; it is not configurable.
pub const BANDS_COST: f64 = 0.25;

/// V-shaped lumber cost curve: `|a * bf - b| + c` dollars per MBF.
///
/// The curve bottoms out at the floor price `c` when `bf = b / a`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LumberPriceCurve {
    #[serde(default)]
    pub a: f64,
    #[serde(default)]
    pub b: f64,
    #[serde(default = "default_lumber_floor")]
    pub c: f64,
}

impl LumberPriceCurve {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        LumberPriceCurve { a, b, c }
    }

    /// Board footage at which the curve reaches its floor
    pub fn breakeven_board_feet(&self) -> Option<f64> {
        if self.a == 0.0 {
            None
        } else {
            Some(self.b / self.a)
        }
    }
}

fn default_lumber_floor() -> f64 {
    DEFAULT_LUMBER_PRICE_PER_MBF
}

/// Flat add-on prices for finishing options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalCosts {
    pub painted: f64,
    pub notched: f64,
    pub heat_treated: f64,
}

impl Default for AdditionalCosts {
    fn default() -> Self {
        AdditionalCosts {
            painted: 0.75,
            notched: 0.85,
            heat_treated: 1.0,
        }
    }
}

/// Delivery pricing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportationCosts {
    /// Flat fee per trip, keyed by vehicle type
    pub base_delivery_fee: BTreeMap<String, f64>,
    /// Dollars per mile
    pub per_mile_charge: f64,
}

/// Interior cargo dimensions and payload of a vehicle type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleDimensions {
    pub length: Feet,
    pub width: Feet,
    pub height: Feet,
    pub max_weight: Pounds,
}

impl VehicleDimensions {
    pub fn new(length_ft: f64, width_ft: f64, height_ft: f64, max_weight_lb: f64) -> Self {
        VehicleDimensions {
            length: Feet(length_ft),
            width: Feet(width_ft),
            height: Feet(height_ft),
            max_weight: Pounds(max_weight_lb),
        }
    }
}

/// Per-nail unit costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastenerCosts {
    pub standard: f64,
    pub automatic: f64,
    pub specialty: f64,
}

impl Default for FastenerCosts {
    fn default() -> Self {
        FastenerCosts {
            standard: 0.0046,
            automatic: 0.0065,
            specialty: 0.01,
        }
    }
}

impl FastenerCosts {
    /// Unit cost for one fastener of the given type
    pub fn unit_cost(&self, fastener_type: FastenerType) -> f64 {
        match fastener_type {
            FastenerType::Standard => self.standard,
            FastenerType::AutomaticNail => self.automatic,
            FastenerType::SpecialtyNail => self.specialty,
        }
    }
}

fn default_processing_cost() -> f64 {
    0.05
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// Process-wide pricing configuration. The newest `updated_at` wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Schema version (for migration compatibility)
    #[serde(default = "default_version")]
    pub version: String,

    /// When this settings version was saved
    pub updated_at: DateTime<Utc>,

    /// Price curve per lumber type
    #[serde(default)]
    pub lumber_prices: BTreeMap<String, LumberPriceCurve>,

    /// Labor cost per pallet, keyed by intricacy label
    #[serde(default)]
    pub build_intricacy_costs: BTreeMap<String, f64>,

    #[serde(default)]
    pub additional_costs: AdditionalCosts,

    #[serde(default)]
    pub transportation_costs: TransportationCosts,

    #[serde(default)]
    pub vehicle_dimensions: BTreeMap<String, VehicleDimensions>,

    #[serde(default)]
    pub fastener_costs: FastenerCosts,

    /// Dollars per processed lumber piece
    #[serde(default = "default_processing_cost")]
    pub lumber_processing_cost: f64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            version: default_version(),
            updated_at: Utc::now(),
            lumber_prices: BTreeMap::new(),
            build_intricacy_costs: BTreeMap::new(),
            additional_costs: AdditionalCosts::default(),
            transportation_costs: TransportationCosts::default(),
            vehicle_dimensions: BTreeMap::new(),
            fastener_costs: FastenerCosts::default(),
            lumber_processing_cost: default_processing_cost(),
        }
    }
}

impl GlobalSettings {
    pub fn with_lumber_price(mut self, lumber_type: impl Into<String>, curve: LumberPriceCurve) -> Self {
        self.lumber_prices.insert(lumber_type.into(), curve);
        self
    }

    pub fn with_intricacy_cost(mut self, intricacy: BuildIntricacy, cost: f64) -> Self {
        self.build_intricacy_costs.insert(intricacy.label().to_string(), cost);
        self
    }

    pub fn with_delivery_fee(mut self, vehicle_type: impl Into<String>, fee: f64) -> Self {
        self.transportation_costs.base_delivery_fee.insert(vehicle_type.into(), fee);
        self
    }

    pub fn with_per_mile_charge(mut self, per_mile_charge: f64) -> Self {
        self.transportation_costs.per_mile_charge = per_mile_charge;
        self
    }

    pub fn with_vehicle(mut self, vehicle_type: impl Into<String>, dimensions: VehicleDimensions) -> Self {
        self.vehicle_dimensions.insert(vehicle_type.into(), dimensions);
        self
    }

    /// Price curve for a lumber type, if the table has one.
    pub fn lumber_curve(&self, lumber_type: &str) -> Option<&LumberPriceCurve> {
        self.lumber_prices.get(lumber_type)
    }

    /// Table price per MBF (the curve floor `c`), 350 when unknown or unset.
    pub fn price_per_mbf(&self, lumber_type: &str) -> f64 {
        self.lumber_curve(lumber_type)
            .map(|curve| curve.c)
            .unwrap_or(DEFAULT_LUMBER_PRICE_PER_MBF)
    }

    /// Delivery fee for a vehicle type, 0 when unknown.
    pub fn delivery_fee(&self, vehicle_type: &str) -> f64 {
        self.transportation_costs
            .base_delivery_fee
            .get(vehicle_type)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn per_mile_charge(&self) -> f64 {
        self.transportation_costs.per_mile_charge
    }

    /// Labor cost for an intricacy tier, 0 when unset or unpriced.
    pub fn intricacy_cost(&self, intricacy: Option<BuildIntricacy>) -> f64 {
        intricacy
            .and_then(|tier| self.build_intricacy_costs.get(tier.label()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn vehicle(&self, vehicle_type: &str) -> Option<&VehicleDimensions> {
        self.vehicle_dimensions.get(vehicle_type)
    }

    /// Vehicle types known to either the fee table or the dimension table
    pub fn vehicle_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .transportation_costs
            .base_delivery_fee
            .keys()
            .chain(self.vehicle_dimensions.keys())
            .map(String::as_str)
            .collect();
        types.sort_unstable();
        types.dedup();
        types
    }
}

/// Pick the most recently updated settings version.
pub fn latest<'a>(versions: impl IntoIterator<Item = &'a GlobalSettings>) -> Option<&'a GlobalSettings> {
    versions.into_iter().max_by_key(|s| s.updated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_nested_defaults_fill_missing_keys() {
        let json = r#"{
            "updated_at": "2026-10-01T12:00:00Z",
            "lumber_prices": { "SYP": { "a": 0.2, "b": 300.0 } },
            "additional_costs": { "painted": 1.1 }
        }"#;
        let settings: GlobalSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.version, SCHEMA_VERSION);
        assert_eq!(settings.price_per_mbf("SYP"), 350.0);
        assert_eq!(settings.additional_costs.painted, 1.1);
        assert_eq!(settings.additional_costs.notched, 0.85);
        assert_eq!(settings.additional_costs.heat_treated, 1.0);
        assert_eq!(settings.fastener_costs.unit_cost(FastenerType::Standard), 0.0046);
        assert_eq!(settings.lumber_processing_cost, 0.05);
        assert_eq!(settings.per_mile_charge(), 0.0);
    }

    #[test]
    fn test_missing_updated_at_is_rejected() {
        let result: Result<GlobalSettings, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_lookups_and_fallbacks() {
        let settings = GlobalSettings::default()
            .with_lumber_price("Oak", LumberPriceCurve::new(1.0, 10.0, 600.0))
            .with_delivery_fee("Flatbed", 200.0)
            .with_intricacy_cost(BuildIntricacy::ManualEasy, 1.5);

        assert_eq!(settings.price_per_mbf("Oak"), 600.0);
        assert_eq!(settings.price_per_mbf(""), 350.0);
        assert_eq!(settings.delivery_fee("Flatbed"), 200.0);
        assert_eq!(settings.delivery_fee("Sprinter"), 0.0);
        assert_eq!(settings.intricacy_cost(Some(BuildIntricacy::ManualEasy)), 1.5);
        assert_eq!(settings.intricacy_cost(Some(BuildIntricacy::Automated)), 0.0);
        assert_eq!(settings.intricacy_cost(None), 0.0);
    }

    #[test]
    fn test_breakeven() {
        assert_eq!(LumberPriceCurve::new(10.0, 60.0, 350.0).breakeven_board_feet(), Some(6.0));
        assert_eq!(LumberPriceCurve::new(0.0, 60.0, 350.0).breakeven_board_feet(), None);
    }

    #[test]
    fn test_latest_wins() {
        let mut older = GlobalSettings::default();
        older.updated_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        older.lumber_processing_cost = 0.01;
        let mut newer = GlobalSettings::default();
        newer.updated_at = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        newer.lumber_processing_cost = 0.09;

        let versions = vec![newer.clone(), older];
        assert_eq!(latest(&versions).map(|s| s.lumber_processing_cost), Some(0.09));
        assert!(latest(std::iter::empty()).is_none());
    }

    #[test]
    fn test_vehicle_types_merged() {
        let settings = GlobalSettings::default()
            .with_delivery_fee("Flatbed", 200.0)
            .with_vehicle("Flatbed", VehicleDimensions::new(48.0, 8.5, 8.0, 48_000.0))
            .with_vehicle("Box Truck", VehicleDimensions::new(26.0, 8.0, 8.0, 10_000.0));
        assert_eq!(settings.vehicle_types(), vec!["Box Truck", "Flatbed"]);
    }
}
