//! # Transportation Cost
//!
//! The basic calculator charges one full trip to the quote. The advanced
//! calculator spreads a trip across the pallets that share the truck.

use crate::settings::GlobalSettings;

/// Basic calculator: `delivery fee + miles * per-mile charge`.
///
/// An unknown vehicle type contributes a 0 delivery fee.
pub fn trip_transportation_cost(settings: &GlobalSettings, vehicle_type: &str, distance_miles: f64) -> f64 {
    let delivery_fee = settings.delivery_fee(vehicle_type);
    delivery_fee + distance_miles * settings.per_mile_charge()
}

/// Truck capacity used for allocation; 0 or missing counts as 1.
pub fn effective_pallets_per_truck(pallets_per_truck: Option<u32>) -> u32 {
    match pallets_per_truck {
        Some(n) if n > 0 => n,
        _ => 1,
    }
}

/// Advanced calculator: one trip divided across the pallets on the truck.
///
/// # Example
///
/// ```rust
/// use pallet_core::pricing::allocated_transportation_cost;
/// use pallet_core::settings::GlobalSettings;
///
/// let settings = GlobalSettings::default()
///     .with_delivery_fee("Flatbed", 200.0)
///     .with_per_mile_charge(2.0);
///
/// assert_eq!(allocated_transportation_cost(&settings, "Flatbed", 50.0, Some(10)), 30.0);
/// ```
pub fn allocated_transportation_cost(
    settings: &GlobalSettings,
    transportation_type: &str,
    distance_miles: f64,
    pallets_per_truck: Option<u32>,
) -> f64 {
    let mileage_cost = distance_miles * settings.per_mile_charge();
    let trip = settings.delivery_fee(transportation_type) + mileage_cost;
    trip / f64::from(effective_pallets_per_truck(pallets_per_truck))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GlobalSettings {
        GlobalSettings::default()
            .with_delivery_fee("Flatbed", 200.0)
            .with_per_mile_charge(2.0)
    }

    #[test]
    fn test_trip_cost() {
        assert_eq!(trip_transportation_cost(&settings(), "Flatbed", 50.0), 300.0);
        assert_eq!(trip_transportation_cost(&settings(), "Unknown", 50.0), 100.0);
    }

    #[test]
    fn test_allocation_per_pallet() {
        assert_eq!(allocated_transportation_cost(&settings(), "Flatbed", 50.0, Some(10)), 30.0);
    }

    #[test]
    fn test_zero_or_missing_capacity_is_one() {
        assert_eq!(allocated_transportation_cost(&settings(), "Flatbed", 50.0, Some(0)), 300.0);
        assert_eq!(allocated_transportation_cost(&settings(), "Flatbed", 50.0, None), 300.0);
        assert!(allocated_transportation_cost(&settings(), "Flatbed", 50.0, Some(0)).is_finite());
    }

    #[test]
    fn test_unknown_vehicle_keeps_mileage() {
        assert_eq!(allocated_transportation_cost(&settings(), "Sprinter", 50.0, Some(4)), 25.0);
    }
}
