//! Shipping destinations.

use serde::{Deserialize, Serialize};

/// A delivery destination, looked up by id from `Pallet::location_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingLocation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    /// One-way distance from the yard in miles
    pub distance_miles: f64,
}

impl ShippingLocation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, address: impl Into<String>, distance_miles: f64) -> Self {
        ShippingLocation {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            distance_miles,
        }
    }
}

/// Find a location by id.
pub fn find_location<'a>(locations: &'a [ShippingLocation], id: &str) -> Option<&'a ShippingLocation> {
    locations.iter().find(|l| l.id == id)
}
