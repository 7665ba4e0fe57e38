//! # Walkaway Price and Margin Tiers
//!
//! Two walkaway multipliers are in use. The basic calculator quotes a 20%
//! walkaway, the advanced per-pallet view a 15% walkaway. They are separate
//! functions on purpose and must not be merged without a pricing decision.

/// Walkaway multiplier used by the basic calculator
pub const WALKAWAY_MULTIPLIER_BASIC: f64 = 1.20;

/// Walkaway multiplier used by the advanced per-pallet view
pub const WALKAWAY_MULTIPLIER_ADVANCED: f64 = 1.15;

/// Markup applied to the product subtotal for the aggregate net revenue price
pub const NET_REVENUE_MULTIPLIER: f64 = 1.3;

/// Basic calculator walkaway: total cost with transport plus 20%.
pub fn walkaway_price_20(total_cost_with_transport: f64) -> f64 {
    total_cost_with_transport * WALKAWAY_MULTIPLIER_BASIC
}

/// Advanced per-pallet walkaway: total cost with transport plus 15%.
pub fn walkaway_price_15(total_cost_with_transport: f64) -> f64 {
    total_cost_with_transport * WALKAWAY_MULTIPLIER_ADVANCED
}

/// `total * (1 + percent / 100)`
///
/// # Example
///
/// ```rust
/// use pallet_core::pricing::profit_margin;
///
/// assert_eq!(profit_margin(100.0, 25), 125.0);
/// ```
pub fn profit_margin(total_cost_with_transport: f64, percent: u32) -> f64 {
    total_cost_with_transport * (1.0 + f64::from(percent) / 100.0)
}

/// Walkaway spread over footage; 0 when there is no footage.
pub fn price_per_board_foot(walkaway_price: f64, board_feet: f64) -> f64 {
    if board_feet == 0.0 {
        0.0
    } else {
        walkaway_price / board_feet
    }
}

/// Aggregate "30% net revenue" price for a multi-pallet quote.
///
/// Marks up product costs by 30% and adds the quote-level delivery fee and
/// labor price. Per-pallet transportation is not part of this figure.
pub fn net_revenue_price_30(
    lumber_price: f64,
    processing_cost: f64,
    additional_options_cost: f64,
    delivery_fee: f64,
    labor_build_price: f64,
) -> f64 {
    (lumber_price + processing_cost + additional_options_cost) * NET_REVENUE_MULTIPLIER
        + delivery_fee
        + labor_build_price
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkaway_variants_differ() {
        assert!((walkaway_price_20(100.0) - 120.0).abs() < 1e-9);
        assert!((walkaway_price_15(100.0) - 115.0).abs() < 1e-9);
    }

    #[test]
    fn test_margins_are_monotonic() {
        for total in [0.01, 1.0, 129.0, 4_250.75] {
            let m20 = profit_margin(total, 20);
            let m25 = profit_margin(total, 25);
            let m30 = profit_margin(total, 30);
            let m35 = profit_margin(total, 35);
            assert!(m20 < m25 && m25 < m30 && m30 < m35);
        }
    }

    #[test]
    fn test_price_per_board_foot_guard() {
        assert_eq!(price_per_board_foot(120.0, 0.0), 0.0);
        assert_eq!(price_per_board_foot(120.0, 60.0), 2.0);
    }

    #[test]
    fn test_net_revenue_price() {
        // (100 + 5 + 1) * 1.3 + 250 + 400 = 787.8
        let price = net_revenue_price_30(100.0, 5.0, 1.0, 250.0, 400.0);
        assert!((price - 787.8).abs() < 1e-9);
    }
}
