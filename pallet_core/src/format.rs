//! # Display Formatting
//!
//! Rounding and formatting rules for quote output. Amounts are rounded half
//! up on their exact binary value, the way fixed-point string formatting
//! does in most UI toolkits: a value that lies exactly halfway between two
//! candidates rounds away from zero, anything else rounds to the nearest.
//!
//! Only board feet are rounded during computation (see
//! [`crate::pricing::board_feet`]); every monetary value is rounded here, at
//! the point of display.
//!
//! ## Example
//!
//! ```rust
//! use pallet_core::format::{format_fastener_cost, format_money, round2};
//!
//! assert_eq!(round2(27.5), 27.5);
//! assert_eq!(format_money(129.0), "129.00");
//! assert_eq!(format_fastener_cost(0.0966), "0.097");
//! assert_eq!(format_fastener_cost(1.2345), "1.23");
//! ```

/// Round to `places` decimals, half away from zero on exact ties.
pub fn round_half_up(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    fixed(value, places).parse().unwrap_or(value)
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    round_half_up(value, 2)
}

/// Format with exactly `places` decimals using half-up rounding.
pub fn fixed(value: f64, places: usize) -> String {
    let target = if is_exact_tie(value, places) {
        // Step one ulp away from zero so the tie resolves upward.
        f64::from_bits(value.to_bits() + 1)
    } else {
        value
    };
    format!("{:.*}", places, target)
}

/// Format a dollar amount with 2 decimals.
pub fn format_money(value: f64) -> String {
    fixed(value, 2)
}

/// Format a dollar amount with a leading `$`.
pub fn format_dollars(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", fixed(-value, 2))
    } else {
        format!("${}", fixed(value, 2))
    }
}

/// Fastener costs under a dollar show 3 decimals, everything else 2.
pub fn format_fastener_cost(value: f64) -> String {
    if value < 1.0 {
        fixed(value, 3)
    } else {
        fixed(value, 2)
    }
}

/// Format board feet with 2 decimals.
pub fn format_board_feet(value: f64) -> String {
    fixed(value, 2)
}

/// True when `value` sits exactly on the midpoint at `places` decimals.
fn is_exact_tie(value: f64, places: usize) -> bool {
    if !value.is_finite() || value == 0.0 {
        return false;
    }
    // f64 Display prints exact digits at any precision, so 40 extra digits
    // are enough to see whether anything follows the 5.
    let expanded = format!("{:.*}", places + 40, value.abs());
    let Some((_, fraction)) = expanded.split_once('.') else {
        return false;
    };
    let tail = &fraction.as_bytes()[places..];
    tail.first() == Some(&b'5') && tail[1..].iter().all(|&b| b == b'0')
}
