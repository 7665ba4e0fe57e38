//! # Board Footage
//!
//! One board foot is 144 cubic inches. Each component row is rounded to
//! 2 decimals on its own before pallet totals are summed, and the sum is
//! rounded again.

use crate::format::round2;
use crate::pallet::{LumberComponent, Pallet};

/// Cubic inches in one board foot
pub const CUBIC_INCHES_PER_BOARD_FOOT: f64 = 144.0;

/// Board feet of one component row.
///
/// Returns 0 when any of count, thickness, width or length is zero, which
/// covers partially filled rows.
///
/// # Example
///
/// ```rust
/// use pallet_core::pallet::Board;
/// use pallet_core::pricing::board_feet;
///
/// let deck = Board::new(10, 1.5, 5.5, 48.0, "SYP");
/// assert_eq!(board_feet(&deck), 27.5);
///
/// let unfinished = Board::new(10, 1.5, 0.0, 48.0, "SYP");
/// assert_eq!(board_feet(&unfinished), 0.0);
/// ```
pub fn board_feet(component: &dyn LumberComponent) -> f64 {
    let count = component.count();
    let thickness = component.thickness_in();
    let width = component.width_in();
    let length = component.length_in();

    if count == 0 || thickness == 0.0 || width == 0.0 || length == 0.0 {
        return 0.0;
    }
    // NaN inputs behave like empty fields
    if thickness.is_nan() || width.is_nan() || length.is_nan() {
        return 0.0;
    }

    round2(f64::from(count) * thickness * width * length / CUBIC_INCHES_PER_BOARD_FOOT)
}

/// Total board feet of a pallet (deck + lead + stringers).
pub fn pallet_board_feet(pallet: &Pallet) -> f64 {
    let sum: f64 = pallet.components().map(board_feet).sum();
    round2(sum)
}

/// Total board feet across several pallets, rounded once more.
pub fn total_board_feet<'a>(pallets: impl IntoIterator<Item = &'a Pallet>) -> f64 {
    let sum: f64 = pallets.into_iter().map(pallet_board_feet).sum();
    round2(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pallet::{Board, Stringer};

    #[test]
    fn test_standard_formula() {
        let board = Board::new(10, 1.5, 5.5, 48.0, "SYP");
        assert_eq!(board_feet(&board), 27.5);
    }

    #[test]
    fn test_zero_fields_yield_zero() {
        assert_eq!(board_feet(&Board::new(0, 1.5, 5.5, 48.0, "SYP")), 0.0);
        assert_eq!(board_feet(&Board::new(10, 0.0, 5.5, 48.0, "SYP")), 0.0);
        assert_eq!(board_feet(&Board::new(10, 1.5, 0.0, 48.0, "SYP")), 0.0);
        assert_eq!(board_feet(&Board::new(10, 1.5, 5.5, 0.0, "SYP")), 0.0);
        assert_eq!(board_feet(&Board::new(10, f64::NAN, 5.5, 48.0, "SYP")), 0.0);
    }

    #[test]
    fn test_stringer_uses_height() {
        // 3 * 3.5 * 1.5 * 48 / 144 = 5.25
        let stringer = Stringer::new(3, 3.5, 1.5, 48.0, "SYP");
        assert_eq!(board_feet(&stringer), 5.25);
    }

    #[test]
    fn test_rows_rounded_before_summing() {
        // 1 * 0.625 * 3.5 * 40 / 144 = 0.607638.. -> 0.61 per row
        let pallet = Pallet::new("p", "rounding")
            .with_deck_board(Board::new(1, 0.625, 3.5, 40.0, "SYP"))
            .with_deck_board(Board::new(1, 0.625, 3.5, 40.0, "SYP"))
            .with_deck_board(Board::new(1, 0.625, 3.5, 40.0, "SYP"));
        // Unrounded sum would be 1.8229 -> 1.82; row rounding gives 1.83
        assert_eq!(pallet_board_feet(&pallet), 1.83);
    }

    #[test]
    fn test_pallet_total() {
        let pallet = Pallet::new("p", "48x40")
            .with_deck_board(Board::new(10, 1.5, 5.5, 48.0, "SYP"))
            .with_lead_board(Board::new(0, 1.5, 5.5, 48.0, "SYP"))
            .with_stringer(Stringer::new(3, 3.5, 1.5, 48.0, "SYP"));
        assert_eq!(pallet_board_feet(&pallet), 32.75);
        assert_eq!(total_board_feet([&pallet, &pallet]), 65.5);
    }
}
