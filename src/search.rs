use crate::geometry::{can_place, stock_dimensions};
use crate::types::{Position, Rect, StockSheet};

/// First free position for `size`, scanning `x` in the outer loop and `y` in
/// the inner loop, both ascending from the origin.
///
/// The scan order decides which of several valid positions wins, so the
/// result is always the smallest `x`, then the smallest `y`.
pub fn find_position(stock: &StockSheet, size: Rect) -> Option<Position> {
    let (stock_w, stock_h) = stock_dimensions(stock);
    if size.is_degenerate() || !size.fits_in(&Rect::new(stock_w, stock_h)) {
        return None;
    }

    for x in 0..=stock_w - size.w {
        for y in 0..=stock_h - size.h {
            let position = Position::new(x, y);
            if can_place(stock, position, size) {
                return Some(position);
            }
        }
    }
    None
}
