use crate::types::{Position, Rect, StockSheet};

/// Usable width and height of a sheet.
pub fn stock_dimensions(stock: &StockSheet) -> (u32, u32) {
    (stock.width(), stock.height())
}

/// True iff `size` placed at `position` stays inside the sheet and covers
/// only free cells.
pub fn can_place(stock: &StockSheet, position: Position, size: Rect) -> bool {
    let (stock_w, stock_h) = stock_dimensions(stock);
    let (Some(x_end), Some(y_end)) = (
        position.x.checked_add(size.w),
        position.y.checked_add(size.h),
    ) else {
        return false;
    };
    if x_end > stock_w || y_end > stock_h {
        return false;
    }
    (position.x..x_end).all(|x| (position.y..y_end).all(|y| stock.is_free(x, y)))
}
