use crate::pattern::{Pattern, PatternStore, PlacementHint};
use crate::search::find_position;
use crate::types::{PlacementAction, Position, ProductDemand, StockSheet};

/// Placement picked by the waste-minimizing column generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub action: PlacementAction,
    /// `sheet_area - product_area`. Ignores what is already filled on the sheet.
    pub waste: u64,
}

/// First-fit over patterns, in creation order.
///
/// Each pattern's sheet is searched live, so hints only decide which sheets
/// are visited and in which order.
pub fn solve_master(
    product: &ProductDemand,
    stocks: &[StockSheet],
    patterns: &PatternStore,
) -> PlacementAction {
    for pattern in patterns {
        let Some(stock) = stocks.get(pattern.stock_idx) else {
            tracing::warn!(
                stock_idx = pattern.stock_idx,
                stocks = stocks.len(),
                "skipping pattern for unknown stock"
            );
            continue;
        };
        if !product.size.fits_in(&stock.size()) {
            continue;
        }
        if let Some(position) = find_position(stock, product.size) {
            return PlacementAction::placed(pattern.stock_idx, product.size, position);
        }
    }
    PlacementAction::NONE
}

/// Scans every sheet directly and keeps the feasible one with the least
/// waste. Ties go to the lower index.
pub fn generate_column(product: &ProductDemand, stocks: &[StockSheet]) -> Option<Column> {
    let mut best: Option<Column> = None;

    for (stock_idx, stock) in stocks.iter().enumerate() {
        if !product.size.fits_in(&stock.size()) {
            continue;
        }
        let Some(position) = find_position(stock, product.size) else {
            continue;
        };
        let waste = stock.size().area() - product.size.area();
        if best.is_none_or(|b| waste < b.waste) {
            best = Some(Column {
                action: PlacementAction::placed(stock_idx, product.size, position),
                waste,
            });
        }
    }

    best
}

/// Anchors the product at the origin of the first sheet that is large
/// enough and records the association as a new pattern.
///
/// Occupancy is not consulted: the origin is returned even when it is
/// already filled.
pub fn generate_new_pattern(
    product: &ProductDemand,
    stocks: &[StockSheet],
    patterns: &mut PatternStore,
) -> PlacementAction {
    let Some(stock_idx) = stocks
        .iter()
        .position(|s| product.size.fits_in(&s.size()))
    else {
        return PlacementAction::NONE;
    };

    patterns.push(Pattern {
        stock_idx,
        hints: vec![PlacementHint {
            size: product.size,
            position: Position::ORIGIN,
        }],
    });
    tracing::debug!(stock_idx, size = %product.size, "recorded new pattern");
    PlacementAction::placed(stock_idx, product.size, Position::ORIGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn demand(w: u32, h: u32) -> ProductDemand {
        ProductDemand::new(Rect::new(w, h), 1)
    }

    fn store_for(stocks: &[StockSheet]) -> PatternStore {
        let mut store = PatternStore::new();
        store.initialize(stocks);
        store
    }

    #[test]
    fn test_master_first_fit_over_patterns() {
        // Both sheets fit; the first pattern wins even though sheet 1 is tighter.
        let stocks = vec![StockSheet::new(10, 10), StockSheet::new(2, 2)];
        let action = solve_master(&demand(2, 2), &stocks, &store_for(&stocks));
        assert_eq!(action, PlacementAction::placed(0, Rect::new(2, 2), Position::ORIGIN));
    }

    #[test]
    fn test_master_skips_small_and_full_sheets() {
        let mut full = StockSheet::new(4, 4);
        full.fill(Position::ORIGIN, Rect::new(4, 4), 0);
        let mut partial = StockSheet::new(4, 4);
        partial.fill(Position::ORIGIN, Rect::new(2, 4), 0);
        let stocks = vec![StockSheet::new(1, 1), full, partial];
        let action = solve_master(&demand(2, 2), &stocks, &store_for(&stocks));
        assert_eq!(action, PlacementAction::placed(2, Rect::new(2, 2), Position::new(2, 0)));
    }

    #[test]
    fn test_master_without_fit_is_sentinel() {
        let stocks = vec![StockSheet::new(3, 3)];
        let action = solve_master(&demand(4, 4), &stocks, &store_for(&stocks));
        assert_eq!(action, PlacementAction::NONE);
    }

    #[test]
    fn test_master_follows_pattern_order() {
        let stocks = vec![StockSheet::new(5, 5), StockSheet::new(5, 5)];
        let mut store = PatternStore::new();
        store.push(Pattern::empty(1));
        store.push(Pattern::empty(0));
        let action = solve_master(&demand(1, 1), &stocks, &store);
        assert_eq!(action.stock(), Some(1));
    }

    #[test]
    fn test_master_ignores_stale_pattern() {
        let stocks = vec![StockSheet::new(5, 5)];
        let mut store = PatternStore::new();
        store.push(Pattern::empty(3));
        store.push(Pattern::empty(0));
        let action = solve_master(&demand(1, 1), &stocks, &store);
        assert_eq!(action.stock(), Some(0));
    }

    #[test]
    fn test_column_picks_least_waste() {
        let stocks = vec![
            StockSheet::new(10, 10),
            StockSheet::new(5, 5),
            StockSheet::new(3, 3),
        ];
        let column = generate_column(&demand(4, 4), &stocks).unwrap();
        assert_eq!(column.action.stock(), Some(1));
        assert_eq!(column.waste, 25 - 16);
    }

    #[test]
    fn test_column_waste_ignores_occupancy() {
        let mut busy = StockSheet::new(5, 5);
        busy.fill(Position::ORIGIN, Rect::new(5, 3), 0);
        let stocks = vec![StockSheet::new(6, 6), busy];
        let column = generate_column(&demand(2, 2), &stocks).unwrap();
        assert_eq!(column.action.stock(), Some(1));
        assert_eq!(column.action.position, Position::new(0, 3));
        assert_eq!(column.waste, 21);
    }

    #[test]
    fn test_column_tie_keeps_lower_index() {
        let stocks = vec![StockSheet::new(4, 4), StockSheet::new(4, 4)];
        let column = generate_column(&demand(2, 2), &stocks).unwrap();
        assert_eq!(column.action.stock(), Some(0));
    }

    #[test]
    fn test_column_none_when_nothing_fits() {
        let mut full = StockSheet::new(5, 5);
        full.fill(Position::ORIGIN, Rect::new(5, 5), 0);
        let stocks = vec![StockSheet::new(1, 1), full];
        assert_eq!(generate_column(&demand(2, 2), &stocks), None);
        assert_eq!(generate_column(&demand(2, 2), &[]), None);
    }

    #[test]
    fn test_new_pattern_anchors_at_origin_even_if_filled() {
        let mut busy = StockSheet::new(5, 5);
        busy.fill(Position::ORIGIN, Rect::new(1, 1), 0);
        let stocks = vec![StockSheet::new(1, 1), busy];
        let mut store = PatternStore::new();
        let action = generate_new_pattern(&demand(2, 2), &stocks, &mut store);
        assert_eq!(action, PlacementAction::placed(1, Rect::new(2, 2), Position::ORIGIN));
        assert_eq!(store.len(), 1);
        let pattern = store.iter().next().unwrap();
        assert_eq!(pattern.stock_idx, 1);
        assert_eq!(pattern.hints.len(), 1);
    }

    #[test]
    fn test_new_pattern_sentinel_leaves_store_alone() {
        let stocks = vec![StockSheet::new(1, 1)];
        let mut store = PatternStore::new();
        let action = generate_new_pattern(&demand(2, 2), &stocks, &mut store);
        assert!(action.is_none());
        assert!(store.is_empty());
    }
}
