use crate::types::{Position, Rect, StockSheet};

/// A placement remembered on a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementHint {
    pub size: Rect,
    pub position: Position,
}

/// Provisional association between a stock sheet and placement hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub stock_idx: usize,
    pub hints: Vec<PlacementHint>,
}

impl Pattern {
    pub fn empty(stock_idx: usize) -> Self {
        Self {
            stock_idx,
            hints: Vec::new(),
        }
    }
}

/// Append-only pattern collection.
///
/// Populated lazily on the policy's first decision and kept for the
/// lifetime of the policy. Entries are never removed or edited, so the
/// length only grows.
#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    patterns: Vec<Pattern>,
}

impl PatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one empty pattern per sheet, in sheet order. No-op once any
    /// pattern exists.
    pub fn initialize(&mut self, stocks: &[StockSheet]) {
        if !self.patterns.is_empty() {
            return;
        }
        self.patterns
            .extend((0..stocks.len()).map(Pattern::empty));
        tracing::debug!(patterns = self.patterns.len(), "initialized patterns");
    }

    pub fn push(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<'a> IntoIterator for &'a PatternStore {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_one_per_stock() {
        let stocks = vec![StockSheet::new(3, 3), StockSheet::new(5, 2)];
        let mut store = PatternStore::new();
        store.initialize(&stocks);
        let idx: Vec<usize> = store.iter().map(|p| p.stock_idx).collect();
        assert_eq!(idx, vec![0, 1]);
        assert!(store.iter().all(|p| p.hints.is_empty()));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let stocks = vec![StockSheet::new(3, 3), StockSheet::new(5, 2)];
        let mut store = PatternStore::new();
        store.initialize(&stocks);
        store.push(Pattern::empty(1));
        store.initialize(&stocks);
        store.initialize(&[StockSheet::new(1, 1)]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_initialize_without_stocks() {
        let mut store = PatternStore::new();
        store.initialize(&[]);
        assert!(store.is_empty());
    }
}
