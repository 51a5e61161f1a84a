use crate::pattern::Pattern;
use crate::types::{PlacementAction, Position, Rect};

/// LIFO of placements put aside for later.
///
/// Owned by a single policy instance. Nothing in the decision sequence pushes
/// on its own; callers defer actions explicitly.
#[derive(Debug, Clone, Default)]
pub struct BranchStack {
    branches: Vec<PlacementAction>,
}

impl BranchStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: PlacementAction) {
        self.branches.push(action);
    }

    /// Most recently pushed action, or [`PlacementAction::NONE`] when empty.
    pub fn pop(&mut self) -> PlacementAction {
        self.branches.pop().unwrap_or(PlacementAction::NONE)
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }
}

/// Unit-sized placement at the origin of the pattern's sheet.
pub fn create_branch(pattern: &Pattern) -> PlacementAction {
    PlacementAction::placed(pattern.stock_idx, Rect::new(1, 1), Position::ORIGIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_empty_is_sentinel() {
        let mut stack = BranchStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), PlacementAction::NONE);
    }

    #[test]
    fn test_lifo_order() {
        let mut stack = BranchStack::new();
        let a = PlacementAction::placed(0, Rect::new(2, 2), Position::ORIGIN);
        let b = PlacementAction::placed(1, Rect::new(3, 1), Position::new(1, 0));
        stack.push(a);
        stack.push(b);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop(), b);
        assert_eq!(stack.pop(), a);
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_create_branch() {
        let action = create_branch(&Pattern::empty(4));
        assert_eq!(action.stock(), Some(4));
        assert_eq!(action.size, Rect::new(1, 1));
        assert_eq!(action.position, Position::ORIGIN);
    }
}
