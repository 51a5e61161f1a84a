use serde::{Deserialize, Serialize};

use crate::branch::BranchStack;
use crate::error::{PolicyError, Result};
use crate::pattern::PatternStore;
use crate::solver::{generate_column, generate_new_pattern, solve_master};
use crate::types::{Observation, PlacementAction, ProductDemand};

/// Chooses one placement per call from the current observation.
///
/// Object-safe so it can be used as `Box<dyn Policy>`.
pub trait Policy {
    fn get_action(&mut self, observation: &Observation) -> Result<PlacementAction>;
}

/// Which fallback pipeline runs after the pattern pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Variant {
    /// Deferred branches, then the waste-minimizing column generator.
    #[default]
    WasteMinimizing,
    /// Origin-anchored first fit that records new patterns.
    FirstFit,
}

impl Variant {
    /// Whether a non-empty branch stack is consulted before generating columns.
    pub fn uses_branches(self) -> bool {
        matches!(self, Variant::WasteMinimizing)
    }
}

impl TryFrom<u8> for Variant {
    type Error = PolicyError;

    fn try_from(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Variant::WasteMinimizing),
            2 => Ok(Variant::FirstFit),
            other => Err(PolicyError::InvalidVariant(other)),
        }
    }
}

impl From<Variant> for u8 {
    fn from(v: Variant) -> Self {
        match v {
            Variant::WasteMinimizing => 1,
            Variant::FirstFit => 2,
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Products with quantity left, with their input index.
fn pending(products: &[ProductDemand]) -> impl Iterator<Item = (usize, &ProductDemand)> {
    products.iter().enumerate().filter(|(_, p)| p.is_pending())
}

/// Greedy "column generation" policy.
///
/// `patterns` and `branches` start empty, are filled lazily by the first
/// decision, and live as long as the policy. They are never cleared, so
/// search effort carries over between calls of one episode.
#[derive(Debug, Clone)]
pub struct ColumnGenerationPolicy {
    variant: Variant,
    patterns: PatternStore,
    branches: BranchStack,
}

impl ColumnGenerationPolicy {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            patterns: PatternStore::new(),
            branches: BranchStack::new(),
        }
    }

    /// Builds from a numeric selector, rejecting anything but 1 or 2.
    pub fn from_id(id: u8) -> Result<Self> {
        Ok(Self::new(Variant::try_from(id)?))
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn patterns(&self) -> &PatternStore {
        &self.patterns
    }

    pub fn branches(&self) -> &BranchStack {
        &self.branches
    }

    /// Puts a placement aside; the waste-minimizing variant returns it once
    /// no pattern yields a placement.
    pub fn defer(&mut self, action: PlacementAction) {
        self.branches.push(action);
    }

    fn decide(&mut self, observation: &Observation) -> PlacementAction {
        let Observation { products, stocks } = observation;

        self.patterns.initialize(stocks);

        for (idx, product) in pending(products) {
            let action = solve_master(product, stocks, &self.patterns);
            if !action.is_none() {
                tracing::debug!(product = idx, %action, "placed from pattern");
                return action;
            }
        }

        if self.variant.uses_branches() && !self.branches.is_empty() {
            let action = self.branches.pop();
            tracing::debug!(%action, remaining = self.branches.len(), "popped branch");
            return action;
        }

        match self.variant {
            Variant::WasteMinimizing => {
                for (idx, product) in pending(products) {
                    if let Some(column) = generate_column(product, stocks) {
                        tracing::debug!(
                            product = idx,
                            action = %column.action,
                            waste = column.waste,
                            "generated column"
                        );
                        return column.action;
                    }
                }
            }
            Variant::FirstFit => {
                for (idx, product) in pending(products) {
                    let action = generate_new_pattern(product, stocks, &mut self.patterns);
                    if !action.is_none() {
                        tracing::debug!(product = idx, %action, "placed from new pattern");
                        return action;
                    }
                }
            }
        }

        tracing::debug!(variant = %self.variant, "no placement available");
        PlacementAction::NONE
    }
}

impl Default for ColumnGenerationPolicy {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}

impl Policy for ColumnGenerationPolicy {
    fn get_action(&mut self, observation: &Observation) -> Result<PlacementAction> {
        observation.validate()?;
        Ok(self.decide(observation))
    }
}
