use serde::Serialize;

use crate::error::{PolicyError, Result};
use crate::geometry::can_place;
use crate::policy::Policy;
use crate::types::{Observation, PlacementAction, Position, ProductDemand, Rect, StockSheet};

/// Reference decision loop: owns the sheets and the demand, asks a policy for
/// one action at a time and applies it.
#[derive(Debug, Clone)]
pub struct Episode {
    observation: Observation,
    placements: Vec<PlacedPiece>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacedPiece {
    pub stock_idx: usize,
    pub product_idx: usize,
    pub size: Rect,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every demanded piece was cut.
    Completed,
    /// The policy returned the sentinel action.
    NoPlacement,
    /// The policy proposed an action the sheets cannot take.
    Rejected,
    StepLimit,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeSummary {
    pub outcome: Outcome,
    pub steps: usize,
    pub placements: Vec<PlacedPiece>,
    pub used_stocks: usize,
    pub remaining_pieces: u64,
    pub waste_percent: f64,
}

impl Episode {
    pub fn new(stocks: Vec<StockSheet>, products: Vec<ProductDemand>) -> Self {
        Self {
            observation: Observation::new(products, stocks),
            placements: Vec::new(),
        }
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn stocks(&self) -> &[StockSheet] {
        &self.observation.stocks
    }

    pub fn placements(&self) -> &[PlacedPiece] {
        &self.placements
    }

    pub fn is_done(&self) -> bool {
        self.observation.products.iter().all(|p| !p.is_pending())
    }

    pub fn remaining_pieces(&self) -> u64 {
        self.observation
            .products
            .iter()
            .map(|p| p.quantity as u64)
            .sum()
    }

    /// Cuts the action's piece from its sheet and takes one unit off the
    /// first pending product of that size.
    pub fn apply(&mut self, action: PlacementAction) -> Result<PlacedPiece> {
        let stock_idx = action
            .stock()
            .ok_or_else(|| PolicyError::InvalidAction("no placement".to_string()))?;
        let Observation { products, stocks } = &mut self.observation;

        let stock_count = stocks.len();
        let stock = stocks.get_mut(stock_idx).ok_or_else(|| {
            PolicyError::InvalidAction(format!(
                "stock {stock_idx} out of range ({stock_count} stocks)"
            ))
        })?;
        let product_idx = products
            .iter()
            .position(|p| p.is_pending() && p.size == action.size)
            .ok_or_else(|| {
                PolicyError::InvalidAction(format!("no pending product of size {}", action.size))
            })?;
        if !can_place(stock, action.position, action.size) {
            return Err(PolicyError::InvalidAction(format!(
                "{} does not fit at {} on stock {}",
                action.size, action.position, stock_idx
            )));
        }

        stock.fill(action.position, action.size, product_idx);
        products[product_idx].quantity -= 1;

        let piece = PlacedPiece {
            stock_idx,
            product_idx,
            size: action.size,
            position: action.position,
        };
        self.placements.push(piece);
        Ok(piece)
    }

    /// Drives `policy` until the demand is met, the policy gives up or
    /// proposes an unusable action, or `max_steps` decisions were made.
    pub fn run(&mut self, policy: &mut dyn Policy, max_steps: usize) -> Result<EpisodeSummary> {
        let mut steps = 0;
        let outcome = loop {
            if self.is_done() {
                break Outcome::Completed;
            }
            if steps >= max_steps {
                break Outcome::StepLimit;
            }
            let action = policy.get_action(&self.observation)?;
            steps += 1;
            if action.is_none() {
                break Outcome::NoPlacement;
            }
            match self.apply(action) {
                Ok(piece) => tracing::debug!(
                    step = steps,
                    stock_idx = piece.stock_idx,
                    product_idx = piece.product_idx,
                    "applied placement"
                ),
                Err(e) => {
                    tracing::warn!(step = steps, error = %e, "policy proposed an unusable action");
                    break Outcome::Rejected;
                }
            }
        };

        let summary = self.summary(outcome, steps);
        tracing::info!(
            outcome = ?summary.outcome,
            steps = summary.steps,
            used_stocks = summary.used_stocks,
            remaining = summary.remaining_pieces,
            "episode finished"
        );
        Ok(summary)
    }

    /// Share of the used sheets' area that is not filled. A sheet counts as
    /// used once any cell on it is filled.
    pub fn waste_percent(&self) -> f64 {
        let (total, filled) = self
            .stocks()
            .iter()
            .filter(|s| !s.is_untouched())
            .fold((0u64, 0u64), |(t, f), s| (t + s.size().area(), f + s.filled_area()));
        if total == 0 {
            return 0.0;
        }
        (total - filled) as f64 / total as f64 * 100.0
    }

    fn summary(&self, outcome: Outcome, steps: usize) -> EpisodeSummary {
        EpisodeSummary {
            outcome,
            steps,
            placements: self.placements.clone(),
            used_stocks: self.stocks().iter().filter(|s| !s.is_untouched()).count(),
            remaining_pieces: self.remaining_pieces(),
            waste_percent: self.waste_percent(),
        }
    }
}
