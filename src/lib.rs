//! Greedy placement policy for 2D cutting stock.
//!
//! The policy is called once per decision by an outer loop that owns the
//! sheets and the demand. It keeps patterns (sheets already explored) and a
//! stack of deferred placements between calls.

pub mod branch;
pub mod episode;
pub mod error;
pub mod geometry;
pub mod pattern;
pub mod policy;
pub mod render;
pub mod search;
pub mod solver;
pub mod types;

pub use error::{PolicyError, Result};
pub use policy::{ColumnGenerationPolicy, Policy, Variant};
pub use types::{Observation, PlacementAction, Position, ProductDemand, Rect, StockSheet};
