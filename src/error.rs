use thiserror::Error;

/// Failures raised by the policy and the episode loop.
///
/// Not finding a placement is never an error: it is reported through
/// [`crate::types::PlacementAction::NONE`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("invalid policy variant {0}, expected 1 or 2")]
    InvalidVariant(u8),

    #[error("stock {index} has a zero dimension")]
    ZeroSizedStock { index: usize },

    #[error("product {index} has a zero dimension")]
    ZeroSizedProduct { index: usize },

    #[error("malformed stock: {0}")]
    MalformedStock(String),

    #[error("invalid action: {0}")]
    InvalidAction(String),
}

pub type Result<T> = std::result::Result<T, PolicyError>;
