use thiserror::Error;

/// Errors raised while building a cutting plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Caller supplied a record or parameter the planner cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal contract was broken; no plan is produced.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
