use thiserror::Error;

/// Errors produced by the core search engine.
///
/// Mirrors the error kinds in the design: invalid input fails the whole
/// run at the boundary, infeasibility is per-contestant and does not
/// propagate, and cancellation is always surfaced to the caller.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("contestants disagree on remaining weeks beyond tolerance: {0}")]
    InconsistentInference(String),

    #[error("search cancelled")]
    Cancelled,
}

pub type CoreResult<T> = Result<T, CoreError>;
