use std::fmt;
use thiserror::Error;

/// Which input dimension broke the variable layout bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Sources,
    Positions,
    Variables,
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundKind::Sources => write!(f, "source"),
            BoundKind::Positions => write!(f, "cost position"),
            BoundKind::Variables => write!(f, "variable"),
        }
    }
}

/// Failures of a castability query. An unpayable cost is not an error: it is
/// reported as `Ok(false)` or `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    #[error("{what} count {len} exceeds the supported maximum of {max}")]
    InputOutOfBounds {
        what: BoundKind,
        len: usize,
        max: usize,
    },
    #[error("SAT solver unavailable: {0}")]
    SolverUnavailable(String),
    #[error("SAT solver failure: {0}")]
    SolverFailure(String),
}
