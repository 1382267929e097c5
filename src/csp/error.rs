use crate::crossword::{Overlap, Variable};
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the constraint engine.
///
/// An unsatisfiable puzzle is not an error; it is reported as `Ok(None)` by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CspError {
    #[error("variable {0} has length zero")]
    ZeroLengthVariable(Variable),
    #[error("variable {0} is reported to overlap itself")]
    SelfOverlap(Variable),
    #[error("{x} lists {y} as a neighbor, but {y} is not a variable of the puzzle")]
    UnknownNeighbor { x: Variable, y: Variable },
    #[error("{x} and {y} are neighbors but no overlap is recorded between them")]
    MissingOverlap { x: Variable, y: Variable },
    #[error("{x} and {y} overlap but are not listed as neighbors")]
    UnlistedNeighbor { x: Variable, y: Variable },
    #[error("overlap between {x} and {y} is not symmetric: {forward:?} vs {backward:?}")]
    AsymmetricOverlap {
        x: Variable,
        y: Variable,
        forward: Overlap,
        backward: Option<Overlap>,
    },
    #[error("overlap {overlap:?} lies outside {x} or {y}")]
    OverlapOutOfBounds {
        x: Variable,
        y: Variable,
        overlap: Overlap,
    },
    #[error("search exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),
}
