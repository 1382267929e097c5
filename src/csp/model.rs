//! The contract between a puzzle and the constraint engine

use super::CspError;
use crate::crossword::{Overlap, Variable};
use std::collections::BTreeSet;

/// Read-only view of a puzzle that the engine solves against
pub trait PuzzleModel {
    /// Every slot of the puzzle, in a stable order
    fn variables(&self) -> &[Variable];

    /// Slots crossing `var`, never `var` itself
    fn neighbors(&self, var: &Variable) -> Vec<Variable>;

    /// Character indices of the shared cell, or `None` if the slots do not cross
    fn overlap(&self, x: &Variable, y: &Variable) -> Option<Overlap>;

    /// Candidate words
    fn words(&self) -> &BTreeSet<String>;
}

/// Check the preconditions the engine relies on.
///
/// Fails on the first violation found. A slot with no word of matching length is not
/// a malformed model; the solver reports it as having no solution.
pub fn check_model<M: PuzzleModel + ?Sized>(model: &M) -> Result<(), CspError> {
    let variables = model.variables();
    let known: BTreeSet<&Variable> = variables.iter().collect();

    for x in variables {
        if x.length == 0 {
            return Err(CspError::ZeroLengthVariable(*x));
        }
        if model.overlap(x, x).is_some() {
            return Err(CspError::SelfOverlap(*x));
        }

        let neighbors = model.neighbors(x);
        for y in &neighbors {
            if y == x {
                return Err(CspError::SelfOverlap(*x));
            }
            if !known.contains(y) {
                return Err(CspError::UnknownNeighbor { x: *x, y: *y });
            }
        }

        for y in variables.iter().filter(|y| *y != x) {
            let listed = neighbors.contains(y);
            let forward = match (model.overlap(x, y), listed) {
                (Some(forward), true) => forward,
                (None, false) => continue,
                (None, true) => return Err(CspError::MissingOverlap { x: *x, y: *y }),
                (Some(_), false) => return Err(CspError::UnlistedNeighbor { x: *x, y: *y }),
            };

            if forward.first >= x.length || forward.second >= y.length {
                return Err(CspError::OverlapOutOfBounds {
                    x: *x,
                    y: *y,
                    overlap: forward,
                });
            }

            let backward = model.overlap(y, x);
            if backward != Some(forward.swapped()) {
                return Err(CspError::AsymmetricOverlap {
                    x: *x,
                    y: *y,
                    forward,
                    backward,
                });
            }
        }
    }

    Ok(())
}
