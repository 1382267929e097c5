//! Filling a crossword: problem orchestration, solution records and validation

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{CrosswordProblem, PuzzleAnalysis, SlotReport};
pub use solution::{Entry, Solution, SolutionMetadata, SolutionSummary};
pub use validator::{SolutionValidator, ValidationResult, Violation};
