//! Output formatting helpers

pub mod display;

pub use display::{BatchOutcome, Color, ColorOutput, SolutionFormatter};
