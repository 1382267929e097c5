//! Crossword CSP Solver
//!
//! Fills a crossword grid from a word list by treating every slot as a variable of a
//! constraint satisfaction problem, solved with arc consistency and backtracking search.

pub mod config;
pub mod crossword;
pub mod csp;
pub mod fill;
pub mod utils;

pub use config::Settings;
pub use fill::{CrosswordProblem, Solution};

use anyhow::Result;

/// Main entry point: load the puzzle named in `settings` and fill it
pub fn solve_crossword(settings: Settings) -> Result<Option<Solution>> {
    let problem = CrosswordProblem::new(settings)?;
    problem.solve()
}
