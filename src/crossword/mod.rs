//! Crossword puzzle model: slots, structure and word list

pub mod variable;
pub mod structure;
pub mod io;

pub use variable::{Direction, Overlap, Variable};
pub use structure::Crossword;
pub use io::{load_crossword, parse_crossword, create_example_puzzles};
