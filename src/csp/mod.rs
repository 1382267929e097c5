//! Constraint satisfaction engine: domains, arc consistency and backtracking search

pub mod error;
pub mod model;
pub mod domains;
pub mod consistency;
pub mod heuristics;
pub mod search;

pub use error::CspError;
pub use model::{check_model, PuzzleModel};
pub use domains::Domains;
pub use consistency::{ac3, enforce_node_consistency, revise, Arc};
pub use search::{is_complete, is_consistent, solve, Assignment, SearchOptions, SearchStatistics, Solver};
