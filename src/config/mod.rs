//! Configuration management for the crossword solver

pub mod settings;

pub use settings::{Settings, SolverConfig, InputConfig, OutputConfig, OutputFormat, CliOverrides};
