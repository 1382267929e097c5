//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::crossword::Direction;
use crate::fill::Solution;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// How a single puzzle of a batch run ended
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Solved(Solution),
    NoSolution,
    Failed(String),
}

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a single solution for console output
    pub fn format_solution(solution: &Solution, show_entries: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Solution {} ===\n", solution.metadata.id));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.statistics.solve_time.as_secs_f64()));
        output.push_str(&format!(
            "Grid: {}x{}, {} slots, {} letters\n",
            solution.metadata.width,
            solution.metadata.height,
            solution.metadata.slot_count,
            solution.metadata.letter_count
        ));
        output.push('\n');
        output.push_str(&solution.format_grid());

        if show_entries {
            output.push('\n');
            output.push_str(&Self::format_entries(solution));
        }

        output
    }

    /// Across and down entries, each in slot order
    pub fn format_entries(solution: &Solution) -> String {
        let mut output = String::new();

        for (direction, heading) in [(Direction::Across, "Across:"), (Direction::Down, "Down:")] {
            output.push_str(heading);
            output.push('\n');
            for entry in solution.entries.iter().filter(|e| e.variable.direction == direction) {
                output.push_str(&format!(
                    "  ({}, {}) {}\n",
                    entry.variable.row, entry.variable.col, entry.word
                ));
            }
        }

        output
    }

    /// Format a rendered grid with row and column numbers
    pub fn format_grid_with_coords(rows: &[String]) -> String {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..width {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        for (row, cells) in rows.iter().enumerate() {
            output.push_str(&format!("{:2} ", row));
            for cell in cells.chars() {
                match cell {
                    '█' => output.push_str("██"),
                    letter => output.push_str(&format!(" {}", letter)),
                }
            }
            output.push('\n');
        }

        output
    }

    /// Format batch results as a summary table
    pub fn format_batch_summary(results: &[(String, BatchOutcome)]) -> String {
        let mut output = String::new();

        output.push_str("Batch Summary:\n");
        output.push_str("Puzzle               | Result    | Tried    | Backtracks | Time(ms)\n");
        output.push_str("---------------------|-----------|----------|------------|---------\n");

        for (name, outcome) in results {
            let line = match outcome {
                BatchOutcome::Solved(solution) => format!(
                    "{:20} | {:9} | {:8} | {:10} | {}\n",
                    name,
                    "solved",
                    solution.statistics.assignments_tried,
                    solution.statistics.backtracks,
                    solution.statistics.solve_time.as_millis()
                ),
                BatchOutcome::NoSolution => format!("{:20} | {:9} | {:8} | {:10} | -\n", name, "none", "-", "-"),
                BatchOutcome::Failed(error) => format!("{:20} | {:9} | {}\n", name, "error", error),
            };
            output.push_str(&line);
        }

        let solved = results
            .iter()
            .filter(|(_, outcome)| matches!(outcome, BatchOutcome::Solved(_)))
            .count();
        output.push_str(&format!("\n{}/{} puzzles solved\n", solved, results.len()));

        output
    }

    /// Save a solution under `name` in the given output format, returning the written path
    pub fn save_solution<P: AsRef<Path>>(
        solution: &Solution,
        output_dir: P,
        name: &str,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let filepath = match format {
            OutputFormat::Text => {
                let filepath = output_dir.join(format!("{}.txt", name));
                std::fs::write(&filepath, Self::format_solution(solution, true))?;
                filepath
            }
            OutputFormat::Json => {
                let filepath = output_dir.join(format!("{}.json", name));
                solution.save_to_file(&filepath)?;
                filepath
            }
            OutputFormat::Visual => {
                let filepath = output_dir.join(format!("{}_visual.txt", name));
                std::fs::write(&filepath, Self::create_visual(solution))?;
                filepath
            }
        };

        Ok(filepath)
    }

    fn create_visual(solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str(&format!("Visual Fill - Solution {}\n", solution.metadata.id));
        output.push_str(&"=".repeat(50));
        output.push_str("\n\n");
        output.push_str(&Self::format_grid_with_coords(&solution.grid));
        output.push('\n');
        output.push_str(&Self::format_entries(solution));
        output.push('\n');
        output.push_str(&solution.statistics.to_string());

        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
