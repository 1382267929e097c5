//! A filled crossword and what it took to find it

use crate::crossword::{Crossword, Variable};
use crate::csp::{Assignment, PuzzleModel, SearchStatistics};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One slot and the word written into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub variable: Variable,
    pub word: String,
}

/// A complete fill of a crossword
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Entries in slot order
    pub entries: Vec<Entry>,
    /// Rendered rows of the filled grid
    pub grid: Vec<String>,
    /// Search counters; the solve time is not persisted
    pub statistics: SearchStatistics,
    pub metadata: SolutionMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Stable identifier derived from the grid and its words
    pub id: String,
    pub width: usize,
    pub height: usize,
    pub slot_count: usize,
    pub letter_count: usize,
    pub distinct_letters: usize,
}

impl Solution {
    pub fn new(crossword: &Crossword, assignment: &Assignment, statistics: SearchStatistics) -> Self {
        let entries = assignment
            .iter()
            .map(|(variable, word)| Entry {
                variable: *variable,
                word: word.clone(),
            })
            .collect();
        let grid = crossword.render_rows(assignment);
        let metadata = SolutionMetadata::analyze(crossword, &grid);

        Self {
            entries,
            grid,
            statistics,
            metadata,
        }
    }

    /// Entries as a slot to word map
    pub fn assignment(&self) -> Assignment {
        self.entries
            .iter()
            .map(|entry| (entry.variable, entry.word.clone()))
            .collect()
    }

    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            id: self.metadata.id.clone(),
            width: self.metadata.width,
            height: self.metadata.height,
            slot_count: self.metadata.slot_count,
            assignments_tried: self.statistics.assignments_tried,
            backtracks: self.statistics.backtracks,
            solve_time_ms: self.statistics.solve_time.as_millis() as u64,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = self.to_json().context("Failed to serialize solution")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write solution file: {}", path.display()))?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read solution file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse solution file: {}", path.display()))
    }

    /// The filled grid, one row per line
    pub fn format_grid(&self) -> String {
        self.grid.iter().map(|row| format!("{}\n", row)).collect()
    }
}

impl SolutionMetadata {
    pub fn analyze(crossword: &Crossword, grid: &[String]) -> Self {
        let letters: Vec<char> = grid
            .iter()
            .flat_map(|row| row.chars())
            .filter(|c| c.is_alphabetic())
            .collect();
        let distinct_letters = letters.iter().collect::<BTreeSet<_>>().len();

        Self {
            id: Self::generate_id(grid),
            width: crossword.width,
            height: crossword.height,
            slot_count: crossword.variables().len(),
            letter_count: letters.len(),
            distinct_letters,
        }
    }

    fn generate_id(grid: &[String]) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        grid.hash(&mut hasher);

        format!("fill_{:x}", hasher.finish())
    }
}

/// Summary of a solution for display purposes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub id: String,
    pub width: usize,
    pub height: usize,
    pub slot_count: usize,
    pub assignments_tried: usize,
    pub backtracks: usize,
    pub solve_time_ms: u64,
}

impl std::fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution {}: {}x{}, {} slots, {} tried, {} backtracks, {}ms",
            self.id,
            self.width,
            self.height,
            self.slot_count,
            self.assignments_tried,
            self.backtracks,
            self.solve_time_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::{parse_crossword, Direction};
    use std::time::Duration;
    use tempfile::tempdir;

    fn corner_solution() -> (Crossword, Solution) {
        let crossword = parse_crossword("___\n##_\n##_\n", "car\nrat").unwrap();
        let mut assignment = Assignment::new();
        assignment.insert(Variable::new(0, 0, Direction::Across, 3), "CAR".to_string());
        assignment.insert(Variable::new(0, 2, Direction::Down, 3), "RAT".to_string());

        let statistics = SearchStatistics {
            assignments_tried: 2,
            solve_time: Duration::from_millis(5),
            ..SearchStatistics::default()
        };
        let solution = Solution::new(&crossword, &assignment, statistics);
        (crossword, solution)
    }

    #[test]
    fn test_solution_creation() {
        let (crossword, solution) = corner_solution();

        assert_eq!(solution.entries.len(), 2);
        assert_eq!(solution.grid, vec!["CAR", "██A", "██T"]);
        assert_eq!(solution.metadata.slot_count, 2);
        assert_eq!(solution.metadata.letter_count, 5);
        assert_eq!(solution.metadata.distinct_letters, 4);
        assert_eq!(solution.summary().solve_time_ms, 5);
        assert!(solution.metadata.id.starts_with("fill_"));
        assert_eq!(solution.format_grid(), "CAR\n██A\n██T\n");
        assert_eq!(
            solution.assignment()[&Variable::new(0, 2, Direction::Down, 3)],
            "RAT"
        );
        assert_eq!(solution.metadata.width, crossword.width);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solution.json");
        let (_, solution) = corner_solution();

        solution.save_to_file(&path).unwrap();
        let loaded = Solution::load_from_file(&path).unwrap();

        assert_eq!(loaded.assignment(), solution.assignment());
        assert_eq!(loaded.grid, solution.grid);
        assert_eq!(loaded.metadata, solution.metadata);
        assert_eq!(loaded.statistics.assignments_tried, 2);
        // Solve time is not persisted
        assert_eq!(loaded.statistics.solve_time, Duration::ZERO);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Solution::load_from_file(&path).is_err());
        assert!(Solution::load_from_file(dir.path().join("missing.json")).is_err());
    }
}
