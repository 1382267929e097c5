//! Crossword fill problem definition

use super::{Solution, SolutionValidator};
use crate::config::Settings;
use crate::crossword::{load_crossword, Crossword, Overlap, Variable};
use crate::csp::{ac3, enforce_node_consistency, Domains, PuzzleModel, Solver};
use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};

/// A crossword together with the settings it is solved under
pub struct CrosswordProblem {
    settings: Settings,
    crossword: Crossword,
    validator: SolutionValidator,
}

impl CrosswordProblem {
    /// Create a new problem, loading the structure and words named in `settings`
    pub fn new(settings: Settings) -> Result<Self> {
        settings.check_inputs()?;

        let crossword = load_crossword(&settings.input.structure_file, &settings.input.words_file)
            .context("Failed to load crossword")?;

        Ok(Self::with_crossword(settings, crossword))
    }

    /// Create a problem around an already built crossword
    pub fn with_crossword(settings: Settings, crossword: Crossword) -> Self {
        Self {
            settings,
            crossword,
            validator: SolutionValidator::new(),
        }
    }

    /// Fill the crossword, or `None` if it cannot be filled from the word list
    pub fn solve(&self) -> Result<Option<Solution>> {
        info!(
            "Filling {}x{} grid with {} slots from {} words",
            self.crossword.width,
            self.crossword.height,
            self.crossword.variables().len(),
            self.crossword.words().len()
        );

        let unchecked = self.crossword.unchecked_cells();
        if !unchecked.is_empty() {
            warn!("{} blank cells belong to no slot and stay empty", unchecked.len());
        }

        let mut solver = Solver::with_options(&self.crossword, self.settings.search_options())
            .context("Crossword is malformed")?;

        let Some(assignment) = solver.solve().context("Search failed")? else {
            return Ok(None);
        };

        let solution = Solution::new(&self.crossword, &assignment, solver.statistics().clone());

        let validation = self.validator.validate(&self.crossword, &solution);
        if !validation.is_valid {
            anyhow::bail!(
                "Search produced an invalid fill: {}",
                validation.error_message.unwrap_or_default()
            );
        }

        Ok(Some(solution))
    }

    /// Describe the slots and how far consistency alone narrows their candidates
    pub fn analyze(&self) -> PuzzleAnalysis {
        let crossword = &self.crossword;
        let mut domains = Domains::from_model(crossword);
        enforce_node_consistency(&mut domains, crossword);
        let after_node: Vec<usize> = crossword.variables().iter().map(|v| domains.size(v)).collect();

        let arc_consistent = after_node.iter().all(|&size| size > 0) && ac3(&mut domains, crossword, None);

        let slots = crossword
            .variables()
            .iter()
            .zip(after_node)
            .map(|(variable, node_size)| SlotReport {
                variable: *variable,
                degree: crossword.degree(variable),
                node_consistent_candidates: node_size,
                arc_consistent_candidates: arc_consistent.then(|| domains.size(variable)),
            })
            .collect();

        let crossings = crossword
            .variables()
            .iter()
            .tuple_combinations()
            .filter_map(|(x, y)| crossword.overlap(x, y).map(|overlap| (*x, *y, overlap)))
            .collect();

        PuzzleAnalysis {
            width: crossword.width,
            height: crossword.height,
            blank_cells: crossword.blank_count(),
            word_count: crossword.words().len(),
            slots,
            crossings,
            unchecked_cells: crossword.unchecked_cells(),
            arc_consistent,
        }
    }

    pub fn crossword(&self) -> &Crossword {
        &self.crossword
    }
}

/// Per-slot line of a [`PuzzleAnalysis`]
#[derive(Debug, Clone)]
pub struct SlotReport {
    pub variable: Variable,
    pub degree: usize,
    pub node_consistent_candidates: usize,
    /// `None` when arc consistency found the puzzle infeasible
    pub arc_consistent_candidates: Option<usize>,
}

/// What can be said about a puzzle before searching
#[derive(Debug, Clone)]
pub struct PuzzleAnalysis {
    pub width: usize,
    pub height: usize,
    pub blank_cells: usize,
    pub word_count: usize,
    pub slots: Vec<SlotReport>,
    pub crossings: Vec<(Variable, Variable, Overlap)>,
    pub unchecked_cells: Vec<(usize, usize)>,
    pub arc_consistent: bool,
}

impl std::fmt::Display for PuzzleAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Puzzle Analysis:")?;
        writeln!(f, "  Grid: {}x{}, {} blank cells", self.width, self.height, self.blank_cells)?;
        writeln!(f, "  Words: {}", self.word_count)?;
        writeln!(f, "  Slots: {}", self.slots.len())?;
        for slot in &self.slots {
            let after_arc = slot
                .arc_consistent_candidates
                .map_or_else(|| "-".to_string(), |size| size.to_string());
            writeln!(
                f,
                "    {:<24} degree {}, {} by length, {} after arc consistency",
                slot.variable.to_string(),
                slot.degree,
                slot.node_consistent_candidates,
                after_arc
            )?;
        }
        writeln!(f, "  Crossings: {}", self.crossings.len())?;
        for (x, y, overlap) in &self.crossings {
            writeln!(f, "    {} [{}] x {} [{}]", x, overlap.first, y, overlap.second)?;
        }
        if !self.unchecked_cells.is_empty() {
            writeln!(f, "  Cells outside any slot: {:?}", self.unchecked_cells)?;
        }
        writeln!(
            f,
            "  Arc consistency: {}",
            if self.arc_consistent { "consistent" } else { "infeasible" }
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::{create_example_puzzles, parse_crossword, Direction};
    use crate::csp::CspError;
    use std::time::Duration;
    use tempfile::tempdir;

    fn problem(structure: &str, words: &str) -> CrosswordProblem {
        CrosswordProblem::with_crossword(Settings::default(), parse_crossword(structure, words).unwrap())
    }

    #[test]
    fn test_problem_from_settings() {
        let dir = tempdir().unwrap();
        create_example_puzzles(dir.path()).unwrap();

        let mut settings = Settings::default();
        settings.input.structure_file = dir.path().join("structure1.txt");
        settings.input.words_file = dir.path().join("words1.txt");

        let problem = CrosswordProblem::new(settings).unwrap();
        assert_eq!(problem.crossword().variables().len(), 6);

        let solution = problem.solve().unwrap().unwrap();
        assert_eq!(solution.entries.len(), 6);
        assert!(solution.grid.iter().all(|row| row.chars().all(|c| c.is_ascii_uppercase())));
    }

    #[test]
    fn test_missing_files() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.input.structure_file = dir.path().join("nope.txt");

        assert!(CrosswordProblem::new(settings).is_err());
    }

    #[test]
    fn test_unsolvable_problem() {
        let problem = problem("____\n_##_\n____\n", "cat\nore\nwed");
        assert!(problem.solve().unwrap().is_none());
    }

    #[test]
    fn test_timeout_surfaces_as_error() {
        let mut problem = problem("___\n___\n___\n", "cat\nore\nwed\ncow\nare\nted");
        problem.settings.solver.timeout_seconds = Some(0);

        let error = problem.solve().unwrap_err();
        assert!(matches!(
            error.downcast_ref::<CspError>(),
            Some(CspError::DeadlineExceeded(d)) if *d == Duration::ZERO
        ));
    }

    #[test]
    fn test_analyze() {
        let analysis = problem("___\n##_\n##_\n", "cat\ncar\nrat\nox").analyze();

        assert_eq!(analysis.slots.len(), 2);
        assert_eq!(analysis.crossings.len(), 1);
        assert_eq!(analysis.blank_cells, 5);
        assert!(analysis.arc_consistent);

        let across = &analysis.slots[0];
        assert_eq!(across.variable, Variable::new(0, 0, Direction::Across, 3));
        assert_eq!(across.degree, 1);
        assert_eq!(across.node_consistent_candidates, 3);
        assert_eq!(across.arc_consistent_candidates, Some(1));

        let report = analysis.to_string();
        assert!(report.contains("Crossings: 1"));
        assert!(report.contains("Grid: 3x3, 5 blank cells"));
    }

    #[test]
    fn test_analyze_infeasible() {
        let analysis = problem("____\n", "cat").analyze();

        assert!(!analysis.arc_consistent);
        assert_eq!(analysis.slots[0].node_consistent_candidates, 0);
        assert_eq!(analysis.slots[0].arc_consistent_candidates, None);
    }
}
