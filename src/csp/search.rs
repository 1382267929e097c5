//! Backtracking search with arc-consistency lookahead

use super::consistency::{self, PropagationCounters};
use super::heuristics::{order_domain_values, select_unassigned_variable};
use super::{check_model, CspError, Domains, PuzzleModel};
use crate::crossword::Variable;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// A word chosen for each decided variable
pub type Assignment = BTreeMap<Variable, String>;

/// Options controlling a single search
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Re-run arc consistency after each tentative assignment
    pub inference: bool,
    /// Give up once this much time has passed
    pub timeout: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            inference: true,
            timeout: None,
        }
    }
}

/// Counters collected while solving
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStatistics {
    pub variables: usize,
    pub words: usize,
    pub pruned_by_node_consistency: usize,
    pub assignments_tried: usize,
    pub backtracks: usize,
    pub revisions: usize,
    pub values_pruned: usize,
    pub max_depth: usize,
    #[serde(skip)]
    pub solve_time: Duration,
}

/// True when every variable of the puzzle has a word
pub fn is_complete<M: PuzzleModel + ?Sized>(model: &M, assignment: &Assignment) -> bool {
    model.variables().iter().all(|var| assignment.contains_key(var))
}

/// Check a partial assignment: lengths fit, crossings agree, no word is used twice
pub fn is_consistent<M: PuzzleModel + ?Sized>(model: &M, assignment: &Assignment) -> bool {
    if assignment
        .iter()
        .any(|(var, word)| word.chars().count() != var.length)
    {
        return false;
    }

    let crossings_agree = assignment
        .iter()
        .tuple_combinations()
        .all(|((x, x_word), (y, y_word))| {
            model
                .overlap(x, y)
                .map_or(true, |overlap| overlap.agrees(x_word, y_word))
        });

    crossings_agree && assignment.values().all_unique()
}

/// Solves one puzzle. All search state lives here for the duration of a [`Solver::solve`] call.
pub struct Solver<'m, M: PuzzleModel + ?Sized> {
    model: &'m M,
    domains: Domains,
    options: SearchOptions,
    statistics: SearchStatistics,
    counters: PropagationCounters,
    deadline: Option<Instant>,
}

impl<'m, M: PuzzleModel + ?Sized> Solver<'m, M> {
    /// Create a solver with default options, rejecting malformed models
    pub fn new(model: &'m M) -> Result<Self, CspError> {
        Self::with_options(model, SearchOptions::default())
    }

    pub fn with_options(model: &'m M, options: SearchOptions) -> Result<Self, CspError> {
        check_model(model)?;

        Ok(Self {
            model,
            domains: Domains::from_model(model),
            options,
            statistics: SearchStatistics::default(),
            counters: PropagationCounters::default(),
            deadline: None,
        })
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Reset domains to the full word list and enforce node and arc consistency.
    ///
    /// Returns `false` if some domain ends up empty, meaning the puzzle has no solution.
    pub fn prepare(&mut self) -> bool {
        let model = self.model;
        self.domains = Domains::from_model(model);
        self.counters = PropagationCounters::default();
        self.statistics = SearchStatistics {
            variables: model.variables().len(),
            words: model.words().len(),
            ..SearchStatistics::default()
        };

        let removed = consistency::enforce_node_consistency(&mut self.domains, model);
        self.statistics.pruned_by_node_consistency = removed;
        debug!("Node consistency removed {} candidates", removed);

        if let Some(var) = model
            .variables()
            .iter()
            .find(|var| self.domains.is_wiped_out(var))
        {
            debug!("No word fits {}", var);
            return false;
        }

        let consistent = consistency::ac3_with_counters(&mut self.domains, model, None, &mut self.counters);
        self.sync_counters();
        debug!(
            "Initial arc consistency {}: {} candidates remain",
            if consistent { "succeeded" } else { "failed" },
            self.domains.total_size()
        );

        consistent
    }

    /// Find a complete assignment, or `None` if the puzzle cannot be filled
    pub fn solve(&mut self) -> Result<Option<Assignment>, CspError> {
        let start = Instant::now();
        self.deadline = self.options.timeout.map(|timeout| start + timeout);

        info!(
            "Solving {} variables against {} words",
            self.model.variables().len(),
            self.model.words().len()
        );

        if !self.prepare() {
            self.statistics.solve_time = start.elapsed();
            info!("Puzzle is infeasible before search");
            return Ok(None);
        }

        let mut assignment = Assignment::new();
        let solved = self.backtrack(&mut assignment, 0);
        self.sync_counters();
        self.statistics.solve_time = start.elapsed();

        if !solved? {
            info!("Search exhausted without a solution");
            return Ok(None);
        }

        info!(
            "Solved after {} assignments and {} backtracks in {:.3}s",
            self.statistics.assignments_tried,
            self.statistics.backtracks,
            self.statistics.solve_time.as_secs_f64()
        );
        Ok(Some(assignment))
    }

    fn backtrack(&mut self, assignment: &mut Assignment, depth: usize) -> Result<bool, CspError> {
        self.check_deadline()?;
        self.statistics.max_depth = self.statistics.max_depth.max(depth);

        if is_complete(self.model, assignment) {
            return Ok(true);
        }

        let Some(var) = select_unassigned_variable(self.model, &self.domains, assignment) else {
            return Ok(false);
        };

        for value in order_domain_values(self.model, &self.domains, &var, assignment) {
            self.statistics.assignments_tried += 1;
            trace!("{}Trying {} = {}", "  ".repeat(depth), var, value);

            assignment.insert(var, value.clone());
            let snapshot = self.domains.clone();

            if self.infer(&var, &value)
                && is_consistent(self.model, assignment)
                && self.backtrack(assignment, depth + 1)?
            {
                return Ok(true);
            }

            assignment.remove(&var);
            self.domains = snapshot;
            self.statistics.backtracks += 1;
        }

        Ok(false)
    }

    /// Pin `var` to `value` and propagate to its neighbors
    fn infer(&mut self, var: &Variable, value: &str) -> bool {
        self.domains.pin(var, value);

        if !self.options.inference {
            return true;
        }

        let arcs = self
            .model
            .neighbors(var)
            .into_iter()
            .map(|neighbor| (neighbor, *var))
            .collect();

        consistency::ac3_with_counters(&mut self.domains, self.model, Some(arcs), &mut self.counters)
    }

    fn check_deadline(&self) -> Result<(), CspError> {
        match (self.deadline, self.options.timeout) {
            (Some(deadline), Some(timeout)) if Instant::now() >= deadline => {
                Err(CspError::DeadlineExceeded(timeout))
            }
            _ => Ok(()),
        }
    }

    fn sync_counters(&mut self) {
        self.statistics.revisions = self.counters.revisions;
        self.statistics.values_pruned = self.counters.pruned;
    }
}

/// Solve `model` with default options
pub fn solve<M: PuzzleModel + ?Sized>(model: &M) -> Result<Option<Assignment>, CspError> {
    Solver::new(model)?.solve()
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Variables: {}", self.variables)?;
        writeln!(f, "  Words: {}", self.words)?;
        writeln!(f, "  Pruned by length: {}", self.pruned_by_node_consistency)?;
        writeln!(f, "  Assignments tried: {}", self.assignments_tried)?;
        writeln!(f, "  Backtracks: {}", self.backtracks)?;
        writeln!(f, "  Arc revisions: {}", self.revisions)?;
        writeln!(f, "  Values pruned by arcs: {}", self.values_pruned)?;
        writeln!(f, "  Max depth: {}", self.max_depth)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}
