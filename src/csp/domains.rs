//! Candidate words still considered legal for each slot

use super::PuzzleModel;
use crate::crossword::Variable;
use std::collections::{BTreeMap, BTreeSet};

/// Per-variable candidate sets.
///
/// Values are only ever removed, except when a whole snapshot is restored on backtrack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Domains {
    domains: BTreeMap<Variable, BTreeSet<String>>,
}

impl Domains {
    /// Start every variable with the full word list
    pub fn from_model<M: PuzzleModel + ?Sized>(model: &M) -> Self {
        let domains = model
            .variables()
            .iter()
            .map(|var| (*var, model.words().clone()))
            .collect();

        Self { domains }
    }

    /// Current candidates of `var` in lexicographic order
    pub fn values<'a>(&'a self, var: &Variable) -> impl Iterator<Item = &'a String> + 'a {
        self.domains.get(var).into_iter().flatten()
    }

    pub fn size(&self, var: &Variable) -> usize {
        self.domains.get(var).map_or(0, BTreeSet::len)
    }

    /// Sum of all domain sizes
    pub fn total_size(&self) -> usize {
        self.domains.values().map(BTreeSet::len).sum()
    }

    /// Whether `var` has no candidates left
    pub fn is_wiped_out(&self, var: &Variable) -> bool {
        self.size(var) == 0
    }

    /// Remove the given words from `var`, returning how many were actually present
    pub fn remove_all<'w, I>(&mut self, var: &Variable, words: I) -> usize
    where
        I: IntoIterator<Item = &'w String>,
    {
        let Some(domain) = self.domains.get_mut(var) else {
            return 0;
        };

        words.into_iter().filter(|word| domain.remove(*word)).count()
    }

    /// Collapse `var` to the single chosen word
    pub fn pin(&mut self, var: &Variable, word: &str) {
        self.domains.insert(*var, BTreeSet::from([word.to_string()]));
    }
}
