//! Node and arc consistency over the domain store

use super::{Domains, PuzzleModel};
use crate::crossword::Variable;
use log::trace;
use std::collections::{HashSet, VecDeque};

/// An ordered pair of variables queued for revision
pub type Arc = (Variable, Variable);

/// Work done by propagation, accumulated across calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationCounters {
    pub revisions: usize,
    pub pruned: usize,
}

/// Drop every word whose length differs from its slot's length.
///
/// Returns the number of words removed.
pub fn enforce_node_consistency<M: PuzzleModel + ?Sized>(domains: &mut Domains, model: &M) -> usize {
    let mut removed = 0;

    for var in model.variables() {
        let wrong_length: Vec<String> = domains
            .values(var)
            .filter(|word| word.chars().count() != var.length)
            .cloned()
            .collect();
        removed += domains.remove_all(var, &wrong_length);
    }

    removed
}

/// Make `x` arc consistent with `y`: drop every word of `x` that no word of `y` supports.
///
/// Returns whether anything was removed. Slots that do not cross are left alone.
pub fn revise<M: PuzzleModel + ?Sized>(
    domains: &mut Domains,
    model: &M,
    x: &Variable,
    y: &Variable,
) -> bool {
    revise_counted(domains, model, x, y) > 0
}

fn revise_counted<M: PuzzleModel + ?Sized>(
    domains: &mut Domains,
    model: &M,
    x: &Variable,
    y: &Variable,
) -> usize {
    let Some(overlap) = model.overlap(x, y) else {
        return 0;
    };

    // Letters that some word of y offers at the shared cell
    let supported: HashSet<char> = domains
        .values(y)
        .filter_map(|word| word.chars().nth(overlap.second))
        .collect();

    let unsupported: Vec<String> = domains
        .values(x)
        .filter(|word| {
            word.chars()
                .nth(overlap.first)
                .map_or(true, |letter| !supported.contains(&letter))
        })
        .cloned()
        .collect();

    domains.remove_all(x, &unsupported)
}

/// Every ordered pair of crossing variables, both directions
pub fn all_arcs<M: PuzzleModel + ?Sized>(model: &M) -> Vec<Arc> {
    model
        .variables()
        .iter()
        .flat_map(|x| model.neighbors(x).into_iter().map(move |y| (*x, y)))
        .collect()
}

/// AC-3 from `arcs`, or from every arc of the puzzle when `None`.
///
/// Returns `false` as soon as a domain is wiped out, `true` once the queue drains.
pub fn ac3<M: PuzzleModel + ?Sized>(domains: &mut Domains, model: &M, arcs: Option<Vec<Arc>>) -> bool {
    ac3_with_counters(domains, model, arcs, &mut PropagationCounters::default())
}

/// [`ac3`], recording revisions and pruned values into `counters`
pub fn ac3_with_counters<M: PuzzleModel + ?Sized>(
    domains: &mut Domains,
    model: &M,
    arcs: Option<Vec<Arc>>,
    counters: &mut PropagationCounters,
) -> bool {
    let mut queue: VecDeque<Arc> = arcs.unwrap_or_else(|| all_arcs(model)).into();

    while let Some((x, y)) = queue.pop_front() {
        counters.revisions += 1;
        let pruned = revise_counted(domains, model, &x, &y);
        if pruned == 0 {
            continue;
        }

        counters.pruned += pruned;
        trace!("Revised {} against {}: {} removed", x, y, pruned);

        if domains.is_wiped_out(&x) {
            trace!("Domain of {} wiped out", x);
            return false;
        }

        queue.extend(
            model
                .neighbors(&x)
                .into_iter()
                .filter(|z| *z != y)
                .map(|z| (z, x)),
        );
    }

    true
}
