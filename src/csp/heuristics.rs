//! Variable and value ordering for backtracking search

use super::{Assignment, Domains, PuzzleModel};
use crate::crossword::Variable;
use itertools::Itertools;
use std::cmp::Reverse;

/// Minimum remaining values, ties broken by highest degree.
///
/// Remaining ties go to the first variable in the model's order. Returns `None` once
/// every variable is assigned.
pub fn select_unassigned_variable<M: PuzzleModel + ?Sized>(
    model: &M,
    domains: &Domains,
    assignment: &Assignment,
) -> Option<Variable> {
    model
        .variables()
        .iter()
        .filter(|var| !assignment.contains_key(*var))
        .min_by_key(|var| (domains.size(var), Reverse(model.neighbors(var).len())))
        .copied()
}

/// Candidates of `var`, least constraining first.
///
/// A word's cost is the number of open neighbor candidates it rules out, read off a
/// per-neighbor letter histogram. The sort is stable, so equally constraining words keep
/// their domain order.
pub fn order_domain_values<M: PuzzleModel + ?Sized>(
    model: &M,
    domains: &Domains,
    var: &Variable,
    assignment: &Assignment,
) -> Vec<String> {
    // Letter histogram of each open neighbor at the shared cell
    let open_neighbors: Vec<_> = model
        .neighbors(var)
        .into_iter()
        .filter(|neighbor| !assignment.contains_key(neighbor))
        .filter_map(|neighbor| {
            let overlap = model.overlap(var, &neighbor)?;
            let histogram = domains
                .values(&neighbor)
                .filter_map(|candidate| candidate.chars().nth(overlap.second))
                .counts();
            Some((overlap.first, domains.size(&neighbor), histogram))
        })
        .collect();

    let ruled_out = |word: &String| -> usize {
        open_neighbors
            .iter()
            .map(|(index, size, histogram)| {
                let compatible = word
                    .chars()
                    .nth(*index)
                    .and_then(|letter| histogram.get(&letter))
                    .copied()
                    .unwrap_or(0);
                size - compatible
            })
            .sum()
    };

    domains
        .values(var)
        .sorted_by_cached_key(|word| ruled_out(*word))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::{parse_crossword, Direction};
    use crate::csp::consistency::{ac3, enforce_node_consistency};

    /// Neighbor candidates ruled out by `word`, counted one candidate at a time
    fn constraint_count<M: PuzzleModel + ?Sized>(
        model: &M,
        domains: &Domains,
        var: &Variable,
        word: &str,
        assignment: &Assignment,
    ) -> usize {
        model
            .neighbors(var)
            .iter()
            .filter(|neighbor| !assignment.contains_key(*neighbor))
            .filter_map(|neighbor| model.overlap(var, neighbor).map(|overlap| (neighbor, overlap)))
            .map(|(neighbor, overlap)| {
                domains
                    .values(neighbor)
                    .filter(|candidate| !overlap.agrees(word, candidate))
                    .count()
            })
            .sum()
    }

    #[test]
    fn test_mrv_picks_slot_narrowed_by_arc_consistency() {
        // Only TOE starts with the last letter of an across word
        let crossword = parse_crossword("___\n##_\n##_\n", "car\ncat\ncut\ntoe").unwrap();
        let mut domains = Domains::from_model(&crossword);
        enforce_node_consistency(&mut domains, &crossword);
        assert!(ac3(&mut domains, &crossword, None));

        let across = Variable::new(0, 0, Direction::Across, 3);
        let down = Variable::new(0, 2, Direction::Down, 3);
        assert_eq!(crossword.variables(), &[across, down]);
        assert_eq!(domains.values(&across).collect::<Vec<_>>(), ["CAT", "CUT"]);
        assert_eq!(domains.values(&down).collect::<Vec<_>>(), ["TOE"]);

        let chosen = select_unassigned_variable(&crossword, &domains, &Assignment::new());
        assert_eq!(chosen, Some(down));
    }

    #[test]
    fn test_mrv_prefers_singleton_domain() {
        // Three independent 3-letter slots
        let crossword = parse_crossword("___\n###\n___\n###\n___\n", "cat\ndog\nemu").unwrap();
        let mut domains = Domains::from_model(&crossword);
        enforce_node_consistency(&mut domains, &crossword);
        assert!(ac3(&mut domains, &crossword, None));

        let bottom = Variable::new(4, 0, Direction::Across, 3);
        let removals = vec!["CAT".to_string(), "DOG".to_string()];
        domains.remove_all(&bottom, &removals);

        let chosen = select_unassigned_variable(&crossword, &domains, &Assignment::new());
        assert_eq!(chosen, Some(bottom));
    }

    #[test]
    fn test_degree_breaks_domain_ties() {
        // The down slot crosses both across slots; every slot has the same domain size
        let crossword = parse_crossword("___\n_##\n___\n", "cat\ncot\ncut").unwrap();
        let mut domains = Domains::from_model(&crossword);
        enforce_node_consistency(&mut domains, &crossword);

        let chosen = select_unassigned_variable(&crossword, &domains, &Assignment::new());
        assert_eq!(chosen, Some(Variable::new(0, 0, Direction::Down, 3)));
    }

    #[test]
    fn test_skips_assigned_variables() {
        let crossword = parse_crossword("___\n###\n___\n", "cat\ndog").unwrap();
        let domains = Domains::from_model(&crossword);
        let vars = crossword.variables().to_vec();

        let mut assignment = Assignment::new();
        assignment.insert(vars[0], "CAT".to_string());
        assert_eq!(
            select_unassigned_variable(&crossword, &domains, &assignment),
            Some(vars[1])
        );

        assignment.insert(vars[1], "DOG".to_string());
        assert_eq!(select_unassigned_variable(&crossword, &domains, &assignment), None);
    }

    #[test]
    fn test_least_constraining_value_first() {
        let crossword = parse_crossword("___\n##_\n##_\n", "car\ncat\nrat\nrot\nrun\ntea").unwrap();
        let mut domains = Domains::from_model(&crossword);
        enforce_node_consistency(&mut domains, &crossword);
        let x = Variable::new(0, 0, Direction::Across, 3);
        let y = Variable::new(0, 2, Direction::Down, 3);

        let ordered = order_domain_values(&crossword, &domains, &x, &Assignment::new());

        // x ending in R leaves 3 of y's words, ending in T leaves 1, anything else none
        assert_eq!(ordered.len(), 6);
        assert_eq!(ordered[0], "CAR");
        assert_eq!(constraint_count(&crossword, &domains, &x, "CAR", &Assignment::new()), 3);
        assert_eq!(constraint_count(&crossword, &domains, &x, "CAT", &Assignment::new()), 5);
        assert_eq!(constraint_count(&crossword, &domains, &x, "RUN", &Assignment::new()), 6);

        let counts: Vec<usize> = ordered
            .iter()
            .map(|w| constraint_count(&crossword, &domains, &x, w, &Assignment::new()))
            .collect();
        assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));

        // Assigned neighbors are not counted
        let mut assignment = Assignment::new();
        assignment.insert(y, "RAT".to_string());
        assert_eq!(constraint_count(&crossword, &domains, &x, "CAT", &assignment), 0);
    }
}
