//! Independent check of a fill against its crossword

use super::Solution;
use crate::crossword::{Crossword, Variable};
use crate::csp::PuzzleModel;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;

/// Checks a solution without trusting the search that produced it.
///
/// Words are only checked against the list when the crossword carries one.
#[derive(Debug, Default)]
pub struct SolutionValidator;

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub error_message: Option<String>,
}

/// A single way in which a fill breaks the puzzle's rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingSlot(Variable),
    UnknownSlot(Variable),
    DuplicateSlot(Variable),
    LengthMismatch {
        variable: Variable,
        word: String,
    },
    CrossingMismatch {
        first: Variable,
        second: Variable,
        first_letter: Option<char>,
        second_letter: Option<char>,
    },
    DuplicateWord {
        word: String,
        first: Variable,
        second: Variable,
    },
    WordNotInList {
        variable: Variable,
        word: String,
    },
    GridMismatch {
        row: usize,
    },
}

impl SolutionValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, crossword: &Crossword, solution: &Solution) -> ValidationResult {
        let mut violations = Vec::new();

        // Duplicate entries for one slot would be lost in the map
        let mut assignment = BTreeMap::new();
        for entry in &solution.entries {
            if assignment.insert(entry.variable, entry.word.clone()).is_some() {
                violations.push(Violation::DuplicateSlot(entry.variable));
            }
        }

        let known = crossword.variables();
        violations.extend(
            known
                .iter()
                .filter(|var| !assignment.contains_key(*var))
                .map(|var| Violation::MissingSlot(*var)),
        );
        violations.extend(
            assignment
                .keys()
                .filter(|var| !known.contains(var))
                .map(|var| Violation::UnknownSlot(*var)),
        );

        for (variable, word) in &assignment {
            if word.chars().count() != variable.length {
                violations.push(Violation::LengthMismatch {
                    variable: *variable,
                    word: word.clone(),
                });
            }
            if !crossword.words().is_empty() && !crossword.words().contains(word) {
                violations.push(Violation::WordNotInList {
                    variable: *variable,
                    word: word.clone(),
                });
            }
        }

        for ((x, x_word), (y, y_word)) in assignment.iter().tuple_combinations() {
            if let Some(overlap) = crossword.overlap(x, y) {
                if !overlap.agrees(x_word, y_word) {
                    violations.push(Violation::CrossingMismatch {
                        first: *x,
                        second: *y,
                        first_letter: x_word.chars().nth(overlap.first),
                        second_letter: y_word.chars().nth(overlap.second),
                    });
                }
            }
            if x_word == y_word {
                violations.push(Violation::DuplicateWord {
                    word: x_word.clone(),
                    first: *x,
                    second: *y,
                });
            }
        }

        let rendered = crossword.render_rows(&assignment);
        if rendered.len() != solution.grid.len() {
            violations.push(Violation::GridMismatch {
                row: rendered.len().min(solution.grid.len()),
            });
        } else if let Some(row) = rendered.iter().zip(&solution.grid).position(|(a, b)| a != b) {
            violations.push(Violation::GridMismatch { row });
        }

        let is_valid = violations.is_empty();
        let error_message = (!is_valid).then(|| Self::generate_error_message(&violations));

        ValidationResult {
            is_valid,
            violations,
            error_message,
        }
    }

    fn generate_error_message(violations: &[Violation]) -> String {
        let mut message = format!("{} violation(s) found", violations.len());

        for violation in violations.iter().take(5) {
            message.push_str(&format!("\n  - {}", violation));
        }
        if violations.len() > 5 {
            message.push_str(&format!("\n  ... and {} more", violations.len() - 5));
        }

        message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingSlot(var) => write!(f, "slot {} has no word", var),
            Violation::UnknownSlot(var) => write!(f, "slot {} is not part of the grid", var),
            Violation::DuplicateSlot(var) => write!(f, "slot {} has more than one entry", var),
            Violation::LengthMismatch { variable, word } => {
                write!(f, "{} does not fit slot {}", word, variable)
            }
            Violation::CrossingMismatch {
                first,
                second,
                first_letter,
                second_letter,
            } => write!(
                f,
                "{} and {} disagree at their crossing ({} vs {})",
                first,
                second,
                first_letter.unwrap_or('?'),
                second_letter.unwrap_or('?')
            ),
            Violation::DuplicateWord { word, first, second } => {
                write!(f, "{} is used by both {} and {}", word, first, second)
            }
            Violation::WordNotInList { variable, word } => {
                write!(f, "{} in slot {} is not in the word list", word, variable)
            }
            Violation::GridMismatch { row } => {
                write!(f, "stored grid differs from the entries at row {}", row)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::{parse_crossword, Direction};
    use crate::csp::{Assignment, SearchStatistics};
    use crate::fill::solution::Entry;

    fn across() -> Variable {
        Variable::new(0, 0, Direction::Across, 3)
    }

    fn down() -> Variable {
        Variable::new(0, 2, Direction::Down, 3)
    }

    fn fill(crossword: &Crossword, words: [&str; 2]) -> Solution {
        let mut assignment = Assignment::new();
        assignment.insert(across(), words[0].to_string());
        assignment.insert(down(), words[1].to_string());
        Solution::new(crossword, &assignment, SearchStatistics::default())
    }

    #[test]
    fn test_valid_solution() {
        let crossword = parse_crossword("___\n##_\n##_\n", "car\nrat").unwrap();
        let result = SolutionValidator::new().validate(&crossword, &fill(&crossword, ["CAR", "RAT"]));

        assert!(result.is_valid);
        assert!(result.violations.is_empty());
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_crossing_mismatch() {
        let crossword = parse_crossword("___\n##_\n##_\n", "").unwrap();
        let result = SolutionValidator::new().validate(&crossword, &fill(&crossword, ["CAT", "RAT"]));

        assert!(!result.is_valid);
        assert!(result.violations.contains(&Violation::CrossingMismatch {
            first: across(),
            second: down(),
            first_letter: Some('T'),
            second_letter: Some('R'),
        }));
    }

    #[test]
    fn test_tampered_grid() {
        let crossword = parse_crossword("___\n##_\n##_\n", "").unwrap();
        let mut solution = fill(&crossword, ["CAR", "RAT"]);
        solution.grid[1] = "██E".to_string();

        let result = SolutionValidator::new().validate(&crossword, &solution);

        assert_eq!(result.violations, vec![Violation::GridMismatch { row: 1 }]);
    }

    #[test]
    fn test_duplicate_and_unlisted_words() {
        let crossword = parse_crossword("___\n##_\n##_\n", "rar").unwrap();
        let result = SolutionValidator::new().validate(&crossword, &fill(&crossword, ["RAR", "RAR"]));

        assert!(result.violations.contains(&Violation::DuplicateWord {
            word: "RAR".to_string(),
            first: across(),
            second: down(),
        }));
        assert!(!result
            .violations
            .iter()
            .any(|v| matches!(v, Violation::WordNotInList { .. })));

        let crossword = parse_crossword("___\n##_\n##_\n", "car").unwrap();
        let result = SolutionValidator::new().validate(&crossword, &fill(&crossword, ["CAR", "RAT"]));
        assert_eq!(
            result.violations,
            vec![Violation::WordNotInList {
                variable: down(),
                word: "RAT".to_string()
            }]
        );
    }

    #[test]
    fn test_missing_and_unknown_slots() {
        let crossword = parse_crossword("___\n##_\n##_\n", "").unwrap();
        let mut solution = fill(&crossword, ["CAR", "RAT"]);
        let stray = Variable::new(5, 5, Direction::Across, 4);
        solution.entries.retain(|entry| entry.variable != down());
        solution.entries.push(Entry {
            variable: stray,
            word: "CARS".to_string(),
        });

        let result = SolutionValidator::new().validate(&crossword, &solution);

        assert!(result.violations.contains(&Violation::MissingSlot(down())));
        assert!(result.violations.contains(&Violation::UnknownSlot(stray)));
        assert!(result.error_message.unwrap().contains("violation(s) found"));
    }

    #[test]
    fn test_slot_entered_twice() {
        let crossword = parse_crossword("___\n##_\n##_\n", "car\nrat").unwrap();
        let mut solution = fill(&crossword, ["CAR", "RAT"]);
        solution.entries.push(Entry {
            variable: across(),
            word: "CAR".to_string(),
        });

        let result = SolutionValidator::new().validate(&crossword, &solution);

        assert_eq!(result.violations, vec![Violation::DuplicateSlot(across())]);
        assert!(result.error_message.unwrap().contains("has more than one entry"));
    }

    #[test]
    fn test_length_mismatch() {
        let crossword = parse_crossword("___\n##_\n##_\n", "").unwrap();
        let mut solution = fill(&crossword, ["CAR", "RAT"]);
        solution.entries[0].word = "CART".to_string();

        let result = SolutionValidator::new().validate(&crossword, &solution);

        assert!(result.violations.contains(&Violation::LengthMismatch {
            variable: across(),
            word: "CART".to_string(),
        }));
    }
}
