//! Slot identities and crossing geometry

use serde::{Deserialize, Serialize};
use std::fmt;

/// Orientation of a slot in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Across,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A single word slot: where it starts, which way it runs and how long it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Self {
        Self {
            row,
            col,
            direction,
            length,
        }
    }

    /// Grid cells covered by this slot, in word order
    pub fn cells(&self) -> Vec<(usize, usize)> {
        (0..self.length)
            .map(|k| match self.direction {
                Direction::Across => (self.row, self.col + k),
                Direction::Down => (self.row + k, self.col),
            })
            .collect()
    }

    /// Position of `cell` inside this slot, if the slot covers it
    pub fn index_of(&self, cell: (usize, usize)) -> Option<usize> {
        let (row, col) = cell;
        match self.direction {
            Direction::Across if row == self.row && col >= self.col => {
                let k = col - self.col;
                (k < self.length).then_some(k)
            }
            Direction::Down if col == self.col && row >= self.row => {
                let k = row - self.row;
                (k < self.length).then_some(k)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {} : {}", self.row, self.col, self.direction, self.length)
    }
}

/// Character indices at which two crossing slots share a cell.
///
/// For `overlap(x, y)`, `first` indexes into x's word and `second` into y's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Overlap {
    pub first: usize,
    pub second: usize,
}

impl Overlap {
    pub fn new(first: usize, second: usize) -> Self {
        Self { first, second }
    }

    /// The same crossing seen from the other slot
    pub fn swapped(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }

    /// Whether the two words agree on the shared letter
    pub fn agrees(&self, x_word: &str, y_word: &str) -> bool {
        match (x_word.chars().nth(self.first), y_word.chars().nth(self.second)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Compute the crossing of two slots, if they share a cell
    pub fn between(x: &Variable, y: &Variable) -> Option<Self> {
        if x == y {
            return None;
        }
        x.cells()
            .into_iter()
            .enumerate()
            .find_map(|(i, cell)| y.index_of(cell).map(|j| Self::new(i, j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells() {
        let across = Variable::new(1, 2, Direction::Across, 3);
        assert_eq!(across.cells(), vec![(1, 2), (1, 3), (1, 4)]);

        let down = Variable::new(0, 4, Direction::Down, 2);
        assert_eq!(down.cells(), vec![(0, 4), (1, 4)]);
    }

    #[test]
    fn test_index_of() {
        let down = Variable::new(2, 1, Direction::Down, 3);
        assert_eq!(down.index_of((2, 1)), Some(0));
        assert_eq!(down.index_of((4, 1)), Some(2));
        assert_eq!(down.index_of((5, 1)), None);
        assert_eq!(down.index_of((1, 1)), None);
        assert_eq!(down.index_of((3, 2)), None);
    }

    #[test]
    fn test_overlap_between() {
        let x = Variable::new(0, 0, Direction::Across, 3);
        let y = Variable::new(0, 2, Direction::Down, 3);

        assert_eq!(Overlap::between(&x, &y), Some(Overlap::new(2, 0)));
        assert_eq!(Overlap::between(&y, &x), Some(Overlap::new(0, 2)));
        assert_eq!(Overlap::between(&x, &x), None);

        let parallel = Variable::new(2, 0, Direction::Across, 3);
        assert_eq!(Overlap::between(&x, &parallel), None);
    }

    #[test]
    fn test_agrees() {
        let overlap = Overlap::new(2, 0);
        assert!(overlap.agrees("CAR", "RAT"));
        assert!(!overlap.agrees("CAT", "RAT"));
        assert!(!overlap.agrees("CA", "RAT"));
    }

    #[test]
    fn test_display() {
        let var = Variable::new(3, 1, Direction::Down, 5);
        assert_eq!(var.to_string(), "(3, 1) down : 5");
    }
}
