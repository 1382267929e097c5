//! Crossword structure: the grid of blank/blocked cells, the slots it implies and the word list

use super::variable::{Direction, Overlap, Variable};
use crate::csp::PuzzleModel;
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// A crossword puzzle ready to be filled
#[derive(Debug, Clone)]
pub struct Crossword {
    pub width: usize,
    pub height: usize,
    /// Row-major, `true` for cells that take a letter
    cells: Vec<bool>,
    words: BTreeSet<String>,
    variables: Vec<Variable>,
    overlaps: HashMap<(Variable, Variable), Overlap>,
    neighbors: BTreeMap<Variable, Vec<Variable>>,
}

impl Crossword {
    /// Build a crossword from rows of blank (`true`) / blocked (`false`) cells
    pub fn from_rows(rows: Vec<Vec<bool>>, words: BTreeSet<String>) -> Result<Self> {
        if rows.is_empty() {
            anyhow::bail!("Crossword structure cannot be empty");
        }

        let height = rows.len();
        let width = rows[0].len();

        if width == 0 {
            anyhow::bail!("Crossword width cannot be zero");
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!("Row {} has length {}, expected {}", i, row.len(), width);
            }
        }

        let cells: Vec<bool> = rows.into_iter().flatten().collect();
        let variables = discover_variables(&cells, width, height);

        let mut overlaps = HashMap::new();
        let mut neighbors: BTreeMap<Variable, Vec<Variable>> =
            variables.iter().map(|v| (*v, Vec::new())).collect();

        for x in &variables {
            for y in &variables {
                if let Some(overlap) = Overlap::between(x, y) {
                    overlaps.insert((*x, *y), overlap);
                    neighbors.entry(*x).or_default().push(*y);
                }
            }
        }

        Ok(Self {
            width,
            height,
            cells,
            words,
            variables,
            overlaps,
            neighbors,
        })
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Whether the cell takes a letter; out of bounds counts as blocked
    pub fn is_blank(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[self.index(row, col)]
    }

    /// Number of cells that take a letter
    pub fn blank_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Blank cells not covered by any slot (isolated single cells)
    pub fn unchecked_cells(&self) -> Vec<(usize, usize)> {
        let covered: BTreeSet<(usize, usize)> =
            self.variables.iter().flat_map(|v| v.cells()).collect();

        (0..self.height)
            .flat_map(|row| (0..self.width).map(move |col| (row, col)))
            .filter(|&(row, col)| self.is_blank(row, col) && !covered.contains(&(row, col)))
            .collect()
    }

    /// Number of slots crossing `var`
    pub fn degree(&self, var: &Variable) -> usize {
        self.neighbors.get(var).map_or(0, Vec::len)
    }

    /// Place each assigned word into a letter grid; `None` where nothing was written
    pub fn letter_grid(&self, assignment: &BTreeMap<Variable, String>) -> Vec<Vec<Option<char>>> {
        let mut letters = vec![vec![None; self.width]; self.height];

        for (var, word) in assignment {
            for ((row, col), letter) in var.cells().into_iter().zip(word.chars()) {
                if row < self.height && col < self.width {
                    letters[row][col] = Some(letter);
                }
            }
        }

        letters
    }

    /// Render the filled grid one string per row: `█` for blocked cells, a space for
    /// blank cells without a letter
    pub fn render_rows(&self, assignment: &BTreeMap<Variable, String>) -> Vec<String> {
        self.letter_grid(assignment)
            .into_iter()
            .enumerate()
            .map(|(row, letters)| {
                letters
                    .into_iter()
                    .enumerate()
                    .map(|(col, letter)| match letter {
                        _ if !self.is_blank(row, col) => '█',
                        Some(letter) => letter,
                        None => ' ',
                    })
                    .collect()
            })
            .collect()
    }
}

/// Find every run of two or more blank cells, across and down
fn discover_variables(cells: &[bool], width: usize, height: usize) -> Vec<Variable> {
    let blank = |row: usize, col: usize| row < height && col < width && cells[row * width + col];
    let mut variables = Vec::new();

    for row in 0..height {
        for col in 0..width {
            if !blank(row, col) {
                continue;
            }

            if row == 0 || !blank(row - 1, col) {
                let length = (row..height).take_while(|&r| blank(r, col)).count();
                if length > 1 {
                    variables.push(Variable::new(row, col, Direction::Down, length));
                }
            }

            if col == 0 || !blank(row, col - 1) {
                let length = (col..width).take_while(|&c| blank(row, c)).count();
                if length > 1 {
                    variables.push(Variable::new(row, col, Direction::Across, length));
                }
            }
        }
    }

    variables.sort();
    variables
}

impl PuzzleModel for Crossword {
    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn neighbors(&self, var: &Variable) -> Vec<Variable> {
        self.neighbors.get(var).cloned().unwrap_or_default()
    }

    fn overlap(&self, x: &Variable, y: &Variable) -> Option<Overlap> {
        self.overlaps.get(&(*x, *y)).copied()
    }

    fn words(&self) -> &BTreeSet<String> {
        &self.words
    }
}

impl fmt::Display for Crossword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let symbol = if self.is_blank(row, col) { '_' } else { '█' };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
