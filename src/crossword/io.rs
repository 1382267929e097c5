//! File I/O for crossword structures and word lists

use super::Crossword;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Load a crossword from a structure file and a word list file
pub fn load_crossword<P: AsRef<Path>, Q: AsRef<Path>>(structure_path: P, words_path: Q) -> Result<Crossword> {
    let rows = load_structure_from_file(&structure_path)?;
    let words = load_words_from_file(&words_path)?;

    Crossword::from_rows(rows, words).with_context(|| {
        format!("Failed to build crossword from {}", structure_path.as_ref().display())
    })
}

/// Load a structure file.
/// Format: one grid row per line, '_' for a blank cell and any other character for a blocked one
pub fn load_structure_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<bool>>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read structure file: {}", path.as_ref().display()))?;

    parse_structure_from_string(&content)
        .with_context(|| format!("Failed to parse structure file: {}", path.as_ref().display()))
}

/// Parse a structure; rows shorter than the widest one are padded with blocked cells
pub fn parse_structure_from_string(content: &str) -> Result<Vec<Vec<bool>>> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.is_empty() {
        anyhow::bail!("Structure file is empty");
    }

    let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    if width == 0 {
        anyhow::bail!("Structure rows cannot all be empty");
    }

    let rows = lines
        .iter()
        .map(|line| {
            let mut row: Vec<bool> = line.chars().map(|ch| ch == '_').collect();
            row.resize(width, false);
            row
        })
        .collect();

    Ok(rows)
}

/// Load a word list file
pub fn load_words_from_file<P: AsRef<Path>>(path: P) -> Result<BTreeSet<String>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read word list: {}", path.as_ref().display()))?;

    Ok(parse_words(&content))
}

/// Parse a word list: one word per line, trimmed and upper-cased, blanks skipped
pub fn parse_words(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Build a crossword straight from in-memory structure and word list text
pub fn parse_crossword(structure: &str, words: &str) -> Result<Crossword> {
    let rows = parse_structure_from_string(structure)?;
    Crossword::from_rows(rows, parse_words(words))
}

/// Create example structure and word list files
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Four slots chained by three crossings
    let structure0 = "#___#\n#_##_\n#_##_\n#_##_\n#____\n";
    std::fs::write(dir.join("structure0.txt"), structure0)
        .context("Failed to write structure0.txt")?;

    let words0 = "one\ntwo\nthree\nfour\nfive\nsix\nseven\neight\nnine\nten\n";
    std::fs::write(dir.join("words0.txt"), words0)
        .context("Failed to write words0.txt")?;

    // Small mini with every letter checked twice
    let structure1 = "___\n___\n___\n";
    std::fs::write(dir.join("structure1.txt"), structure1)
        .context("Failed to write structure1.txt")?;

    let words1 = "cat\nore\nwed\ncow\nare\nted\ndog\ntoe\nrat\ncar\nbat\near\ntar\n";
    std::fs::write(dir.join("words1.txt"), words1)
        .context("Failed to write words1.txt")?;

    // A grid that cannot be filled from words1
    let structure2 = "____\n_##_\n____\n";
    std::fs::write(dir.join("structure2.txt"), structure2)
        .context("Failed to write structure2.txt")?;

    Ok(())
}
