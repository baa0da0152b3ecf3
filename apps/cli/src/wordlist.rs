//! Indented word-list parser.
//!
//! # Format
//! ```text
//! run
//!   v move quickly on foot
//!   n an act of running
//!   runner
//!     n a person who runs
//! ```
//!
//! A line at column 0 starts an entry. An indented `<pos> <gloss>` line is a
//! definition of the nearest shallower word; any other indented line is a
//! derivative, imported as an entry of its own. Blank lines and lines
//! starting with `#` are ignored.

use thiserror::Error;
use vocab_core::{Definition, RawEntry};

const PARTS_OF_SPEECH: &[&str] = &["n", "v", "adj", "adv", "conj", "prep"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordListError {
    #[error("indented line with no word above it at line {line}")]
    OrphanLine { line: usize },

    #[error("definition without gloss at line {line}")]
    EmptyGloss { line: usize },
}

pub type Result<T> = std::result::Result<T, WordListError>;

/// Parse word-list text into raw entries, parents before derivatives.
pub fn parse(content: &str) -> Result<Vec<RawEntry>> {
    let mut entries: Vec<RawEntry> = Vec::new();
    // (indent, index into entries) of the words enclosing the current line
    let mut parents: Vec<(usize, usize)> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let indent = line.len() - line.trim_start().len();
        while parents.last().is_some_and(|&(depth, _)| depth >= indent) {
            parents.pop();
        }

        if indent > 0 {
            let &(_, parent) = parents
                .last()
                .ok_or(WordListError::OrphanLine { line: line_num })?;

            if let Some(definition) = parse_definition(text, line_num)? {
                entries[parent].definitions.push(definition);
                continue;
            }
        }

        entries.push(RawEntry {
            word: text.to_string(),
            definitions: Vec::new(),
        });
        parents.push((indent, entries.len() - 1));
    }

    Ok(entries)
}

fn parse_definition(text: &str, line: usize) -> Result<Option<Definition>> {
    let (pos, gloss) = match text.split_once(char::is_whitespace) {
        Some((pos, gloss)) => (pos, gloss.trim()),
        None => (text, ""),
    };

    if !PARTS_OF_SPEECH.contains(&pos) {
        return Ok(None);
    }
    if gloss.is_empty() {
        return Err(WordListError::EmptyGloss { line });
    }
    Ok(Some(Definition::new(pos, gloss)))
}
