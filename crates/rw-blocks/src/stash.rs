//! Literal text stash for fenced code blocks.
//!
//! Fenced code is removed from the source before block splitting so that
//! blank lines and block syntax inside code cannot interfere with block
//! processors. Each fenced block is stored in the [`Stash`] together with the
//! column its opening fence was found at, and replaced by a single
//! placeholder line at that indentation.
//!
//! Placeholders have the form `\u{2}wzxhzdk:{id}\u{3}` and may be preceded by
//! spaces or `>` markers once the surrounding container has been stripped.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::fence::{FenceLine, FenceTracker};

/// Placeholder line: optional indent/quote prefix, then the marker.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^([> ]*)\u{2}wzxhzdk:([0-9]+)\u{3}$").unwrap());

/// A stashed literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashEntry {
    /// Original text, including the fence lines and their indentation.
    pub text: String,
    /// Column of the opening fence in the source.
    pub column: usize,
}

/// A placeholder found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    /// Stash key.
    pub id: usize,
    /// Width of the prefix before the marker.
    pub indent: usize,
}

/// Literal text store keyed by numeric id.
#[derive(Debug, Default)]
pub struct Stash {
    entries: HashMap<usize, StashEntry>,
    next_id: usize,
}

impl Stash {
    /// Create an empty stash.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store text and return its id.
    pub fn store(&mut self, text: impl Into<String>, column: usize) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            id,
            StashEntry {
                text: text.into(),
                column,
            },
        );
        id
    }

    /// Look up an entry.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&StashEntry> {
        self.entries.get(&id)
    }

    /// Remove an entry.
    pub fn remove(&mut self, id: usize) -> Option<StashEntry> {
        self.entries.remove(&id)
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the stash is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries and restart ids.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_id = 0;
    }
}

/// Placeholder marker for a stash id.
#[must_use]
pub fn placeholder(id: usize) -> String {
    format!("\u{2}wzxhzdk:{id}\u{3}")
}

/// Parse a line consisting of a single placeholder.
///
/// # Example
///
/// ```
/// use rw_blocks::stash::{parse_placeholder, placeholder};
///
/// let line = format!("  {}", placeholder(7));
/// let found = parse_placeholder(&line).unwrap();
/// assert_eq!(found.id, 7);
/// assert_eq!(found.indent, 2);
/// ```
#[must_use]
pub fn parse_placeholder(line: &str) -> Option<Placeholder> {
    let caps = PLACEHOLDER_RE.captures(line)?;
    let indent = caps.get(1).map_or(0, |m| m.as_str().len());
    let id = caps.get(2)?.as_str().parse().ok()?;
    Some(Placeholder { id, indent })
}

/// Replace fenced code blocks in `text` with placeholders.
///
/// Unterminated fences are left untouched.
pub fn stash_fenced_code(text: &str, stash: &mut Stash) -> String {
    let mut output: Vec<String> = Vec::new();
    let mut tracker = FenceTracker::new();
    let mut pending: Option<(usize, Vec<&str>)> = None;

    for line in text.split('\n') {
        match tracker.update(line) {
            FenceLine::Opening { column } => pending = Some((column, vec![line])),
            FenceLine::Inside => {
                if let Some((_, lines)) = pending.as_mut() {
                    lines.push(line);
                }
            }
            FenceLine::Closing => {
                if let Some((column, mut lines)) = pending.take() {
                    lines.push(line);
                    let id = stash.store(lines.join("\n"), column);
                    tracing::trace!(id, column, "Stashed fenced code");
                    output.push(format!("{}{}", " ".repeat(column), placeholder(id)));
                }
            }
            FenceLine::Outside => output.push(line.to_owned()),
        }
    }

    if let Some((_, lines)) = pending {
        output.extend(lines.into_iter().map(str::to_owned));
    }

    output.join("\n")
}

/// Split a stashed fenced block into its info string and code body.
///
/// The body is de-indented by the entry's column.
#[must_use]
pub fn code_body(entry: &StashEntry) -> (String, String) {
    let lines: Vec<&str> = entry.text.split('\n').collect();
    let info = lines
        .first()
        .map(|l| l.trim().trim_start_matches(['`', '~']).trim().to_owned())
        .unwrap_or_default();
    let body = if lines.len() > 2 {
        lines[1..lines.len() - 1]
            .iter()
            .map(|l| strip_indent(l, entry.column))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        String::new()
    };
    (info, body)
}

/// Strip up to `count` leading spaces.
#[must_use]
pub fn strip_indent(line: &str, count: usize) -> &str {
    let spaces = line.bytes().take(count).take_while(|&b| b == b' ').count();
    &line[spaces..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_store_and_remove() {
        let mut stash = Stash::new();
        let a = stash.store("a", 0);
        let b = stash.store("b", 4);

        assert_ne!(a, b);
        assert_eq!(stash.len(), 2);
        assert_eq!(stash.get(b).map(|e| e.column), Some(4));
        assert_eq!(stash.remove(a).map(|e| e.text), Some("a".to_owned()));
        assert!(stash.get(a).is_none());
    }

    #[test]
    fn test_parse_placeholder_with_quote_prefix() {
        let line = format!("> {}", placeholder(3));
        let found = parse_placeholder(&line).unwrap();
        assert_eq!(found, Placeholder { id: 3, indent: 2 });
    }

    #[test]
    fn test_parse_placeholder_rejects_text() {
        assert!(parse_placeholder("plain text").is_none());
        assert!(parse_placeholder(&format!("x {}", placeholder(1))).is_none());
    }

    #[test]
    fn test_stash_fenced_code() {
        let mut stash = Stash::new();
        let output = stash_fenced_code("before\n\n```python\n:::\n\nx = 1\n```\nafter", &mut stash);

        assert_eq!(output, format!("before\n\n{}\nafter", placeholder(0)));
        let entry = stash.get(0).unwrap();
        assert_eq!(entry.text, "```python\n:::\n\nx = 1\n```");
        assert_eq!(entry.column, 0);
    }

    #[test]
    fn test_stash_indented_fence_keeps_column() {
        let mut stash = Stash::new();
        let output = stash_fenced_code("- item\n\n    ```\n    code\n    ```", &mut stash);

        assert_eq!(output, format!("- item\n\n    {}", placeholder(0)));
        assert_eq!(stash.get(0).unwrap().column, 4);
    }

    #[test]
    fn test_unterminated_fence_left_alone() {
        let mut stash = Stash::new();
        let input = "```\nnever closed";
        assert_eq!(stash_fenced_code(input, &mut stash), input);
        assert!(stash.is_empty());
    }

    #[test]
    fn test_code_body() {
        let entry = StashEntry {
            text: "    ```rust\n    let x = 1;\n      indented\n    ```".to_owned(),
            column: 4,
        };
        let (info, body) = code_body(&entry);
        assert_eq!(info, "rust");
        assert_eq!(body, "let x = 1;\n  indented");
    }

    #[test]
    fn test_strip_indent() {
        assert_eq!(strip_indent("    x", 2), "  x");
        assert_eq!(strip_indent(" x", 4), "x");
        assert_eq!(strip_indent(">x", 2), ">x");
    }
}
