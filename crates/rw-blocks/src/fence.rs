//! Line classification for the fenced code stash.
//!
//! A code fence is a run of three or more backticks or tildes, possibly
//! indented (e.g. inside a list item). The block ends at a run of the same
//! character that is at least as long and has nothing after it.

/// Classification of one line by [`FenceTracker::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FenceLine {
    /// Opening fence found at the given column.
    Opening { column: usize },
    /// Closing fence of the current block.
    Closing,
    /// Line inside a fenced block.
    Inside,
    /// Line outside any fenced block.
    Outside,
}

/// Open fence: its character and run length.
#[derive(Debug, Clone, Copy)]
struct OpenFence {
    marker: char,
    length: usize,
}

/// Follows code fences line by line.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<OpenFence>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Classify the next line.
    pub(crate) fn update(&mut self, line: &str) -> FenceLine {
        let trimmed = line.trim_start_matches(' ');
        let run = fence_run(trimmed);

        match (self.open, run) {
            (Some(open), Some((marker, length, rest)))
                if marker == open.marker && length >= open.length && rest.trim().is_empty() =>
            {
                self.open = None;
                FenceLine::Closing
            }
            (Some(_), _) => FenceLine::Inside,
            (None, Some((marker, length, rest))) if marker == '~' || !rest.contains('`') => {
                self.open = Some(OpenFence { marker, length });
                FenceLine::Opening {
                    column: line.len() - trimmed.len(),
                }
            }
            (None, _) => FenceLine::Outside,
        }
    }
}

/// Split a leading run of three or more fence characters off `text`.
fn fence_run(text: &str) -> Option<(char, usize, &str)> {
    let marker = text.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let length = text.len() - text.trim_start_matches(marker).len();
    (length >= 3).then_some((marker, length, &text[length..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify(lines: &[&str]) -> Vec<FenceLine> {
        let mut tracker = FenceTracker::new();
        lines.iter().map(|line| tracker.update(line)).collect()
    }

    #[test]
    fn test_backtick_block() {
        assert_eq!(
            classify(&["```rust", "fn main() {}", "```", "after"]),
            vec![
                FenceLine::Opening { column: 0 },
                FenceLine::Inside,
                FenceLine::Closing,
                FenceLine::Outside
            ]
        );
    }

    #[test]
    fn test_indented_fence_reports_column() {
        assert_eq!(
            classify(&["    ~~~ text", "    ~~~"]),
            vec![FenceLine::Opening { column: 4 }, FenceLine::Closing]
        );
    }

    #[test]
    fn test_close_needs_same_marker_and_length() {
        assert_eq!(
            classify(&["````", "```", "~~~~", "```` x", "`````"]),
            vec![
                FenceLine::Opening { column: 0 },
                FenceLine::Inside,
                FenceLine::Inside,
                FenceLine::Inside,
                FenceLine::Closing
            ]
        );
    }

    #[test]
    fn test_not_a_fence() {
        assert_eq!(
            classify(&["``inline``", "```a`b", "::: note", "- ```"]),
            vec![FenceLine::Outside; 4]
        );
    }
}
