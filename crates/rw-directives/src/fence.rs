//! Start and end fence matching.
//!
//! A start fence is a run of three or more colons followed by a directive
//! name, either in braces or bare:
//!
//! ```text
//! :::{note} Optional title
//! ::: details Summary text
//! ```
//!
//! An end fence is a run of three or more colons alone on its line. The run
//! length pairs fences: a directive opened with `n` colons is only closed by
//! an end fence of at least `n` colons.

use std::mem;
use std::sync::LazyLock;

use regex::Regex;

static START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ ]{0,3}(:{3,})[ ]*(?:\{[ ]*(\w+)[ ]*\}(.*)|(\w+)(?:[ \t]+(.*))?)$").unwrap()
});

static END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ ]{0,3}(:{3,})[ \t]*$").unwrap());

/// A parsed start fence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartFence {
    /// Number of colons.
    pub length: usize,
    /// Lowercased directive name.
    pub name: String,
    /// Trimmed text after the name.
    pub arguments: String,
}

/// Parse a start fence line.
///
/// # Example
///
/// ```
/// use rw_directives::fence::parse_start;
///
/// let fence = parse_start("::::{Tab} First tab").unwrap();
/// assert_eq!(fence.length, 4);
/// assert_eq!(fence.name, "tab");
/// assert_eq!(fence.arguments, "First tab");
/// ```
#[must_use]
pub fn parse_start(line: &str) -> Option<StartFence> {
    let caps = START_RE.captures(line)?;
    let length = caps.get(1)?.as_str().len();
    let (name, arguments) = match caps.get(2) {
        Some(name) => (name, caps.get(3)),
        None => (caps.get(4)?, caps.get(5)),
    };
    Some(StartFence {
        length,
        name: name.as_str().to_lowercase(),
        arguments: arguments.map_or("", |m| m.as_str()).trim().to_owned(),
    })
}

/// Parse an end fence line, returning its length.
#[must_use]
pub fn parse_end(line: &str) -> Option<usize> {
    END_RE.captures(line).and_then(|caps| caps.get(1)).map(|m| m.as_str().len())
}

/// An open nesting level while scanning for an end fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    /// Fence length of the directive that opened the level.
    pub length: usize,
    /// Whether start fences inside this level open further levels.
    pub nests: bool,
}

impl Level {
    /// Level of a directive whose content is parsed as blocks.
    #[must_use]
    pub const fn nesting(length: usize) -> Self {
        Self { length, nests: true }
    }
}

/// Split the content of a directive from the blocks that follow it.
///
/// Scans `blocks` line by line for the end fence of a directive opened with
/// `length` colons. While the innermost level nests and fewer than `room`
/// levels are open, `nested` is asked about every non-end line together with
/// the rest of its block and returns the level that line would open. A `room`
/// of zero means the content does not nest at all. Such levels, plus the
/// still-open ones given in `open` (outermost first), must be closed before an
/// end fence can match this directive. An end fence closes the innermost level
/// it is long enough for.
///
/// Returns the content blocks and whether the end fence was found. The end
/// fence line is dropped; `blocks` keeps whatever follows it.
pub fn split_end<F>(
    blocks: &mut Vec<String>,
    length: usize,
    room: usize,
    open: &[Level],
    mut nested: F,
) -> (Vec<String>, bool)
where
    F: FnMut(&str, &[&str]) -> Option<Level>,
{
    let mut levels = open.to_vec();
    let mut found = None;

    'scan: for (index, block) in blocks.iter().enumerate() {
        let lines: Vec<&str> = block.split('\n').collect();
        for (at, line) in lines.iter().enumerate() {
            if let Some(end) = parse_end(line) {
                if let Some(level) = levels.iter().rposition(|l| l.length <= end) {
                    levels.truncate(level);
                } else if end >= length {
                    found = Some((index, at));
                    break 'scan;
                }
            } else if levels.len() < room
                && levels.last().is_none_or(|l| l.nests)
                && let Some(level) = nested(line, &lines[at + 1..])
            {
                levels.push(level);
            }
        }
    }

    let Some((index, at)) = found else {
        return (mem::take(blocks), false);
    };

    let mut rest = blocks.split_off(index);
    let block = rest.remove(0);
    let lines: Vec<&str> = block.split('\n').collect();
    let before = lines[..at].join("\n");
    let after = lines[at + 1..].join("\n");

    let mut ours = mem::take(blocks);
    if !before.is_empty() {
        ours.push(before);
    }
    if !after.is_empty() {
        blocks.push(after);
    }
    blocks.extend(rest);

    (ours, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn blocks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    const ANY: usize = usize::MAX;

    fn no_nesting(_: &str, _: &[&str]) -> Option<Level> {
        None
    }

    fn any_start(line: &str, _: &[&str]) -> Option<Level> {
        parse_start(line).map(|fence| Level {
            length: fence.length,
            nests: fence.name != "raw",
        })
    }

    #[test]
    fn test_parse_start_braced() {
        let fence = parse_start(":::{ note }  Title here ").unwrap();
        assert_eq!(fence.length, 3);
        assert_eq!(fence.name, "note");
        assert_eq!(fence.arguments, "Title here");
    }

    #[test]
    fn test_parse_start_bare() {
        let fence = parse_start("   ::: details Click me").unwrap();
        assert_eq!(fence.name, "details");
        assert_eq!(fence.arguments, "Click me");

        let fence = parse_start(":::::NOTE").unwrap();
        assert_eq!(fence.length, 5);
        assert_eq!(fence.name, "note");
        assert_eq!(fence.arguments, "");
    }

    #[test]
    fn test_parse_start_rejects() {
        assert!(parse_start(":: note").is_none());
        assert!(parse_start("    ::: note").is_none());
        assert!(parse_start(":::").is_none());
        assert!(parse_start("::: note-x").is_none());
        assert!(parse_start("text ::: note").is_none());
    }

    #[test]
    fn test_parse_end() {
        assert_eq!(parse_end(":::"), Some(3));
        assert_eq!(parse_end("  ::::: \t"), Some(5));
        assert_eq!(parse_end("::"), None);
        assert_eq!(parse_end("::: note"), None);
        assert_eq!(parse_end("    :::"), None);
    }

    #[test]
    fn test_split_end_in_first_block() {
        let mut input = blocks(&["one\n:::\nafter", "next"]);
        let (ours, end) = split_end(&mut input, 3, ANY, &[], no_nesting);

        assert!(end);
        assert_eq!(ours, blocks(&["one"]));
        assert_eq!(input, blocks(&["after", "next"]));
    }

    #[test]
    fn test_split_end_across_blocks() {
        let mut input = blocks(&["one", "two\n::::", "three"]);
        let (ours, end) = split_end(&mut input, 4, ANY, &[], no_nesting);

        assert!(end);
        assert_eq!(ours, blocks(&["one", "two"]));
        assert_eq!(input, blocks(&["three"]));
    }

    #[test]
    fn test_split_end_not_found() {
        let mut input = blocks(&["one", "two"]);
        let (ours, end) = split_end(&mut input, 3, ANY, &[], no_nesting);

        assert!(!end);
        assert_eq!(ours, blocks(&["one", "two"]));
        assert!(input.is_empty());
    }

    #[test]
    fn test_short_end_does_not_close() {
        let mut input = blocks(&["a\n:::\nb\n::::"]);
        let (ours, end) = split_end(&mut input, 4, ANY, &[], no_nesting);

        assert!(end);
        assert_eq!(ours, blocks(&["a\n:::\nb"]));
    }

    #[test]
    fn test_nested_longer_fence_closes_first() {
        let mut input = blocks(&[":::: tab A\nx\n::::\n:::\ntail"]);
        let (ours, end) = split_end(&mut input, 3, ANY, &[], any_start);

        assert!(end);
        assert_eq!(ours, blocks(&[":::: tab A\nx\n::::"]));
        assert_eq!(input, blocks(&["tail"]));
    }

    #[test]
    fn test_open_levels_are_closed_first() {
        let mut input = blocks(&["inner\n:::", "outer\n:::"]);
        let (ours, end) = split_end(&mut input, 3, ANY, &[Level::nesting(3)], no_nesting);

        assert!(end);
        assert_eq!(ours, blocks(&["inner\n:::", "outer"]));
        assert!(input.is_empty());
    }

    #[test]
    fn test_end_closes_innermost_fitting_level() {
        // The length-5 level cannot be closed by `:::`, the length-3 level can.
        let mut input = blocks(&[":::::x\n:::\nafter\n:::"]);
        let (ours, end) = split_end(&mut input, 3, ANY, &[Level::nesting(3)], any_start);

        assert!(end);
        assert_eq!(ours, blocks(&[":::::x\n:::\nafter"]));
    }

    #[test]
    fn test_no_nesting_inside_raw_level() {
        let mut input = blocks(&["::: raw\n::: note\n:::\n:::\ntail"]);
        let (ours, end) = split_end(&mut input, 3, ANY, &[], any_start);

        assert!(end);
        assert_eq!(ours, blocks(&["::: raw\n::: note\n:::"]));
        assert_eq!(input, blocks(&["tail"]));
    }

    #[test]
    fn test_raw_content_ignores_starts() {
        let mut input = blocks(&["::: note\n:::\ntail"]);
        let (ours, end) = split_end(&mut input, 3, 0, &[], any_start);

        assert!(end);
        assert_eq!(ours, blocks(&["::: note"]));
        assert_eq!(input, blocks(&["tail"]));
    }

    #[test]
    fn test_starts_past_room_are_text() {
        let mut input = blocks(&["::: a\n::: b\n::: c\n:::\n:::\ntail\n:::\nrest"]);
        let (ours, end) = split_end(&mut input, 3, 2, &[], any_start);

        assert!(end);
        assert_eq!(ours, blocks(&["::: a\n::: b\n::: c\n:::\n:::\ntail"]));
        assert_eq!(input, blocks(&["rest"]));
    }

    #[test]
    fn test_end_fence_only_block() {
        let mut input = blocks(&[":::", "after"]);
        let (ours, end) = split_end(&mut input, 3, ANY, &[], no_nesting);

        assert!(end);
        assert!(ours.is_empty());
        assert_eq!(input, blocks(&["after"]));
    }
}
