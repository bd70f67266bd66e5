//! Recovery of stashed fenced code for text content.

use rw_blocks::Stash;
use rw_blocks::stash::{parse_placeholder, strip_indent};

/// Replace placeholder lines with the stashed code they stand for.
///
/// The code is re-indented relative to the placeholder: its original column
/// minus the placeholder's indentation is stripped from every line. Used
/// entries are removed from the stash. Placeholders without an entry are
/// kept as they are.
pub(crate) fn revert_fenced_code(stash: &mut Stash, blocks: &[String]) -> Vec<String> {
    blocks
        .iter()
        .map(|block| {
            block
                .split('\n')
                .map(|line| {
                    let Some(found) = parse_placeholder(line) else {
                        return line.to_owned();
                    };
                    let Some(entry) = stash.remove(found.id) else {
                        tracing::debug!(id = found.id, "Keeping unresolved stash placeholder");
                        return line.to_owned();
                    };
                    let strip = entry.column.saturating_sub(found.indent);
                    entry
                        .text
                        .split('\n')
                        .map(|l| strip_indent(l, strip))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rw_blocks::stash::placeholder;

    #[test]
    fn test_reindents_to_placeholder() {
        let mut stash = Stash::new();
        let id = stash.store("    ```\n      code\n    ```", 4);
        let blocks = vec![format!("text\n{}", placeholder(id))];

        let reverted = revert_fenced_code(&mut stash, &blocks);

        assert_eq!(reverted, vec!["text\n```\n  code\n```".to_owned()]);
        assert!(stash.is_empty());
    }

    #[test]
    fn test_keeps_placeholder_indent() {
        let mut stash = Stash::new();
        let id = stash.store("    ```\n    x\n    ```", 4);
        let blocks = vec![format!("  {}", placeholder(id))];

        let reverted = revert_fenced_code(&mut stash, &blocks);

        assert_eq!(reverted, vec!["  ```\n  x\n  ```".to_owned()]);
    }

    #[test]
    fn test_unresolved_placeholder_kept() {
        let mut stash = Stash::new();
        let line = placeholder(42);

        let reverted = revert_fenced_code(&mut stash, std::slice::from_ref(&line));

        assert_eq!(reverted, vec![line]);
    }
}
