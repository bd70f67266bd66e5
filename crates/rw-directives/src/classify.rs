//! Content classification by target tag.

use crate::kind::ContentMode;

/// How blocks are placed into a target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handling {
    /// Parse as blocks.
    Block,
    /// Append as text.
    Span,
    /// Append as atomic text.
    Raw,
}

impl Handling {
    /// Whether start fences inside the content open nested directives.
    pub(crate) fn nests(self) -> bool {
        self == Self::Block
    }
}

/// Decide how content for a `tag` target is handled.
pub(crate) fn classify(tag: &str, mode: ContentMode) -> Handling {
    match mode.resolve(tag) {
        ContentMode::Auto | ContentMode::Block => Handling::Block,
        ContentMode::Span => Handling::Span,
        ContentMode::Raw => Handling::Raw,
    }
}

/// Whether a kind's content mode lets start fences nest inside it.
///
/// `Auto` kinds are assumed to nest until their target is known.
pub(crate) fn mode_nests(mode: ContentMode) -> bool {
    matches!(mode, ContentMode::Auto | ContentMode::Block)
}
