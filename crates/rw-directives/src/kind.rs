//! Directive kind contract.
//!
//! A [`DirectiveKind`] describes one named directive and builds a
//! [`Directive`] instance for every occurrence that passes configuration.
//! The instance creates its output elements and tells the engine where
//! content goes.

use rw_blocks::{Document, NodeId, tags};

use crate::error::DirectiveError;
use crate::options::{Arguments, OptionSpec, Options};
use crate::tracker::SharedTracker;

/// How content placed into a directive is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// Decide by the target element's tag.
    #[default]
    Auto,
    /// Parse content as blocks.
    Block,
    /// Keep content as text for inline processing.
    Span,
    /// Keep content as atomic text.
    Raw,
}

impl ContentMode {
    /// Replace `Auto` by the mode the host tag tables give `tag`.
    ///
    /// Raw and empty elements keep raw text, span-only and unknown elements
    /// keep inline text, other block-level elements parse blocks.
    #[must_use]
    pub fn resolve(self, tag: &str) -> Self {
        match self {
            Self::Auto if tags::is_raw(tag) || tags::is_empty(tag) => Self::Raw,
            Self::Auto if tags::is_span(tag) || !tags::is_block_level(tag) => Self::Span,
            Self::Auto => Self::Block,
            mode => mode,
        }
    }
}

/// Static description of a directive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveSpec {
    /// Lowercase name used in the start fence.
    pub name: &'static str,
    /// Minimum fence length that opens this directive.
    pub min_length: usize,
    /// Positional arguments.
    pub arguments: Arguments,
    /// Recognized header options.
    pub options: &'static [OptionSpec],
}

impl DirectiveSpec {
    /// Describe a directive with the default minimum fence length.
    #[must_use]
    pub const fn new(name: &'static str, arguments: Arguments, options: &'static [OptionSpec]) -> Self {
        Self {
            name,
            min_length: 3,
            arguments,
            options,
        }
    }
}

/// Everything a kind needs to build an instance.
#[derive(Debug, Clone)]
pub struct DirectiveContext {
    /// Length of the start fence.
    pub length: usize,
    /// Parsed positional arguments.
    pub arguments: Vec<String>,
    /// Converted options.
    pub options: Options,
    /// Tracker of this directive kind.
    pub tracker: SharedTracker,
}

/// One directive occurrence.
pub trait Directive {
    /// Minimum end fence length that closes this occurrence.
    fn length(&self) -> usize;

    /// Create the output elements under `parent` and return the root.
    fn create(&mut self, doc: &mut Document, parent: NodeId) -> NodeId;

    /// Element the next content goes into, or `None` to stop accepting
    /// content.
    fn add(&mut self, _doc: &Document, root: NodeId) -> Option<NodeId> {
        Some(root)
    }

    /// How content is handled.
    ///
    /// Kinds that know their target tag before `create` should return a
    /// resolved mode: while looking for an end fence the engine cannot tell
    /// what an `Auto` directive will hold, and assumes it parses blocks.
    fn content_mode(&self) -> ContentMode {
        ContentMode::Auto
    }
}

/// A named directive kind.
pub trait DirectiveKind {
    /// Static description.
    fn spec(&self) -> &DirectiveSpec;

    /// Build an instance from validated arguments and options.
    ///
    /// Kinds may reject the occurrence with a
    /// [`DirectiveError::InvalidArgument`].
    fn build(&self, ctx: DirectiveContext) -> Result<Box<dyn Directive>, DirectiveError>;
}
