//! Nested colon-fenced directive blocks.
//!
//! Adds directive syntax to the [`rw_blocks`] block parser:
//!
//! ```text
//! ::: note Optional title
//! Content parsed as blocks.
//! :::
//! ```
//!
//! A directive opens with a run of three or more colons followed by its name
//! (bare or in braces) and closes with a run of at least as many colons.
//! Longer fences let directives nest. An optional header right after the
//! start fence configures the directive, either as a `---` delimited YAML
//! block or as `:key: value` lines.
//!
//! # Quick Start
//!
//! ```
//! use rw_blocks::BlockParser;
//! use rw_directives::{DirectiveProcessor, Registry};
//!
//! let mut parser = BlockParser::new();
//! DirectiveProcessor::new(Registry::builtin()).install(&mut parser);
//!
//! let doc = parser.parse_document(":::: details Show more\n:open: yes\n::: tip\nNested\n:::\n::::");
//! assert_eq!(
//!     doc.render(),
//!     "<details open=\"open\"><summary>Show more</summary>\
//!      <div class=\"admonition tip\"><p>Nested</p></div></details>"
//! );
//! ```
//!
//! # Content Handling
//!
//! Each directive names the element its content goes into. Content for
//! block-level elements is parsed as blocks. Content for span-only elements
//! (`p`, `summary`, ...) is appended as text, and content for raw elements
//! (`pre`, `script`, ...) is appended as atomic text with fenced code
//! restored from the stash. Kinds may override this with a [`ContentMode`].
//!
//! # Continuation
//!
//! A directive whose end fence is not among the blocks the host offered
//! stays open and continues when the host offers more blocks under the same
//! element. This lets directive bodies span indented list item chunks.
//!
//! # Custom Kinds
//!
//! Implement [`DirectiveKind`] and [`Directive`] and add the kind with
//! [`Registry::with_kind`].

mod classify;
pub mod config;
pub mod error;
pub mod fence;
pub mod header;
pub mod kind;
pub mod kinds;
pub mod options;
mod processor;
pub mod registry;
mod stack;
pub mod tracker;
mod unstash;

pub use config::{ConfigError, DirectivesConfig};
pub use error::DirectiveError;
pub use kind::{ContentMode, Directive, DirectiveContext, DirectiveKind, DirectiveSpec};
pub use options::{Arguments, Converter, OptionSpec, OptionValue, Options};
pub use processor::{DirectiveProcessor, MAX_DEPTH, NAME, PRIORITY, STATE};
pub use registry::Registry;
pub use tracker::{SharedTracker, Tracker};
