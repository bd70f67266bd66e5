//! Block-level document parser.
//!
//! Parses Markdown-like text into an element tree by offering blank-line
//! separated blocks to a priority-ordered list of [`BlockProcessor`]s.
//! Extensions register their own processors to add block syntax.
//!
//! Before parsing, fenced code blocks are moved into a [`Stash`] and replaced
//! by placeholder lines, so that nothing inside code can be mistaken for
//! block syntax.
//!
//! # Quick Start
//!
//! ```
//! use rw_blocks::BlockParser;
//!
//! let mut parser = BlockParser::new();
//! let doc = parser.parse_document("> quoted\n\n```sh\nls -la\n```");
//!
//! assert_eq!(
//!     doc.render(),
//!     "<blockquote><p>quoted</p></blockquote>\
//!      <pre><code class=\"language-sh\">ls -la</code></pre>"
//! );
//! ```
//!
//! # Parser State
//!
//! Processors that recurse into nested content push a named state with
//! [`BlockParser::push_state`] and pop it afterwards. Other processors check
//! the innermost state with [`BlockParser::is_state`], e.g. paragraphs inside
//! a tight list item (`"list"`) become item text instead of `p` elements.

mod fence;
pub mod parser;
pub mod processors;
pub mod stash;
pub mod tags;
mod tree;

pub use parser::{BlockParser, BlockProcessor};
pub use stash::{Stash, StashEntry};
pub use tree::{Document, Element, NodeId, Text, escape_html};
