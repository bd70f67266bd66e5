//! Block parser with pluggable block processors.
//!
//! The parser splits source text into blocks on blank lines and offers each
//! block, together with the element it should be attached to, to the
//! registered processors in priority order. A processor claims a block in
//! [`BlockProcessor::test`] and consumes it (and possibly following blocks)
//! in [`BlockProcessor::run`]. Processors may call back into
//! [`BlockParser::parse_blocks`] or [`BlockParser::parse_chunk`] to parse
//! nested content under another element.

use std::mem;
use std::rc::Rc;

use crate::processors;
use crate::stash::{Stash, stash_fenced_code};
use crate::tree::{Document, NodeId};

/// A block-level processor.
///
/// Processors are shared (`Rc`) so that a processor can keep running while
/// the parser it was called from is borrowed mutably. Processors that keep
/// per-document state use interior mutability and clear it in
/// [`BlockProcessor::reset`].
pub trait BlockProcessor {
    /// Check whether this processor handles `block` under `parent`.
    fn test(&self, parser: &BlockParser, parent: NodeId, block: &str) -> bool;

    /// Process `blocks[0]` (and optionally following blocks).
    ///
    /// Consumed blocks must be removed from `blocks`. Returning `false`
    /// passes the block on to the next processor.
    fn run(&self, parser: &mut BlockParser, parent: NodeId, blocks: &mut Vec<String>) -> bool;

    /// Clear per-document state. Called before each document parse.
    fn reset(&self) {}
}

struct Registered {
    name: String,
    priority: u32,
    processor: Rc<dyn BlockProcessor>,
}

/// Block parser.
///
/// # Example
///
/// ```
/// use rw_blocks::BlockParser;
///
/// let mut parser = BlockParser::new();
/// let doc = parser.parse_document("# Title\n\nSome *text*.\n\n- one\n- two");
///
/// assert_eq!(
///     doc.render(),
///     "<h1>Title</h1><p>Some *text*.</p><ul><li>one</li><li>two</li></ul>"
/// );
/// ```
pub struct BlockParser {
    doc: Document,
    stash: Stash,
    state: Vec<String>,
    processors: Vec<Registered>,
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser {
    /// Create a parser with the default block processors.
    #[must_use]
    pub fn new() -> Self {
        let mut parser = Self::empty();
        processors::register_defaults(&mut parser);
        parser
    }

    /// Create a parser without any processors.
    ///
    /// Blocks that no processor claims are dropped.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            doc: Document::new(),
            stash: Stash::new(),
            state: Vec::new(),
            processors: Vec::new(),
        }
    }

    /// Register a processor.
    ///
    /// Higher priorities are tried first. A processor registered under an
    /// existing name replaces it.
    pub fn register(&mut self, name: &str, processor: Rc<dyn BlockProcessor>, priority: u32) {
        self.processors.retain(|p| p.name != name);
        let index = self
            .processors
            .iter()
            .position(|p| p.priority < priority)
            .unwrap_or(self.processors.len());
        self.processors.insert(
            index,
            Registered {
                name: name.to_owned(),
                priority,
                processor,
            },
        );
    }

    /// Names of registered processors in the order they are tried.
    #[must_use]
    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name.as_str()).collect()
    }

    /// Parse a complete document.
    ///
    /// Resets all processors, stashes fenced code, and parses the result
    /// under a fresh root element.
    pub fn parse_document(&mut self, text: &str) -> Document {
        for registered in &self.processors {
            registered.processor.reset();
        }
        self.doc = Document::new();
        self.stash.clear();
        self.state.clear();

        let text = text.replace("\r\n", "\n");
        let source = stash_fenced_code(&text, &mut self.stash);
        tracing::debug!(stashed = self.stash.len(), "Parsing document");

        let root = self.doc.root();
        self.parse_chunk(root, &source);
        mem::take(&mut self.doc)
    }

    /// Parse a list of blocks under `parent`.
    pub fn parse_blocks(&mut self, parent: NodeId, mut blocks: Vec<String>) {
        while !blocks.is_empty() {
            let mut handled = false;
            for index in 0..self.processors.len() {
                let processor = Rc::clone(&self.processors[index].processor);
                if processor.test(self, parent, &blocks[0]) && processor.run(self, parent, &mut blocks) {
                    handled = true;
                    break;
                }
            }
            if !handled {
                let dropped = blocks.remove(0);
                tracing::trace!(len = dropped.len(), "No processor claimed block");
            }
        }
    }

    /// Split `text` into blocks and parse them under `parent`.
    pub fn parse_chunk(&mut self, parent: NodeId, text: &str) {
        self.parse_blocks(parent, split_blocks(text));
    }

    /// The document being built.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access to the document being built.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Fenced code stash of the current document.
    #[must_use]
    pub fn stash(&self) -> &Stash {
        &self.stash
    }

    /// Mutable access to the stash.
    pub fn stash_mut(&mut self) -> &mut Stash {
        &mut self.stash
    }

    /// Enter a parser state.
    pub fn push_state(&mut self, state: &str) {
        self.state.push(state.to_owned());
    }

    /// Leave the current parser state.
    pub fn pop_state(&mut self) {
        self.state.pop();
    }

    /// Check whether the innermost parser state is `state`.
    #[must_use]
    pub fn is_state(&self, state: &str) -> bool {
        self.state.last().is_some_and(|s| s == state)
    }
}

/// Split text into blocks of consecutive non-blank lines.
///
/// # Example
///
/// ```
/// use rw_blocks::parser::split_blocks;
///
/// let blocks = split_blocks("a\nb\n\n  \n\nc\n");
/// assert_eq!(blocks, vec!["a\nb".to_owned(), "c".to_owned()]);
/// ```
#[must_use]
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use pretty_assertions::assert_eq;

    /// Records every block it sees and claims none of them.
    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<String>>,
        resets: RefCell<usize>,
    }

    impl BlockProcessor for Recorder {
        fn test(&self, _parser: &BlockParser, _parent: NodeId, block: &str) -> bool {
            self.seen.borrow_mut().push(block.to_owned());
            false
        }

        fn run(&self, _parser: &mut BlockParser, _parent: NodeId, _blocks: &mut Vec<String>) -> bool {
            false
        }

        fn reset(&self) {
            *self.resets.borrow_mut() += 1;
        }
    }

    /// Claims every block, declines it in `run`.
    struct Decliner;

    impl BlockProcessor for Decliner {
        fn test(&self, _parser: &BlockParser, _parent: NodeId, _block: &str) -> bool {
            true
        }

        fn run(&self, _parser: &mut BlockParser, _parent: NodeId, _blocks: &mut Vec<String>) -> bool {
            false
        }
    }

    #[test]
    fn test_split_blocks() {
        assert_eq!(split_blocks(""), Vec::<String>::new());
        assert_eq!(split_blocks("a\n\n\n\nb"), vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(split_blocks("  a\n  b"), vec!["  a\n  b".to_owned()]);
    }

    #[test]
    fn test_register_orders_by_priority() {
        let mut parser = BlockParser::empty();
        parser.register("low", Rc::new(Decliner), 10);
        parser.register("high", Rc::new(Decliner), 90);
        parser.register("mid", Rc::new(Decliner), 50);
        parser.register("low", Rc::new(Decliner), 95);

        assert_eq!(parser.processor_names(), vec!["low", "high", "mid"]);
    }

    #[test]
    fn test_default_processor_order() {
        let parser = BlockParser::new();
        assert_eq!(
            parser.processor_names(),
            vec!["indent", "code", "heading", "olist", "ulist", "quote", "paragraph"]
        );
    }

    #[test]
    fn test_declined_block_falls_through() {
        let mut parser = BlockParser::new();
        parser.register("decliner", Rc::new(Decliner), 100);

        let doc = parser.parse_document("text");
        assert_eq!(doc.render(), "<p>text</p>");
    }

    #[test]
    fn test_unclaimed_blocks_dropped() {
        let recorder = Rc::new(Recorder::default());
        let mut parser = BlockParser::empty();
        parser.register("recorder", Rc::clone(&recorder) as Rc<dyn BlockProcessor>, 10);

        let doc = parser.parse_document("one\n\ntwo");
        assert_eq!(doc.render(), "");
        assert_eq!(*recorder.seen.borrow(), vec!["one".to_owned(), "two".to_owned()]);
        assert_eq!(*recorder.resets.borrow(), 1);
    }

    #[test]
    fn test_state_stack() {
        let mut parser = BlockParser::empty();
        assert!(!parser.is_state("list"));

        parser.push_state("list");
        parser.push_state("detabbed");
        assert!(parser.is_state("detabbed"));
        assert!(!parser.is_state("list"));

        parser.pop_state();
        assert!(parser.is_state("list"));
    }

    #[test]
    fn test_parse_document_resets_state() {
        let mut parser = BlockParser::new();
        parser.push_state("list");
        let first = parser.parse_document("```\ncode\n```");
        let second = parser.parse_document("```\ncode\n```");

        assert_eq!(first, second);
        assert!(!parser.is_state("list"));
        assert!(parser.stash().is_empty());
    }
}
