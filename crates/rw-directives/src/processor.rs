//! Block processor that runs directives.
//!
//! The host offers one block at a time under some parent element. The
//! processor claims a block when it continues a hungry directive or
//! contains a valid start fence, then splits off the directive's content up
//! to the matching end fence and dispatches it into the element the
//! directive names.
//!
//! Content that reaches the end of the available blocks without an end fence
//! leaves the directive hungry. The host may later offer more blocks under
//! the same parent, e.g. the next indented chunk of a list item, and the
//! directive picks up where it left off.
//!
//! Directives nest at most [`MAX_DEPTH`] deep. Start fences further in are
//! left as text.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rw_blocks::processors::loosen_item;
use rw_blocks::{BlockParser, BlockProcessor, Document, NodeId};

use crate::classify::{Handling, classify, mode_nests};
use crate::fence::{Level, parse_start, split_end};
use crate::header::split_header;
use crate::kind::Directive;
use crate::registry::Registry;
use crate::stack::{EntryId, OpenDirective, OpenStack};
use crate::tracker::SharedTracker;
use crate::unstash::revert_fenced_code;

/// Name the processor registers under.
pub const NAME: &str = "directives";

/// Priority of the processor: after list indentation, before everything
/// else of the default host grammar.
pub const PRIORITY: u32 = 89;

/// Parser state pushed while directive content is parsed as blocks.
pub const STATE: &str = "directives";

/// Deepest nesting at which a start fence still opens a directive.
pub const MAX_DEPTH: usize = 64;

/// A start fence that passed configuration.
struct Opening {
    /// Index of the fence line in its block.
    line: usize,
    /// Header lines following the fence.
    header_lines: usize,
    name: String,
    directive: Box<dyn Directive>,
}

enum Claim {
    Continue(EntryId),
    Open(Opening),
}

/// Result of the last `test`, kept for the following `run`.
struct CachedClaim {
    parent: NodeId,
    block: String,
    claim: Claim,
}

#[derive(Default)]
struct EngineState {
    stack: OpenStack,
    trackers: HashMap<&'static str, SharedTracker>,
    /// Directive whose content is being parsed.
    active: Option<EntryId>,
    cached: Option<CachedClaim>,
    /// Levels of start fences seen while looking for end fences, keyed by
    /// the fence line and its header lines.
    levels: HashMap<String, Option<Level>>,
}

/// Directive engine as a host block processor.
///
/// # Example
///
/// ```
/// use rw_blocks::BlockParser;
/// use rw_directives::{DirectiveProcessor, Registry};
///
/// let mut parser = BlockParser::new();
/// DirectiveProcessor::new(Registry::builtin()).install(&mut parser);
///
/// let doc = parser.parse_document("::: note\nbody line\n:::");
/// assert_eq!(doc.render(), r#"<div class="admonition note"><p>body line</p></div>"#);
/// ```
pub struct DirectiveProcessor {
    registry: Registry,
    state: RefCell<EngineState>,
}

impl DirectiveProcessor {
    /// Create an engine for the kinds in `registry`.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        let processor = Self {
            registry,
            state: RefCell::default(),
        };
        processor.reset();
        processor
    }

    /// Register the engine with a parser.
    pub fn install(self, parser: &mut BlockParser) {
        parser.register(NAME, Rc::new(self), PRIORITY);
    }

    /// Registered directive kinds.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Recognize a start fence and configure its directive.
    fn prepare(&self, line: &str, rest: &[&str]) -> Option<(usize, String, Box<dyn Directive>)> {
        let fence = parse_start(line)?;
        let (header, header_lines) = split_header(rest).unwrap_or_default();
        let tracker = self
            .state
            .borrow()
            .trackers
            .get(fence.name.as_str())
            .map(Rc::clone)
            .unwrap_or_default();

        match self.registry.parse_config(&fence, &header, tracker) {
            Ok(directive) => Some((header_lines, fence.name, directive)),
            Err(e) => {
                tracing::debug!(name = %fence.name, error = %e, "Start fence is not a directive");
                None
            }
        }
    }

    /// Level a start fence would open, remembered for the document.
    fn level(&self, line: &str, rest: &[&str]) -> Option<Level> {
        parse_start(line)?;
        let header_lines = split_header(rest).map_or(0, |(_, lines)| lines);
        let key = rest[..header_lines].iter().fold(line.to_owned(), |mut key, header| {
            key.push('\n');
            key.push_str(header);
            key
        });
        if let Some(&level) = self.state.borrow().levels.get(&key) {
            return level;
        }

        let level = self.prepare(line, rest).map(|(_, _, directive)| Level {
            length: directive.length(),
            nests: mode_nests(directive.content_mode()),
        });
        self.state.borrow_mut().levels.insert(key, level);
        level
    }

    /// Decide whether the engine handles `block` under `parent`.
    fn claim(&self, doc: &Document, parent: NodeId, block: &str) -> Option<Claim> {
        let depth = {
            let state = self.state.borrow();
            if let Some(entry) = state.stack.resolve(doc, parent) {
                return Some(Claim::Continue(entry));
            }
            state.stack.depth(state.active)
        };
        if depth >= MAX_DEPTH {
            tracing::trace!(depth, "Nesting limit reached, start fences stay text");
            return None;
        }

        let lines: Vec<&str> = block.split('\n').collect();
        lines.iter().enumerate().find_map(|(line, text)| {
            self.prepare(text, &lines[line + 1..])
                .map(|(header_lines, name, directive)| {
                    Claim::Open(Opening {
                        line,
                        header_lines,
                        name,
                        directive,
                    })
                })
        })
    }

    fn open(&self, parser: &mut BlockParser, parent: NodeId, blocks: &mut Vec<String>, opening: Opening) {
        let block = blocks.remove(0);
        let lines: Vec<&str> = block.split('\n').collect();
        let before = lines[..opening.line].join("\n");
        let after = lines
            .get(opening.line + 1 + opening.header_lines..)
            .map(|rest| rest.join("\n"))
            .unwrap_or_default();
        if !after.is_empty() {
            blocks.insert(0, after);
        }
        if !before.is_empty() {
            parser.parse_chunk(parent, &before);
        }

        if matches!(parser.document().tag(parent), "li" | "dd") {
            loosen_item(parser, parent);
        }

        let mut directive = opening.directive;
        let root = directive.create(parser.document_mut(), parent);
        let length = directive.length();
        let nests = mode_nests(directive.content_mode());
        let entry = {
            let mut state = self.state.borrow_mut();
            let outer = state.active;
            state.stack.push(OpenDirective {
                directive,
                root,
                parent,
                outer,
                length,
                nests,
            })
        };
        tracing::debug!(name = %opening.name, length, "Opened directive");

        self.consume(parser, entry, blocks);
    }

    fn resume(&self, parser: &mut BlockParser, entry: EntryId, blocks: &mut Vec<String>) {
        self.state.borrow_mut().stack.set_active(entry);
        tracing::trace!(?entry, "Resuming hungry directive");
        self.consume(parser, entry, blocks);
    }

    /// Take the directive's content from `blocks` and dispatch it.
    fn consume(&self, parser: &mut BlockParser, entry: EntryId, blocks: &mut Vec<String>) {
        let Some((target, handling, length)) = self.target(parser.document(), entry) else {
            self.state.borrow_mut().stack.close(entry);
            return;
        };

        let (open, room) = {
            let state = self.state.borrow();
            let room = MAX_DEPTH.saturating_sub(state.stack.depth(Some(entry)));
            (state.stack.nested_levels(entry), if handling.nests() { room } else { 0 })
        };
        let (content, found) = split_end(blocks, length, room, &open, |line, rest| self.level(line, rest));

        self.dispatch(parser, entry, target, handling, content);

        let mut state = self.state.borrow_mut();
        if found {
            state.stack.close(entry);
        } else {
            state.stack.set_hungry(entry);
        }
    }

    /// Ask the directive where content goes and how it is handled.
    fn target(&self, doc: &Document, entry: EntryId) -> Option<(NodeId, Handling, usize)> {
        let mut state = self.state.borrow_mut();
        let open = state.stack.get_mut(entry)?;
        let target = open.directive.add(doc, open.root)?;
        let handling = classify(doc.tag(target), open.directive.content_mode());
        open.nests = handling.nests();
        Some((target, handling, open.length))
    }

    fn dispatch(
        &self,
        parser: &mut BlockParser,
        entry: EntryId,
        target: NodeId,
        handling: Handling,
        content: Vec<String>,
    ) {
        if content.is_empty() {
            return;
        }

        match handling {
            Handling::Block => {
                parser.push_state(STATE);
                let saved = self.state.borrow_mut().active.replace(entry);
                parser.parse_blocks(target, content);
                self.state.borrow_mut().active = saved;
                parser.pop_state();
            }
            Handling::Span | Handling::Raw => {
                let text = revert_fenced_code(parser.stash_mut(), &content).join("\n\n");
                let doc = parser.document_mut();
                let value = match doc.text(target) {
                    Some(existing) if !existing.is_empty() => format!("{existing}\n\n{text}"),
                    _ => text,
                };
                if handling == Handling::Raw {
                    doc.set_atomic_text(target, value);
                } else {
                    doc.set_text(target, value);
                }
            }
        }
    }
}

impl BlockProcessor for DirectiveProcessor {
    fn test(&self, parser: &BlockParser, parent: NodeId, block: &str) -> bool {
        let claim = self.claim(parser.document(), parent, block);
        let claimed = claim.is_some();
        self.state.borrow_mut().cached = claim.map(|claim| CachedClaim {
            parent,
            block: block.to_owned(),
            claim,
        });
        claimed
    }

    fn run(&self, parser: &mut BlockParser, parent: NodeId, blocks: &mut Vec<String>) -> bool {
        let Some(block) = blocks.first() else {
            return false;
        };

        let cached = self.state.borrow_mut().cached.take();
        let claim = match cached {
            Some(cached) if cached.parent == parent && cached.block == *block => cached.claim,
            _ => match self.claim(parser.document(), parent, block) {
                Some(claim) => claim,
                None => return false,
            },
        };

        match claim {
            Claim::Continue(entry) => self.resume(parser, entry, blocks),
            Claim::Open(opening) => self.open(parser, parent, blocks, opening),
        }
        true
    }

    fn reset(&self) {
        let mut state = self.state.borrow_mut();
        state.stack.clear();
        state.active = None;
        state.cached = None;
        state.levels.clear();
        state.trackers = self
            .registry
            .names()
            .into_iter()
            .map(|name| (name, SharedTracker::default()))
            .collect();
    }
}
