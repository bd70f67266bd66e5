//! Default block processors.
//!
//! A small Markdown-like block grammar: ATX headings, blockquotes, bullet and
//! ordered lists with indented continuation, stashed fenced code, and
//! paragraphs. Inline syntax is left untouched in element text.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::parser::{BlockParser, BlockProcessor};
use crate::stash::{code_body, parse_placeholder, strip_indent};
use crate::tree::NodeId;

/// Indentation width of one nesting level.
pub const TAB_LENGTH: usize = 4;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ ]{0,3}(#{1,6})(?:[ \t]+(.*?))?[ \t]*#*[ \t]*$").unwrap());

static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ ]{0,3}>[ ]?(.*)$").unwrap());

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ ]{0,3}[*+-][ ]+(.*)$").unwrap());

static ORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ ]{0,3}\d+\.[ ]+(.*)$").unwrap());

pub(crate) fn register_defaults(parser: &mut BlockParser) {
    parser.register("indent", Rc::new(ListIndentProcessor), 90);
    parser.register("code", Rc::new(StashedCodeProcessor), 80);
    parser.register("heading", Rc::new(HeadingProcessor), 70);
    parser.register("olist", Rc::new(ListProcessor::ordered()), 40);
    parser.register("ulist", Rc::new(ListProcessor::unordered()), 30);
    parser.register("quote", Rc::new(BlockQuoteProcessor), 20);
    parser.register("paragraph", Rc::new(ParagraphProcessor), 10);
}

fn is_list(tag: &str) -> bool {
    tag == "ul" || tag == "ol"
}

/// Move the bare text of a list item into a leading paragraph.
///
/// Turns a tight item into a loose one so that block children can follow.
pub fn loosen_item(parser: &mut BlockParser, item: NodeId) {
    let doc = parser.document_mut();
    if let Some(text) = doc.take_text(item) {
        if text.value.is_empty() {
            return;
        }
        let p = doc.insert(item, 0, "p");
        doc.element_mut(p).text = Some(text);
    }
}

/// Remove up to `level` indentation levels from every line.
fn detab(block: &str, level: usize) -> String {
    let width = level * TAB_LENGTH;
    block
        .split('\n')
        .map(|line| strip_indent(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indented blocks following a list.
///
/// Attaches the block to the deepest list item its indentation reaches.
pub struct ListIndentProcessor;

impl ListIndentProcessor {
    /// Walk down the last-child chain as far as the block's indentation goes.
    fn level(parser: &BlockParser, parent: NodeId, block: &str) -> (usize, NodeId) {
        let doc = parser.document();
        let spaces = block.bytes().take_while(|&b| b == b' ').count();
        let indent_level = spaces / TAB_LENGTH;
        let mut level = usize::from(parser.is_state("list"));
        let mut node = parent;

        while indent_level > level {
            match doc.last_child(node) {
                Some(child) if is_list(doc.tag(child)) || doc.tag(child) == "li" => {
                    if is_list(doc.tag(child)) {
                        level += 1;
                    }
                    node = child;
                }
                _ => break,
            }
        }
        (level, node)
    }
}

impl BlockProcessor for ListIndentProcessor {
    fn test(&self, parser: &BlockParser, parent: NodeId, block: &str) -> bool {
        let doc = parser.document();
        block.starts_with(&" ".repeat(TAB_LENGTH))
            && !parser.is_state("detabbed")
            && (doc.tag(parent) == "li" || doc.last_child(parent).is_some_and(|c| is_list(doc.tag(c))))
    }

    fn run(&self, parser: &mut BlockParser, parent: NodeId, blocks: &mut Vec<String>) -> bool {
        let block = blocks.remove(0);
        let (level, sibling) = Self::level(parser, parent, &block);
        let block = detab(&block, level);

        parser.push_state("detabbed");
        let doc = parser.document();
        if doc.tag(parent) == "li" {
            let target = doc
                .last_child(parent)
                .filter(|&c| is_list(doc.tag(c)))
                .unwrap_or(parent);
            parser.parse_blocks(target, vec![block]);
        } else if doc.tag(sibling) == "li" {
            parser.parse_blocks(sibling, vec![block]);
        } else if let Some(item) = doc.last_child(sibling).filter(|&c| doc.tag(c) == "li") {
            loosen_item(parser, item);
            parser.parse_chunk(item, &block);
        } else {
            let item = parser.document_mut().append(sibling, "li");
            parser.parse_blocks(item, vec![block]);
        }
        parser.pop_state();
        true
    }
}

/// Stashed fenced code placeholders.
///
/// Produces `pre > code` with atomic text and a `language-*` class taken
/// from the info string.
pub struct StashedCodeProcessor;

impl StashedCodeProcessor {
    /// Stash id of a placeholder line that is not inside a quote prefix.
    fn stashed_id(parser: &BlockParser, line: &str) -> Option<usize> {
        if line.trim_start_matches(' ').starts_with('>') {
            return None;
        }
        parse_placeholder(line)
            .map(|p| p.id)
            .filter(|&id| parser.stash().get(id).is_some())
    }
}

impl BlockProcessor for StashedCodeProcessor {
    fn test(&self, parser: &BlockParser, _parent: NodeId, block: &str) -> bool {
        block.split('\n').any(|line| Self::stashed_id(parser, line).is_some())
    }

    fn run(&self, parser: &mut BlockParser, parent: NodeId, blocks: &mut Vec<String>) -> bool {
        let block = blocks.remove(0);
        let lines: Vec<&str> = block.split('\n').collect();
        let found = lines
            .iter()
            .enumerate()
            .find_map(|(index, line)| Self::stashed_id(parser, line).map(|id| (index, id)));
        let Some((index, id)) = found else {
            blocks.insert(0, block);
            return false;
        };

        let before = lines[..index].join("\n");
        let after = lines[index + 1..].join("\n");
        if !after.is_empty() {
            blocks.insert(0, after);
        }
        if !before.is_empty() {
            parser.parse_blocks(parent, vec![before]);
        }

        let Some(entry) = parser.stash_mut().remove(id) else {
            return true;
        };
        let (info, body) = code_body(&entry);
        let doc = parser.document_mut();
        let pre = doc.append(parent, "pre");
        let code = doc.append(pre, "code");
        if let Some(language) = info.split_whitespace().next() {
            doc.set_attr(code, "class", format!("language-{language}"));
        }
        doc.set_atomic_text(code, body);
        true
    }
}

/// ATX headings on the first line of a block.
pub struct HeadingProcessor;

impl BlockProcessor for HeadingProcessor {
    fn test(&self, _parser: &BlockParser, _parent: NodeId, block: &str) -> bool {
        block.lines().next().is_some_and(|line| HEADING_RE.is_match(line))
    }

    fn run(&self, parser: &mut BlockParser, parent: NodeId, blocks: &mut Vec<String>) -> bool {
        let block = blocks.remove(0);
        let (first, rest) = block.split_once('\n').unwrap_or((block.as_str(), ""));
        let Some(caps) = HEADING_RE.captures(first) else {
            blocks.insert(0, block);
            return false;
        };
        let level = caps[1].len();
        let text = caps.get(2).map_or("", |m| m.as_str()).to_owned();
        if !rest.is_empty() {
            blocks.insert(0, rest.to_owned());
        }

        let doc = parser.document_mut();
        let heading = doc.append(parent, &format!("h{level}"));
        doc.set_text(heading, text);
        true
    }
}

/// Blockquotes.
///
/// Consecutive quote blocks join the previous blockquote.
pub struct BlockQuoteProcessor;

impl BlockProcessor for BlockQuoteProcessor {
    fn test(&self, _parser: &BlockParser, _parent: NodeId, block: &str) -> bool {
        block.lines().next().is_some_and(|line| QUOTE_RE.is_match(line))
    }

    fn run(&self, parser: &mut BlockParser, parent: NodeId, blocks: &mut Vec<String>) -> bool {
        let block = blocks.remove(0);
        let stripped = block
            .split('\n')
            .map(|line| QUOTE_RE.captures(line).map_or(line, |caps| caps.get(1).map_or("", |m| m.as_str())))
            .collect::<Vec<_>>()
            .join("\n");

        let doc = parser.document_mut();
        let quote = match doc.last_child(parent) {
            Some(sibling) if doc.tag(sibling) == "blockquote" => sibling,
            _ => doc.append(parent, "blockquote"),
        };

        parser.push_state("blockquote");
        parser.parse_chunk(quote, &stripped);
        parser.pop_state();
        true
    }
}

/// Bullet or ordered lists.
pub struct ListProcessor {
    tag: &'static str,
    marker: &'static LazyLock<Regex>,
}

impl ListProcessor {
    /// Ordered (`1.`) lists.
    #[must_use]
    pub fn ordered() -> Self {
        Self {
            tag: "ol",
            marker: &ORDERED_RE,
        }
    }

    /// Bullet (`-`, `*`, `+`) lists.
    #[must_use]
    pub fn unordered() -> Self {
        Self {
            tag: "ul",
            marker: &BULLET_RE,
        }
    }

    /// Split a block into item texts.
    ///
    /// Indented lines stay attached to the preceding item with one level of
    /// indentation removed, unless they start a nested block of their own.
    fn items(&self, block: &str) -> Vec<String> {
        let indent = " ".repeat(TAB_LENGTH);
        let mut items: Vec<String> = Vec::new();

        for line in block.split('\n') {
            if let Some(caps) = self.marker.captures(line) {
                items.push(caps.get(1).map_or("", |m| m.as_str()).to_owned());
            } else if let Some(stripped) = line.strip_prefix(&indent) {
                match items.last_mut() {
                    Some(last) if last.starts_with(&indent) => {
                        last.push('\n');
                        last.push_str(stripped);
                    }
                    _ => items.push(line.to_owned()),
                }
            } else if let Some(last) = items.last_mut() {
                last.push('\n');
                last.push_str(line);
            } else {
                items.push(line.to_owned());
            }
        }
        items
    }
}

impl BlockProcessor for ListProcessor {
    fn test(&self, _parser: &BlockParser, _parent: NodeId, block: &str) -> bool {
        block.lines().next().is_some_and(|line| self.marker.is_match(line))
    }

    fn run(&self, parser: &mut BlockParser, parent: NodeId, blocks: &mut Vec<String>) -> bool {
        let block = blocks.remove(0);
        let mut items = self.items(&block).into_iter();
        let indent = " ".repeat(TAB_LENGTH);

        let doc = parser.document();
        let sibling = doc.last_child(parent).filter(|&s| doc.tag(s) == self.tag);
        let list = if let Some(list) = sibling {
            // A list continued after a blank line becomes loose.
            if let Some(last) = parser.document().last_child(list) {
                loosen_item(parser, last);
            }
            parser.push_state("looselist");
            if let Some(first) = items.next() {
                let item = parser.document_mut().append(list, "li");
                parser.parse_blocks(item, vec![first]);
            }
            parser.pop_state();
            list
        } else if is_list(doc.tag(parent)) {
            parent
        } else {
            parser.document_mut().append(parent, self.tag)
        };

        parser.push_state("list");
        for text in items {
            let last = parser.document().last_child(list);
            match last {
                Some(item) if text.starts_with(&indent) => parser.parse_blocks(item, vec![text]),
                _ => {
                    let item = parser.document_mut().append(list, "li");
                    parser.parse_blocks(item, vec![text]);
                }
            }
        }
        parser.pop_state();
        true
    }
}

/// Paragraphs.
///
/// Inside a tight list item the text goes onto the item itself.
pub struct ParagraphProcessor;

impl BlockProcessor for ParagraphProcessor {
    fn test(&self, _parser: &BlockParser, _parent: NodeId, _block: &str) -> bool {
        true
    }

    fn run(&self, parser: &mut BlockParser, parent: NodeId, blocks: &mut Vec<String>) -> bool {
        let block = blocks.remove(0);
        let text = block.trim();
        if text.is_empty() {
            return true;
        }

        let in_list = parser.is_state("list");
        let doc = parser.document_mut();
        if in_list {
            match doc.text(parent) {
                Some(existing) if !existing.is_empty() => {
                    let joined = format!("{existing}\n{text}");
                    doc.set_text(parent, joined);
                }
                _ => doc.set_text(parent, text),
            }
        } else {
            let p = doc.append(parent, "p");
            doc.set_text(p, text);
        }
        true
    }
}
