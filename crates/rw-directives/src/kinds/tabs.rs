//! Tabbed content.
//!
//! Consecutive `tab` directives at the same level join one tab group:
//!
//! ```text
//! ::: tab macOS
//! brew install rw
//! :::
//!
//! ::: tab Linux
//! apt install rw
//! :::
//! ```
//!
//! A group is a `div.tabbed-set.tabbed-alternate` holding one radio `input`
//! per tab, a `div.tabbed-labels` with the labels, and a `div.tabbed-content`
//! with one `div.tabbed-block` per tab. Groups are numbered per document
//! through the kind's tracker; `data-tabs` records `group:tab_count`. Set the
//! `new` option to start a new group next to an existing one.

use rw_blocks::{Document, NodeId};

use crate::error::DirectiveError;
use crate::kind::{Directive, DirectiveContext, DirectiveKind, DirectiveSpec};
use crate::options::{Arguments, Converter, OptionSpec};
use crate::tracker::SharedTracker;

use super::{CLASS, ID};

const SPEC: DirectiveSpec = DirectiveSpec::new(
    "tab",
    Arguments::new(1, 0),
    &[OptionSpec::new("new", "false", Converter::Boolean), CLASS, ID],
);

const GROUP_CLASS: &str = "tabbed-set tabbed-alternate";
const GROUP_COUNTER: &str = "tab_group_count";

/// `tab` with a required title.
#[derive(Debug, Default)]
pub struct TabKind;

impl TabKind {
    /// Create the kind.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DirectiveKind for TabKind {
    fn spec(&self) -> &DirectiveSpec {
        &SPEC
    }

    fn build(&self, ctx: DirectiveContext) -> Result<Box<dyn Directive>, DirectiveError> {
        Ok(Box::new(Tab {
            length: ctx.length,
            new_group: ctx.options.flag("new"),
            classes: ctx.options.list("class").to_vec(),
            id: ctx.options.string("id").to_owned(),
            title: ctx.arguments.into_iter().next().unwrap_or_default(),
            tracker: ctx.tracker,
            content: None,
        }))
    }
}

struct Tab {
    length: usize,
    new_group: bool,
    classes: Vec<String>,
    id: String,
    title: String,
    tracker: SharedTracker,
    /// Block of this tab, found on the first `add`.
    content: Option<NodeId>,
}

impl Tab {
    /// Reuse the preceding group or start a new one.
    ///
    /// Returns the group, its labels and content containers, and whether the
    /// group is new.
    fn group(&self, doc: &mut Document, parent: NodeId) -> (NodeId, NodeId, NodeId, bool) {
        let sibling = doc
            .last_child(parent)
            .filter(|&s| doc.tag(s) == "div" && doc.attr(s, "class") == Some(GROUP_CLASS));

        if let Some(group) = sibling.filter(|_| !self.new_group) {
            let labels = child_with_class(doc, group, "tabbed-labels");
            let content = child_with_class(doc, group, "tabbed-content");
            if let (Some(labels), Some(content)) = (labels, content) {
                return (group, labels, content, false);
            }
        }

        let set = self.tracker.borrow_mut().increment(GROUP_COUNTER);
        let group = doc.append(parent, "div");
        doc.set_attr(group, "class", GROUP_CLASS);
        doc.set_attr(group, "data-tabs", format!("{set}:0"));
        let labels = doc.append(group, "div");
        doc.set_attr(labels, "class", "tabbed-labels");
        let content = doc.append(group, "div");
        doc.set_attr(content, "class", "tabbed-content");
        (group, labels, content, true)
    }
}

impl Directive for Tab {
    fn length(&self) -> usize {
        self.length
    }

    fn create(&mut self, doc: &mut Document, parent: NodeId) -> NodeId {
        let (group, labels, content, first) = self.group(doc, parent);

        let (set, count) = doc
            .attr(group, "data-tabs")
            .and_then(parse_data_tabs)
            .unwrap_or_else(|| (self.tracker.borrow().get(GROUP_COUNTER), 0));
        let count = count + 1;
        let input_id = format!("__tabbed_{set}_{count}");

        let inputs = doc.children_with_tag(group, "input").count();
        let input = doc.insert(group, inputs, "input");
        doc.set_attr(input, "name", format!("__tabbed_{set}"));
        doc.set_attr(input, "type", "radio");
        doc.set_attr(input, "id", input_id.as_str());
        if first {
            doc.set_attr(input, "checked", "checked");
        }

        let label = doc.append(labels, "label");
        doc.set_attr(label, "for", input_id);
        doc.set_text(label, self.title.as_str());

        let mut classes = vec!["tabbed-block".to_owned()];
        classes.extend(self.classes.iter().cloned());
        let block = doc.append(content, "div");
        super::set_class_and_id(doc, block, &classes, &self.id);

        doc.set_attr(group, "data-tabs", format!("{set}:{count}"));
        group
    }

    fn add(&mut self, doc: &Document, root: NodeId) -> Option<NodeId> {
        if self.content.is_none() {
            self.content = child_with_class(doc, root, "tabbed-content").and_then(|c| doc.last_child(c));
        }
        Some(self.content.unwrap_or(root))
    }
}

fn child_with_class(doc: &Document, parent: NodeId, class: &str) -> Option<NodeId> {
    doc.children_with_tag(parent, "div").find(|&d| doc.has_class(d, class))
}

fn parse_data_tabs(value: &str) -> Option<(usize, usize)> {
    let (set, count) = value.split_once(':')?;
    Some((set.parse().ok()?, count.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::render;
    use pretty_assertions::assert_eq;

    fn group(set: usize, tabs: &[(&str, &str)]) -> String {
        let mut inputs = String::new();
        let mut labels = String::new();
        let mut blocks = String::new();
        for (index, (title, body)) in tabs.iter().enumerate() {
            let n = index + 1;
            let checked = if n == 1 { r#" checked="checked""# } else { "" };
            inputs.push_str(&format!(
                r#"<input name="__tabbed_{set}" type="radio" id="__tabbed_{set}_{n}"{checked} />"#
            ));
            labels.push_str(&format!(r#"<label for="__tabbed_{set}_{n}">{title}</label>"#));
            blocks.push_str(&format!(r#"<div class="tabbed-block">{body}</div>"#));
        }
        format!(
            r#"<div class="tabbed-set tabbed-alternate" data-tabs="{set}:{}">{inputs}<div class="tabbed-labels">{labels}</div><div class="tabbed-content">{blocks}</div></div>"#,
            tabs.len()
        )
    }

    #[test]
    fn test_single_tab() {
        assert_eq!(
            render("::: tab One\nFirst\n:::"),
            group(1, &[("One", "<p>First</p>")])
        );
    }

    #[test]
    fn test_consecutive_tabs_share_group() {
        assert_eq!(
            render("::: tab One\nFirst\n:::\n\n::: tab Two\nSecond\n:::"),
            group(1, &[("One", "<p>First</p>"), ("Two", "<p>Second</p>")])
        );
    }

    #[test]
    fn test_new_option_starts_group() {
        let expected = format!(
            "{}{}",
            group(1, &[("One", "<p>First</p>")]),
            group(2, &[("Two", "<p>Second</p>")])
        );
        assert_eq!(
            render("::: tab One\nFirst\n:::\n\n::: tab Two\n:new: true\nSecond\n:::"),
            expected
        );
    }

    #[test]
    fn test_nested_tabs() {
        let inner = group(2, &[("Second", "<p>inner</p>")]);
        let outer = group(1, &[("First", &inner)]);
        assert_eq!(render("::::{tab} First\n::: {tab} Second\ninner\n:::\n::::"), outer);
    }

    #[test]
    fn test_paragraph_between_tabs_splits_groups() {
        let expected = format!(
            "{}<p>Between</p>{}",
            group(1, &[("One", "<p>A</p>")]),
            group(2, &[("Two", "<p>B</p>")])
        );
        assert_eq!(
            render("::: tab One\nA\n:::\n\nBetween\n\n::: tab Two\nB\n:::"),
            expected
        );
    }

    #[test]
    fn test_parse_data_tabs() {
        assert_eq!(parse_data_tabs("3:2"), Some((3, 2)));
        assert_eq!(parse_data_tabs("x:2"), None);
        assert_eq!(parse_data_tabs("3"), None);
    }
}
