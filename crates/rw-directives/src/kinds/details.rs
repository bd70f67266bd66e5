//! Collapsible details.
//!
//! ```text
//! :::{details} Click to expand
//! :open: true
//! Hidden content
//! :::
//! ```

use rw_blocks::{Document, NodeId};

use crate::error::DirectiveError;
use crate::kind::{Directive, DirectiveContext, DirectiveKind, DirectiveSpec};
use crate::options::{Arguments, Converter, OptionSpec};

use super::{CLASS, ID};

const SPEC: DirectiveSpec = DirectiveSpec::new(
    "details",
    Arguments::new(1, 0),
    &[OptionSpec::new("open", "false", Converter::Boolean), CLASS, ID],
);

/// `details` with a required summary.
#[derive(Debug, Default)]
pub struct DetailsKind;

impl DetailsKind {
    /// Create the kind.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DirectiveKind for DetailsKind {
    fn spec(&self) -> &DirectiveSpec {
        &SPEC
    }

    fn build(&self, ctx: DirectiveContext) -> Result<Box<dyn Directive>, DirectiveError> {
        Ok(Box::new(Details {
            length: ctx.length,
            open: ctx.options.flag("open"),
            classes: ctx.options.list("class").to_vec(),
            id: ctx.options.string("id").to_owned(),
            summary: ctx.arguments.into_iter().next().unwrap_or_default(),
        }))
    }
}

struct Details {
    length: usize,
    open: bool,
    classes: Vec<String>,
    id: String,
    summary: String,
}

impl Directive for Details {
    fn length(&self) -> usize {
        self.length
    }

    fn create(&mut self, doc: &mut Document, parent: NodeId) -> NodeId {
        let details = doc.append(parent, "details");
        if self.open {
            doc.set_attr(details, "open", "open");
        }
        super::set_class_and_id(doc, details, &self.classes, &self.id);
        let summary = doc.append(details, "summary");
        doc.set_text(summary, self.summary.as_str());
        details
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::render;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_details() {
        assert_eq!(
            render(":::{details} More\nHidden\n:::"),
            "<details><summary>More</summary><p>Hidden</p></details>"
        );
    }

    #[test]
    fn test_open_with_classes() {
        assert_eq!(
            render(":::{details} More\n---\nopen: yes\nclass: a, b\n---\nHidden\n:::"),
            r#"<details open="open" class="a b"><summary>More</summary><p>Hidden</p></details>"#
        );
    }

    #[test]
    fn test_summary_required() {
        assert_eq!(render(":::{details}\nHidden\n:::"), "<p>:::{details}\nHidden\n:::</p>");
    }

    #[test]
    fn test_invalid_flag_is_text() {
        assert_eq!(
            render("::: details More\n:open: sometimes\nx\n:::"),
            "<p>::: details More\n:open: sometimes\nx\n:::</p>"
        );
    }
}
