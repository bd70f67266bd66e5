//! Admonitions.
//!
//! ```text
//! ::: warning Mind the gap
//! Content
//! :::
//! ```
//!
//! renders as `div.admonition.warning` with an optional `p.admonition-title`
//! first child. The generic `admonition` kind takes its type from the
//! `type` option.

use rw_blocks::{Document, NodeId};

use crate::error::DirectiveError;
use crate::kind::{Directive, DirectiveContext, DirectiveKind, DirectiveSpec};
use crate::options::{Arguments, Converter, OptionSpec};

use super::{CLASS, ID};

const TYPED: &[&str] = &[
    "note",
    "attention",
    "caution",
    "danger",
    "error",
    "tip",
    "hint",
    "important",
    "warning",
];

const GENERIC_OPTIONS: &[OptionSpec] = &[OptionSpec::new("type", "", Converter::HtmlAttribute), CLASS, ID];

const TYPED_OPTIONS: &[OptionSpec] = &[CLASS, ID];

/// Admonition kinds.
pub struct AdmonitionKind {
    spec: DirectiveSpec,
    fixed_type: Option<&'static str>,
}

impl AdmonitionKind {
    /// The generic `admonition` kind.
    #[must_use]
    pub fn generic() -> Self {
        Self {
            spec: DirectiveSpec::new("admonition", Arguments::new(0, 1), GENERIC_OPTIONS),
            fixed_type: None,
        }
    }

    /// One of the typed aliases (`note`, `warning`, ...).
    #[must_use]
    pub fn typed(name: &str) -> Option<Self> {
        let name = TYPED.iter().copied().find(|t| *t == name)?;
        Some(Self {
            spec: DirectiveSpec::new(name, Arguments::new(0, 1), TYPED_OPTIONS),
            fixed_type: Some(name),
        })
    }
}

impl DirectiveKind for AdmonitionKind {
    fn spec(&self) -> &DirectiveSpec {
        &self.spec
    }

    fn build(&self, ctx: DirectiveContext) -> Result<Box<dyn Directive>, DirectiveError> {
        let kind = match self.fixed_type {
            Some(fixed) => fixed,
            None => ctx.options.string("type"),
        };
        let mut classes = vec!["admonition".to_owned()];
        if !kind.is_empty() {
            classes.push(kind.to_owned());
        }
        classes.extend(ctx.options.list("class").iter().cloned());

        Ok(Box::new(Admonition {
            length: ctx.length,
            title: ctx.arguments.into_iter().next(),
            classes,
            id: ctx.options.string("id").to_owned(),
        }))
    }
}

struct Admonition {
    length: usize,
    title: Option<String>,
    classes: Vec<String>,
    id: String,
}

impl Directive for Admonition {
    fn length(&self) -> usize {
        self.length
    }

    fn create(&mut self, doc: &mut Document, parent: NodeId) -> NodeId {
        let div = doc.append(parent, "div");
        super::set_class_and_id(doc, div, &self.classes, &self.id);
        if let Some(title) = &self.title {
            let p = doc.append(div, "p");
            doc.set_attr(p, "class", "admonition-title");
            doc.set_text(p, title.as_str());
        }
        div
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::render;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_note() {
        assert_eq!(
            render("::: note\nbody line\n:::"),
            r#"<div class="admonition note"><p>body line</p></div>"#
        );
    }

    #[test]
    fn test_title_and_options() {
        assert_eq!(
            render(":::{warning} Mind the gap\n:class: wide\n:id: gap\nText\n:::"),
            concat!(
                r#"<div class="admonition warning wide" id="gap">"#,
                r#"<p class="admonition-title">Mind the gap</p><p>Text</p></div>"#
            )
        );
    }

    #[test]
    fn test_generic_type() {
        assert_eq!(
            render("::: admonition Custom\n---\ntype: todo\n---\nText\n:::"),
            concat!(
                r#"<div class="admonition todo">"#,
                r#"<p class="admonition-title">Custom</p><p>Text</p></div>"#
            )
        );
    }

    #[test]
    fn test_unknown_option_is_text() {
        assert_eq!(
            render("::: tip\n:color: red\nText\n:::"),
            "<p>::: tip\n:color: red\nText\n:::</p>"
        );
    }
}
