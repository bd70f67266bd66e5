//! Arbitrary HTML elements.
//!
//! The argument is a CSS-like selector naming the element and its
//! attributes:
//!
//! ```text
//! ::: html div#intro.lead.wide[data-role="banner"]
//! Content
//! :::
//! ```
//!
//! The `markdown` option controls content handling: `auto` (by tag),
//! `block`, `inline` or `raw`.

use std::sync::LazyLock;

use regex::Regex;
use rw_blocks::{Document, NodeId};

use crate::error::DirectiveError;
use crate::kind::{ContentMode, Directive, DirectiveContext, DirectiveKind, DirectiveSpec};
use crate::options::{Arguments, Converter, OptionSpec};

const SPEC: DirectiveSpec = DirectiveSpec::new(
    "html",
    Arguments::new(1, 0),
    &[OptionSpec::new(
        "markdown",
        "auto",
        Converter::OneOf(&["auto", "inline", "block", "raw"]),
    )],
);

const IDENT: &str = r"-?[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\-\x{80}-\x{10FFFF}]*";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9\-]*").unwrap());

static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!(r"^#({IDENT})")).unwrap());

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!(r"^\.({IDENT})")).unwrap());

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"^\[[ \t]*({IDENT})(?:[ \t]*=[ \t]*("[^"]*"|'[^']*'|{IDENT}))?[ \t]*\]"#
    ))
    .unwrap()
});

/// Parse a selector into a tag name and ordered attributes.
///
/// # Example
///
/// ```
/// use rw_directives::kinds::parse_selector;
///
/// let (tag, attrs) = parse_selector("span#x.a.b[title='Hi there']").unwrap();
/// assert_eq!(tag, "span");
/// assert_eq!(
///     attrs,
///     vec![
///         ("id".to_owned(), "x".to_owned()),
///         ("class".to_owned(), "a b".to_owned()),
///         ("title".to_owned(), "Hi there".to_owned()),
///     ]
/// );
/// ```
pub fn parse_selector(selector: &str) -> Result<(String, Vec<(String, String)>), DirectiveError> {
    let invalid = || DirectiveError::InvalidArgument(format!("invalid selector '{selector}'"));

    let tag = TAG_RE.find(selector).ok_or_else(invalid)?;
    let mut rest = &selector[tag.end()..];
    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut classes: Vec<String> = Vec::new();
    let mut class_at = None;

    while !rest.is_empty() {
        let (caps, kind) = if let Some(caps) = ID_RE.captures(rest) {
            (caps, Part::Id)
        } else if let Some(caps) = CLASS_RE.captures(rest) {
            (caps, Part::Class)
        } else if let Some(caps) = ATTR_RE.captures(rest) {
            (caps, Part::Attr)
        } else {
            return Err(invalid());
        };

        let name = caps.get(1).map_or("", |m| m.as_str());
        match kind {
            Part::Id => set(&mut attrs, "id", name.to_owned()),
            Part::Class => {
                class_at.get_or_insert(attrs.len());
                classes.push(name.to_owned());
            }
            Part::Attr => {
                let name = name.to_lowercase();
                let value = caps.get(2).map(|m| unquote(m.as_str()));
                if name == "class" {
                    class_at.get_or_insert(attrs.len());
                    classes.extend(value.unwrap_or("").split_whitespace().map(str::to_owned));
                } else {
                    let value = value.map_or_else(|| name.clone(), str::to_owned);
                    set(&mut attrs, &name, value);
                }
            }
        }
        rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
    }

    if let (Some(at), false) = (class_at, classes.is_empty()) {
        attrs.insert(at.min(attrs.len()), ("class".to_owned(), classes.join(" ")));
    }
    Ok((tag.as_str().to_lowercase(), attrs))
}

enum Part {
    Id,
    Class,
    Attr,
}

fn set(attrs: &mut Vec<(String, String)>, name: &str, value: String) {
    if let Some(slot) = attrs.iter_mut().find(|(key, _)| key == name) {
        slot.1 = value;
    } else {
        attrs.push((name.to_owned(), value));
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

/// `html` element from a selector.
#[derive(Debug, Default)]
pub struct HtmlKind;

impl HtmlKind {
    /// Create the kind.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DirectiveKind for HtmlKind {
    fn spec(&self) -> &DirectiveSpec {
        &SPEC
    }

    fn build(&self, ctx: DirectiveContext) -> Result<Box<dyn Directive>, DirectiveError> {
        let selector = ctx.arguments.first().map_or("", String::as_str);
        let (tag, attrs) = parse_selector(selector)?;
        let mode = match ctx.options.string("markdown") {
            "block" => ContentMode::Block,
            "inline" => ContentMode::Span,
            "raw" => ContentMode::Raw,
            _ => ContentMode::Auto,
        };
        Ok(Box::new(Html {
            length: ctx.length,
            tag,
            attrs,
            mode,
        }))
    }
}

struct Html {
    length: usize,
    tag: String,
    attrs: Vec<(String, String)>,
    mode: ContentMode,
}

impl Directive for Html {
    fn length(&self) -> usize {
        self.length
    }

    fn create(&mut self, doc: &mut Document, parent: NodeId) -> NodeId {
        let element = doc.append(parent, &self.tag);
        for (name, value) in &self.attrs {
            doc.set_attr(element, name, value.as_str());
        }
        element
    }

    fn content_mode(&self) -> ContentMode {
        self.mode.resolve(&self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::testing::{parse, render};
    use crate::tracker::SharedTracker;
    use pretty_assertions::assert_eq;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn test_parse_selector_tag_only() {
        assert_eq!(parse_selector("DIV").unwrap(), ("div".to_owned(), vec![]));
    }

    #[test]
    fn test_parse_selector_attributes() {
        let (tag, attrs) = parse_selector(r#"div.a#x[data-x="1 2"][hidden].b[class="c d"]"#).unwrap();
        assert_eq!(tag, "div");
        assert_eq!(
            attrs,
            pairs(&[("class", "a b c d"), ("id", "x"), ("data-x", "1 2"), ("hidden", "hidden")])
        );
    }

    #[test]
    fn test_parse_selector_rejects() {
        assert!(parse_selector("").is_err());
        assert!(parse_selector("#id").is_err());
        assert!(parse_selector("div..a").is_err());
        assert!(parse_selector("div[unclosed").is_err());
        assert!(parse_selector("div span").is_err());
    }

    #[test]
    fn test_block_element() {
        assert_eq!(
            render("::: html section.intro\nHello\n:::"),
            r#"<section class="intro"><p>Hello</p></section>"#
        );
    }

    #[test]
    fn test_span_element_by_tag() {
        assert_eq!(render("::: html p\nOne\n\nTwo\n:::"), "<p>One\n\nTwo</p>");
    }

    #[test]
    fn test_raw_element_is_atomic() {
        let doc = parse("::: html pre\n<b>kept</b>\n:::");
        let pre = doc.children(doc.root())[0];
        assert_eq!(doc.text(pre), Some("<b>kept</b>"));
        assert!(doc.is_atomic(pre));
    }

    #[test]
    fn test_markdown_option_overrides_tag() {
        assert_eq!(
            render("::: html div\n:markdown: inline\n# not a heading\n:::"),
            "<div># not a heading</div>"
        );
        assert_eq!(
            render("::: html p\n:markdown: block\n# heading\n:::"),
            "<p><h1>heading</h1></p>"
        );
    }

    #[test]
    fn test_raw_recovers_fenced_code() {
        let doc = parse("::: html div\n:markdown: raw\n```\nfn main() {}\n```\n:::");
        let div = doc.children(doc.root())[0];
        assert_eq!(doc.text(div), Some("```\nfn main() {}\n```"));
        assert!(doc.is_atomic(div));
    }

    #[test]
    fn test_raw_recovers_indented_fenced_code() {
        let source = "- item\n\n    ::: html div\n    :markdown: raw\n    ```\n      indented\n    ```\n    :::";
        let doc = parse(source);
        let ul = doc.children(doc.root())[0];
        let li = doc.children(ul)[0];
        let div = doc.children(li)[1];
        assert_eq!(doc.tag(div), "div");
        assert_eq!(doc.text(div), Some("```\n  indented\n```"));
    }

    #[test]
    fn test_content_mode_resolved_from_tag() {
        let mode = |source: &str| {
            let ctx = DirectiveContext {
                length: 3,
                arguments: vec![source.to_owned()],
                options: Options::default(),
                tracker: SharedTracker::default(),
            };
            HtmlKind::new().build(ctx).unwrap().content_mode()
        };
        assert_eq!(mode("pre"), ContentMode::Raw);
        assert_eq!(mode("p.lead"), ContentMode::Span);
        assert_eq!(mode("section"), ContentMode::Block);
    }

    #[test]
    fn test_invalid_selector_is_text() {
        assert_eq!(render("::: html #x\ntext\n:::"), "<p>::: html #x\ntext\n:::</p>");
    }
}
