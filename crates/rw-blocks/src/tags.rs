//! Tag classification tables.
//!
//! Block processors and extensions use these to decide how element content
//! is treated: parsed as blocks, parsed as inline spans, or kept raw.

/// Tags treated as block-level elements.
pub const BLOCK_LEVEL: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "canvas",
    "colgroup",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "group",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "html",
    "iframe",
    "legend",
    "li",
    "main",
    "map",
    "math",
    "menu",
    "nav",
    "noscript",
    "object",
    "ol",
    "option",
    "output",
    "p",
    "pre",
    "progress",
    "script",
    "section",
    "style",
    "summary",
    "table",
    "tbody",
    "td",
    "textarea",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
    "video",
];

/// Block-level tags whose content only receives span-level parsing.
pub const SPAN_TAGS: &[&str] = &[
    "address",
    "caption",
    "dd",
    "dt",
    "figcaption",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "legend",
    "li",
    "p",
    "summary",
    "td",
    "th",
];

/// Block-level tags whose content is never parsed.
pub const RAW_BLOCK_TAGS: &[&str] = &[
    "canvas", "math", "option", "pre", "script", "style", "textarea",
];

/// Inline tags whose content is never parsed.
pub const RAW_SPAN_TAGS: &[&str] = &["code"];

/// Tags that never carry content.
pub const EMPTY_TAGS: &[&str] = &["hr"];

/// Tags serialized as self-closing when empty.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "source", "wbr"];

/// Check whether a tag is block-level.
#[must_use]
pub fn is_block_level(tag: &str) -> bool {
    contains(BLOCK_LEVEL, tag)
}

/// Check whether a tag only accepts span-level content.
#[must_use]
pub fn is_span(tag: &str) -> bool {
    contains(SPAN_TAGS, tag)
}

/// Check whether a tag's content is kept raw.
#[must_use]
pub fn is_raw(tag: &str) -> bool {
    contains(RAW_BLOCK_TAGS, tag) || contains(RAW_SPAN_TAGS, tag)
}

/// Check whether a tag never carries content.
#[must_use]
pub fn is_empty(tag: &str) -> bool {
    contains(EMPTY_TAGS, tag)
}

pub(crate) fn is_void(tag: &str) -> bool {
    contains(VOID_TAGS, tag)
}

fn contains(table: &[&str], tag: &str) -> bool {
    table.iter().any(|t| t.eq_ignore_ascii_case(tag))
}
