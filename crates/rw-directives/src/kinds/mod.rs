//! Built-in directive kinds.
//!
//! | Name | Arguments | Output |
//! |------|-----------|--------|
//! | `admonition` | optional title | `div.admonition.{type}` |
//! | `note`, `attention`, `caution`, `danger`, `error`, `tip`, `hint`, `important`, `warning` | optional title | `div.admonition.{name}` |
//! | `details` | summary | `details > summary` |
//! | `html` | CSS selector | any element |
//! | `tab` | title | `div.tabbed-set` groups |
//! | `figure` | optional caption | `figure > figcaption` |

mod admonition;
mod details;
mod figure;
mod html;
mod tabs;

pub use admonition::AdmonitionKind;
pub use details::DetailsKind;
pub use figure::FigureKind;
pub use html::{HtmlKind, parse_selector};
pub use tabs::TabKind;

use rw_blocks::{Document, NodeId};

use crate::kind::DirectiveKind;
use crate::options::{Converter, OptionSpec};

/// Names of the built-in kinds in registration order.
pub const BUILTIN_NAMES: &[&str] = &[
    "admonition",
    "details",
    "html",
    "note",
    "attention",
    "caution",
    "danger",
    "error",
    "tip",
    "hint",
    "important",
    "warning",
    "tab",
    "figure",
];

/// `class` option shared by most kinds.
pub(crate) const CLASS: OptionSpec = OptionSpec::new("class", "", Converter::Classes);

/// `id` option shared by most kinds.
pub(crate) const ID: OptionSpec = OptionSpec::new("id", "", Converter::HtmlAttribute);

/// Instantiate a built-in kind by name.
#[must_use]
pub fn builtin(name: &str) -> Option<Box<dyn DirectiveKind>> {
    let kind: Box<dyn DirectiveKind> = match name {
        "admonition" => Box::new(AdmonitionKind::generic()),
        "details" => Box::new(DetailsKind::new()),
        "html" => Box::new(HtmlKind::new()),
        "tab" => Box::new(TabKind::new()),
        "figure" => Box::new(FigureKind::new()),
        typed => Box::new(AdmonitionKind::typed(typed)?),
    };
    Some(kind)
}

/// Set `class` and `id` on an element, skipping empty values.
pub(crate) fn set_class_and_id(doc: &mut Document, node: NodeId, classes: &[String], id: &str) {
    if !classes.is_empty() {
        doc.set_attr(node, "class", classes.join(" "));
    }
    if !id.is_empty() {
        doc.set_attr(node, "id", id);
    }
}
