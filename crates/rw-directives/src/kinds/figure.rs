//! Figures with an optional caption.

use rw_blocks::{Document, NodeId};

use crate::error::DirectiveError;
use crate::kind::{Directive, DirectiveContext, DirectiveKind, DirectiveSpec};
use crate::options::Arguments;

use super::{CLASS, ID};

const SPEC: DirectiveSpec = DirectiveSpec::new("figure", Arguments::new(0, 1), &[CLASS, ID]);

/// `figure` whose caption argument becomes a leading `figcaption`.
#[derive(Debug, Default)]
pub struct FigureKind;

impl FigureKind {
    /// Create the kind.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DirectiveKind for FigureKind {
    fn spec(&self) -> &DirectiveSpec {
        &SPEC
    }

    fn build(&self, ctx: DirectiveContext) -> Result<Box<dyn Directive>, DirectiveError> {
        Ok(Box::new(Figure {
            length: ctx.length,
            classes: ctx.options.list("class").to_vec(),
            id: ctx.options.string("id").to_owned(),
            caption: ctx.arguments.into_iter().next(),
        }))
    }
}

struct Figure {
    length: usize,
    classes: Vec<String>,
    id: String,
    caption: Option<String>,
}

impl Directive for Figure {
    fn length(&self) -> usize {
        self.length
    }

    fn create(&mut self, doc: &mut Document, parent: NodeId) -> NodeId {
        let figure = doc.append(parent, "figure");
        super::set_class_and_id(doc, figure, &self.classes, &self.id);
        if let Some(caption) = &self.caption {
            let figcaption = doc.append(figure, "figcaption");
            doc.set_text(figcaption, caption.as_str());
        }
        figure
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::render;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_figure_with_caption() {
        assert_eq!(
            render("::: figure Results\n:class: wide\nA chart\n:::"),
            r#"<figure class="wide"><figcaption>Results</figcaption><p>A chart</p></figure>"#
        );
    }

    #[test]
    fn test_figure_without_caption() {
        assert_eq!(render("::: figure\nA chart\n:::"), "<figure><p>A chart</p></figure>");
    }
}
