use std::collections::HashMap;

use ego_tree::NodeId;
use scraper::node::Node;
use scraper::{ElementRef, Html};

use crate::types::BoundingBox;

const CONTENT_WIDTH: f32 = 800.0;
const LINE_HEIGHT: f32 = 20.0;
const CHARS_PER_LINE: usize = 80;

/// Tags that never contribute to page flow.
const NON_RENDERED_TAGS: &[&str] = &["head", "script", "style", "noscript", "template", "iframe"];

/// Assigns every element a deterministic box using a single-column flow
/// model: text advances a line cursor, and a block box spans from the
/// cursor at entry to the cursor after its children. A wrapper and its
/// sole text-bearing child therefore share a box, the same coincidence
/// real chat pages show for nested message divs.
///
/// Three inline style properties are honored (`display: none`,
/// `margin-left`, `height` in px), enough to shape fixtures the way live
/// layouts behave.
pub(crate) fn compute_boxes(document: &Html) -> HashMap<NodeId, BoundingBox> {
    let mut flow = FlowCursor {
        boxes: HashMap::new(),
        cursor: 0.0,
    };
    flow.layout_element(document.root_element(), 0.0);
    flow.boxes
}

struct FlowCursor {
    boxes: HashMap<NodeId, BoundingBox>,
    cursor: f32,
}

impl FlowCursor {
    fn layout_element(&mut self, element: ElementRef<'_>, left: f32) {
        let style = InlineStyle::of(element);
        if style.hidden || NON_RENDERED_TAGS.contains(&element.value().name()) {
            self.collapse_subtree(element, left);
            return;
        }

        let left = left + style.margin_left.unwrap_or(0.0);
        let top = self.cursor;

        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.cursor += text_height(text),
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        self.layout_element(child_element, left);
                    }
                }
                _ => {}
            }
        }

        let height = match style.height {
            Some(forced) => {
                self.cursor = top + forced;
                forced
            }
            None => self.cursor - top,
        };

        self.boxes.insert(
            element.id(),
            BoundingBox {
                top,
                left,
                width: CONTENT_WIDTH - left,
                height,
            },
        );
    }

    /// Hidden subtrees occupy zero space at the current cursor position.
    fn collapse_subtree(&mut self, element: ElementRef<'_>, left: f32) {
        for node in element.descendants() {
            if node.value().is_element() {
                self.boxes.insert(
                    node.id(),
                    BoundingBox {
                        top: self.cursor,
                        left,
                        width: 0.0,
                        height: 0.0,
                    },
                );
            }
        }
    }
}

fn text_height(text: &str) -> f32 {
    let visible = text.trim();
    if visible.is_empty() {
        return 0.0;
    }
    let lines = visible.chars().count().div_ceil(CHARS_PER_LINE);
    lines as f32 * LINE_HEIGHT
}

#[derive(Default)]
struct InlineStyle {
    hidden: bool,
    margin_left: Option<f32>,
    height: Option<f32>,
}

impl InlineStyle {
    fn of(element: ElementRef<'_>) -> Self {
        let mut style = Self::default();
        let Some(raw) = element.value().attr("style") else {
            return style;
        };
        for declaration in raw.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match property.trim().to_ascii_lowercase().as_str() {
                "display" if value.eq_ignore_ascii_case("none") => style.hidden = true,
                "margin-left" => style.margin_left = parse_px(value),
                "height" => style.height = parse_px(value),
                _ => {}
            }
        }
        style
    }
}

fn parse_px(value: &str) -> Option<f32> {
    value.strip_suffix("px")?.trim().parse().ok()
}
