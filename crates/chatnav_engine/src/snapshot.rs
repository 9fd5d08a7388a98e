use std::collections::HashMap;

use ego_tree::NodeId;
use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};

use crate::layout;
use crate::types::{BoundingBox, NodePath};

/// A parsed page plus the synthetic geometry every heuristic works from.
/// Snapshots are immutable; a page change means a new snapshot.
pub struct PageSnapshot {
    document: Html,
    boxes: HashMap<NodeId, BoundingBox>,
}

impl PageSnapshot {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let boxes = layout::compute_boxes(&document);
        Self { document, boxes }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// Selector iteration. The yielded elements borrow only the document,
    /// so they may outlive the selector.
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.document.select(selector)
    }

    pub fn bounds_of(&self, element: ElementRef<'_>) -> BoundingBox {
        self.boxes.get(&element.id()).copied().unwrap_or_default()
    }

    /// Identity path of `element` within this snapshot.
    pub fn path_of(&self, element: ElementRef<'_>) -> NodePath {
        let mut segments = Vec::new();
        let mut node = *element;
        while let Some(parent) = node.parent() {
            if !parent.value().is_element() {
                break;
            }
            let index = node
                .prev_siblings()
                .filter(|sibling| sibling.value().is_element())
                .count();
            segments.push(index as u32);
            node = parent;
        }
        segments.reverse();
        NodePath::new(segments)
    }

    /// Walks `path` down from the root element. `None` when the branch no
    /// longer exists, which is how stale identities silently expire.
    pub fn resolve(&self, path: &NodePath) -> Option<ElementRef<'_>> {
        let mut current = self.root();
        for &segment in path.segments() {
            current = current
                .children()
                .filter_map(ElementRef::wrap)
                .nth(segment as usize)?;
        }
        Some(current)
    }

    pub fn resolve_bounds(&self, path: &NodePath) -> Option<BoundingBox> {
        self.resolve(path).map(|element| self.bounds_of(element))
    }
}
