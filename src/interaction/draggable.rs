//! Draggable behaviors
//!
//! A behavior is an immutable value. The resetting variant is built from the
//! plain one and its `on_end` runs the plain `on_end` before snapping back.

use tracing::trace;

use crate::constants::{attrs, classes, ids};
use crate::dom::{Document, NodeId, Selector};
use crate::geometry::clamp_offset;

use super::DragEvent;

/// What happens to the element's offset when the drag ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Offset persists
    Keep,
    /// Offset snaps back to the origin
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragBehavior {
    pub release: Release,
    /// Pointer targets (and their ancestors below the draggable) that never start a drag
    pub ignore_from: Selector,
    /// Element whose rectangle bounds the drag
    pub restriction: Selector,
}

/// Plain draggable: moves with the pointer, stays where released
pub fn draggable() -> DragBehavior {
    DragBehavior {
        release: Release::Keep,
        ignore_from: Selector::any([
            Selector::tag("input"),
            Selector::tag("button"),
            Selector::tag("a"),
            Selector::class(classes::OVERLAY),
        ]),
        restriction: Selector::id(ids::CONTENT),
    }
}

/// Draggable that returns to its origin on release
pub fn resetting_draggable() -> DragBehavior {
    DragBehavior {
        release: Release::Reset,
        ..draggable()
    }
}

/// Persisted offset of an element; zero when never dragged
pub fn offset(doc: &Document, element: NodeId) -> (f32, f32) {
    let read = |name| {
        doc.attr(element, name)
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(0.0)
    };
    (read(attrs::DATA_X), read(attrs::DATA_Y))
}

/// Store an offset and the matching transform on an element
pub fn translate(doc: &mut Document, element: NodeId, x: f32, y: f32) {
    doc.set_attr(element, attrs::STYLE, format!("transform: translate({x}px, {y}px)"));
    doc.set_attr(element, attrs::DATA_X, x.to_string());
    doc.set_attr(element, attrs::DATA_Y, y.to_string());
}

impl DragBehavior {
    pub fn on_start(&self, doc: &mut Document, event: &DragEvent) {
        for name in [attrs::DATA_X, attrs::DATA_Y] {
            if doc.attr(event.target, name).is_none() {
                doc.set_attr(event.target, name, "0");
            }
        }
    }

    pub fn on_move(&self, doc: &mut Document, event: &DragEvent) {
        let (x, y) = offset(doc, event.target);
        let mut next = (x + event.dx, y + event.dy);

        let bounds = doc
            .query(doc.root(), &self.restriction)
            .and_then(|r| doc.layout(r));
        if let (Some(element), Some(bounds)) = (doc.layout(event.target), bounds) {
            next = clamp_offset(element, next, bounds);
        }

        trace!(element = ?event.target, x = next.0, y = next.1, "drag move");
        translate(doc, event.target, next.0, next.1);
    }

    pub fn on_end(&self, doc: &mut Document, event: &DragEvent) {
        if self.release == Release::Reset {
            translate(doc, event.target, 0.0, 0.0);
        }
    }

    /// Whether a press on `pointer_target` must not drag `draggable`
    pub fn ignores(&self, doc: &Document, pointer_target: NodeId, draggable: NodeId) -> bool {
        doc.ancestors(pointer_target)
            .take_while(|n| *n != draggable)
            .any(|n| self.ignore_from.matches(doc, n))
    }
}
