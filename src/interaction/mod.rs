//! Drag-and-drop driver
//!
//! Draggables and dropzones are registered per selector. A drag session
//! resolves the draggable under the pointer, activates every attached
//! dropzone accepting it, tracks the hovered zone, and on release runs the
//! draggable's end callback, the hovered zone's drop callback and finally
//! deactivates all activated zones.

pub mod draggable;
pub mod dropzone;

use tracing::{debug, info};

use crate::dom::{Document, NodeId, Selector};

use draggable::DragBehavior;
use dropzone::DropHandler;

/// Event passed to draggable and dropzone callbacks
///
/// For draggable callbacks `target` is the dragged element. For dropzone
/// callbacks `target` is the zone and `related_target` the dragged element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEvent {
    pub target: NodeId,
    pub related_target: Option<NodeId>,
    pub dx: f32,
    pub dy: f32,
}

impl DragEvent {
    fn on(target: NodeId) -> Self {
        Self {
            target,
            related_target: None,
            dx: 0.0,
            dy: 0.0,
        }
    }

    fn zone(zone: NodeId, dragged: NodeId) -> Self {
        Self {
            target: zone,
            related_target: Some(dragged),
            dx: 0.0,
            dy: 0.0,
        }
    }
}

#[derive(Debug)]
struct DraggableRegistration {
    selector: Selector,
    behavior: DragBehavior,
}

#[derive(Debug)]
struct DropzoneRegistration {
    selector: Selector,
    accept: Selector,
    handler: Box<dyn DropHandler>,
}

/// Zone element paired with the index of its registration
type ZoneRef = (NodeId, usize);

#[derive(Debug, Default)]
enum DragSession {
    #[default]
    Idle,
    Dragging {
        target: NodeId,
        behavior: usize,
        activated: Vec<ZoneRef>,
        hovered: Option<ZoneRef>,
    },
}

#[derive(Debug, Default)]
pub struct Interactions {
    draggables: Vec<DraggableRegistration>,
    dropzones: Vec<DropzoneRegistration>,
    session: DragSession,
}

impl Interactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make elements matching `selector` draggable
    pub fn draggable(&mut self, selector: Selector, behavior: DragBehavior) -> &mut Self {
        self.draggables.push(DraggableRegistration { selector, behavior });
        self
    }

    /// Make elements matching `selector` dropzones for draggables matching `accept`
    pub fn dropzone(
        &mut self,
        selector: Selector,
        accept: Selector,
        handler: impl DropHandler + 'static,
    ) -> &mut Self {
        self.dropzones.push(DropzoneRegistration {
            selector,
            accept,
            handler: Box::new(handler),
        });
        self
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.session, DragSession::Dragging { .. })
    }

    /// Element being dragged
    pub fn dragged(&self) -> Option<NodeId> {
        match &self.session {
            DragSession::Dragging { target, .. } => Some(*target),
            DragSession::Idle => None,
        }
    }

    /// Zone currently under the pointer
    pub fn hovered(&self) -> Option<NodeId> {
        match &self.session {
            DragSession::Dragging { hovered, .. } => hovered.map(|(zone, _)| zone),
            DragSession::Idle => None,
        }
    }

    /// Zones activated for the current drag
    pub fn activated(&self) -> Vec<NodeId> {
        match &self.session {
            DragSession::Dragging { activated, .. } => {
                activated.iter().map(|(zone, _)| *zone).collect()
            }
            DragSession::Idle => Vec::new(),
        }
    }

    /// Start a drag from a press on `pointer_target`
    ///
    /// Returns the dragged element, or `None` when the press is not on a
    /// draggable or starts inside one of its ignore zones.
    pub fn begin(&mut self, doc: &mut Document, pointer_target: NodeId) -> Option<NodeId> {
        if self.is_dragging() {
            self.cancel(doc);
        }
        if !doc.is_attached(pointer_target) {
            return None;
        }

        let view: &Document = doc;
        let (target, behavior) = view.ancestors(pointer_target).find_map(|node| {
            self.draggables
                .iter()
                .position(|reg| reg.selector.matches(view, node))
                .map(|index| (node, index))
        })?;

        let registration = &self.draggables[behavior];
        if registration.behavior.ignores(doc, pointer_target, target) {
            debug!(?pointer_target, dragged = ?target, "press inside drag ignore zone");
            return None;
        }
        registration.behavior.on_start(doc, &DragEvent::on(target));

        let mut activated = Vec::new();
        for (index, zone) in self.dropzones.iter().enumerate() {
            if !zone.accept.matches(doc, target) {
                continue;
            }
            for candidate in doc.query_all(doc.root(), &zone.selector) {
                if doc.is_inclusive_descendant(candidate, target) {
                    continue;
                }
                zone.handler
                    .on_drop_activate(doc, &DragEvent::zone(candidate, target));
                activated.push((candidate, index));
            }
        }

        info!(dragged = ?target, zones = activated.len(), "drag started");
        self.session = DragSession::Dragging {
            target,
            behavior,
            activated,
            hovered: None,
        };
        Some(target)
    }

    /// Move the dragged element by a pointer delta
    pub fn step(&mut self, doc: &mut Document, dx: f32, dy: f32) {
        if let DragSession::Dragging {
            target, behavior, ..
        } = &self.session
        {
            let event = DragEvent {
                target: *target,
                related_target: None,
                dx,
                dy,
            };
            self.draggables[*behavior].behavior.on_move(doc, &event);
        }
    }

    /// Report the element under the pointer; emits leave/enter on zone changes
    pub fn hover(&mut self, doc: &mut Document, over: Option<NodeId>) {
        let DragSession::Dragging {
            target,
            activated,
            hovered,
            ..
        } = &mut self.session
        else {
            return;
        };

        let next = over.and_then(|node| {
            doc.ancestors(node)
                .find_map(|a| activated.iter().find(|(zone, _)| *zone == a).copied())
        });
        if next == *hovered {
            return;
        }

        if let Some((zone, index)) = hovered.take() {
            self.dropzones[index]
                .handler
                .on_drag_leave(doc, &DragEvent::zone(zone, *target));
        }
        if let Some((zone, index)) = next {
            self.dropzones[index]
                .handler
                .on_drag_enter(doc, &DragEvent::zone(zone, *target));
            debug!(?zone, "drag entered dropzone");
        }
        *hovered = next;
    }

    /// Release the drag; returns the zone it was dropped on
    pub fn end(&mut self, doc: &mut Document) -> Option<NodeId> {
        let DragSession::Dragging {
            target,
            behavior,
            activated,
            hovered,
        } = std::mem::take(&mut self.session)
        else {
            return None;
        };

        self.draggables[behavior]
            .behavior
            .on_end(doc, &DragEvent::on(target));

        if let Some((zone, index)) = hovered {
            self.dropzones[index]
                .handler
                .on_drop(doc, &DragEvent::zone(zone, target));
        }
        for (zone, index) in activated {
            self.dropzones[index]
                .handler
                .on_drop_deactivate(doc, &DragEvent::zone(zone, target));
        }

        let dropped_on = hovered.map(|(zone, _)| zone);
        info!(dragged = ?target, ?dropped_on, "drag ended");
        dropped_on
    }

    /// Abandon the drag without dropping it anywhere
    pub fn cancel(&mut self, doc: &mut Document) {
        if let DragSession::Dragging { hovered, .. } = &mut self.session {
            *hovered = None;
        }
        self.end(doc);
    }
}
