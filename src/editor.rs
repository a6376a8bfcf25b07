//! Editor facade
//!
//! Owns the document, the page skeleton and the drag-and-drop registry, and
//! is the only way front-ends touch them: clicks, value edits and drag
//! gestures go in, the serialized schema comes out.

use tracing::{debug, info, warn};

use crate::constants::{attrs, classes, ids};
use crate::containment::get_container;
use crate::dom::{Document, Listener, NodeId, Selector};
use crate::geometry::Rect;
use crate::interaction::Interactions;
use crate::interaction::draggable::{draggable, resetting_draggable};
use crate::interaction::dropzone::{SidebarDropzone, TableDropzone, WorkspaceDropzone};
use crate::objects::{FieldType, ObjectKind, ObjectType, TableType};
use crate::schema::{self, BuildError, Schema};
use crate::settings;
use crate::templates::{self, Page, TemplateSpec};

/// Lifecycle manager for a kind of object
pub fn manager(kind: ObjectKind) -> &'static dyn ObjectType {
    match kind {
        ObjectKind::Table => &TableType,
        ObjectKind::Field => &FieldType,
    }
}

/// An open settings overlay and the instance it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOverlay {
    pub kind: ObjectKind,
    pub instance: NodeId,
    pub overlay: NodeId,
}

#[derive(Debug)]
pub struct Editor {
    doc: Document,
    page: Page,
    interactions: Interactions,
}

impl Editor {
    pub fn new(spec: &TemplateSpec) -> Self {
        let mut doc = Document::new();
        let page = templates::build_page(&mut doc, spec);
        doc.add_class(page.workspace, classes::DROPZONE);
        doc.add_class(page.sidebar, classes::DROPZONE);

        let mut interactions = Interactions::new();
        interactions
            .draggable(Selector::class(classes::OBJECT_TYPE), resetting_draggable())
            .draggable(Selector::class(classes::TABLE_INSTANCE), draggable())
            .draggable(Selector::class(classes::FIELD_INSTANCE), resetting_draggable())
            .dropzone(
                Selector::id(ids::WORKSPACE),
                Selector::id(ids::TABLE_TYPE),
                WorkspaceDropzone::default(),
            )
            .dropzone(
                Selector::id(ids::SIDEBAR),
                Selector::any([
                    Selector::class(classes::TABLE_INSTANCE),
                    Selector::class(classes::FIELD_INSTANCE),
                ]),
                SidebarDropzone::default(),
            )
            .dropzone(
                Selector::class(classes::TABLE_INSTANCE),
                Selector::any([
                    Selector::id(ids::FIELD_TYPE),
                    Selector::class(classes::FIELD_INSTANCE),
                ]),
                TableDropzone::default(),
            );

        info!(
            table_inputs = spec.table.settings.len(),
            field_inputs = spec.field.settings.len(),
            "editor ready"
        );
        Self {
            doc,
            page,
            interactions,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Record where the front-end laid out an element
    pub fn set_layout(&mut self, node: NodeId, rect: Rect) {
        self.doc.set_layout(node, rect);
    }

    pub fn tables(&self) -> Vec<NodeId> {
        TableType.instances(&self.doc, self.page.workspace)
    }

    pub fn fields_of(&self, table: NodeId) -> Vec<NodeId> {
        TableType.fields(&self.doc, table)
    }

    pub fn kind_of(&self, instance: NodeId) -> Option<ObjectKind> {
        if TableType.is_instance(&self.doc, instance) {
            Some(ObjectKind::Table)
        } else if FieldType.is_instance(&self.doc, instance) {
            Some(ObjectKind::Field)
        } else {
            None
        }
    }

    /// Display name of a table or field; empty when unnamed
    pub fn name_of(&self, instance: NodeId) -> &str {
        match self.kind_of(instance) {
            Some(kind) => manager(kind).name(&self.doc, instance),
            None => "",
        }
    }

    pub fn name_input(&self, instance: NodeId) -> Option<NodeId> {
        let kind = self.kind_of(instance)?;
        manager(kind)
            .name_inputs(&self.doc, instance)
            .first()
            .copied()
    }

    /// First element with `class` that belongs to `instance` and not to a nested object
    pub fn control(&self, instance: NodeId, class: &str) -> Option<NodeId> {
        self.doc
            .query_all(instance, &Selector::class(class))
            .into_iter()
            .find(|node| {
                get_container(&self.doc, *node, |d, n| d.has_class(n, classes::OBJECT_INSTANCE))
                    == Some(instance)
            })
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        debug!(?node, value, "set value");
        self.doc.set_value(node, value);
    }

    // ------------------------------------------------------------------
    // Clicks
    // ------------------------------------------------------------------

    /// Click `target`: run the default action, then bubble listeners
    pub fn click(&mut self, target: NodeId) {
        if !self.doc.is_attached(target) {
            warn!(element = ?target, "click on detached element ignored");
            return;
        }
        debug!(element = ?target, tag = self.doc.tag(target), "click");
        self.default_action(target);

        let path: Vec<NodeId> = self.doc.ancestors(target).collect();
        for current in path {
            let listeners = self.doc.listeners(current).to_vec();
            for listener in listeners {
                self.dispatch(listener, current);
            }
        }
    }

    fn default_action(&mut self, target: NodeId) {
        if !self.doc.tag(target).eq_ignore_ascii_case("input") {
            return;
        }
        match self.doc.input_type(target) {
            Some("radio") => {
                let group = self.doc.attr(target, attrs::NAME).map(str::to_string);
                if let Some(group) = group.filter(|g| !g.is_empty()) {
                    let form = get_container(&self.doc, target, |d, n| {
                        d.has_class(n, classes::OVERLAY)
                    })
                    .unwrap_or(self.doc.root());
                    for other in self.doc.query_all(form, &Selector::input_type("radio")) {
                        if other != target && self.doc.attr(other, attrs::NAME) == Some(group.as_str()) {
                            self.doc.set_checked(other, false);
                        }
                    }
                }
                self.doc.set_checked(target, true);
            }
            Some("checkbox") => {
                let checked = self.doc.is_checked(target);
                self.doc.set_checked(target, !checked);
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, listener: Listener, current: NodeId) {
        match listener {
            Listener::OpenSettings(kind) => {
                manager(kind).open_settings(&mut self.doc, current);
            }
            Listener::CloseSettings(kind) => {
                manager(kind).close_settings(&mut self.doc, current);
            }
            Listener::ActivateRadio => settings::activate_radio(&mut self.doc, current),
            Listener::ToggleCheckbox => settings::toggle_checkbox(&mut self.doc, current),
        }
    }

    /// Overlay of `instance` when it is shown
    pub fn open_overlay_of(&self, instance: NodeId) -> Option<NodeId> {
        let kind = self.kind_of(instance)?;
        manager(kind)
            .settings_overlay(&self.doc, instance)
            .filter(|overlay| settings::is_open(&self.doc, *overlay))
    }

    /// Every shown overlay, tables first then their fields
    pub fn open_overlays(&self) -> Vec<OpenOverlay> {
        let mut out = Vec::new();
        for table in self.tables() {
            let instances = std::iter::once((ObjectKind::Table, table))
                .chain(self.fields_of(table).into_iter().map(|f| (ObjectKind::Field, f)));
            for (kind, instance) in instances {
                if let Some(overlay) = self.open_overlay_of(instance) {
                    out.push(OpenOverlay {
                        kind,
                        instance,
                        overlay,
                    });
                }
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Drag gestures
    // ------------------------------------------------------------------

    pub fn begin_drag(&mut self, pointer_target: NodeId) -> Option<NodeId> {
        self.interactions.begin(&mut self.doc, pointer_target)
    }

    pub fn drag_by(&mut self, dx: f32, dy: f32) {
        self.interactions.step(&mut self.doc, dx, dy);
    }

    pub fn drag_hover(&mut self, over: Option<NodeId>) {
        self.interactions.hover(&mut self.doc, over);
    }

    /// Release the current drag; returns the zone it was dropped on
    pub fn end_drag(&mut self) -> Option<NodeId> {
        self.interactions.end(&mut self.doc)
    }

    pub fn cancel_drag(&mut self) {
        self.interactions.cancel(&mut self.doc);
    }

    pub fn is_dragging(&self) -> bool {
        self.interactions.is_dragging()
    }

    pub fn dragged(&self) -> Option<NodeId> {
        self.interactions.dragged()
    }

    /// Dropzone the current drag would land on if released now
    pub fn drop_target(&self) -> Option<NodeId> {
        self.interactions.hovered()
    }

    /// Whether `zone` is a candidate for the current drag
    pub fn is_drop_candidate(&self, zone: NodeId) -> bool {
        self.interactions.activated().contains(&zone)
    }

    /// Press on `source`, hover `target` and release
    pub fn drag_onto(&mut self, source: NodeId, target: NodeId) -> Option<NodeId> {
        self.begin_drag(source)?;
        self.drag_hover(Some(target));
        self.end_drag()
    }

    pub fn serialize(&self) -> Result<Schema, BuildError> {
        schema::build(&self.doc, self.page.workspace)
    }
}
