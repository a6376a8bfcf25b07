//! Dropzone behaviors
//!
//! [`DropFeedback`] only toggles the purpose-namespaced marker classes. The
//! zones the editor registers wrap it and add their drop effect after the
//! feedback has run.

use std::fmt::Debug;

use tracing::debug;

use crate::dom::{Document, NodeId};
use crate::objects::{FieldType, ObjectType, TableType};

use super::DragEvent;

/// Purpose of a dropzone; namespaces its feedback classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPurpose {
    Create,
    Delete,
    Move,
}

impl DropPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropPurpose::Create => "create",
            DropPurpose::Delete => "delete",
            DropPurpose::Move => "move",
        }
    }

    /// Marker set on every zone able to take the current drag
    pub fn candidate_class(&self) -> String {
        format!("dropzone-{}-dragactive", self.as_str())
    }

    /// Marker set on the zone under the pointer
    pub fn hover_class(&self) -> String {
        format!("dropzone-{}-active", self.as_str())
    }
}

/// Callbacks a dropzone receives during a drag
///
/// `event.target` is the zone, `event.related_target` the dragged element.
pub trait DropHandler: Debug {
    fn on_drop_activate(&self, doc: &mut Document, event: &DragEvent);
    fn on_drag_enter(&self, doc: &mut Document, event: &DragEvent);
    fn on_drag_leave(&self, doc: &mut Document, event: &DragEvent);
    fn on_drop(&self, doc: &mut Document, event: &DragEvent);
    fn on_drop_deactivate(&self, doc: &mut Document, event: &DragEvent);
}

/// Class-only feedback for one purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropFeedback {
    pub purpose: DropPurpose,
}

pub fn dropzone(purpose: DropPurpose) -> DropFeedback {
    DropFeedback { purpose }
}

impl DropFeedback {
    fn clear(&self, doc: &mut Document, zone: NodeId) {
        doc.remove_class(zone, &self.purpose.candidate_class());
        doc.remove_class(zone, &self.purpose.hover_class());
    }
}

impl DropHandler for DropFeedback {
    fn on_drop_activate(&self, doc: &mut Document, event: &DragEvent) {
        doc.add_class(event.target, &self.purpose.candidate_class());
    }

    fn on_drag_enter(&self, doc: &mut Document, event: &DragEvent) {
        doc.add_class(event.target, &self.purpose.hover_class());
    }

    fn on_drag_leave(&self, doc: &mut Document, event: &DragEvent) {
        doc.remove_class(event.target, &self.purpose.hover_class());
    }

    fn on_drop(&self, doc: &mut Document, event: &DragEvent) {
        self.clear(doc, event.target);
    }

    fn on_drop_deactivate(&self, doc: &mut Document, event: &DragEvent) {
        self.clear(doc, event.target);
    }
}

/// `#workspace`: dropping the table chip creates a table
#[derive(Debug, Clone, Copy)]
pub struct WorkspaceDropzone {
    feedback: DropFeedback,
}

impl Default for WorkspaceDropzone {
    fn default() -> Self {
        Self {
            feedback: dropzone(DropPurpose::Create),
        }
    }
}

impl DropHandler for WorkspaceDropzone {
    fn on_drop_activate(&self, doc: &mut Document, event: &DragEvent) {
        self.feedback.on_drop_activate(doc, event);
    }

    fn on_drag_enter(&self, doc: &mut Document, event: &DragEvent) {
        self.feedback.on_drag_enter(doc, event);
    }

    fn on_drag_leave(&self, doc: &mut Document, event: &DragEvent) {
        self.feedback.on_drag_leave(doc, event);
    }

    fn on_drop(&self, doc: &mut Document, event: &DragEvent) {
        self.feedback.on_drop(doc, event);
        TableType.create(doc, event.target);
    }

    fn on_drop_deactivate(&self, doc: &mut Document, event: &DragEvent) {
        self.feedback.on_drop_deactivate(doc, event);
    }
}

/// `#sidebar`: dropping a table or field deletes it
#[derive(Debug, Clone, Copy)]
pub struct SidebarDropzone {
    feedback: DropFeedback,
}

impl Default for SidebarDropzone {
    fn default() -> Self {
        Self {
            feedback: dropzone(DropPurpose::Delete),
        }
    }
}

impl DropHandler for SidebarDropzone {
    fn on_drop_activate(&self, doc: &mut Document, event: &DragEvent) {
        self.feedback.on_drop_activate(doc, event);
    }

    fn on_drag_enter(&self, doc: &mut Document, event: &DragEvent) {
        self.feedback.on_drag_enter(doc, event);
    }

    fn on_drag_leave(&self, doc: &mut Document, event: &DragEvent) {
        self.feedback.on_drag_leave(doc, event);
    }

    fn on_drop(&self, doc: &mut Document, event: &DragEvent) {
        self.feedback.on_drop(doc, event);
        let Some(dragged) = event.related_target else {
            return;
        };
        if TableType.is_instance(doc, dragged) {
            TableType.delete(doc, dragged);
        } else if FieldType.is_instance(doc, dragged) {
            FieldType.delete(doc, dragged);
        }
    }

    fn on_drop_deactivate(&self, doc: &mut Document, event: &DragEvent) {
        self.feedback.on_drop_deactivate(doc, event);
    }
}

/// `.obj-instance-table`: creates fields from the chip, moves existing fields
#[derive(Debug, Clone, Copy)]
pub struct TableDropzone {
    create: DropFeedback,
    moving: DropFeedback,
}

impl Default for TableDropzone {
    fn default() -> Self {
        Self {
            create: dropzone(DropPurpose::Create),
            moving: dropzone(DropPurpose::Move),
        }
    }
}

impl TableDropzone {
    /// Feedback matching what is being dragged; `None` for anything else
    fn feedback(&self, doc: &Document, event: &DragEvent) -> Option<&DropFeedback> {
        let dragged = event.related_target?;
        if FieldType.is_type_template(doc, dragged) {
            Some(&self.create)
        } else if FieldType.is_instance(doc, dragged) {
            Some(&self.moving)
        } else {
            None
        }
    }
}

impl DropHandler for TableDropzone {
    fn on_drop_activate(&self, doc: &mut Document, event: &DragEvent) {
        if let Some(feedback) = self.feedback(doc, event) {
            feedback.on_drop_activate(doc, event);
        }
    }

    fn on_drag_enter(&self, doc: &mut Document, event: &DragEvent) {
        if let Some(feedback) = self.feedback(doc, event) {
            feedback.on_drag_enter(doc, event);
        }
    }

    fn on_drag_leave(&self, doc: &mut Document, event: &DragEvent) {
        if let Some(feedback) = self.feedback(doc, event) {
            feedback.on_drag_leave(doc, event);
        }
    }

    fn on_drop(&self, doc: &mut Document, event: &DragEvent) {
        let Some(dragged) = event.related_target else {
            return;
        };
        if FieldType.is_type_template(doc, dragged) {
            self.create.on_drop(doc, event);
            FieldType.create(doc, event.target);
        } else if FieldType.is_instance(doc, dragged) {
            self.moving.on_drop(doc, event);
            FieldType.move_to(doc, dragged, event.target);
        } else {
            debug!(?dragged, "table dropzone ignored unrelated drop");
        }
    }

    fn on_drop_deactivate(&self, doc: &mut Document, event: &DragEvent) {
        if let Some(feedback) = self.feedback(doc, event) {
            feedback.on_drop_deactivate(doc, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::test_support::page;

    fn event(zone: NodeId, dragged: NodeId) -> DragEvent {
        DragEvent {
            target: zone,
            related_target: Some(dragged),
            dx: 0.0,
            dy: 0.0,
        }
    }

    #[test]
    fn test_feedback_class_lifecycle() {
        let mut doc = Document::new();
        let zone = doc.create_element("div");
        let dragged = doc.create_element("div");
        let feedback = dropzone(DropPurpose::Delete);
        let e = event(zone, dragged);

        feedback.on_drop_activate(&mut doc, &e);
        assert!(doc.has_class(zone, "dropzone-delete-dragactive"));

        feedback.on_drag_enter(&mut doc, &e);
        assert!(doc.has_class(zone, "dropzone-delete-active"));

        feedback.on_drag_leave(&mut doc, &e);
        assert!(!doc.has_class(zone, "dropzone-delete-active"));
        assert!(doc.has_class(zone, "dropzone-delete-dragactive"));

        feedback.on_drag_enter(&mut doc, &e);
        feedback.on_drop(&mut doc, &e);
        assert_eq!(doc.classes(zone).count(), 0);
    }

    #[test]
    fn test_deactivate_clears_both_markers() {
        let mut doc = Document::new();
        let zone = doc.create_element("div");
        let dragged = doc.create_element("div");
        let feedback = dropzone(DropPurpose::Move);
        let e = event(zone, dragged);

        feedback.on_drop_activate(&mut doc, &e);
        feedback.on_drag_enter(&mut doc, &e);
        feedback.on_drop_deactivate(&mut doc, &e);
        assert_eq!(doc.classes(zone).count(), 0);
    }

    #[test]
    fn test_workspace_drop_creates_table() {
        let (mut doc, page) = page();
        let zone = WorkspaceDropzone::default();
        zone.on_drop(&mut doc, &event(page.workspace, page.table_type));
        assert_eq!(TableType.instances(&doc, page.workspace).len(), 1);
    }

    #[test]
    fn test_sidebar_drop_deletes_dragged_object() {
        let (mut doc, page) = page();
        let table = TableType.create(&mut doc, page.workspace).unwrap();
        let field = FieldType.create(&mut doc, table).unwrap();
        let zone = SidebarDropzone::default();

        zone.on_drop(&mut doc, &event(page.sidebar, field));
        assert!(TableType.fields(&doc, table).is_empty());
        assert!(doc.is_attached(table));

        zone.on_drop(&mut doc, &event(page.sidebar, table));
        assert!(TableType.instances(&doc, page.workspace).is_empty());
    }

    #[test]
    fn test_table_zone_feedback_follows_dragged_kind() {
        let (mut doc, page) = page();
        let a = TableType.create(&mut doc, page.workspace).unwrap();
        let b = TableType.create(&mut doc, page.workspace).unwrap();
        let field = FieldType.create(&mut doc, a).unwrap();
        let zone = TableDropzone::default();

        zone.on_drop_activate(&mut doc, &event(b, page.field_type));
        assert!(doc.has_class(b, "dropzone-create-dragactive"));
        zone.on_drop_deactivate(&mut doc, &event(b, page.field_type));

        zone.on_drop_activate(&mut doc, &event(b, field));
        assert!(doc.has_class(b, "dropzone-move-dragactive"));
        assert!(!doc.has_class(b, "dropzone-create-dragactive"));
    }

    #[test]
    fn test_table_zone_creates_and_moves_fields() {
        let (mut doc, page) = page();
        let a = TableType.create(&mut doc, page.workspace).unwrap();
        let b = TableType.create(&mut doc, page.workspace).unwrap();
        let zone = TableDropzone::default();

        zone.on_drop(&mut doc, &event(a, page.field_type));
        let fields = TableType.fields(&doc, a);
        assert_eq!(fields.len(), 1);

        zone.on_drop(&mut doc, &event(b, fields[0]));
        assert!(TableType.fields(&doc, a).is_empty());
        assert_eq!(TableType.fields(&doc, b), fields);
    }

    #[test]
    fn test_table_zone_ignores_other_drags() {
        let (mut doc, page) = page();
        let a = TableType.create(&mut doc, page.workspace).unwrap();
        let b = TableType.create(&mut doc, page.workspace).unwrap();
        let zone = TableDropzone::default();

        zone.on_drop_activate(&mut doc, &event(a, b));
        zone.on_drop(&mut doc, &event(a, b));
        assert!(!doc.has_class(a, "dropzone-create-dragactive"));
        assert!(TableType.fields(&doc, a).is_empty());
        assert_eq!(doc.parent(b), Some(page.workspace));
    }
}
