use tracing::{info, warn};

use crate::constants::{classes, ids, names};
use crate::dom::{Document, NodeId};

use super::{ObjectKind, ObjectType, TableType, title_part};

/// Lifecycle of field instances; fields live in a table's field list
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldType;

impl FieldType {
    /// The table a field currently belongs to
    pub fn table_of(&self, doc: &Document, field: NodeId) -> Option<NodeId> {
        let parent = doc.parent(field)?;
        TableType.instance_of(doc, parent)
    }

    /// Re-parent `field` to the end of `target`'s field list
    ///
    /// `target` may be the table or any element inside it.
    pub fn move_to(&self, doc: &mut Document, field: NodeId, target: NodeId) -> bool {
        let Some(fields) = self.insertion_point(doc, target) else {
            warn!(?field, drop_target = ?target, "move target is not inside a table");
            return false;
        };
        let from = self.table_of(doc, field);
        doc.append_child(fields, field);
        info!(?field, ?from, to = ?self.table_of(doc, field), "moved field");
        true
    }
}

impl ObjectType for FieldType {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Field
    }

    fn type_id(&self) -> &'static str {
        ids::FIELD_TYPE
    }

    fn template_id(&self) -> &'static str {
        ids::FIELD_TEMPLATE
    }

    fn instance_class(&self) -> &'static str {
        classes::FIELD_INSTANCE
    }

    fn settings_class(&self) -> &'static str {
        classes::FIELD_SETTINGS
    }

    fn name_key(&self) -> &'static str {
        names::FIELD_NAME
    }

    fn insertion_point(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        let table = TableType.instance_of(doc, target)?;
        TableType.fields_container(doc, table)
    }

    fn title(&self, doc: &Document, instance: NodeId) -> String {
        let table_name = self
            .table_of(doc, instance)
            .map(|table| TableType.name(doc, table))
            .unwrap_or("");
        format!(
            "{}.{}",
            title_part(table_name),
            title_part(self.name(doc, instance))
        )
    }

    fn frozen_containers(&self, doc: &Document, instance: NodeId) -> Vec<NodeId> {
        self.table_of(doc, instance)
            .into_iter()
            .chain([instance])
            .collect()
    }
}
