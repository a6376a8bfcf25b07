use crate::constants::{classes, ids, names};
use crate::dom::{Document, NodeId};

use super::{ObjectKind, ObjectType, title_part};

/// Lifecycle of table instances; tables live directly in the workspace
#[derive(Debug, Clone, Copy, Default)]
pub struct TableType;

impl TableType {
    /// Table instances directly inside `workspace`, in order
    pub fn instances(&self, doc: &Document, workspace: NodeId) -> Vec<NodeId> {
        doc.children(workspace)
            .iter()
            .copied()
            .filter(|n| self.is_instance(doc, *n))
            .collect()
    }

    /// The element holding a table's fields
    pub fn fields_container(&self, doc: &Document, table: NodeId) -> Option<NodeId> {
        doc.first_by_class(table, classes::TABLE_FIELDS)
    }

    /// Field instances of a table, in order
    pub fn fields(&self, doc: &Document, table: NodeId) -> Vec<NodeId> {
        self.fields_container(doc, table)
            .map(|container| {
                doc.children(container)
                    .iter()
                    .copied()
                    .filter(|n| doc.has_class(*n, classes::FIELD_INSTANCE))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ObjectType for TableType {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Table
    }

    fn type_id(&self) -> &'static str {
        ids::TABLE_TYPE
    }

    fn template_id(&self) -> &'static str {
        ids::TABLE_TEMPLATE
    }

    fn instance_class(&self) -> &'static str {
        classes::TABLE_INSTANCE
    }

    fn settings_class(&self) -> &'static str {
        classes::TABLE_SETTINGS
    }

    fn name_key(&self) -> &'static str {
        names::TABLE_NAME
    }

    fn insertion_point(&self, _doc: &Document, target: NodeId) -> Option<NodeId> {
        Some(target)
    }

    fn title(&self, doc: &Document, instance: NodeId) -> String {
        title_part(self.name(doc, instance)).to_string()
    }

    fn frozen_containers(&self, _doc: &Document, instance: NodeId) -> Vec<NodeId> {
        vec![instance]
    }
}
