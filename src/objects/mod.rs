//! Object lifecycle managers
//!
//! Tables and fields share one lifecycle: clone a template, tag the clone as
//! an instance, wire its settings controls, and attach it to a target. The
//! per-type differences (template id, where instances go, how the overlay is
//! titled) are the required methods of [`ObjectType`]; the lifecycle itself is
//! provided. Implementors are stateless values.

pub mod field;
pub mod table;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::{attrs, classes};
use crate::containment::get_container;
use crate::dom::{Document, Listener, NodeId, Selector};
use crate::settings;

pub use field::FieldType;
pub use table::TableType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Table,
    Field,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Table => write!(f, "table"),
            ObjectKind::Field => write!(f, "field"),
        }
    }
}

pub trait ObjectType {
    fn kind(&self) -> ObjectKind;

    /// Id of the sidebar chip that creates this type
    fn type_id(&self) -> &'static str;

    /// Id of the template whose first child is the prototype
    fn template_id(&self) -> &'static str;

    /// Class carried by every instance
    fn instance_class(&self) -> &'static str;

    /// Class of the instance's settings overlay
    fn settings_class(&self) -> &'static str;

    /// `data-name` of the instance's name input
    fn name_key(&self) -> &'static str;

    /// Where new instances are appended for a given drop target
    fn insertion_point(&self, doc: &Document, target: NodeId) -> Option<NodeId>;

    /// Overlay title for an instance
    fn title(&self, doc: &Document, instance: NodeId) -> String;

    /// Elements frozen in place while the overlay is shown
    fn frozen_containers(&self, doc: &Document, instance: NodeId) -> Vec<NodeId>;

    fn is_type_template(&self, doc: &Document, element: NodeId) -> bool {
        doc.attr(element, attrs::ID) == Some(self.type_id())
    }

    fn is_instance(&self, doc: &Document, element: NodeId) -> bool {
        doc.has_class(element, self.instance_class())
    }

    /// The instance `inner` belongs to, if any
    fn instance_of(&self, doc: &Document, inner: NodeId) -> Option<NodeId> {
        get_container(doc, inner, |d, n| self.is_instance(d, n))
    }

    fn settings_overlay(&self, doc: &Document, instance: NodeId) -> Option<NodeId> {
        doc.first_by_class(instance, self.settings_class())
    }

    /// Name inputs owned by this instance (not by nested instances)
    fn name_inputs(&self, doc: &Document, instance: NodeId) -> Vec<NodeId> {
        doc.query_all(instance, &Selector::attr_eq(attrs::DATA_NAME, self.name_key()))
            .into_iter()
            .filter(|input| self.instance_of(doc, *input) == Some(instance))
            .collect()
    }

    /// Current display name; empty when unnamed
    fn name<'d>(&self, doc: &'d Document, instance: NodeId) -> &'d str {
        self.name_inputs(doc, instance)
            .first()
            .map(|input| doc.value(*input))
            .unwrap_or("")
    }

    /// Clone the template into `target` and wire the clone's controls
    fn create(&self, doc: &mut Document, target: NodeId) -> Option<NodeId> {
        let kind = self.kind();
        let Some(prototype) = doc
            .element_by_id(self.template_id())
            .and_then(|template| doc.first_child(template))
        else {
            warn!(%kind, template = self.template_id(), "template missing or empty");
            return None;
        };
        let Some(parent) = self.insertion_point(doc, target) else {
            warn!(%kind, drop_target = ?target, "drop target cannot hold this object");
            return None;
        };

        let instance = doc.deep_clone(prototype);
        doc.add_class(instance, classes::OBJECT_INSTANCE);
        doc.add_class(instance, self.instance_class());
        doc.add_class(instance, classes::DROPZONE);

        for button in doc.query_all(instance, &Selector::class(classes::SETTINGS_BUTTON)) {
            doc.add_listener(button, Listener::OpenSettings(kind));
        }
        match self.settings_overlay(doc, instance) {
            Some(overlay) => {
                for close in doc.query_all(overlay, &Selector::class(classes::OVERLAY_CLOSE)) {
                    doc.add_listener(close, Listener::CloseSettings(kind));
                }
                settings::set_event_listeners(doc, overlay);
            }
            None => warn!(%kind, "template has no settings overlay"),
        }

        doc.append_child(parent, instance);
        info!(%kind, ?instance, ?parent, "created object");
        Some(instance)
    }

    fn delete(&self, doc: &mut Document, instance: NodeId) {
        doc.detach(instance);
        info!(kind = %self.kind(), ?instance, "deleted object");
    }

    /// Open the overlay of the instance containing `inner`
    fn open_settings(&self, doc: &mut Document, inner: NodeId) -> Option<NodeId> {
        let instance = self.instance_of(doc, inner)?;
        let overlay = self.settings_overlay(doc, instance)?;
        let title = self.title(doc, instance);
        let frozen = self.frozen_containers(doc, instance);
        settings::open(doc, overlay, &title, &frozen);
        Some(overlay)
    }

    /// Close the overlay of the instance containing `inner`
    fn close_settings(&self, doc: &mut Document, inner: NodeId) -> Option<NodeId> {
        let instance = self.instance_of(doc, inner)?;
        let overlay = self.settings_overlay(doc, instance)?;
        settings::close(doc, overlay);
        Some(overlay)
    }
}

/// Display name or the placeholder used in overlay titles
pub(crate) fn title_part(name: &str) -> &str {
    if name.is_empty() {
        crate::constants::names::UNDEFINED
    } else {
        name
    }
}
