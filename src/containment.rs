//! Resolve the container an element sits in

use crate::dom::{Document, NodeId};

/// Walk upward from `element` (inclusive) until `is_container` matches
///
/// Returns `None` when the chain runs out without a match; callers treat that
/// as "not contained".
pub fn get_container(
    doc: &Document,
    element: NodeId,
    is_container: impl Fn(&Document, NodeId) -> bool,
) -> Option<NodeId> {
    doc.ancestors(element).find(|candidate| is_container(doc, *candidate))
}
