//! Settings overlay manager
//!
//! Every object instance carries a settings overlay cloned from its template.
//! Because all instances share one template, the overlay inputs only carry
//! inert `data-name`/`data-id`/`data-for` attributes; the live `name`/`id`/
//! `for` attributes are bound while the overlay is open and cleared when it
//! closes. Radio "active" markers are scoped to the nearest radio fieldset so
//! that nested parameter groups and sibling instances never interfere.

use tracing::{debug, warn};

use crate::constants::{attrs, classes};
use crate::containment::get_container;
use crate::dom::{Document, Listener, NodeId, Selector};

/// Kinds of input grouping a fieldset can declare via `data-input-type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldsetKind {
    Radio,
    Checkbox,
}

impl FieldsetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldsetKind::Radio => "radio",
            FieldsetKind::Checkbox => "checkbox",
        }
    }
}

// ------------------------------------------------------------------
// Support functions
// ------------------------------------------------------------------

/// Check whether `element` is a fieldset, optionally of the given kind
pub fn is_fieldset(doc: &Document, element: NodeId, kind: Option<FieldsetKind>) -> bool {
    if !doc.tag(element).eq_ignore_ascii_case("fieldset") {
        return false;
    }
    match kind {
        Some(kind) => doc.attr(element, attrs::DATA_INPUT_TYPE) == Some(kind.as_str()),
        None => true,
    }
}

/// The radio fieldset a radio belongs to
pub fn radio_scope(doc: &Document, radio: NodeId) -> Option<NodeId> {
    get_container(doc, radio, |d, n| is_fieldset(d, n, Some(FieldsetKind::Radio)))
}

/// The parameter sub-section paired with an input, if it has one
///
/// Inputs and their parameters are siblings inside a wrapping element.
pub fn params_of(doc: &Document, input: NodeId) -> Option<NodeId> {
    let wrapper = doc.parent(input)?;
    doc.children(wrapper)
        .iter()
        .copied()
        .find(|c| *c != input && doc.has_class(*c, classes::INPUT_PARAMS))
}

pub fn has_params(doc: &Document, input: NodeId) -> bool {
    params_of(doc, input).is_some()
}

/// Show or hide the parameter sub-section of an input
pub fn toggle_params(doc: &mut Document, input: NodeId) {
    if let Some(params) = params_of(doc, input) {
        doc.toggle_class(params, classes::HIDDEN);
    }
}

fn set_params_visible(doc: &mut Document, input: NodeId, visible: bool) {
    if let Some(params) = params_of(doc, input) {
        if visible {
            doc.remove_class(params, classes::HIDDEN);
        } else {
            doc.add_class(params, classes::HIDDEN);
        }
    }
}

// ------------------------------------------------------------------
// Setup and tear-down
// ------------------------------------------------------------------

pub fn set_title(doc: &mut Document, overlay: NodeId, title: &str) {
    match doc.first_by_class(overlay, classes::SETTINGS_TITLE) {
        Some(heading) => doc.set_text(heading, title),
        None => warn!(title, "settings overlay has no title region"),
    }
}

const BINDINGS: [(&str, &str); 3] = [
    (attrs::DATA_NAME, attrs::NAME),
    (attrs::DATA_ID, attrs::ID),
    (attrs::DATA_FOR, "for"),
];

/// Copy `data-name`/`data-id`/`data-for` onto the live attributes
pub fn assign_data_attrs(doc: &mut Document, overlay: NodeId) {
    for (data_attr, live_attr) in BINDINGS {
        for element in doc.query_all(overlay, &Selector::has_attr(data_attr)) {
            let value = doc.attr(element, data_attr).unwrap_or_default().to_string();
            doc.set_attr(element, live_attr, value);
        }
    }
}

/// Drop the live attributes bound by [`assign_data_attrs`]
pub fn clear_data_attrs(doc: &mut Document, overlay: NodeId) {
    for (data_attr, live_attr) in BINDINGS {
        for element in doc.query_all(overlay, &Selector::has_attr(data_attr)) {
            doc.remove_attr(element, live_attr);
        }
    }
}

/// Attach click listeners to every radio and checkbox in the overlay
pub fn set_event_listeners(doc: &mut Document, overlay: NodeId) {
    for radio in doc.query_all(overlay, &Selector::input_type("radio")) {
        doc.add_listener(radio, Listener::ActivateRadio);
    }
    for checkbox in doc.query_all(overlay, &Selector::input_type("checkbox")) {
        doc.add_listener(checkbox, Listener::ToggleCheckbox);
    }
}

/// Reveal an overlay, binding its inputs and freezing `frozen` in place
///
/// The overlay remembers what it froze so `close` releases exactly those
/// elements, wherever they have moved since.
pub fn open(doc: &mut Document, overlay: NodeId, title: &str, frozen: &[NodeId]) {
    set_title(doc, overlay, title);
    assign_data_attrs(doc, overlay);
    thaw(doc, overlay);
    for &element in frozen {
        doc.add_class(element, classes::NO_TRANSFORM);
    }
    doc.set_links(overlay, frozen.to_vec());
    doc.remove_class(overlay, classes::HIDDEN);
    debug!(title, "opened settings overlay");
}

/// Hide an overlay and return its inputs to the inert template state
pub fn close(doc: &mut Document, overlay: NodeId) {
    clear_data_attrs(doc, overlay);
    doc.add_class(overlay, classes::HIDDEN);
    thaw(doc, overlay);
    debug!("closed settings overlay");
}

fn thaw(doc: &mut Document, overlay: NodeId) {
    for element in doc.take_links(overlay) {
        doc.remove_class(element, classes::NO_TRANSFORM);
    }
}

pub fn is_open(doc: &Document, overlay: NodeId) -> bool {
    !doc.has_class(overlay, classes::HIDDEN)
}

// ------------------------------------------------------------------
// Radio buttons and checkboxes
// ------------------------------------------------------------------

/// Mark `selected` as the active radio of its fieldset
///
/// Only radios whose nearest radio fieldset is the same as the selected
/// radio's compete, so radios inside nested parameter groups keep their own
/// markers. The checked state itself is handled by the click default action.
pub fn activate_radio(doc: &mut Document, selected: NodeId) {
    let Some(scope) = radio_scope(doc, selected) else {
        warn!(?selected, "radio is not inside a radio fieldset");
        return;
    };

    let active = Selector::All(vec![
        Selector::input_type("radio"),
        Selector::has_attr(attrs::DATA_ACTIVE),
    ]);
    let current = doc
        .query_all(scope, &active)
        .into_iter()
        .find(|radio| radio_scope(doc, *radio) == Some(scope));

    if let Some(current) = current {
        doc.remove_attr(current, attrs::DATA_ACTIVE);
        set_params_visible(doc, current, false);
    }

    doc.set_attr(selected, attrs::DATA_ACTIVE, "true");
    set_params_visible(doc, selected, true);
}

/// Show/hide a checkbox's parameters; no effect when it has none
pub fn toggle_checkbox(doc: &mut Document, checkbox: NodeId) {
    if has_params(doc, checkbox) {
        toggle_params(doc, checkbox);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// fieldset[radio] > (div.input > radio a + params(fieldset[radio] > nested x, y)), (div.input > radio b)
    struct Fixture {
        doc: Document,
        overlay: NodeId,
        a: NodeId,
        b: NodeId,
        x: NodeId,
        y: NodeId,
    }

    fn radio(doc: &mut Document, parent: NodeId, value: &str, with_params: bool) -> (NodeId, Option<NodeId>) {
        let wrapper = doc.create_element("div");
        doc.add_class(wrapper, classes::INPUT);
        let input = doc.create_element("input");
        doc.set_attr(input, attrs::TYPE, "radio");
        doc.set_attr(input, attrs::DATA_NAME, "choice");
        doc.set_value(input, value);
        doc.append_child(wrapper, input);
        let params = with_params.then(|| {
            let params = doc.create_element("div");
            doc.add_class(params, classes::INPUT_PARAMS);
            doc.add_class(params, classes::HIDDEN);
            doc.append_child(wrapper, params);
            params
        });
        doc.append_child(parent, wrapper);
        (input, params)
    }

    fn radio_fieldset(doc: &mut Document, parent: NodeId) -> NodeId {
        let fieldset = doc.create_element("fieldset");
        doc.set_attr(fieldset, attrs::DATA_INPUT_TYPE, "radio");
        doc.append_child(parent, fieldset);
        fieldset
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let overlay = doc.create_element("div");
        doc.add_class(overlay, classes::OVERLAY);
        doc.add_class(overlay, classes::HIDDEN);
        doc.append_child(doc.root(), overlay);
        let title = doc.create_element("h2");
        doc.add_class(title, classes::SETTINGS_TITLE);
        doc.append_child(overlay, title);

        let outer = radio_fieldset(&mut doc, overlay);
        let (a, a_params) = radio(&mut doc, outer, "a", true);
        let (b, _) = radio(&mut doc, outer, "b", false);
        let inner = radio_fieldset(&mut doc, a_params.unwrap());
        let (x, _) = radio(&mut doc, inner, "x", false);
        let (y, _) = radio(&mut doc, inner, "y", false);
        Fixture { doc, overlay, a, b, x, y }
    }

    fn is_active(doc: &Document, radio: NodeId) -> bool {
        doc.attr(radio, attrs::DATA_ACTIVE).is_some()
    }

    #[test]
    fn test_activate_radio_replaces_previous_in_same_fieldset() {
        let Fixture { mut doc, a, b, .. } = fixture();

        activate_radio(&mut doc, a);
        assert!(is_active(&doc, a));
        assert!(!doc.has_class(params_of(&doc, a).unwrap(), classes::HIDDEN));

        activate_radio(&mut doc, b);
        assert!(is_active(&doc, b));
        assert!(!is_active(&doc, a));
        assert!(doc.has_class(params_of(&doc, a).unwrap(), classes::HIDDEN));
    }

    #[test]
    fn test_nested_fieldset_keeps_its_own_marker() {
        let Fixture { mut doc, a, b, x, y, .. } = fixture();

        activate_radio(&mut doc, a);
        activate_radio(&mut doc, x);
        assert!(is_active(&doc, a));
        assert!(is_active(&doc, x));

        // Outer switch does not touch the nested marker
        activate_radio(&mut doc, b);
        assert!(is_active(&doc, x));

        // Nested switch does not touch the outer marker
        activate_radio(&mut doc, y);
        assert!(is_active(&doc, b));
        assert!(!is_active(&doc, x));
        assert!(is_active(&doc, y));
    }

    #[test]
    fn test_reactivating_same_radio_keeps_params_visible() {
        let Fixture { mut doc, a, .. } = fixture();
        activate_radio(&mut doc, a);
        activate_radio(&mut doc, a);
        assert!(is_active(&doc, a));
        assert!(!doc.has_class(params_of(&doc, a).unwrap(), classes::HIDDEN));
    }

    #[test]
    fn test_checkbox_toggles_params_only_when_present() {
        let mut doc = Document::new();
        let wrapper = doc.create_element("div");
        let checkbox = doc.create_element("input");
        doc.set_attr(checkbox, attrs::TYPE, "checkbox");
        let params = doc.create_element("div");
        doc.add_class(params, classes::INPUT_PARAMS);
        doc.add_class(params, classes::HIDDEN);
        doc.append_child(wrapper, checkbox);
        doc.append_child(wrapper, params);

        toggle_checkbox(&mut doc, checkbox);
        assert!(!doc.has_class(params, classes::HIDDEN));
        toggle_checkbox(&mut doc, checkbox);
        assert!(doc.has_class(params, classes::HIDDEN));

        let lone = doc.create_element("input");
        doc.set_attr(lone, attrs::TYPE, "checkbox");
        toggle_checkbox(&mut doc, lone);
        assert!(!has_params(&doc, lone));
    }

    #[test]
    fn test_open_close_binds_and_clears_names() {
        let Fixture { mut doc, overlay, a, x, .. } = fixture();
        let frozen = doc.create_element("div");
        doc.set_attr(x, attrs::DATA_ID, "size-x");

        open(&mut doc, overlay, "Users", &[frozen]);
        assert!(is_open(&doc, overlay));
        assert!(doc.has_class(frozen, classes::NO_TRANSFORM));
        assert_eq!(doc.attr(a, attrs::NAME), Some("choice"));
        assert_eq!(doc.attr(x, attrs::ID), Some("size-x"));
        let title = doc.first_by_class(overlay, classes::SETTINGS_TITLE).unwrap();
        assert_eq!(doc.text(title), "Users");

        close(&mut doc, overlay);
        assert!(!is_open(&doc, overlay));
        assert!(!doc.has_class(frozen, classes::NO_TRANSFORM));
        assert_eq!(doc.attr(a, attrs::NAME), None);
        assert_eq!(doc.attr(x, attrs::ID), None);

        // Closing again changes nothing
        close(&mut doc, overlay);
        assert!(!is_open(&doc, overlay));
        assert_eq!(doc.attr(a, attrs::NAME), None);
    }

    #[test]
    fn test_event_listeners_attached_to_radios_and_checkboxes() {
        let Fixture { mut doc, overlay, a, y, .. } = fixture();
        set_event_listeners(&mut doc, overlay);
        assert_eq!(doc.listeners(a), &[Listener::ActivateRadio]);
        assert_eq!(doc.listeners(y), &[Listener::ActivateRadio]);
    }
}
