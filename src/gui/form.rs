//! Generic rendering of a settings overlay's form
//!
//! Walks the overlay content and draws one egui widget per input. Widgets
//! never write to the document; they queue [`Action`]s that the app applies
//! after the frame so every change goes through the editor's click and
//! value paths.

use egui::{Id, RichText, TextEdit, Ui};

use crate::constants::classes;
use crate::dom::{Document, NodeId};

use super::Action;
use super::constants::INPUT_WIDTH;

pub fn render_children(ui: &mut Ui, doc: &Document, parent: NodeId, actions: &mut Vec<Action>) {
    for &child in doc.children(parent) {
        render_node(ui, doc, child, actions);
    }
}

fn render_node(ui: &mut Ui, doc: &Document, node: NodeId, actions: &mut Vec<Action>) {
    if doc.has_class(node, classes::HIDDEN) {
        return;
    }
    match doc.tag(node) {
        "fieldset" => {
            ui.group(|ui| render_children(ui, doc, node, actions));
        }
        "legend" => {
            ui.label(RichText::new(doc.text(node)).strong());
        }
        "label" => {
            ui.label(doc.text(node));
        }
        "input" => render_input(ui, doc, node, "", actions),
        _ if doc.has_class(node, classes::INPUT) => render_wrapper(ui, doc, node, actions),
        _ if doc.has_class(node, classes::INPUT_PARAMS) => {
            ui.indent(node, |ui| render_children(ui, doc, node, actions));
        }
        _ => render_children(ui, doc, node, actions),
    }
}

/// `div.input`: the input with its caption, then its parameters
fn render_wrapper(ui: &mut Ui, doc: &Document, wrapper: NodeId, actions: &mut Vec<Action>) {
    let children = doc.children(wrapper);
    let caption = children
        .iter()
        .find(|c| doc.tag(**c) == "label")
        .map(|label| doc.text(*label))
        .unwrap_or("");
    if let Some(input) = children.iter().find(|c| doc.tag(**c) == "input") {
        render_input(ui, doc, *input, caption, actions);
    }
    for &child in children {
        if doc.has_class(child, classes::INPUT_PARAMS) {
            render_node(ui, doc, child, actions);
        }
    }
}

fn render_input(
    ui: &mut Ui,
    doc: &Document,
    input: NodeId,
    caption: &str,
    actions: &mut Vec<Action>,
) {
    match doc.input_type(input) {
        Some("radio") => {
            if ui.radio(doc.is_checked(input), caption).clicked() {
                actions.push(Action::Click(input));
            }
        }
        Some("checkbox") => {
            let mut checked = doc.is_checked(input);
            if ui.checkbox(&mut checked, caption).clicked() {
                actions.push(Action::Click(input));
            }
        }
        _ => {
            ui.horizontal(|ui| {
                ui.label(caption);
                let mut value = doc.value(input).to_string();
                let edit = TextEdit::singleline(&mut value)
                    .id(Id::new(("setting", input)))
                    .desired_width(INPUT_WIDTH);
                if ui.add(edit).changed() {
                    actions.push(Action::SetValue(input, value));
                }
            });
        }
    }
}
