//! Object templates and page skeleton
//!
//! Templates are described declaratively by a [`TemplateSpec`] (the built-in
//! default, or a TOML file) and expanded into element subtrees that follow the
//! template contract: a name input, a settings button, and a hidden settings
//! overlay with a title region, a close control and `data-name`-tagged
//! inputs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{attrs, classes, ids, names};
use crate::dom::{Document, NodeId};
use crate::settings::FieldsetKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub table: ObjectTemplate,
    pub field: ObjectTemplate,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectTemplate {
    #[serde(default)]
    pub settings: Vec<InputSpec>,
}

/// One settings input; `params` are only shown while their owner is active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputSpec {
    Text {
        name: String,
        #[serde(default)]
        label: String,
        #[serde(default)]
        default: String,
    },
    Checkbox {
        name: String,
        #[serde(default)]
        label: String,
        #[serde(default)]
        checked: bool,
        #[serde(default)]
        params: Vec<InputSpec>,
    },
    Radio {
        name: String,
        #[serde(default)]
        legend: String,
        options: Vec<RadioOption>,
    },
    Group {
        name: String,
        #[serde(default)]
        legend: String,
        inputs: Vec<InputSpec>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub params: Vec<InputSpec>,
}

fn text(name: &str, label: &str, default: &str) -> InputSpec {
    InputSpec::Text {
        name: name.to_string(),
        label: label.to_string(),
        default: default.to_string(),
    }
}

fn checkbox(name: &str, label: &str, params: Vec<InputSpec>) -> InputSpec {
    InputSpec::Checkbox {
        name: name.to_string(),
        label: label.to_string(),
        checked: false,
        params,
    }
}

fn option(value: &str, label: &str, params: Vec<InputSpec>) -> RadioOption {
    RadioOption {
        value: value.to_string(),
        label: label.to_string(),
        params,
    }
}

impl Default for TemplateSpec {
    fn default() -> Self {
        let table = ObjectTemplate {
            settings: vec![
                text("records", "Expected records", "0"),
                InputSpec::Radio {
                    name: "engine".to_string(),
                    legend: "Storage engine".to_string(),
                    options: vec![
                        option("default", "Default", vec![]),
                        option("memory", "In-memory", vec![]),
                        option("archive", "Archive", vec![]),
                    ],
                },
                text("comment", "Comment", ""),
            ],
        };

        let integer_size = InputSpec::Radio {
            name: "size".to_string(),
            legend: "Size".to_string(),
            options: vec![
                option("int", "32-bit", vec![]),
                option("small", "16-bit", vec![]),
                option("big", "64-bit", vec![]),
            ],
        };
        let field = ObjectTemplate {
            settings: vec![
                InputSpec::Radio {
                    name: "type".to_string(),
                    legend: "Data type".to_string(),
                    options: vec![
                        option(
                            "integer",
                            "Integer",
                            vec![integer_size, checkbox("unsigned", "Unsigned", vec![])],
                        ),
                        option(
                            "decimal",
                            "Decimal",
                            vec![text("precision", "Precision", "10"), text("scale", "Scale", "2")],
                        ),
                        option("text", "Text", vec![text("max-length", "Maximum length", "255")]),
                        option("boolean", "Boolean", vec![]),
                        option("datetime", "Date/time", vec![]),
                    ],
                },
                InputSpec::Group {
                    name: "constraints".to_string(),
                    legend: "Constraints".to_string(),
                    inputs: vec![
                        checkbox("primary-key", "Primary key", vec![]),
                        checkbox("nullable", "Nullable", vec![]),
                        checkbox("unique", "Unique", vec![]),
                    ],
                },
                checkbox("default", "Default value", vec![text("default-value", "Value", "")]),
            ],
        };

        Self { table, field }
    }
}

impl TemplateSpec {
    /// Load templates from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read templates from {:?}", path))?;
        let spec: TemplateSpec = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML templates from {:?}", path))?;
        info!(
            path = %path.display(),
            table_inputs = spec.table.settings.len(),
            field_inputs = spec.field.settings.len(),
            "loaded templates"
        );
        Ok(spec)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize templates to TOML")
    }
}

/// Elements of the page skeleton the editor needs direct access to
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub content: NodeId,
    pub sidebar: NodeId,
    pub workspace: NodeId,
    pub table_type: NodeId,
    pub field_type: NodeId,
}

/// Build the page skeleton and both object templates into `doc`
pub fn build_page(doc: &mut Document, spec: &TemplateSpec) -> Page {
    let content = element(doc, "div", &[]);
    doc.set_attr(content, attrs::ID, ids::CONTENT);
    doc.append_child(doc.root(), content);

    let sidebar = element(doc, "div", &[]);
    doc.set_attr(sidebar, attrs::ID, ids::SIDEBAR);
    doc.append_child(content, sidebar);

    let table_type = type_chip(doc, ids::TABLE_TYPE, "Table");
    doc.append_child(sidebar, table_type);
    let field_type = type_chip(doc, ids::FIELD_TYPE, "Field");
    doc.append_child(sidebar, field_type);

    let workspace = element(doc, "div", &[]);
    doc.set_attr(workspace, attrs::ID, ids::WORKSPACE);
    doc.append_child(content, workspace);

    let templates = element(doc, "div", &[classes::HIDDEN]);
    doc.set_attr(templates, attrs::ID, ids::TEMPLATES);
    doc.append_child(doc.root(), templates);

    let table_template = element(doc, "template", &[]);
    doc.set_attr(table_template, attrs::ID, ids::TABLE_TEMPLATE);
    let table_prototype = object_prototype(
        doc,
        "table",
        names::TABLE_NAME,
        classes::TABLE_SETTINGS,
        Some(classes::TABLE_FIELDS),
        &spec.table,
    );
    doc.append_child(table_template, table_prototype);
    doc.append_child(templates, table_template);

    let field_template = element(doc, "template", &[]);
    doc.set_attr(field_template, attrs::ID, ids::FIELD_TEMPLATE);
    let field_prototype = object_prototype(
        doc,
        "field",
        names::FIELD_NAME,
        classes::FIELD_SETTINGS,
        None,
        &spec.field,
    );
    doc.append_child(field_template, field_prototype);
    doc.append_child(templates, field_template);

    Page {
        content,
        sidebar,
        workspace,
        table_type,
        field_type,
    }
}

fn element(doc: &mut Document, tag: &str, class_list: &[&str]) -> NodeId {
    let node = doc.create_element(tag);
    for class in class_list {
        doc.add_class(node, class);
    }
    node
}

fn labelled(doc: &mut Document, tag: &str, class_list: &[&str], text: &str) -> NodeId {
    let node = element(doc, tag, class_list);
    doc.set_text(node, text);
    node
}

fn type_chip(doc: &mut Document, id: &str, label: &str) -> NodeId {
    let chip = labelled(doc, "div", &[classes::OBJECT_TYPE], label);
    doc.set_attr(chip, attrs::ID, id);
    chip
}

fn object_prototype(
    doc: &mut Document,
    label: &str,
    name_key: &str,
    settings_class: &str,
    body_class: Option<&str>,
    template: &ObjectTemplate,
) -> NodeId {
    let object = element(doc, "div", &[]);

    let header = element(doc, "div", &[classes::OBJECT_HEADER]);
    let name = element(doc, "input", &[]);
    doc.set_attr(name, attrs::TYPE, "text");
    doc.set_attr(name, attrs::DATA_NAME, name_key);
    doc.set_attr(name, "placeholder", format!("{label} name"));
    doc.append_child(header, name);
    let button = labelled(doc, "button", &[classes::SETTINGS_BUTTON], "\u{2699}");
    doc.append_child(header, button);
    doc.append_child(object, header);

    if let Some(body_class) = body_class {
        let body = element(doc, "div", &[body_class]);
        doc.append_child(object, body);
    }

    let overlay = element(doc, "div", &[classes::OVERLAY, classes::HIDDEN, settings_class]);
    let title = element(doc, "h2", &[classes::SETTINGS_TITLE]);
    doc.append_child(overlay, title);
    let close = labelled(doc, "button", &[classes::OVERLAY_CLOSE], "\u{00D7}");
    doc.append_child(overlay, close);
    let content = element(doc, "div", &[classes::OVERLAY_CONTENT]);
    build_inputs(doc, content, label, &template.settings);
    doc.append_child(overlay, content);
    doc.append_child(object, overlay);

    object
}

fn build_inputs(doc: &mut Document, parent: NodeId, scope: &str, inputs: &[InputSpec]) {
    for input in inputs {
        let node = build_input(doc, scope, input);
        doc.append_child(parent, node);
    }
}

fn build_input(doc: &mut Document, scope: &str, spec: &InputSpec) -> NodeId {
    match spec {
        InputSpec::Text { name, label, default } => {
            let id = format!("{scope}-{name}");
            let wrapper = element(doc, "div", &[classes::INPUT]);
            let caption = labelled(doc, "label", &[], label);
            doc.set_attr(caption, attrs::DATA_FOR, id.as_str());
            doc.append_child(wrapper, caption);
            let input = form_input(doc, "text", name, &id);
            doc.set_value(input, default.as_str());
            doc.append_child(wrapper, input);
            wrapper
        }
        InputSpec::Checkbox {
            name,
            label,
            checked,
            params,
        } => {
            let id = format!("{scope}-{name}");
            let wrapper = element(doc, "div", &[classes::INPUT]);
            let input = form_input(doc, "checkbox", name, &id);
            doc.set_checked(input, *checked);
            doc.append_child(wrapper, input);
            let caption = labelled(doc, "label", &[], label);
            doc.set_attr(caption, attrs::DATA_FOR, id.as_str());
            doc.append_child(wrapper, caption);
            if !params.is_empty() {
                let section = params_section(doc, &id, params, *checked);
                doc.append_child(wrapper, section);
            }
            wrapper
        }
        InputSpec::Radio { name, legend, options } => {
            let fieldset = element(doc, "fieldset", &[]);
            doc.set_attr(fieldset, attrs::DATA_INPUT_TYPE, FieldsetKind::Radio.as_str());
            let caption = labelled(doc, "legend", &[], legend);
            doc.append_child(fieldset, caption);
            for (index, option) in options.iter().enumerate() {
                let id = format!("{scope}-{name}-{}", option.value);
                let active = index == 0;
                let wrapper = element(doc, "div", &[classes::INPUT]);
                let input = form_input(doc, "radio", name, &id);
                doc.set_value(input, option.value.as_str());
                if active {
                    doc.set_checked(input, true);
                    doc.set_attr(input, attrs::DATA_ACTIVE, "true");
                }
                doc.append_child(wrapper, input);
                let caption = labelled(doc, "label", &[], &option.label);
                doc.set_attr(caption, attrs::DATA_FOR, id.as_str());
                doc.append_child(wrapper, caption);
                if !option.params.is_empty() {
                    let section = params_section(doc, &id, &option.params, active);
                    doc.append_child(wrapper, section);
                }
                doc.append_child(fieldset, wrapper);
            }
            fieldset
        }
        InputSpec::Group { name, legend, inputs } => {
            let all_checkboxes = inputs.iter().all(|i| matches!(i, InputSpec::Checkbox { .. }));
            let fieldset = element(doc, "fieldset", &[]);
            if all_checkboxes {
                doc.set_attr(fieldset, attrs::DATA_INPUT_TYPE, FieldsetKind::Checkbox.as_str());
            }
            doc.set_attr(fieldset, attrs::DATA_NAME, name.as_str());
            let caption = labelled(doc, "legend", &[], legend);
            doc.append_child(fieldset, caption);
            build_inputs(doc, fieldset, &format!("{scope}-{name}"), inputs);
            fieldset
        }
    }
}

fn form_input(doc: &mut Document, kind: &str, name: &str, id: &str) -> NodeId {
    let input = element(doc, "input", &[]);
    doc.set_attr(input, attrs::TYPE, kind);
    doc.set_attr(input, attrs::DATA_NAME, name);
    doc.set_attr(input, attrs::DATA_ID, id);
    input
}

fn params_section(doc: &mut Document, scope: &str, params: &[InputSpec], visible: bool) -> NodeId {
    let section = element(doc, "div", &[classes::INPUT_PARAMS]);
    if !visible {
        doc.add_class(section, classes::HIDDEN);
    }
    build_inputs(doc, section, scope, params);
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;
    use crate::settings;

    #[test]
    fn test_page_skeleton_ids_resolve() {
        let mut doc = Document::new();
        let page = build_page(&mut doc, &TemplateSpec::default());

        assert_eq!(doc.element_by_id(ids::WORKSPACE), Some(page.workspace));
        assert_eq!(doc.element_by_id(ids::SIDEBAR), Some(page.sidebar));
        assert_eq!(doc.element_by_id(ids::TABLE_TYPE), Some(page.table_type));
        assert!(doc.has_class(page.field_type, classes::OBJECT_TYPE));
        assert!(doc.element_by_id(ids::TABLE_TEMPLATE).is_some());
        assert!(doc.element_by_id(ids::FIELD_TEMPLATE).is_some());
    }

    #[test]
    fn test_table_prototype_layout() {
        let mut doc = Document::new();
        build_page(&mut doc, &TemplateSpec::default());
        let template = doc.element_by_id(ids::TABLE_TEMPLATE).unwrap();
        let prototype = doc.first_child(template).unwrap();

        let children = doc.children(prototype).to_vec();
        assert_eq!(children.len(), 3);
        assert!(doc.has_class(children[0], classes::OBJECT_HEADER));
        assert!(doc.has_class(children[1], classes::TABLE_FIELDS));
        assert!(doc.has_class(children[2], classes::TABLE_SETTINGS));
        assert!(doc.has_class(children[2], classes::HIDDEN));
    }

    #[test]
    fn test_first_radio_option_starts_active() {
        let mut doc = Document::new();
        build_page(&mut doc, &TemplateSpec::default());
        let template = doc.element_by_id(ids::FIELD_TEMPLATE).unwrap();

        let radios = doc.query_all(template, &Selector::input_type("radio"));
        let integer = radios
            .iter()
            .copied()
            .find(|r| doc.value(*r) == "integer")
            .unwrap();
        let decimal = radios
            .iter()
            .copied()
            .find(|r| doc.value(*r) == "decimal")
            .unwrap();
        assert!(doc.is_checked(integer));
        assert_eq!(doc.attr(integer, attrs::DATA_ACTIVE), Some("true"));
        assert!(!doc.has_class(settings::params_of(&doc, integer).unwrap(), classes::HIDDEN));
        assert!(!doc.is_checked(decimal));
        assert!(doc.has_class(settings::params_of(&doc, decimal).unwrap(), classes::HIDDEN));
    }

    #[test]
    fn test_data_ids_unique_within_template() {
        let mut doc = Document::new();
        build_page(&mut doc, &TemplateSpec::default());
        let template = doc.element_by_id(ids::FIELD_TEMPLATE).unwrap();

        let mut seen = std::collections::HashSet::new();
        for node in doc.query_all(template, &Selector::has_attr(attrs::DATA_ID)) {
            assert!(seen.insert(doc.attr(node, attrs::DATA_ID).unwrap().to_string()));
        }
        assert!(seen.contains("field-type-integer-size-big"));
    }

    #[test]
    fn test_spec_parses_from_toml() {
        let toml_str = r#"
[[table.settings]]
kind = "text"
name = "records"
default = "10"

[[field.settings]]
kind = "radio"
name = "type"

[[field.settings.options]]
value = "text"

[[field.settings.options.params]]
kind = "text"
name = "max-length"
default = "64"

[[field.settings.options]]
value = "integer"
"#;
        let spec: TemplateSpec = toml::from_str(toml_str).unwrap();
        assert_eq!(spec.table.settings, vec![text("records", "", "10")]);
        match &spec.field.settings[0] {
            InputSpec::Radio { name, options, .. } => {
                assert_eq!(name, "type");
                assert_eq!(options.len(), 2);
                assert_eq!(options[0].params, vec![text("max-length", "", "64")]);
            }
            other => panic!("expected radio, got {other:?}"),
        }
    }

    #[test]
    fn test_default_spec_survives_toml() {
        let spec = TemplateSpec::default();
        let rendered = spec.to_toml().unwrap();
        let parsed: TemplateSpec = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, spec);
    }
}
