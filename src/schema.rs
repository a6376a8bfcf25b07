//! Schema serializer
//!
//! Walks the workspace and produces `table name -> {settings, fields}` with
//! `field name -> {settings}` nested inside. Settings are read from each
//! instance's overlay: every `data-name` input outside a parameter
//! sub-section contributes one entry, and the parameters of an active input
//! are nested under it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::schema::{CONTEXT_DELIMITER, ERROR_DELIMITER};
use crate::constants::{attrs, classes};
use crate::dom::{Document, NodeId};
use crate::objects::{FieldType, ObjectType, TableType};
use crate::settings::{self, FieldsetKind};

pub type Settings = BTreeMap<String, SettingValue>;
pub type Schema = BTreeMap<String, TableSchema>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Text(String),
    /// An active input together with its expanded parameters
    WithParams {
        #[serde(rename = "_value_")]
        value: Box<SettingValue>,
        #[serde(rename = "_params_")]
        params: Settings,
    },
    /// Inputs of a named fieldset
    Group(Settings),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(rename = "_settings_")]
    pub settings: Settings,
    #[serde(rename = "_fields_")]
    pub fields: BTreeMap<String, FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "_settings_")]
    pub settings: Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("invalid table object: should have exactly one non-empty name")]
    InvalidTable,
    #[error("invalid field object: should have exactly one non-empty name")]
    InvalidField,
    #[error("table already exists")]
    DuplicateTable,
    #[error("field already exists")]
    DuplicateField,
}

/// Structural error with the breadcrumb of the object being built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}{}", .context.join(CONTEXT_DELIMITER), ERROR_DELIMITER, .kind)]
pub struct BuildError {
    pub context: Vec<String>,
    pub kind: StructuralError,
}

fn fail(context: &[String], kind: StructuralError) -> BuildError {
    BuildError {
        context: context.to_vec(),
        kind,
    }
}

/// Breadcrumb frame for an object; unnamed objects use their position
fn frame(label: &str, name: Option<&str>, index: usize) -> String {
    match name {
        Some(name) => format!("{label}({name})"),
        None => format!("{label}(#{})", index + 1),
    }
}

/// The single non-blank name of an instance, verbatim
fn resolve_name<'d>(doc: &'d Document, kind: &impl ObjectType, instance: NodeId) -> Option<&'d str> {
    match kind.name_inputs(doc, instance).as_slice() {
        [input] => {
            let name = doc.value(*input);
            (!name.trim().is_empty()).then_some(name)
        }
        _ => None,
    }
}

/// Serialize every table in `workspace`
pub fn build(doc: &Document, workspace: NodeId) -> Result<Schema, BuildError> {
    let mut context = vec!["workspace".to_string()];
    let mut tables = Schema::new();

    for (index, table) in TableType.instances(doc, workspace).into_iter().enumerate() {
        let name = resolve_name(doc, &TableType, table);
        context.push(frame("table", name, index));
        let Some(name) = name else {
            return Err(fail(&context, StructuralError::InvalidTable));
        };
        if tables.contains_key(name) {
            return Err(fail(&context, StructuralError::DuplicateTable));
        }

        let schema = build_table(doc, &mut context, table)?;
        tables.insert(name.to_string(), schema);
        context.pop();
    }

    Ok(tables)
}

fn build_table(
    doc: &Document,
    context: &mut Vec<String>,
    table: NodeId,
) -> Result<TableSchema, BuildError> {
    let mut fields = BTreeMap::new();

    for (index, field) in TableType.fields(doc, table).into_iter().enumerate() {
        let name = resolve_name(doc, &FieldType, field);
        context.push(frame("field", name, index));
        let Some(name) = name else {
            return Err(fail(context, StructuralError::InvalidField));
        };
        if fields.contains_key(name) {
            return Err(fail(context, StructuralError::DuplicateField));
        }

        fields.insert(
            name.to_string(),
            FieldSchema {
                settings: settings_of(doc, &FieldType, field),
            },
        );
        context.pop();
    }

    Ok(TableSchema {
        settings: settings_of(doc, &TableType, table),
        fields,
    })
}

/// Settings of one instance, read from its overlay content
pub fn settings_of(doc: &Document, kind: &impl ObjectType, instance: NodeId) -> Settings {
    let mut out = Settings::new();
    if let Some(content) = kind
        .settings_overlay(doc, instance)
        .and_then(|overlay| doc.first_by_class(overlay, classes::OVERLAY_CONTENT))
    {
        collect(doc, content, &mut out);
    }
    out
}

fn collect(doc: &Document, parent: NodeId, out: &mut Settings) {
    for &child in doc.children(parent) {
        if doc.has_class(child, classes::INPUT_PARAMS) {
            continue;
        }
        let data_name = doc.attr(child, attrs::DATA_NAME);

        if doc.tag(child).eq_ignore_ascii_case("input") {
            if let Some(name) = data_name
                && let Some(value) = input_value(doc, child)
            {
                out.insert(name.to_string(), value);
            }
        } else if settings::is_fieldset(doc, child, None)
            && !settings::is_fieldset(doc, child, Some(FieldsetKind::Radio))
            && let Some(name) = data_name
        {
            let mut group = Settings::new();
            collect(doc, child, &mut group);
            out.insert(name.to_string(), SettingValue::Group(group));
        } else {
            collect(doc, child, out);
        }
    }
}

/// Value of one input; `None` for radios that are not selected
fn input_value(doc: &Document, input: NodeId) -> Option<SettingValue> {
    let (value, active) = match doc.input_type(input) {
        Some("radio") => {
            if !doc.is_checked(input) {
                return None;
            }
            (SettingValue::Text(doc.value(input).to_string()), true)
        }
        Some("checkbox") => {
            let checked = doc.is_checked(input);
            (SettingValue::Flag(checked), checked)
        }
        _ => (SettingValue::Text(doc.value(input).to_string()), false),
    };

    let mut params = Settings::new();
    if active && let Some(section) = settings::params_of(doc, input) {
        collect(doc, section, &mut params);
    }
    if params.is_empty() {
        Some(value)
    } else {
        Some(SettingValue::WithParams {
            value: Box::new(value),
            params,
        })
    }
}

/// Render a schema as JSON
pub fn to_json(schema: &Schema, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(schema)
    } else {
        serde_json::to_string(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::names;
    use crate::dom::Selector;
    use crate::objects::test_support::{input_by_data_name, page};
    use crate::templates::Page;

    fn table(doc: &mut Document, page: &Page, name: &str) -> NodeId {
        let table = TableType.create(doc, page.workspace).unwrap();
        let input = input_by_data_name(doc, table, names::TABLE_NAME);
        doc.set_value(input, name);
        table
    }

    fn field(doc: &mut Document, table: NodeId, name: &str) -> NodeId {
        let field = FieldType.create(doc, table).unwrap();
        let input = input_by_data_name(doc, field, names::FIELD_NAME);
        doc.set_value(input, name);
        field
    }

    fn text(value: &str) -> SettingValue {
        SettingValue::Text(value.to_string())
    }

    #[test]
    fn test_empty_workspace_builds_empty_schema() {
        let (doc, page) = page();
        assert_eq!(build(&doc, page.workspace), Ok(Schema::new()));
    }

    #[test]
    fn test_unique_tables_and_fields_build() {
        let (mut doc, page) = page();
        let users = table(&mut doc, &page, "Users");
        field(&mut doc, users, "id");
        field(&mut doc, users, "email");
        let orders = table(&mut doc, &page, "Orders");
        field(&mut doc, orders, "id");

        let schema = build(&doc, page.workspace).unwrap();
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["Orders", "Users"]);
        assert_eq!(
            schema["Users"].fields.keys().collect::<Vec<_>>(),
            vec!["email", "id"]
        );
        assert_eq!(schema["Orders"].fields.len(), 1);
    }

    #[test]
    fn test_duplicate_table_names_fail() {
        let (mut doc, page) = page();
        table(&mut doc, &page, "Users");
        table(&mut doc, &page, "Users");

        let err = build(&doc, page.workspace).unwrap_err();
        assert_eq!(err.kind, StructuralError::DuplicateTable);
        assert_eq!(err.to_string(), "workspace > table(Users): table already exists");
    }

    #[test]
    fn test_duplicate_field_breadcrumb() {
        let (mut doc, page) = page();
        let users = table(&mut doc, &page, "Users");
        field(&mut doc, users, "id");
        field(&mut doc, users, "id");

        let err = build(&doc, page.workspace).unwrap_err();
        assert_eq!(
            err.to_string(),
            "workspace > table(Users) > field(id): field already exists"
        );
    }

    #[test]
    fn test_same_field_name_in_different_tables_is_fine() {
        let (mut doc, page) = page();
        let users = table(&mut doc, &page, "Users");
        field(&mut doc, users, "id");
        let orders = table(&mut doc, &page, "Orders");
        field(&mut doc, orders, "id");

        assert!(build(&doc, page.workspace).is_ok());
    }

    #[test]
    fn test_blank_names_are_invalid() {
        let (mut doc, page) = page();
        table(&mut doc, &page, "Users");
        table(&mut doc, &page, "   ");

        let err = build(&doc, page.workspace).unwrap_err();
        assert_eq!(err.kind, StructuralError::InvalidTable);
        assert_eq!(err.context, vec!["workspace", "table(#2)"]);

        let (mut doc, page) = crate::objects::test_support::page();
        let users = table(&mut doc, &page, "Users");
        FieldType.create(&mut doc, users).unwrap();
        let err = build(&doc, page.workspace).unwrap_err();
        assert_eq!(err.kind, StructuralError::InvalidField);
        assert_eq!(
            err.to_string(),
            "workspace > table(Users) > field(#1): invalid field object: should have exactly one non-empty name"
        );
    }

    #[test]
    fn test_default_table_settings_shape() {
        let (mut doc, page) = page();
        table(&mut doc, &page, "Users");

        let schema = build(&doc, page.workspace).unwrap();
        let settings = &schema["Users"].settings;
        assert_eq!(settings["records"], text("0"));
        assert_eq!(settings["engine"], text("default"));
        assert_eq!(settings["comment"], text(""));
        assert_eq!(settings.len(), 3);
    }

    #[test]
    fn test_default_field_settings_shape() {
        let (mut doc, page) = page();
        let users = table(&mut doc, &page, "Users");
        field(&mut doc, users, "id");

        let schema = build(&doc, page.workspace).unwrap();
        let settings = &schema["Users"].fields["id"].settings;

        let expected_type = SettingValue::WithParams {
            value: Box::new(text("integer")),
            params: Settings::from([
                ("size".to_string(), text("int")),
                ("unsigned".to_string(), SettingValue::Flag(false)),
            ]),
        };
        assert_eq!(settings["type"], expected_type);
        assert_eq!(
            settings["constraints"],
            SettingValue::Group(Settings::from([
                ("nullable".to_string(), SettingValue::Flag(false)),
                ("primary-key".to_string(), SettingValue::Flag(false)),
                ("unique".to_string(), SettingValue::Flag(false)),
            ]))
        );
        assert_eq!(settings["default"], SettingValue::Flag(false));
    }

    #[test]
    fn test_checked_checkbox_includes_params() {
        let (mut doc, page) = page();
        let users = table(&mut doc, &page, "Users");
        let id = field(&mut doc, users, "id");
        let checkbox = input_by_data_name(&doc, id, "default");
        doc.set_checked(checkbox, true);
        let value = input_by_data_name(&doc, id, "default-value");
        doc.set_value(value, "42");

        let settings = settings_of(&doc, &FieldType, id);
        assert_eq!(
            settings["default"],
            SettingValue::WithParams {
                value: Box::new(SettingValue::Flag(true)),
                params: Settings::from([("default-value".to_string(), text("42"))]),
            }
        );
    }

    #[test]
    fn test_selected_radio_follows_checked_state() {
        let (mut doc, page) = page();
        let users = table(&mut doc, &page, "Users");
        let id = field(&mut doc, users, "id");
        for radio in doc.query_all(id, &Selector::input_type("radio")) {
            if doc.attr(radio, attrs::DATA_NAME) == Some("type") {
                let value = doc.value(radio).to_string();
                doc.set_checked(radio, value == "boolean");
            }
        }

        let settings = settings_of(&doc, &FieldType, id);
        assert_eq!(settings["type"], text("boolean"));
    }

    #[test]
    fn test_json_layout_uses_reserved_keys() {
        let (mut doc, page) = page();
        let users = table(&mut doc, &page, "Users");
        field(&mut doc, users, "id");

        let schema = build(&doc, page.workspace).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&schema, false).unwrap()).unwrap();
        assert_eq!(json["Users"]["_settings_"]["records"], "0");
        assert_eq!(
            json["Users"]["_fields_"]["id"]["_settings_"]["type"]["_value_"],
            "integer"
        );
        assert_eq!(
            json["Users"]["_fields_"]["id"]["_settings_"]["type"]["_params_"]["unsigned"],
            false
        );
    }
}
