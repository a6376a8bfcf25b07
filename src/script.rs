//! Headless replay of editing scripts
//!
//! A script is a JSON array of steps. Each step is carried out the way a
//! user would do it: chips and objects are dragged onto dropzones, settings
//! are changed by opening the overlay and clicking or typing into its
//! inputs. Tables and fields are looked up by their current name.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail, ensure};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{attrs, classes};
use crate::dom::{NodeId, Selector};
use crate::editor::Editor;
use crate::settings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddTable {
        name: String,
    },
    AddField {
        table: String,
        name: String,
    },
    RenameTable {
        name: String,
        to: String,
    },
    RenameField {
        table: String,
        name: String,
        to: String,
    },
    MoveField {
        table: String,
        field: String,
        to: String,
    },
    MoveTable {
        name: String,
        dx: f32,
        dy: f32,
    },
    DeleteTable {
        name: String,
    },
    DeleteField {
        table: String,
        name: String,
    },
    /// `path` is a `/`-separated list of `data-name`s inside the overlay
    SetSetting {
        table: String,
        #[serde(default)]
        field: Option<String>,
        path: String,
        value: serde_json::Value,
    },
}

impl Step {
    fn op(&self) -> &'static str {
        match self {
            Step::AddTable { .. } => "add_table",
            Step::AddField { .. } => "add_field",
            Step::RenameTable { .. } => "rename_table",
            Step::RenameField { .. } => "rename_field",
            Step::MoveField { .. } => "move_field",
            Step::MoveTable { .. } => "move_table",
            Step::DeleteTable { .. } => "delete_table",
            Step::DeleteField { .. } => "delete_field",
            Step::SetSetting { .. } => "set_setting",
        }
    }
}

/// Load a script from a JSON file
pub fn load(path: &Path) -> Result<Vec<Step>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script from {:?}", path))?;
    let steps: Vec<Step> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse script {:?}", path))?;
    info!(path = %path.display(), steps = steps.len(), "loaded script");
    Ok(steps)
}

/// Apply every step in order, stopping at the first failure
pub fn replay(editor: &mut Editor, steps: &[Step]) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        debug!(step = index + 1, op = step.op(), "replaying");
        apply(editor, step)
            .with_context(|| format!("Step {} ({}) failed", index + 1, step.op()))?;
    }
    info!(steps = steps.len(), "replay finished");
    Ok(())
}

fn apply(editor: &mut Editor, step: &Step) -> Result<()> {
    let page = editor.page();
    match step {
        Step::AddTable { name } => {
            let before = editor.tables().len();
            editor.drag_onto(page.table_type, page.workspace);
            let tables = editor.tables();
            ensure!(tables.len() == before + 1, "table chip drop did not create a table");
            rename(editor, tables[before], name)
        }
        Step::AddField { table, name } => {
            let table = find_table(editor, table)?;
            let before = editor.fields_of(table).len();
            editor.drag_onto(page.field_type, table);
            let fields = editor.fields_of(table);
            ensure!(fields.len() == before + 1, "field chip drop did not create a field");
            rename(editor, fields[before], name)
        }
        Step::RenameTable { name, to } => {
            let table = find_table(editor, name)?;
            rename(editor, table, to)
        }
        Step::RenameField { table, name, to } => {
            let table = find_table(editor, table)?;
            let field = find_field(editor, table, name)?;
            rename(editor, field, to)
        }
        Step::MoveField { table, field, to } => {
            let source = find_table(editor, table)?;
            let field = find_field(editor, source, field)?;
            let target = find_table(editor, to)?;
            editor.drag_onto(field, target);
            ensure!(
                editor.fields_of(target).contains(&field),
                "field did not arrive in table {to:?}"
            );
            Ok(())
        }
        Step::MoveTable { name, dx, dy } => {
            let table = find_table(editor, name)?;
            ensure!(editor.begin_drag(table).is_some(), "table could not be dragged");
            editor.drag_by(*dx, *dy);
            editor.end_drag();
            Ok(())
        }
        Step::DeleteTable { name } => {
            let table = find_table(editor, name)?;
            editor.drag_onto(table, page.sidebar);
            ensure!(!editor.tables().contains(&table), "table was not deleted");
            Ok(())
        }
        Step::DeleteField { table, name } => {
            let table = find_table(editor, table)?;
            let field = find_field(editor, table, name)?;
            editor.drag_onto(field, page.sidebar);
            ensure!(!editor.fields_of(table).contains(&field), "field was not deleted");
            Ok(())
        }
        Step::SetSetting {
            table,
            field,
            path,
            value,
        } => {
            let table = find_table(editor, table)?;
            let instance = match field {
                Some(field) => find_field(editor, table, field)?,
                None => table,
            };
            set_setting(editor, instance, path, value)
        }
    }
}

fn find_table(editor: &Editor, name: &str) -> Result<NodeId> {
    editor
        .tables()
        .into_iter()
        .find(|table| editor.name_of(*table) == name)
        .ok_or_else(|| anyhow!("no table named {name:?}"))
}

fn find_field(editor: &Editor, table: NodeId, name: &str) -> Result<NodeId> {
    editor
        .fields_of(table)
        .into_iter()
        .find(|field| editor.name_of(*field) == name)
        .ok_or_else(|| anyhow!("no field named {name:?} in table {:?}", editor.name_of(table)))
}

fn rename(editor: &mut Editor, instance: NodeId, name: &str) -> Result<()> {
    let input = editor
        .name_input(instance)
        .ok_or_else(|| anyhow!("object has no name input"))?;
    editor.set_value(input, name);
    Ok(())
}

/// Open the overlay, change one input, and restore the overlay's state
fn set_setting(
    editor: &mut Editor,
    instance: NodeId,
    path: &str,
    value: &serde_json::Value,
) -> Result<()> {
    let was_open = editor.open_overlay_of(instance).is_some();
    if !was_open {
        let button = editor
            .control(instance, classes::SETTINGS_BUTTON)
            .ok_or_else(|| anyhow!("object has no settings button"))?;
        editor.click(button);
    }
    let overlay = editor
        .open_overlay_of(instance)
        .ok_or_else(|| anyhow!("settings overlay did not open"))?;

    let result = resolve_path(editor, overlay, path)
        .and_then(|candidates| set_input(editor, &candidates, value))
        .with_context(|| format!("Failed to set {path:?}"));

    if !was_open && let Some(close) = editor.control(instance, classes::OVERLAY_CLOSE) {
        editor.click(close);
    }
    result
}

/// Inputs named by the last path segment, scoped by the earlier ones
fn resolve_path(editor: &Editor, overlay: NodeId, path: &str) -> Result<Vec<NodeId>> {
    let doc = editor.document();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        bail!("empty setting path");
    };

    let mut scope = overlay;
    for segment in parents {
        let named = doc.query_all(scope, &Selector::attr_eq(attrs::DATA_NAME, segment));
        let owner = named
            .iter()
            .copied()
            .find(|n| doc.input_type(*n) != Some("radio") || doc.is_checked(*n))
            .ok_or_else(|| anyhow!("no active input named {segment:?}"))?;
        scope = if settings::is_fieldset(doc, owner, None) {
            owner
        } else {
            settings::params_of(doc, owner)
                .ok_or_else(|| anyhow!("input {segment:?} has no parameters"))?
        };
    }

    let candidates = doc.query_all(scope, &Selector::attr_eq(attrs::DATA_NAME, last));
    ensure!(!candidates.is_empty(), "no input named {last:?}");
    Ok(candidates)
}

fn set_input(editor: &mut Editor, candidates: &[NodeId], value: &serde_json::Value) -> Result<()> {
    let first = candidates[0];
    match editor.document().input_type(first) {
        Some("radio") => {
            let wanted = value
                .as_str()
                .ok_or_else(|| anyhow!("radio value must be a string, got {value}"))?;
            let radio = candidates
                .iter()
                .copied()
                .find(|r| editor.document().value(*r) == wanted)
                .ok_or_else(|| anyhow!("no option {wanted:?}"))?;
            editor.click(radio);
        }
        Some("checkbox") => {
            let wanted = value
                .as_bool()
                .ok_or_else(|| anyhow!("checkbox value must be a boolean, got {value}"))?;
            if editor.document().is_checked(first) != wanted {
                editor.click(first);
            }
        }
        Some(_) => {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                other => bail!("text value must be a string or number, got {other}"),
            };
            editor.set_value(first, &text);
        }
        None => bail!("{:?} is not an input", editor.document().tag(first)),
    }
    Ok(())
}
