//! egui front-end for the editor

mod app;
mod constants;
mod form;

use anyhow::{Result, anyhow};
use eframe::egui;

use crate::config::EditorConfig;
use crate::dom::NodeId;
use crate::templates::TemplateSpec;

use app::EditorApp;
use constants::*;

/// Document change requested by a widget, applied once the frame is drawn
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Click(NodeId),
    SetValue(NodeId, String),
    BeginDrag(NodeId),
}

/// Open the editor window and block until it is closed
pub fn run_gui(config: &EditorConfig, spec: &TemplateSpec) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width as f32, config.window_height as f32])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    let spec = spec.clone();
    let pretty_json = config.pretty_json;
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(EditorApp::new(cc, &spec, pretty_json)))),
    )
    .map_err(|err| anyhow!("Failed to launch editor window: {err}"))
}
