//! GUI-specific constants for layout and zone colors

use egui;

pub const WINDOW_TITLE: &str = "Schema Sketch";

/// Editor window bounds
pub const WINDOW_MIN_WIDTH: f32 = 640.0;
pub const WINDOW_MIN_HEIGHT: f32 = 480.0;

/// Layout spacing
pub const PADDING: f32 = 12.0;
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

pub const SIDEBAR_WIDTH: f32 = 160.0;
pub const CHIP_WIDTH: f32 = 120.0;
pub const CHIP_HEIGHT: f32 = 32.0;

/// Table cards on the canvas
pub const TABLE_WIDTH: f32 = 240.0;
pub const TABLE_SPACING: f32 = 24.0;
pub const TABLE_ROW_SPACING: f32 = 260.0;
pub const TABLES_PER_ROW: usize = 3;
pub const HEADER_HEIGHT: f32 = 32.0;
pub const ROW_HEIGHT: f32 = 28.0;
pub const BUTTON_WIDTH: f32 = 26.0;
pub const GRIP_WIDTH: f32 = 16.0;
pub const CORNER_RADIUS: u8 = 4;

pub const SCHEMA_PANEL_HEIGHT: f32 = 220.0;
pub const INPUT_WIDTH: f32 = 140.0;

/// Fills
pub const CHIP_FILL: egui::Color32 = egui::Color32::from_rgb(60, 90, 140);
pub const TABLE_FILL: egui::Color32 = egui::Color32::from_rgb(45, 50, 60);
pub const FIELD_FILL: egui::Color32 = egui::Color32::from_rgb(70, 76, 90);
pub const OUTLINE: egui::Color32 = egui::Color32::from_rgb(110, 115, 130);
pub const TEXT: egui::Color32 = egui::Color32::from_rgb(230, 230, 230);

/// Dropzone feedback
pub const ZONE_CANDIDATE: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);
pub const ZONE_HOVER: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);

/// Schema status
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
