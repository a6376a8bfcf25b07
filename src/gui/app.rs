//! Editor window: object palette, canvas, settings windows and schema preview

use eframe::{CreationContext, egui};
use egui::{
    Align2, CornerRadius, FontId, Id, LayerId, Order, Painter, Pos2, RichText, Sense, Stroke,
    StrokeKind, TextEdit,
};
use tracing::{debug, info};

use crate::constants::classes;
use crate::dom::{Document, NodeId};
use crate::editor::Editor;
use crate::geometry::Rect;
use crate::interaction::draggable::offset;
use crate::interaction::dropzone::DropPurpose;
use crate::schema;
use crate::templates::TemplateSpec;

use super::Action;
use super::constants::*;
use super::form;

/// What one frame produced: widget actions, element layouts and hit areas
#[derive(Debug, Default)]
struct Scene {
    actions: Vec<Action>,
    layouts: Vec<(NodeId, egui::Rect)>,
    /// Painted areas in paint order, topmost last
    hits: Vec<(NodeId, egui::Rect)>,
}

impl Scene {
    /// Record an element drawn at `base` moved by its drag offset
    fn place(&mut self, node: NodeId, base: egui::Rect, drawn: egui::Rect) {
        self.layouts.push((node, base));
        self.hits.push((node, drawn));
    }
}

pub struct EditorApp {
    editor: Editor,
    pretty_json: bool,
}

impl EditorApp {
    pub fn new(_cc: &CreationContext<'_>, spec: &TemplateSpec, pretty_json: bool) -> Self {
        info!("Editor window ready");
        Self {
            editor: Editor::new(spec),
            pretty_json,
        }
    }

    fn render_sidebar(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        let doc = self.editor.document();
        let page = self.editor.page();
        let panel = ui.max_rect();
        scene.place(page.sidebar, panel, panel);

        ui.add_space(PADDING);
        ui.label(RichText::new("Objects").strong());
        ui.add_space(ITEM_SPACING);

        let dragged = self.editor.dragged();
        for chip in [page.table_type, page.field_type] {
            let (base, response) = ui.allocate_exact_size(egui::vec2(CHIP_WIDTH, CHIP_HEIGHT), Sense::drag());
            if response.drag_started() {
                scene.actions.push(Action::BeginDrag(chip));
            }
            let drawn = moved(doc, chip, base);
            scene.place(chip, base, drawn);

            let painter = if dragged == Some(chip) {
                ghost_painter(ui.ctx())
            } else {
                ui.painter().clone()
            };
            painter.rect_filled(drawn, CornerRadius::same(CORNER_RADIUS), CHIP_FILL);
            painter.text(drawn.center(), Align2::CENTER_CENTER, doc.text(chip), FontId::proportional(14.0), TEXT);
            ui.add_space(ITEM_SPACING);
        }

        ui.add_space(SECTION_SPACING);
        let hint = RichText::new("Drop objects here to delete them");
        if self.editor.drop_target() == Some(page.sidebar) {
            ui.label(RichText::new("Release to delete").color(ZONE_HOVER));
        } else if self.editor.is_drop_candidate(page.sidebar) {
            ui.label(hint.color(ZONE_CANDIDATE));
        } else {
            ui.label(hint.weak());
        }
        zone_feedback(ui.painter(), doc, page.sidebar, panel);
    }

    fn render_workspace(&self, ui: &mut egui::Ui, scene: &mut Scene) {
        let doc = self.editor.document();
        let page = self.editor.page();
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
        let canvas = response.rect;
        scene.place(page.workspace, canvas, canvas);

        let tables = self.editor.tables();
        if tables.is_empty() {
            painter.text(
                canvas.center(),
                Align2::CENTER_CENTER,
                "Drag a table here",
                FontId::proportional(16.0),
                OUTLINE,
            );
        }
        for (index, table) in tables.into_iter().enumerate() {
            self.render_table(ui, &painter, scene, canvas, index, table);
        }
        zone_feedback(&painter, doc, page.workspace, canvas);
    }

    fn render_table(
        &self,
        ui: &mut egui::Ui,
        painter: &Painter,
        scene: &mut Scene,
        canvas: egui::Rect,
        index: usize,
        table: NodeId,
    ) {
        let doc = self.editor.document();
        let fields = self.editor.fields_of(table);
        let height = HEADER_HEIGHT + fields.len() as f32 * ROW_HEIGHT + PADDING / 2.0;
        let base = egui::Rect::from_min_size(table_slot(canvas.min, index), egui::vec2(TABLE_WIDTH, height));
        let rect = moved(doc, table, base);
        scene.place(table, base, rect);

        let body = ui.interact(rect, Id::new(("table", table)), Sense::drag());
        if body.drag_started() {
            scene.actions.push(Action::BeginDrag(table));
        }
        painter.rect_filled(rect, CornerRadius::same(CORNER_RADIUS), TABLE_FILL);
        painter.rect_stroke(rect, CornerRadius::same(CORNER_RADIUS), Stroke::new(1.0, OUTLINE), StrokeKind::Inside);
        let header = egui::Rect::from_min_size(rect.min, egui::vec2(TABLE_WIDTH, HEADER_HEIGHT));
        self.render_header(ui, scene, table, header);

        let dragged = self.editor.dragged();
        for (row, field) in fields.into_iter().enumerate() {
            let row_base = egui::Rect::from_min_size(
                rect.min + egui::vec2(PADDING / 2.0, HEADER_HEIGHT + row as f32 * ROW_HEIGHT),
                egui::vec2(TABLE_WIDTH - PADDING, ROW_HEIGHT - 2.0),
            );
            let row_rect = moved(doc, field, row_base);
            scene.place(field, row_base, row_rect);

            let response = ui.interact(row_rect, Id::new(("field", field)), Sense::drag());
            if response.drag_started() {
                scene.actions.push(Action::BeginDrag(field));
            }
            let row_painter = if dragged == Some(field) {
                ghost_painter(ui.ctx())
            } else {
                painter.clone()
            };
            row_painter.rect_filled(row_rect, CornerRadius::same(CORNER_RADIUS), FIELD_FILL);
            self.render_header(ui, scene, field, row_rect);
        }

        zone_feedback(painter, doc, table, rect);
    }

    /// Name edit and settings button of a table or field
    fn render_header(&self, ui: &mut egui::Ui, scene: &mut Scene, instance: NodeId, rect: egui::Rect) {
        let doc = self.editor.document();
        let inner = rect.shrink(3.0);
        let (grip, inner) = inner.split_left_right_at_x(inner.left() + GRIP_WIDTH);
        let (name_rect, button_rect) = inner.split_left_right_at_x(inner.right() - BUTTON_WIDTH);
        ui.painter()
            .text(grip.center(), Align2::CENTER_CENTER, "\u{2630}", FontId::proportional(12.0), OUTLINE);

        if let Some(input) = self.editor.name_input(instance) {
            let mut name = doc.value(input).to_string();
            let hint = doc.attr(input, "placeholder").unwrap_or_default();
            let edit = TextEdit::singleline(&mut name)
                .id(Id::new(("name", input)))
                .hint_text(hint);
            if ui.put(name_rect.shrink2(egui::vec2(2.0, 0.0)), edit).changed() {
                scene.actions.push(Action::SetValue(input, name));
            }
        }

        if let Some(button) = self.editor.control(instance, classes::SETTINGS_BUTTON)
            && ui.put(button_rect, egui::Button::new(doc.text(button))).clicked()
        {
            scene.actions.push(Action::Click(button));
        }
    }

    fn render_overlays(&self, ctx: &egui::Context, scene: &mut Scene) {
        let doc = self.editor.document();
        for open in self.editor.open_overlays() {
            let title = doc
                .first_by_class(open.overlay, classes::SETTINGS_TITLE)
                .map(|heading| doc.text(heading))
                .unwrap_or_default();
            let mut shown = true;
            egui::Window::new(format!("{} settings: {title}", open.kind))
                .id(Id::new(("overlay", open.overlay)))
                .open(&mut shown)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    if let Some(content) = doc.first_by_class(open.overlay, classes::OVERLAY_CONTENT) {
                        form::render_children(ui, doc, content, &mut scene.actions);
                    }
                });

            if !shown && let Some(close) = self.editor.control(open.instance, classes::OVERLAY_CLOSE) {
                scene.actions.push(Action::Click(close));
            }
        }
    }

    fn render_schema(&self, ui: &mut egui::Ui) {
        ui.add_space(ITEM_SPACING);
        let json = self
            .editor
            .serialize()
            .map_err(|err| err.to_string())
            .and_then(|schema| schema::to_json(&schema, self.pretty_json).map_err(|err| err.to_string()));

        match json {
            Ok(json) => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Schema").strong());
                    if ui.button("Copy").clicked() {
                        ui.ctx().copy_text(json.clone());
                    }
                });
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.monospace(json);
                });
            }
            Err(err) => {
                ui.label(RichText::new("Schema").strong());
                ui.colored_label(STATUS_ERROR, err);
            }
        }
    }

    /// Apply the frame's layouts and widget actions, then advance any drag
    fn apply(&mut self, ctx: &egui::Context, scene: Scene) {
        let page = self.editor.page();
        let content = scene
            .layouts
            .iter()
            .filter(|(node, _)| *node == page.sidebar || *node == page.workspace)
            .map(|(_, rect)| *rect)
            .reduce(|a, b| a.union(b));
        if let Some(content) = content {
            self.editor.set_layout(page.content, to_layout(content));
        }
        for (node, rect) in &scene.layouts {
            self.editor.set_layout(*node, to_layout(*rect));
        }

        for action in scene.actions {
            match action {
                Action::Click(node) => self.editor.click(node),
                Action::SetValue(node, value) => self.editor.set_value(node, &value),
                Action::BeginDrag(node) => {
                    if let Some(dragged) = self.editor.begin_drag(node) {
                        debug!(element = ?dragged, "drag started from canvas");
                    }
                }
            }
        }

        if !self.editor.is_dragging() {
            return;
        }

        let (delta, pointer, released, escape) = ctx.input(|i| {
            (
                i.pointer.delta(),
                i.pointer.hover_pos(),
                i.pointer.any_released(),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if escape {
            self.editor.cancel_drag();
            return;
        }
        if delta != egui::Vec2::ZERO {
            self.editor.drag_by(delta.x, delta.y);
        }
        let over = pointer.and_then(|pos| topmost_hit(self.editor.document(), &scene.hits, pos, self.editor.dragged()));
        self.editor.drag_hover(over);
        if released {
            self.editor.end_drag();
        }
        ctx.request_repaint();
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut scene = Scene::default();

        egui::TopBottomPanel::bottom("schema")
            .resizable(true)
            .default_height(SCHEMA_PANEL_HEIGHT)
            .show(ctx, |ui| self.render_schema(ui));

        egui::SidePanel::left("sidebar")
            .exact_width(SIDEBAR_WIDTH)
            .show(ctx, |ui| self.render_sidebar(ui, &mut scene));

        egui::CentralPanel::default().show(ctx, |ui| self.render_workspace(ui, &mut scene));

        self.render_overlays(ctx, &mut scene);
        self.apply(ctx, scene);
    }
}

/// Top-left corner of the `index`th table card on a canvas starting at `origin`
fn table_slot(origin: Pos2, index: usize) -> Pos2 {
    let column = (index % TABLES_PER_ROW) as f32;
    let row = (index / TABLES_PER_ROW) as f32;
    Pos2::new(
        origin.x + PADDING + column * (TABLE_WIDTH + TABLE_SPACING),
        origin.y + PADDING + row * TABLE_ROW_SPACING,
    )
}

/// Topmost painted element under `pos`, skipping the dragged element's subtree
fn topmost_hit(
    doc: &Document,
    hits: &[(NodeId, egui::Rect)],
    pos: Pos2,
    dragged: Option<NodeId>,
) -> Option<NodeId> {
    hits.iter()
        .rev()
        .filter(|(node, _)| dragged.is_none_or(|dragged| !doc.is_inclusive_descendant(*node, dragged)))
        .find(|(_, rect)| rect.contains(pos))
        .map(|(node, _)| *node)
}

fn moved(doc: &Document, node: NodeId, base: egui::Rect) -> egui::Rect {
    let (dx, dy) = offset(doc, node);
    base.translate(egui::vec2(dx, dy))
}

fn to_layout(rect: egui::Rect) -> Rect {
    Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

fn ghost_painter(ctx: &egui::Context) -> Painter {
    ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("drag-ghost")))
}

/// Outline a dropzone that is a candidate for, or hovered by, the current drag
fn zone_feedback(painter: &Painter, doc: &Document, zone: NodeId, rect: egui::Rect) {
    let purposes = [DropPurpose::Create, DropPurpose::Delete, DropPurpose::Move];
    let color = if purposes.iter().any(|p| doc.has_class(zone, &p.hover_class())) {
        ZONE_HOVER
    } else if purposes.iter().any(|p| doc.has_class(zone, &p.candidate_class())) {
        ZONE_CANDIDATE
    } else {
        return;
    };
    painter.rect_stroke(rect, CornerRadius::same(CORNER_RADIUS), Stroke::new(2.0, color), StrokeKind::Inside);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_slots_wrap_into_rows() {
        let origin = Pos2::new(100.0, 50.0);
        assert_eq!(table_slot(origin, 0), Pos2::new(100.0 + PADDING, 50.0 + PADDING));

        let second = table_slot(origin, 1);
        assert_eq!(second.x, 100.0 + PADDING + TABLE_WIDTH + TABLE_SPACING);
        assert_eq!(second.y, 50.0 + PADDING);

        let wrapped = table_slot(origin, TABLES_PER_ROW);
        assert_eq!(wrapped.x, 100.0 + PADDING);
        assert_eq!(wrapped.y, 50.0 + PADDING + TABLE_ROW_SPACING);
    }

    #[test]
    fn test_topmost_hit_skips_dragged_subtree() {
        let mut doc = Document::new();
        let zone = doc.create_element("div");
        doc.append_child(doc.root(), zone);
        let card = doc.create_element("div");
        doc.append_child(zone, card);
        let row = doc.create_element("div");
        doc.append_child(card, row);

        let everywhere = egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 100.0));
        let hits = [(zone, everywhere), (card, everywhere), (row, everywhere)];
        let pos = Pos2::new(10.0, 10.0);

        assert_eq!(topmost_hit(&doc, &hits, pos, None), Some(row));
        assert_eq!(topmost_hit(&doc, &hits, pos, Some(row)), Some(card));
        assert_eq!(topmost_hit(&doc, &hits, pos, Some(card)), Some(zone));
        assert_eq!(topmost_hit(&doc, &hits, Pos2::new(500.0, 500.0), None), None);
    }

    #[test]
    fn test_layout_conversion_keeps_origin_and_size() {
        let rect = egui::Rect::from_min_size(Pos2::new(5.0, 7.0), egui::vec2(20.0, 30.0));
        assert_eq!(to_layout(rect), Rect::new(5.0, 7.0, 20.0, 30.0));
    }
}
