use eframe::egui;
use spritefe::editor::{Editor, MAX_BRUSH_SIZE, Tool};

/// Tool selector, brush size and layer clearing.
#[derive(Default)]
pub struct ToolsPanel;

impl ToolsPanel {
    /// Returns `true` when the brush size changed (so settings can be saved).
    pub fn show(&mut self, ui: &mut egui::Ui, editor: &mut Editor) -> bool {
        ui.heading("Tools");

        ui.horizontal(|ui| {
            for &tool in Tool::all() {
                let label = format!("{} ({})", tool.label(), shortcut_label(tool));
                if ui.selectable_label(editor.tool() == tool, label).clicked() {
                    editor.set_tool(tool);
                }
            }
        });

        ui.weak("Hold Shift to erase with Pencil or Fill");

        let mut brush = editor.brush_size();
        let brush_changed = ui
            .add(egui::Slider::new(&mut brush, 1..=MAX_BRUSH_SIZE).text("Brush"))
            .changed();
        if brush_changed {
            editor.set_brush_size(brush);
        }

        if ui.button("Clear layer").clicked() {
            let removed = editor.clear_active_layer();
            spritefe::log_info!("Cleared {} cells from the active layer", removed);
        }

        brush_changed
    }

    /// Single-key tool shortcuts. Ignored while a text field has focus.
    pub fn handle_shortcuts(&mut self, ctx: &egui::Context, editor: &mut Editor) {
        if ctx.wants_keyboard_input() {
            return;
        }
        for &tool in Tool::all() {
            if ctx.input(|i| i.key_pressed(shortcut_key(tool))) {
                editor.set_tool(tool);
            }
        }
    }
}

fn shortcut_key(tool: Tool) -> egui::Key {
    match tool {
        Tool::Pencil => egui::Key::P,
        Tool::Eraser => egui::Key::E,
        Tool::Fill => egui::Key::F,
    }
}

fn shortcut_label(tool: Tool) -> &'static str {
    match tool {
        Tool::Pencil => "P",
        Tool::Eraser => "E",
        Tool::Fill => "F",
    }
}
