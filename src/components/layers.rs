use eframe::egui;
use spritefe::editor::Editor;
use spritefe::layers::LayerId;

/// State for inline rename
#[derive(Default)]
pub struct RenameState {
    pub renaming_layer: Option<LayerId>,
    pub rename_text: String,
    pub focus_requested: bool,
}

/// Collected during the row pass, applied afterwards so the list is not
/// mutated while it is being drawn.
enum LayerAction {
    Select(LayerId),
    ToggleVisible(LayerId),
    StartRename(LayerId, String),
    CommitRename,
    Delete(LayerId),
    Add,
}

#[derive(Default)]
pub struct LayersPanel {
    rename: RenameState,
}

impl LayersPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, editor: &mut Editor) {
        ui.heading("Layers");
        let mut actions: Vec<LayerAction> = Vec::new();

        for layer in editor.layers().iter() {
            ui.horizontal(|ui| {
                let mut visible = layer.visible;
                if ui.checkbox(&mut visible, "").on_hover_text("Visible").changed() {
                    actions.push(LayerAction::ToggleVisible(layer.id));
                }

                if self.rename.renaming_layer == Some(layer.id) {
                    let response = ui.text_edit_singleline(&mut self.rename.rename_text);
                    if self.rename.focus_requested {
                        response.request_focus();
                        self.rename.focus_requested = false;
                    }
                    if response.lost_focus() {
                        actions.push(LayerAction::CommitRename);
                    }
                } else {
                    let response = ui.selectable_label(layer.active, layer.name.as_str());
                    if response.double_clicked() {
                        actions.push(LayerAction::StartRename(layer.id, layer.name.clone()));
                    } else if response.clicked() {
                        actions.push(LayerAction::Select(layer.id));
                    }
                }

                if editor.layers().len() > 1 && ui.small_button("🗑").on_hover_text("Delete layer").clicked() {
                    actions.push(LayerAction::Delete(layer.id));
                }
            });
        }

        if ui.button("+ Add layer").clicked() {
            actions.push(LayerAction::Add);
        }

        for action in actions {
            self.apply(action, editor);
        }
    }

    fn apply(&mut self, action: LayerAction, editor: &mut Editor) {
        match action {
            LayerAction::Select(id) => {
                editor.select_layer(id);
            }
            LayerAction::ToggleVisible(id) => {
                editor.toggle_layer_visibility(id);
            }
            LayerAction::StartRename(id, name) => {
                self.rename.renaming_layer = Some(id);
                self.rename.rename_text = name;
                self.rename.focus_requested = true;
            }
            LayerAction::CommitRename => {
                if let Some(id) = self.rename.renaming_layer.take() {
                    editor.rename_layer(id, &self.rename.rename_text);
                }
                self.rename.rename_text.clear();
            }
            LayerAction::Delete(id) => {
                if self.rename.renaming_layer == Some(id) {
                    self.rename.renaming_layer = None;
                }
                if editor.remove_layer(id) {
                    spritefe::log_info!("Layer {} deleted", id);
                }
            }
            LayerAction::Add => {
                let id = editor.add_layer(None);
                spritefe::log_info!("Layer {} added", id);
            }
        }
    }
}
