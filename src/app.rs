use eframe::egui;
use egui::{Color32, Pos2, Rect, TextureHandle, TextureOptions, Vec2};

use spritefe::compositor::{ImageSurface, RenderStyle, Subdivision};
use spritefe::editor::{CANVAS_SIZE_PRESETS, Editor};
use spritefe::io::{self, ExportFormat};
use spritefe::raster::SURFACE_SIZE;
use spritefe::settings::EditorSettings;
use spritefe::{log_err, log_info};

use crate::components::colors::ColorsPanel;
use crate::components::layers::LayersPanel;
use crate::components::tools::ToolsPanel;

pub struct SpriteFEApp {
    editor: Editor,
    settings: EditorSettings,
    style: RenderStyle,

    /// Off-screen render target mirrored into `texture`
    surface: ImageSurface,
    texture: Option<TextureHandle>,
    /// Editor revision the texture was last built from
    rendered_revision: Option<u64>,

    tools_panel: ToolsPanel,
    colors_panel: ColorsPanel,
    layers_panel: LayersPanel,

    /// Modal message (export errors, unavailable features)
    notice: Option<String>,
}

impl SpriteFEApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = EditorSettings::load();
        let editor = Editor::from_settings(&settings);
        let style = settings.render_style();
        log_info!(
            "Editor ready: {}x{} canvas, brush {}",
            editor.canvas_size(),
            editor.canvas_size(),
            editor.brush_size()
        );

        Self {
            editor,
            settings,
            style,
            surface: ImageSurface::new(SURFACE_SIZE, SURFACE_SIZE),
            texture: None,
            rendered_revision: None,
            tools_panel: ToolsPanel,
            colors_panel: ColorsPanel::default(),
            layers_panel: LayersPanel::default(),
            notice: None,
        }
    }

    // -- Menus -------------------------------------------------------------

    fn show_menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Export PNG…").clicked() {
                    ui.close_menu();
                    self.export(ExportFormat::Png);
                }
                if ui.button("Export sprite PNG (1 px per cell)…").clicked() {
                    ui.close_menu();
                    self.export(ExportFormat::SpritePng);
                }
                if ui.button("Export JSON…").clicked() {
                    ui.close_menu();
                    self.export(ExportFormat::Json);
                }
            });

            ui.menu_button("View", |ui| {
                let mut show_grid = self.editor.grid().base;
                if ui.checkbox(&mut show_grid, "Pixel grid").changed() {
                    self.editor.set_show_grid(show_grid);
                    self.settings.show_grid = show_grid;
                    self.settings.save();
                }
                ui.separator();
                ui.label("Subdivisions");
                for &level in Subdivision::all() {
                    let selected = self.editor.grid().subdivision == Some(level);
                    if ui.selectable_label(selected, level.label()).clicked() {
                        self.editor.toggle_subdivision(level);
                        self.settings.subdivision = self.editor.grid().subdivision;
                        self.settings.save();
                    }
                }
            });

            ui.separator();
            self.show_canvas_size_picker(ui);
        });
    }

    fn show_canvas_size_picker(&mut self, ui: &mut egui::Ui) {
        let current = self.editor.canvas_size();
        let mut chosen = current;
        egui::ComboBox::from_label("Canvas")
            .selected_text(format!("{0}×{0}", current))
            .show_ui(ui, |ui| {
                for &size in CANVAS_SIZE_PRESETS {
                    ui.selectable_value(&mut chosen, size, format!("{0}×{0}", size));
                }
            });

        if chosen != current {
            match self.editor.resize(chosen) {
                Ok(()) => {
                    self.settings.canvas_size = chosen;
                    self.settings.save();
                }
                Err(e) => self.notice = Some(e.to_string()),
            }
        }
    }

    // -- Export ------------------------------------------------------------

    fn export(&mut self, format: ExportFormat) {
        if let Err(e) = io::ensure_available(format) {
            log_info!("Export skipped: {}", e);
            self.notice = Some(e.to_string());
            return;
        }
        let Some(path) = io::pick_export_path(self.editor.canvas_size()) else {
            return;
        };
        if let Err(e) = self.editor.export_to(format, &self.style, &path) {
            log_err!("Export to {} failed: {}", path.display(), e);
            self.notice = Some(format!("Could not write {}: {}", path.display(), e));
        }
    }

    // -- Canvas ------------------------------------------------------------

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let side = SURFACE_SIZE as f32;
        let (rect, _response) = ui.allocate_exact_size(Vec2::splat(side), egui::Sense::click_and_drag());

        self.handle_pointer(ui, rect);
        self.refresh_texture(ui.ctx());

        ui.painter().rect_filled(rect, 0.0, Color32::from_gray(60));
        if let Some(tex) = &self.texture {
            ui.painter().image(
                tex.id(),
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }

    /// Translate raw pointer state into editor session events.
    fn handle_pointer(&mut self, ui: &egui::Ui, rect: Rect) {
        let (pressed, down, released, pos, shift) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.hover_pos(),
                i.modifiers.shift,
            )
        });
        self.editor.set_erase_modifier(shift);

        match pos.filter(|p| rect.contains(*p)) {
            Some(p) => {
                let local = p - rect.min;
                if pressed {
                    self.editor.pointer_down(local.x, local.y);
                } else if down && self.editor.is_drawing() {
                    self.editor.pointer_move(local.x, local.y);
                }
            }
            None => {
                if self.editor.is_drawing() {
                    self.editor.pointer_leave();
                }
            }
        }

        if released {
            self.editor.pointer_up();
        }
    }

    /// Re-render only when the editor reports a change.
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let revision = self.editor.revision();
        if self.texture.is_some() && self.rendered_revision == Some(revision) {
            return;
        }

        self.editor.render(&mut self.surface, &self.style);
        let img = self.surface.image();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [img.width() as usize, img.height() as usize],
            img.as_raw(),
        );

        match &mut self.texture {
            Some(tex) => tex.set(color_image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("sprite-canvas", color_image, TextureOptions::NEAREST));
            }
        }
        self.rendered_revision = Some(revision);
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.clone() else { return };
        let mut open = true;
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.notice = None;
                }
            });
        if !open {
            self.notice = None;
        }
    }
}

impl eframe::App for SpriteFEApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tools_panel.handle_shortcuts(ctx, &mut self.editor);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.show_menu_bar(ui);
        });

        egui::SidePanel::left("side_panel")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if self.tools_panel.show(ui, &mut self.editor) {
                        self.settings.brush_size = self.editor.brush_size();
                        self.settings.save();
                    }
                    ui.separator();
                    self.colors_panel.show(ui, self.editor.picker_mut());
                    ui.separator();
                    self.layers_panel.show(ui, &mut self.editor);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                self.show_canvas(ui);
            });
        });

        self.show_notice(ctx);
    }
}
