use eframe::egui;
use egui::{Color32, Vec2};
use spritefe::color::ColorPicker;

// ============================================================================
// ColorsPanel — HSV / alpha sliders, swatch and hex entry
// ============================================================================

const HUE_STEP: f64 = 15.0;

pub struct ColorsPanel {
    /// Text being edited in the hex field (committed on Enter / focus loss)
    hex_text: String,
    hex_focused: bool,
}

impl Default for ColorsPanel {
    fn default() -> Self {
        Self {
            hex_text: String::from("#000000"),
            hex_focused: false,
        }
    }
}

impl ColorsPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, picker: &mut ColorPicker) {
        ui.heading("Color");
        self.draw_swatch(ui, picker);
        self.draw_hsv_sliders(ui, picker);
        self.draw_hex_row(ui, picker);
    }

    fn draw_swatch(&self, ui: &mut egui::Ui, picker: &ColorPicker) {
        let rgba = picker.rgba();
        let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), 28.0), egui::Sense::hover());
        let painter = ui.painter();
        // Half the swatch over a dark backing so alpha is visible
        let mid = rect.center().x;
        let left = egui::Rect::from_min_max(rect.min, egui::pos2(mid, rect.max.y));
        let right = egui::Rect::from_min_max(egui::pos2(mid, rect.min.y), rect.max);
        painter.rect_filled(left, 3.0, Color32::WHITE);
        painter.rect_filled(right, 3.0, Color32::from_gray(40));
        painter.rect_filled(
            rect,
            3.0,
            Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3]),
        );
    }

    fn draw_hsv_sliders(&mut self, ui: &mut egui::Ui, picker: &mut ColorPicker) {
        let hsv = picker.hsv();
        let (mut h, mut s, mut v) = (hsv.h, hsv.s, hsv.v);
        let mut alpha = picker.alpha();

        let mut changed = false;
        changed |= ui.add(egui::Slider::new(&mut h, 0.0..=360.0).text("H").suffix("°")).changed();
        changed |= ui.add(egui::Slider::new(&mut s, 0.0..=100.0).text("S").suffix("%")).changed();
        changed |= ui.add(egui::Slider::new(&mut v, 0.0..=100.0).text("V").suffix("%")).changed();
        if changed {
            picker.set_hsv(h, s, v);
        }

        ui.horizontal(|ui| {
            ui.label("Hue shift");
            if ui.small_button("−15°").clicked() {
                picker.rotate_hue(-HUE_STEP);
            }
            if ui.small_button("+15°").clicked() {
                picker.rotate_hue(HUE_STEP);
            }
        });

        if ui.add(egui::Slider::new(&mut alpha, 0.0..=1.0).text("A")).changed() {
            picker.set_alpha(alpha);
        }
    }

    fn draw_hex_row(&mut self, ui: &mut egui::Ui, picker: &mut ColorPicker) {
        // Follow the picker unless the user is typing
        if !self.hex_focused {
            self.hex_text = picker.hex().to_string();
        }

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Hex").monospace().strong());
            let response = ui.add_sized(
                [80.0, 18.0],
                egui::TextEdit::singleline(&mut self.hex_text).font(egui::TextStyle::Monospace),
            );
            self.hex_focused = response.has_focus();

            if response.lost_focus() {
                // Invalid text is dropped without touching the colour
                if !picker.set_hex_text(&self.hex_text) {
                    self.hex_text = picker.hex().to_string();
                }
            }

            if ui.small_button("Copy").clicked() {
                ui.output_mut(|o| o.copied_text = picker.hex().to_string());
            }
        });
    }
}
