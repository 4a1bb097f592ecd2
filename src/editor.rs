// ============================================================================
// EDITOR — the editing surface: tools, drawing session, layers, export
// ============================================================================

use std::path::Path;

use image::RgbaImage;

use crate::color::{ColorPicker, PixelColor};
use crate::compositor::{self, GridOverlay, ImageSurface, RenderStyle, Subdivision, Surface};
use crate::fill::{FillOutcome, flood_fill};
use crate::io::{self, ExportError, ExportFormat};
use crate::layers::{LayerId, LayerList};
use crate::raster::{SURFACE_SIZE, brush_cells, line_cells, surface_to_cell};
use crate::settings::EditorSettings;
use crate::store::{Cell, PixelStore};
use crate::{log_info, log_warn};

pub const DEFAULT_CANVAS_SIZE: u32 = 16;
pub const MAX_CANVAS_SIZE: u32 = 256;
pub const MAX_BRUSH_SIZE: u32 = 8;

/// Sizes offered by the canvas-size picker.
pub const CANVAS_SIZE_PRESETS: &[u32] = &[8, 16, 24, 32, 48, 64, 128];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Fill,
}

impl Tool {
    pub fn all() -> &'static [Tool] {
        &[Tool::Pencil, Tool::Eraser, Tool::Fill]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Eraser => "Eraser",
            Tool::Fill => "Fill",
        }
    }
}

/// Error type for editor operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    InvalidCanvasSize(u32),
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::InvalidCanvasSize(n) => write!(
                f,
                "Canvas size {} is outside 1..={}",
                n, MAX_CANVAS_SIZE
            ),
        }
    }
}

impl std::error::Error for EditorError {}

/// Owns the pixel store and everything that mutates it.
///
/// Pointer input arrives in surface-local pixels. A press starts a drawing
/// session at the cell under the pointer; each move while the session is open
/// paints the Bresenham line from the previous cell, so fast drags leave no
/// gaps; release or leaving the surface closes the session.
pub struct Editor {
    canvas_size: u32,
    store: PixelStore,
    layers: LayerList,
    tool: Tool,
    picker: ColorPicker,
    brush_size: u32,
    grid: GridOverlay,
    /// Last painted cell of the open drawing session
    last_cell: Option<Cell>,
    /// Shift held: pencil and fill paint transparent
    erase_modifier: bool,
    /// Bumped for changes the store generation does not see (layers, grid, resize)
    view_revision: u64,
}

impl Editor {
    pub fn new(canvas_size: u32) -> Result<Self, EditorError> {
        validate_canvas_size(canvas_size)?;
        Ok(Self::blank(canvas_size))
    }

    /// Build from persisted settings; out-of-range values fall back to defaults.
    pub fn from_settings(settings: &EditorSettings) -> Self {
        let mut editor = Self::new(settings.canvas_size).unwrap_or_else(|e| {
            log_warn!("{}; using {}", e, DEFAULT_CANVAS_SIZE);
            Self::blank(DEFAULT_CANVAS_SIZE)
        });
        editor.set_brush_size(settings.brush_size);
        editor.grid = settings.grid_overlay();
        editor
    }

    fn blank(canvas_size: u32) -> Self {
        Self {
            canvas_size,
            store: PixelStore::new(),
            layers: LayerList::new(),
            tool: Tool::default(),
            picker: ColorPicker::default(),
            brush_size: 1,
            grid: GridOverlay { base: true, subdivision: None },
            last_cell: None,
            erase_modifier: false,
            view_revision: 0,
        }
    }

    // -- Accessors ---------------------------------------------------------

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    pub fn store(&self) -> &PixelStore {
        &self.store
    }

    pub fn layers(&self) -> &LayerList {
        &self.layers
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn picker(&self) -> &ColorPicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut ColorPicker {
        &mut self.picker
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn grid(&self) -> GridOverlay {
        self.grid
    }

    pub fn is_drawing(&self) -> bool {
        self.last_cell.is_some()
    }

    /// Changes whenever a render would produce a different image.
    pub fn revision(&self) -> u64 {
        self.store.generation() + self.view_revision
    }

    pub fn color_at(&self, cell: Cell) -> PixelColor {
        self.store.get(cell)
    }

    // -- Tool state --------------------------------------------------------

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.last_cell = None;
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(1, MAX_BRUSH_SIZE);
    }

    /// Colour the current tool paints with.
    pub fn paint_color(&self) -> PixelColor {
        if self.erase_modifier {
            return PixelColor::Transparent;
        }
        match self.tool {
            Tool::Eraser => PixelColor::Transparent,
            Tool::Pencil | Tool::Fill => self.picker.color(),
        }
    }

    pub fn set_erase_modifier(&mut self, held: bool) {
        self.erase_modifier = held;
    }

    pub fn set_show_grid(&mut self, show: bool) {
        if self.grid.base != show {
            self.grid.base = show;
            self.view_revision += 1;
        }
    }

    pub fn toggle_subdivision(&mut self, level: Subdivision) {
        self.grid.toggle_subdivision(level);
        self.view_revision += 1;
    }

    // -- Pointer session ---------------------------------------------------

    /// Button pressed at a surface position. Returns `true` if anything was
    /// painted or a session started.
    pub fn pointer_down(&mut self, px: f32, py: f32) -> bool {
        let Some(cell) = surface_to_cell(px, py, self.canvas_size) else {
            return false;
        };

        match self.tool {
            Tool::Fill => {
                self.last_cell = None;
                self.fill_at(cell);
            }
            Tool::Pencil | Tool::Eraser => {
                self.last_cell = Some(cell);
                self.paint_cells(&[cell]);
            }
        }
        true
    }

    /// Pointer moved. Paints only while a session is open.
    pub fn pointer_move(&mut self, px: f32, py: f32) {
        let Some(last) = self.last_cell else { return };
        let Some(cell) = surface_to_cell(px, py, self.canvas_size) else { return };
        if cell == last {
            return;
        }
        self.paint_cells(&line_cells(last, cell));
        self.last_cell = Some(cell);
    }

    pub fn pointer_up(&mut self) {
        self.last_cell = None;
    }

    pub fn pointer_leave(&mut self) {
        self.last_cell = None;
    }

    /// Stamp the brush at every cell with the current tool's colour.
    fn paint_cells(&mut self, cells: &[Cell]) {
        let Some(layer) = self.layers.active_id() else { return };
        let color = self.paint_color();
        for &cell in cells {
            for stamp in brush_cells(cell, self.brush_size, self.canvas_size) {
                self.store.set(stamp, color, layer);
            }
        }
    }

    /// Flood fill from `cell` with the current tool's colour.
    pub fn fill_at(&mut self, cell: Cell) -> FillOutcome {
        self.fill_at_with(cell, self.paint_color())
    }

    /// Flood fill on the active layer. A transparent `color` erases the
    /// contiguous region.
    pub fn fill_at_with(&mut self, cell: Cell, color: PixelColor) -> FillOutcome {
        let Some(layer) = self.layers.active_id() else {
            return FillOutcome::Unchanged;
        };
        let outcome = flood_fill(&mut self.store, cell, color, layer, self.canvas_size);
        if let FillOutcome::Filled { cells } = outcome {
            log_info!("Fill at ({}, {}) with {}: {} cells", cell.x, cell.y, color, cells);
        }
        outcome
    }

    // -- Canvas ------------------------------------------------------------

    /// Change the grid size. All paint and layers are discarded.
    pub fn resize(&mut self, canvas_size: u32) -> Result<(), EditorError> {
        if let Err(e) = validate_canvas_size(canvas_size) {
            log_warn!("{}", e);
            return Err(e);
        }
        self.canvas_size = canvas_size;
        self.store.clear();
        self.layers = LayerList::new();
        self.last_cell = None;
        self.view_revision += 1;
        log_info!("Canvas resized to {}x{}", canvas_size, canvas_size);
        Ok(())
    }

    /// Erase every cell owned by the active layer.
    pub fn clear_active_layer(&mut self) -> usize {
        let Some(layer) = self.layers.active_id() else { return 0 };
        self.store.remove_layer(layer)
    }

    // -- Layers ------------------------------------------------------------

    pub fn add_layer(&mut self, name: Option<String>) -> LayerId {
        self.view_revision += 1;
        self.layers.add(name)
    }

    /// Remove a layer together with its paint. The last layer stays.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        if !self.layers.remove(id) {
            return false;
        }
        self.store.remove_layer(id);
        self.view_revision += 1;
        true
    }

    pub fn select_layer(&mut self, id: LayerId) -> bool {
        self.last_cell = None;
        self.layers.set_active(id)
    }

    pub fn toggle_layer_visibility(&mut self, id: LayerId) -> Option<bool> {
        let visible = self.layers.toggle_visibility(id)?;
        self.view_revision += 1;
        Some(visible)
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> bool {
        self.layers.rename(id, name)
    }

    // -- Output ------------------------------------------------------------

    pub fn render(&self, surface: &mut dyn Surface, style: &RenderStyle) {
        compositor::render(surface, &self.store, &self.layers, self.grid, style, self.canvas_size);
    }

    /// The full rendered surface, exactly as `render` draws it on screen.
    pub fn export_image(&self, style: &RenderStyle) -> RgbaImage {
        let mut surface = ImageSurface::new(SURFACE_SIZE, SURFACE_SIZE);
        self.render(&mut surface, style);
        surface.into_image()
    }

    /// Visible paint at one pixel per cell.
    pub fn export_sprite_image(&self) -> RgbaImage {
        compositor::render_sprite(&self.store, &self.layers, self.canvas_size)
    }

    pub fn export_png(&self, style: &RenderStyle) -> Result<Vec<u8>, ExportError> {
        io::encode_png(&self.export_image(style))
    }

    /// Encode `format` and write it to `path`.
    pub fn export_to(&self, format: ExportFormat, style: &RenderStyle, path: &Path) -> Result<(), ExportError> {
        io::ensure_available(format)?;
        let image = match format {
            ExportFormat::SpritePng => self.export_sprite_image(),
            _ => self.export_image(style),
        };
        io::save_png(&image, path)?;
        log_info!("Exported {:?} to {}", format, path.display());
        Ok(())
    }

    pub fn export_file_name(&self) -> String {
        io::export_file_name(self.canvas_size)
    }
}

fn validate_canvas_size(canvas_size: u32) -> Result<(), EditorError> {
    if (1..=MAX_CANVAS_SIZE).contains(&canvas_size) {
        Ok(())
    } else {
        Err(EditorError::InvalidCanvasSize(canvas_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 16x16 canvas: 32px cells; cell centre helper
    fn px(cell: u32) -> f32 {
        cell as f32 * 32.0 + 16.0
    }

    fn editor_with_red() -> Editor {
        let mut editor = Editor::new(16).unwrap();
        assert!(editor.picker_mut().set_hex_text("#ff0000"));
        editor
    }

    const RED: PixelColor = PixelColor::Rgb([255, 0, 0]);

    #[test]
    fn fast_drag_paints_a_continuous_line() {
        let mut editor = editor_with_red();
        assert!(editor.pointer_down(px(0), px(0)));
        assert!(editor.is_drawing());
        // One sampled move far to the right
        editor.pointer_move(px(5), px(0));
        editor.pointer_up();
        assert!(!editor.is_drawing());

        for x in 0..=5 {
            assert_eq!(editor.color_at(Cell::new(x, 0)), RED);
        }
        assert_eq!(editor.store().len(), 6);
    }

    #[test]
    fn moves_without_a_session_paint_nothing() {
        let mut editor = editor_with_red();
        editor.pointer_move(px(3), px(3));
        assert!(editor.store().is_empty());

        editor.pointer_down(px(1), px(1));
        editor.pointer_leave();
        editor.pointer_move(px(4), px(1));
        assert_eq!(editor.store().len(), 1);
    }

    #[test]
    fn eraser_removes_paint() {
        let mut editor = editor_with_red();
        editor.pointer_down(px(0), px(2));
        editor.pointer_move(px(3), px(2));
        editor.pointer_up();
        assert_eq!(editor.store().len(), 4);

        editor.set_tool(Tool::Eraser);
        assert_eq!(editor.paint_color(), PixelColor::Transparent);
        editor.pointer_down(px(1), px(2));
        editor.pointer_move(px(2), px(2));
        editor.pointer_up();
        assert_eq!(editor.store().len(), 2);
        assert_eq!(editor.color_at(Cell::new(1, 2)), PixelColor::Transparent);
    }

    #[test]
    fn fill_tool_fills_on_press_without_a_session() {
        let mut editor = editor_with_red();
        editor.set_tool(Tool::Fill);
        assert!(editor.pointer_down(px(8), px(8)));
        assert!(!editor.is_drawing());
        assert_eq!(editor.store().len(), 256);
    }

    #[test]
    fn brush_size_stamps_a_square() {
        let mut editor = editor_with_red();
        editor.set_brush_size(3);
        editor.pointer_down(px(5), px(5));
        editor.pointer_up();
        assert_eq!(editor.store().len(), 9);
        editor.set_brush_size(99);
        assert_eq!(editor.brush_size(), MAX_BRUSH_SIZE);
    }

    #[test]
    fn presses_outside_the_grid_are_ignored() {
        let mut editor = editor_with_red();
        assert!(!editor.pointer_down(-4.0, 10.0));
        assert!(!editor.pointer_down(600.0, 10.0));
        assert!(editor.store().is_empty());
    }

    #[test]
    fn resize_discards_all_paint_and_layers() {
        let mut editor = editor_with_red();
        let _ = editor.add_layer(None);
        editor.pointer_down(px(1), px(1));
        editor.pointer_move(px(9), px(4));
        let before = editor.revision();

        editor.resize(32).unwrap();
        assert!(editor.store().is_empty());
        assert_eq!(editor.layers().len(), 1);
        assert_eq!(editor.canvas_size(), 32);
        assert!(!editor.is_drawing());
        assert!(editor.revision() > before);
    }

    #[test]
    fn invalid_sizes_are_rejected() {
        let mut editor = editor_with_red();
        assert_eq!(editor.resize(0), Err(EditorError::InvalidCanvasSize(0)));
        assert_eq!(editor.resize(MAX_CANVAS_SIZE + 1).unwrap_err().to_string(), "Canvas size 257 is outside 1..=256");
        assert_eq!(editor.canvas_size(), 16);
        assert!(Editor::new(0).is_err());
    }

    #[test]
    fn paint_goes_to_the_active_layer() {
        let mut editor = editor_with_red();
        let first = editor.layers().active_id().unwrap();
        let second = editor.add_layer(Some("Top".into()));

        editor.pointer_down(px(0), px(0));
        editor.pointer_up();
        assert_eq!(editor.store().record(Cell::new(0, 0)).unwrap().layer, second);

        assert!(editor.select_layer(first));
        editor.pointer_down(px(1), px(0));
        editor.pointer_up();
        assert_eq!(editor.store().record(Cell::new(1, 0)).unwrap().layer, first);

        assert!(editor.remove_layer(second));
        assert_eq!(editor.color_at(Cell::new(0, 0)), PixelColor::Transparent);
        assert_eq!(editor.color_at(Cell::new(1, 0)), RED);
        assert!(!editor.remove_layer(first));
    }

    #[test]
    fn hidden_layers_are_left_out_of_render_and_export() {
        let mut editor = editor_with_red();
        let id = editor.layers().active_id().unwrap();
        editor.pointer_down(px(0), px(0));
        editor.pointer_up();

        assert_eq!(editor.export_sprite_image().get_pixel(0, 0).0, [255, 0, 0, 255]);
        editor.toggle_layer_visibility(id);
        assert_eq!(editor.export_sprite_image().get_pixel(0, 0).0[3], 0);

        let mut surface = ImageSurface::new(512, 512);
        editor.render(&mut surface, &RenderStyle::default());
        assert_ne!(surface.image().get_pixel(16, 16).0, [255, 0, 0, 255]);
    }

    #[test]
    fn exported_png_is_the_rendered_surface() {
        let mut editor = editor_with_red();
        editor.pointer_down(px(3), px(2));
        editor.pointer_up();
        let style = RenderStyle::default();

        let mut surface = ImageSurface::new(SURFACE_SIZE, SURFACE_SIZE);
        editor.render(&mut surface, &style);

        let bytes = editor.export_png(&style).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (SURFACE_SIZE, SURFACE_SIZE));
        assert_eq!(&decoded, surface.image());
        assert_eq!(decoded.get_pixel(px(3) as u32, px(2) as u32).0, [255, 0, 0, 255]);
        assert_eq!(editor.export_file_name(), "sprite-16x16.png");
    }

    #[test]
    fn sprite_export_is_one_pixel_per_cell() {
        let mut editor = editor_with_red();
        editor.pointer_down(px(3), px(2));
        editor.pointer_up();
        let sprite = editor.export_sprite_image();
        assert_eq!(sprite.dimensions(), (16, 16));
        assert_eq!(sprite.get_pixel(3, 2).0, [255, 0, 0, 255]);
        assert_eq!(sprite.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn export_to_writes_the_chosen_format() {
        let editor = editor_with_red();
        let style = RenderStyle::default();
        let path = std::env::temp_dir().join(format!("spritefe-editor-{}.png", std::process::id()));

        editor.export_to(ExportFormat::Png, &style, &path).unwrap();
        let full = image::open(&path).unwrap();
        editor.export_to(ExportFormat::SpritePng, &style, &path).unwrap();
        let sprite = image::open(&path).unwrap();
        let json = editor.export_to(ExportFormat::Json, &style, &path);
        let _ = std::fs::remove_file(&path);

        assert_eq!((full.width(), full.height()), (SURFACE_SIZE, SURFACE_SIZE));
        assert_eq!((sprite.width(), sprite.height()), (16, 16));
        assert!(matches!(json, Err(ExportError::NotAvailable(_))));
    }

    #[test]
    fn shift_fill_erases_one_contiguous_region() {
        let mut editor = editor_with_red();
        // Red run x=0..=3, blue run x=4..=6 on row 0
        editor.pointer_down(px(0), px(0));
        editor.pointer_move(px(3), px(0));
        editor.pointer_up();
        assert!(editor.picker_mut().set_hex_text("#0000ff"));
        editor.pointer_down(px(4), px(0));
        editor.pointer_move(px(6), px(0));
        editor.pointer_up();
        assert_eq!(editor.store().len(), 7);

        editor.set_tool(Tool::Fill);
        editor.set_erase_modifier(true);
        assert_eq!(editor.paint_color(), PixelColor::Transparent);
        let before = editor.revision();
        editor.pointer_down(px(1), px(0));

        for x in 0..=3 {
            assert_eq!(editor.color_at(Cell::new(x, 0)), PixelColor::Transparent);
        }
        for x in 4..=6 {
            assert_eq!(editor.color_at(Cell::new(x, 0)), PixelColor::Rgb([0, 0, 255]));
        }
        assert_eq!(editor.store().len(), 3);
        assert!(editor.revision() > before);

        editor.set_erase_modifier(false);
        assert_eq!(editor.paint_color(), PixelColor::Rgb([0, 0, 255]));
    }

    #[test]
    fn transparent_fill_over_empty_canvas_changes_nothing() {
        let mut editor = editor_with_red();
        let before = editor.revision();
        let outcome = editor.fill_at_with(Cell::new(2, 2), PixelColor::Transparent);
        assert_eq!(outcome, FillOutcome::Filled { cells: 256 });
        assert!(editor.store().is_empty());
        assert_eq!(editor.revision(), before);
    }

    #[test]
    fn clear_active_layer_keeps_other_layers() {
        let mut editor = editor_with_red();
        editor.pointer_down(px(0), px(0));
        editor.pointer_up();
        let _ = editor.add_layer(None);
        editor.pointer_down(px(1), px(0));
        editor.pointer_up();

        assert_eq!(editor.clear_active_layer(), 1);
        assert_eq!(editor.color_at(Cell::new(0, 0)), RED);
    }

    #[test]
    fn settings_seed_the_editor() {
        let settings = EditorSettings {
            canvas_size: 999,
            brush_size: 2,
            show_grid: false,
            subdivision: Some(Subdivision::Quarter),
            ..EditorSettings::default()
        };
        let editor = Editor::from_settings(&settings);
        assert_eq!(editor.canvas_size(), DEFAULT_CANVAS_SIZE);
        assert_eq!(editor.brush_size(), 2);
        assert_eq!(editor.grid(), GridOverlay { base: false, subdivision: Some(Subdivision::Quarter) });
    }
}
