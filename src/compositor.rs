// ============================================================================
// COMPOSITOR — checkerboard, grid overlays, visible layers onto a surface
// ============================================================================

use image::{Rgba, RgbaImage};

use crate::color::resolve_fill_style;
use crate::layers::LayerList;
use crate::raster::cell_pixel_size;
use crate::store::PixelStore;

/// Checkerboard tile edge in surface pixels (independent of zoom/canvas size).
pub const CHECKER_TILE: u32 = 8;

pub const DEFAULT_CHECKER_LIGHT: &str = "#ffffff";
pub const DEFAULT_CHECKER_DARK: &str = "#d6d6d6";
pub const DEFAULT_GRID_COLOR: &str = "#b4b4b4";
pub const DEFAULT_SUBDIVISION_COLOR: &str = "#4a86e8";

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// An addressable 2D pixel buffer that the compositor draws into.
pub trait Surface {
    fn size(&self) -> (u32, u32);
    /// Reset every pixel to fully transparent.
    fn clear(&mut self);
    /// Fill an axis-aligned rectangle, clipped to the surface.
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>);
}

/// [`Surface`] backed by an in-memory RGBA image.
pub struct ImageSurface {
    image: RgbaImage,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl Surface for ImageSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = TRANSPARENT;
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
        let (sw, sh) = self.image.dimensions();
        let x_end = x.saturating_add(w).min(sw);
        let y_end = y.saturating_add(h).min(sh);
        for py in y.min(sh)..y_end {
            for px in x.min(sw)..x_end {
                self.image.put_pixel(px, py, color);
            }
        }
    }
}

// ============================================================================
// Grid overlays
// ============================================================================

/// Extra guide lines dividing the canvas into N equal bands per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subdivision {
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl Subdivision {
    pub fn all() -> &'static [Subdivision] {
        &[
            Subdivision::Quarter,
            Subdivision::Eighth,
            Subdivision::Sixteenth,
            Subdivision::ThirtySecond,
        ]
    }

    pub fn divisions(&self) -> u32 {
        match self {
            Subdivision::Quarter => 4,
            Subdivision::Eighth => 8,
            Subdivision::Sixteenth => 16,
            Subdivision::ThirtySecond => 32,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Subdivision::Quarter => "1/4",
            Subdivision::Eighth => "1/8",
            Subdivision::Sixteenth => "1/16",
            Subdivision::ThirtySecond => "1/32",
        }
    }

    /// Settings-file key.
    pub fn key(&self) -> &'static str {
        match self {
            Subdivision::Quarter => "quarter",
            Subdivision::Eighth => "eighth",
            Subdivision::Sixteenth => "sixteenth",
            Subdivision::ThirtySecond => "thirty_second",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Subdivision::all().iter().copied().find(|s| s.key() == key)
    }
}

/// Base cell grid plus at most one subdivision level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridOverlay {
    pub base: bool,
    pub subdivision: Option<Subdivision>,
}

impl GridOverlay {
    /// Selecting a level clears whichever level was selected before.
    pub fn select_subdivision(&mut self, level: Subdivision) {
        self.subdivision = Some(level);
    }

    /// Checkbox semantics: re-selecting the current level turns it off.
    pub fn toggle_subdivision(&mut self, level: Subdivision) {
        if self.subdivision == Some(level) {
            self.subdivision = None;
        } else {
            self.select_subdivision(level);
        }
    }
}

/// Concrete colours for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    pub checker_light: Rgba<u8>,
    pub checker_dark: Rgba<u8>,
    pub grid_line: Rgba<u8>,
    pub subdivision_line: Rgba<u8>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::resolve(
            DEFAULT_CHECKER_LIGHT,
            DEFAULT_CHECKER_DARK,
            DEFAULT_GRID_COLOR,
            DEFAULT_SUBDIVISION_COLOR,
        )
    }
}

impl RenderStyle {
    /// Resolve user-configured hex strings, degrading to the built-in
    /// defaults (then black) for anything unparsable.
    pub fn resolve(checker_light: &str, checker_dark: &str, grid: &str, subdivision: &str) -> Self {
        Self {
            checker_light: resolve_fill_style(checker_light, DEFAULT_CHECKER_LIGHT),
            checker_dark: resolve_fill_style(checker_dark, DEFAULT_CHECKER_DARK),
            grid_line: resolve_fill_style(grid, DEFAULT_GRID_COLOR),
            subdivision_line: resolve_fill_style(subdivision, DEFAULT_SUBDIVISION_COLOR),
        }
    }
}

// ============================================================================
// Render passes
// ============================================================================

/// Full render pass: clear, checkerboard, grid lines, then every record whose
/// layer is visible, in store order.
///
/// Layers are not re-sorted: when several layers paint the same area, the
/// record inserted first is drawn first.
pub fn render(
    surface: &mut dyn Surface,
    store: &PixelStore,
    layers: &LayerList,
    grid: GridOverlay,
    style: &RenderStyle,
    canvas_size: u32,
) {
    let cell = cell_pixel_size(canvas_size);
    let (sw, sh) = surface.size();
    let extent_w = (canvas_size * cell).min(sw);
    let extent_h = (canvas_size * cell).min(sh);

    surface.clear();
    draw_checkerboard(surface, extent_w, extent_h, style);

    if grid.base {
        draw_grid_lines(surface, canvas_size, 1, cell, extent_w, extent_h, style.grid_line);
    }
    if let Some(level) = grid.subdivision {
        let step = (canvas_size / level.divisions()).max(1);
        draw_grid_lines(surface, canvas_size, step, cell, extent_w, extent_h, style.subdivision_line);
    }

    for record in store.iter() {
        if !layers.is_visible(record.layer) {
            continue;
        }
        let [r, g, b] = record.rgb;
        surface.fill_rect(record.cell.x * cell, record.cell.y * cell, cell, cell, Rgba([r, g, b, 255]));
    }
}

fn draw_checkerboard(surface: &mut dyn Surface, w: u32, h: u32, style: &RenderStyle) {
    for ty in 0..h.div_ceil(CHECKER_TILE) {
        for tx in 0..w.div_ceil(CHECKER_TILE) {
            let color = if (tx + ty) % 2 == 0 {
                style.checker_light
            } else {
                style.checker_dark
            };
            let x = tx * CHECKER_TILE;
            let y = ty * CHECKER_TILE;
            surface.fill_rect(x, y, CHECKER_TILE.min(w - x), CHECKER_TILE.min(h - y), color);
        }
    }
}

/// 1px lines at every `step`-th cell boundary, including both outer edges.
/// The far edge is pulled in by one pixel so it stays on the surface.
fn draw_grid_lines(
    surface: &mut dyn Surface,
    canvas_size: u32,
    step: u32,
    cell: u32,
    w: u32,
    h: u32,
    color: Rgba<u8>,
) {
    if w == 0 || h == 0 {
        return;
    }
    let mut boundaries: Vec<u32> = (0..=canvas_size).step_by(step as usize).collect();
    if boundaries.last() != Some(&canvas_size) {
        boundaries.push(canvas_size);
    }
    for i in boundaries {
        let x = (i * cell).min(w - 1);
        let y = (i * cell).min(h - 1);
        surface.fill_rect(x, 0, 1, h, color);
        surface.fill_rect(0, y, w, 1, color);
    }
}

/// One image pixel per cell, transparent background, visible layers only.
pub fn render_sprite(store: &PixelStore, layers: &LayerList, canvas_size: u32) -> RgbaImage {
    let mut image = RgbaImage::new(canvas_size, canvas_size);
    for record in store.iter() {
        if layers.is_visible(record.layer) && record.cell.in_bounds(canvas_size) {
            let [r, g, b] = record.rgb;
            image.put_pixel(record.cell.x, record.cell.y, Rgba([r, g, b, 255]));
        }
    }
    image
}
