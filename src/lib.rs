//! SpriteFE core: the pixel-grid model and algorithms behind the editor
//! window, usable headlessly.

pub mod logger;

pub mod color;
pub mod compositor;
pub mod editor;
pub mod fill;
pub mod io;
pub mod layers;
pub mod raster;
pub mod settings;
pub mod store;

pub use color::{ColorPicker, Hsv, PixelColor};
pub use compositor::{GridOverlay, ImageSurface, RenderStyle, Subdivision, Surface};
pub use editor::{Editor, EditorError, Tool};
pub use store::{Cell, PixelStore};
