use image::codecs::png::PngEncoder;
use image::{ImageEncoder, ImageError, RgbaImage};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Export targets offered in the File menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// The canvas as rendered on screen, checkerboard and grid included.
    Png,
    /// Visible paint only, one image pixel per cell.
    SpritePng,
    /// Raw pixel data as JSON. Not implemented yet.
    Json,
}

/// Error type for export operations
#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Encode(String),
    NotAvailable(&'static str),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::Encode(e) => write!(f, "Encoding error: {}", e),
            ExportError::NotAvailable(what) => write!(f, "{} is not available yet", what),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<ImageError> for ExportError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::IoError(io) => ExportError::Io(io),
            other => ExportError::Encode(other.to_string()),
        }
    }
}

/// Default download name: `sprite-{size}x{size}.png`.
pub fn export_file_name(canvas_size: u32) -> String {
    format!("sprite-{}x{}.png", canvas_size, canvas_size)
}

/// Encode an RGBA image as a PNG byte stream.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(&mut bytes);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(bytes)
}

pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), ExportError> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Fails for formats that have no encoder yet, before any dialog is shown.
pub fn ensure_available(format: ExportFormat) -> Result<(), ExportError> {
    match format {
        ExportFormat::Png | ExportFormat::SpritePng => Ok(()),
        ExportFormat::Json => Err(ExportError::NotAvailable("JSON pixel export")),
    }
}

/// Native save dialog pre-filled with the default export name.
pub fn pick_export_path(canvas_size: u32) -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("PNG Image", &["png"])
        .set_file_name(export_file_name(canvas_size))
        .save_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn file_name_carries_canvas_size() {
        assert_eq!(export_file_name(16), "sprite-16x16.png");
        assert_eq!(export_file_name(128), "sprite-128x128.png");
    }

    #[test]
    fn png_bytes_decode_to_the_same_image() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([10, 20, 30, 255]));
        let bytes = encode_png(&img).unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn json_export_reports_not_available() {
        assert!(ensure_available(ExportFormat::Png).is_ok());
        assert!(ensure_available(ExportFormat::SpritePng).is_ok());
        let err = ensure_available(ExportFormat::Json).unwrap_err();
        assert!(matches!(err, ExportError::NotAvailable(_)));
        assert_eq!(err.to_string(), "JSON pixel export is not available yet");
    }

    #[test]
    fn save_png_writes_the_encoded_bytes() {
        let img = RgbaImage::new(2, 2);
        let path = std::env::temp_dir().join(format!("spritefe-test-{}.png", std::process::id()));
        save_png(&img, &path).unwrap();
        let on_disk = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(on_disk, encode_png(&img).unwrap());
    }
}
