use std::path::PathBuf;

use crate::compositor::{
    DEFAULT_CHECKER_DARK, DEFAULT_CHECKER_LIGHT, DEFAULT_GRID_COLOR, DEFAULT_SUBDIVISION_COLOR,
    GridOverlay, RenderStyle, Subdivision,
};
use crate::editor::{DEFAULT_CANVAS_SIZE, MAX_BRUSH_SIZE, MAX_CANVAS_SIZE};
use crate::log_warn;

/// Editor settings that persist across sessions
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    /// Grid cells per side for new canvases
    pub canvas_size: u32,
    /// Brush edge length in cells
    pub brush_size: u32,
    /// Draw the per-cell grid
    pub show_grid: bool,
    /// Optional guide subdivision drawn on top of the grid
    pub subdivision: Option<Subdivision>,
    // Colours are kept as typed so a bad value degrades at render time
    pub grid_color: String,
    pub subdivision_color: String,
    pub checker_light: String,
    pub checker_dark: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            brush_size: 1,
            show_grid: true,
            subdivision: None,
            grid_color: DEFAULT_GRID_COLOR.to_string(),
            subdivision_color: DEFAULT_SUBDIVISION_COLOR.to_string(),
            checker_light: DEFAULT_CHECKER_LIGHT.to_string(),
            checker_dark: DEFAULT_CHECKER_DARK.to_string(),
        }
    }
}

impl EditorSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/spritefe/spritefe_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\SpriteFE\spritefe_settings.cfg
    /// On macOS:   ~/Library/Application Support/SpriteFE/spritefe_settings.cfg
    /// Fallback:   same directory as the executable.
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
                    PathBuf::from(home).join(".config")
                })
                .join("spritefe");
            let _ = std::fs::create_dir_all(&config_dir);
            return Some(config_dir.join("spritefe_settings.cfg"));
        }
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()?;
            let config_dir = PathBuf::from(appdata).join("SpriteFE");
            let _ = std::fs::create_dir_all(&config_dir);
            return Some(config_dir.join("spritefe_settings.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            let config_dir = PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("SpriteFE");
            let _ = std::fs::create_dir_all(&config_dir);
            return Some(config_dir.join("spritefe_settings.cfg"));
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("spritefe_settings.cfg")))
        }
    }

    /// Load settings from disk (returns default if file missing or unreadable)
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        let Ok(content) = std::fs::read_to_string(&path) else { return Self::default() };
        Self::parse(&content)
    }

    /// Parse `key=value` lines. Unknown keys are ignored, bad values keep
    /// their defaults.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let key = key.trim();
            let val = val.trim();
            match key {
                "canvas_size" => match val.parse::<u32>() {
                    Ok(n) if (1..=MAX_CANVAS_SIZE).contains(&n) => s.canvas_size = n,
                    _ => { log_warn!("settings: ignoring canvas_size={:?}", val); }
                },
                "brush_size" => match val.parse::<u32>() {
                    Ok(n) if (1..=MAX_BRUSH_SIZE).contains(&n) => s.brush_size = n,
                    _ => { log_warn!("settings: ignoring brush_size={:?}", val); }
                },
                "show_grid" => {
                    s.show_grid = val == "true";
                }
                "subdivision" => {
                    s.subdivision = Subdivision::from_key(val);
                }
                "grid_color" => s.grid_color = val.to_string(),
                "subdivision_color" => s.subdivision_color = val.to_string(),
                "checker_light" => s.checker_light = val.to_string(),
                "checker_dark" => s.checker_dark = val.to_string(),
                _ => {}
            }
        }
        s
    }

    pub fn to_config_string(&self) -> String {
        format!(
            "canvas_size={}\n\
             brush_size={}\n\
             show_grid={}\n\
             subdivision={}\n\
             grid_color={}\n\
             subdivision_color={}\n\
             checker_light={}\n\
             checker_dark={}\n",
            self.canvas_size,
            self.brush_size,
            self.show_grid,
            self.subdivision.map(|s| s.key()).unwrap_or("none"),
            self.grid_color,
            self.subdivision_color,
            self.checker_light,
            self.checker_dark,
        )
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        if let Err(e) = std::fs::write(&path, self.to_config_string()) {
            log_warn!("settings: could not write {}: {}", path.display(), e);
        }
    }

    pub fn grid_overlay(&self) -> GridOverlay {
        GridOverlay {
            base: self.show_grid,
            subdivision: self.subdivision,
        }
    }

    pub fn render_style(&self) -> RenderStyle {
        RenderStyle::resolve(
            &self.checker_light,
            &self.checker_dark,
            &self.grid_color,
            &self.subdivision_color,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_all_defaults() {
        assert_eq!(EditorSettings::parse(""), EditorSettings::default());
    }

    #[test]
    fn known_keys_are_read() {
        let s = EditorSettings::parse(
            "canvas_size=64\nbrush_size = 3\nshow_grid=false\nsubdivision=eighth\ngrid_color=#101010\n",
        );
        assert_eq!(s.canvas_size, 64);
        assert_eq!(s.brush_size, 3);
        assert!(!s.show_grid);
        assert_eq!(s.subdivision, Some(Subdivision::Eighth));
        assert_eq!(s.grid_color, "#101010");
    }

    #[test]
    fn bad_values_keep_defaults() {
        let s = EditorSettings::parse("canvas_size=0\nbrush_size=lots\nsubdivision=fifth\nnot a line\n");
        let d = EditorSettings::default();
        assert_eq!(s.canvas_size, d.canvas_size);
        assert_eq!(s.brush_size, d.brush_size);
        assert_eq!(s.subdivision, None);
    }

    #[test]
    fn config_string_reparses_to_the_same_settings() {
        let s = EditorSettings {
            canvas_size: 32,
            brush_size: 2,
            show_grid: false,
            subdivision: Some(Subdivision::ThirtySecond),
            ..EditorSettings::default()
        };
        assert_eq!(EditorSettings::parse(&s.to_config_string()), s);
    }

    #[test]
    fn unparsable_colours_degrade_at_render_time() {
        let s = EditorSettings {
            grid_color: "grey".to_string(),
            ..EditorSettings::default()
        };
        assert_eq!(s.render_style().grid_line, RenderStyle::default().grid_line);
    }
}
