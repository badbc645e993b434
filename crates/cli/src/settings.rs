use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use facefinder_core::shared::constants::{
    BOX_COLOR, BOX_LINE_WIDTH, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR,
};

/// Persisted detection and overlay preferences.
///
/// Fields missing from the file take their defaults, so older settings
/// files keep loading as new fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    pub box_color: [u8; 3],
    pub line_width: u32,
    pub parallel_scan: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            box_color: BOX_COLOR,
            line_width: BOX_LINE_WIDTH,
            parallel_scan: true,
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceFinder").join("settings.json"))
    }

    /// Missing or unreadable files yield the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        path.map(Path::to_path_buf)
            .or_else(Self::default_path)
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    log::warn!("Ignoring corrupt settings file: {e}");
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::default_path)
            .ok_or("No configuration directory available")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}
