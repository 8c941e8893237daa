//! User settings: output size and limits loaded from ~/.lsys/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::render::fit::{Viewport, DEFAULT_PADDING};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_size")]
    pub width: f64,
    #[serde(default = "default_size")]
    pub height: f64,
    #[serde(default = "default_padding")]
    pub padding: f64,
    /// Upper bound on generations; expansion grows exponentially.
    #[serde(default = "default_max_generations")]
    pub max_generations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

fn default_size() -> f64 {
    800.0
}

fn default_padding() -> f64 {
    DEFAULT_PADDING
}

fn default_max_generations() -> u32 {
    16
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: default_size(),
            height: default_size(),
            padding: default_padding(),
            max_generations: default_max_generations(),
            background: None,
        }
    }
}

impl Settings {
    /// Standard location of the settings file.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".lsys").join("config.yaml"))
    }

    /// Load from the standard path, falling back to defaults.
    pub fn load() -> Self {
        Self::path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load from `path`. Returns None if the file is missing or invalid.
    pub fn load_from(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_yaml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid settings file");
                None
            }
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.padding)
    }
}
