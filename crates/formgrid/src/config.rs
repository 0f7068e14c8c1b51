//! Engine configuration
//!
//! Label placement, default table metrics, font lookup and theme selection,
//! loaded from TOML. Every section is optional:
//!
//! ```toml
//! label_orientation = "side"
//! label_padding = 6.0
//!
//! [table]
//! row_height = 20.0
//!
//! [fonts]
//! environment = "directory"
//! dir = "assets/fonts"
//!
//! [theme]
//! preset = "nord"
//! overrides = { "Button.foreground.paint" = "#FFFFFF" }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FormError, FormResult};
use crate::font::FontEnvironment;
use crate::layout::{GridLayout, LabelOrientation};
use crate::table::TableMetrics;
use crate::theme::{ThemePreset, ThemeProperties, ThemeValue};

const DEFAULT_LABEL_PADDING: f32 = 8.0;

fn default_label_padding() -> f32 {
    DEFAULT_LABEL_PADDING
}

fn default_true() -> bool {
    true
}

/// Font lookup settings applied to field builders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontsConfig {
    #[serde(default)]
    pub environment: FontEnvironment,
    /// Directory searched in `directory` environment
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub log_warnings: bool,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            environment: FontEnvironment::System,
            dir: None,
            log_warnings: true,
        }
    }
}

/// Theme selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub preset: ThemePreset,
    /// Property file merged over the preset
    #[serde(default)]
    pub properties: Option<PathBuf>,
    /// Individual properties merged last
    #[serde(default)]
    pub overrides: HashMap<String, ThemeValue>,
}

/// Form engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub label_orientation: LabelOrientation,
    /// Gap between a label and its field
    #[serde(default = "default_label_padding")]
    pub label_padding: f32,
    /// Whether a form's value map keeps insertion order
    #[serde(default = "default_true")]
    pub ordered_values: bool,
    #[serde(default)]
    pub table: TableMetrics,
    #[serde(default)]
    pub fonts: FontsConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            label_orientation: LabelOrientation::Top,
            label_padding: DEFAULT_LABEL_PADDING,
            ordered_values: true,
            table: TableMetrics::default(),
            fonts: FontsConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl FormConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(source: &str) -> FormResult<Self> {
        toml::from_str(source).map_err(|e| FormError::Config(e.to_string()))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> FormResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FormError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded form configuration");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> FormResult<String> {
        toml::to_string_pretty(self).map_err(|e| FormError::Config(e.to_string()))
    }

    /// Save configuration to a file, creating parent directories
    pub fn save(&self, path: &Path) -> FormResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| FormError::Config(format!("{}: {e}", parent.display())))?;
        }
        let content = self.to_toml_string()?;
        std::fs::write(path, content)
            .map_err(|e| FormError::Config(format!("{}: {e}", path.display())))
    }

    /// The grid layout engine described by this configuration
    #[must_use]
    pub fn grid_layout(&self) -> GridLayout {
        GridLayout::new(self.label_orientation).label_padding(self.label_padding)
    }

    /// Theme properties: the preset, then the property file, then overrides
    pub fn look_and_feel(&self) -> FormResult<ThemeProperties> {
        let mut theme = ThemeProperties::from_preset(self.theme.preset);
        if let Some(path) = &self.theme.properties {
            theme.merge(&ThemeProperties::load(path)?);
        }
        for (key, value) in &self.theme.overrides {
            theme.set(key.clone(), value.clone());
        }
        Ok(theme)
    }
}
