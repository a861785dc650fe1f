//! Viewer configuration
//!
//! Loaded from a TOML file; every field has a default so a partial file
//! (or none at all) is fine. `PUPPET_ROTATION_SENSITIVITY` overrides the
//! file value when set.

use puppet_core::{PuppetError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SENSITIVITY_ENV: &str = "PUPPET_ROTATION_SENSITIVITY";

/// Initial window size in pixels. Clicks outside it are not picked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    1024
}
fn default_height() -> u32 {
    768
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Joint drag speed in degrees per pixel of mouse motion
    #[serde(default = "default_rotation_sensitivity")]
    pub rotation_sensitivity: f32,
    /// Diffuse colour used for selected geometry in the shaded pass
    #[serde(default = "default_highlight_colour")]
    pub highlight_colour: [f32; 3],
    #[serde(default)]
    pub window: WindowConfig,
}

fn default_rotation_sensitivity() -> f32 {
    0.5
}
fn default_highlight_colour() -> [f32; 3] {
    [1.0, 0.85, 0.1]
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            rotation_sensitivity: default_rotation_sensitivity(),
            highlight_colour: default_highlight_colour(),
            window: WindowConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load from a file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ViewerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Radians of joint rotation per pixel of drag
    pub fn radians_per_pixel(&self) -> f32 {
        self.rotation_sensitivity.to_radians()
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(SENSITIVITY_ENV) {
            self.rotation_sensitivity = raw.trim().parse().map_err(|_| {
                PuppetError::Config(format!("{} is not a number: '{}'", SENSITIVITY_ENV, raw))
            })?;
            self.validate()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(self.rotation_sensitivity > 0.0) {
            return Err(PuppetError::Config(format!(
                "rotation_sensitivity must be positive, got {}",
                self.rotation_sensitivity
            )));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(PuppetError::Config("window size must be non-zero".to_string()));
        }
        Ok(())
    }
}
