// Application configuration loaded from JSON.
// Every field has a default so a partial (or missing) file is still usable.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::shapes::SurfaceShape;
use super::walker::DEFAULT_SPEED;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "WindowConfig::default_title")]
    pub title: String,
    #[serde(default = "WindowConfig::default_width")]
    pub width: u32,
    #[serde(default = "WindowConfig::default_height")]
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "SimulationConfig::default_walker_count")]
    pub walker_count: usize,
    #[serde(default = "SimulationConfig::default_speed")]
    pub speed: f32,
    /// Fixed seed for reproducible runs; `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub surface: SurfaceShape,
    #[serde(default = "SimulationConfig::default_subdivisions")]
    pub subdivisions: u32,
    /// Expand the surface into implicit triangle triples before walking on it.
    #[serde(default)]
    pub non_indexed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_surface_scale")]
    pub surface_scale: f32,
    #[serde(default = "RenderConfig::default_prop_scale")]
    pub prop_scale: f32,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl WindowConfig {
    fn default_title() -> String {
        "Surface Crawlers".to_string()
    }

    const fn default_width() -> u32 {
        1280
    }

    const fn default_height() -> u32 {
        720
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            width: Self::default_width(),
            height: Self::default_height(),
        }
    }
}

impl SimulationConfig {
    const fn default_walker_count() -> usize {
        200
    }

    const fn default_speed() -> f32 {
        DEFAULT_SPEED
    }

    const fn default_subdivisions() -> u32 {
        2
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            walker_count: Self::default_walker_count(),
            speed: Self::default_speed(),
            seed: None,
            surface: SurfaceShape::default(),
            subdivisions: Self::default_subdivisions(),
            non_indexed: false,
        }
    }
}

impl RenderConfig {
    const fn default_surface_scale() -> f32 {
        5.0
    }

    const fn default_prop_scale() -> f32 {
        0.05
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            surface_scale: Self::default_surface_scale(),
            prop_scale: Self::default_prop_scale(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }
}
