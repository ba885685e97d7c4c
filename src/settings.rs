//! Settings profile and layered configuration loading.
//!
//! The profile is owned by the menu layer; the simulation core only reads
//! view distance, shadows, mouse sensitivity / invert-Y and key bindings.
//!
//! Sources, later ones overriding earlier ones:
//!
//! | Source                     | Example                              |
//! |----------------------------|--------------------------------------|
//! | built-in defaults          | `SimConfig::default()`               |
//! | optional TOML file         | `[sim] seed = 7` / `[settings] shadows = false` |
//! | environment                | `FERRY_SIM__SEED=7`, `FERRY_SETTINGS__VIEW_DISTANCE=300` |

use crate::error::{Result, SimError};
use crate::input::{KeyBindings, BASE_MOUSE_SENSITIVITY};
use crate::types::SimConfig;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub quality: Quality,
    /// Far distance for fog and culling, world units.
    pub view_distance: f32,
    pub shadows: bool,
    pub master_volume: u8,
    pub music_volume: u8,
    pub sfx_volume: u8,
    /// 1–10, 5 is the baseline.
    pub sensitivity: f32,
    pub invert_y: bool,
    pub key_bindings: KeyBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: Quality::Medium,
            view_distance: 500.0,
            shadows: true,
            master_volume: 80,
            music_volume: 50,
            sfx_volume: 70,
            sensitivity: 5.0,
            invert_y: false,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Settings {
    /// Radians of look rotation per pixel of mouse travel.
    pub fn mouse_scale(&self) -> f32 {
        BASE_MOUSE_SENSITIVITY * self.sensitivity / 5.0
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.view_distance > 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "view_distance must be positive, got {}",
                self.view_distance
            )));
        }
        if !(self.sensitivity > 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "sensitivity must be positive, got {}",
                self.sensitivity
            )));
        }
        Ok(())
    }
}

/// Everything a config file can carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub sim: SimConfig,
    pub settings: Settings,
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.sim.day_length > 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "day_length must be positive, got {}",
                self.sim.day_length
            )));
        }
        if self.sim.total_collectibles == 0 {
            return Err(SimError::InvalidSettings(
                "total_collectibles must be at least 1".into(),
            ));
        }
        if !(self.sim.tick_rate_hz > 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "tick_rate_hz must be positive, got {}",
                self.sim.tick_rate_hz
            )));
        }
        self.settings.validate()
    }
}

/// Layer defaults, an optional TOML file and `FERRY_*` environment
/// variables, then validate.
pub fn load(path: Option<&Path>) -> Result<FileConfig> {
    let mut builder =
        config::Config::builder().add_source(config::Config::try_from(&FileConfig::default())?);

    if let Some(path) = path {
        debug!("Loading config file {}", path.display());
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let loaded: FileConfig = builder
        .add_source(
            config::Environment::with_prefix("FERRY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    loaded.validate()?;
    Ok(loaded)
}
