use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

use courier_map::Granularity;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Map loading and classification settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Optional path to a map image; a random map is painted when absent.
    pub path: Option<String>,
    /// Grid cell edge length in pixels.
    pub cell_size: f32,
    /// Inclusive lower bound of the road color band.
    pub road_min: u8,
    /// Inclusive upper bound of the road color band.
    pub road_max: u8,
    /// Point or neighborhood classification.
    pub granularity: Granularity,
    /// Obstacle probability per cell for generated maps.
    pub obstacle_ratio: f64,
    /// Generated map width in cells.
    pub gen_cols: usize,
    /// Generated map height in cells.
    pub gen_rows: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            path: None,
            cell_size: 20.0,
            road_min: 90,
            road_max: 150,
            granularity: Granularity::Point,
            obstacle_ratio: 0.2,
            gen_cols: 40,
            gen_rows: 30,
        }
    }
}

/// Motion controller settings, forwarded to `courier_motion::MotionConfig`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Linear speed (px/ms).
    pub speed: f64,
    /// Rotation blend rate (1/ms).
    pub rotation_speed: f64,
    /// Snap distance (px).
    pub snap_radius: f64,
    /// Maximum accepted tick gap (ms).
    pub stall_gap: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        MotionSettings { speed: 0.1, rotation_speed: 0.01, snap_radius: 2.0, stall_gap: 100.0 }
    }
}

/// Random placement settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Sampling budget before placement is reported as failed.
    pub sample_attempts: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig { sample_attempts: courier_nav::DEFAULT_SAMPLE_ATTEMPTS }
    }
}

/// Typed view of `config/default.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Map loading and classification settings.
    pub map: MapConfig,
    /// Motion controller settings.
    pub motion: MotionSettings,
    /// Random placement settings.
    pub spawn: SpawnConfig,
}

pub fn load_config() -> Result<SimConfig, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(false))
        .build()?;

    match settings.try_deserialize::<SimConfig>() {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}
