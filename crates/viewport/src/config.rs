use std::fs;
use std::path::{Path, PathBuf};

use foundation::geo::{LngLat, LngLatBounds, Size};
use serde::{Deserialize, Serialize};

use crate::popup::POPUP_OFFSET_PX;

pub const DEFAULT_CENTER: LngLat = LngLat { lng: 11.0, lat: 50.0 };
pub const DEFAULT_ZOOM: f64 = 6.0;
pub const MIN_ZOOM: f64 = 4.0;
pub const MAX_ZOOM: f64 = 10.0;
pub const MIN_LNG: f64 = -25.0;
pub const MAX_LNG: f64 = 45.0;
pub const MIN_LAT: f64 = 33.0;
pub const MAX_LAT: f64 = 72.0;

/// Startup parameters of the map view.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub initial_center: LngLat,
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// The center is kept inside this rectangle.
    pub max_bounds: LngLatBounds,
    /// Bounds reported before the widget first settles.
    pub initial_bounds: LngLatBounds,
    pub initial_window: Size,
    pub popup_offset_px: f64,
    pub fly_speed: f64,
    pub fly_curve: f64,
    pub resize_debounce_ms: u64,
    /// Tolerance (degrees and zoom levels) when comparing desired and actual viewports.
    pub sync_epsilon: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            initial_center: DEFAULT_CENTER,
            initial_zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            max_bounds: LngLatBounds::new(
                LngLat::new(MIN_LNG, MIN_LAT),
                LngLat::new(MAX_LNG, MAX_LAT),
            ),
            initial_bounds: LngLatBounds::new(LngLat::new(0.0, 0.0), LngLat::new(50.0, 50.0)),
            initial_window: Size::new(1280.0, 720.0),
            popup_offset_px: POPUP_OFFSET_PX,
            fly_speed: 0.7,
            fly_curve: 1.1,
            resize_debounce_ms: 500,
            sync_epsilon: 1e-6,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse(e) => write!(f, "invalid config json: {e}"),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ViewportConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&payload)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom.is_finite() && self.max_zoom.is_finite()) || self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] is empty",
                self.min_zoom, self.max_zoom
            )));
        }
        let b = self.max_bounds;
        if !(b.sw.is_finite() && b.ne.is_finite()) || b.sw.lng > b.ne.lng || b.sw.lat > b.ne.lat {
            return Err(ConfigError::Invalid(format!("max_bounds {b:?} is inverted")));
        }
        if !b.contains(self.initial_center) {
            return Err(ConfigError::Invalid(format!(
                "initial_center {:?} lies outside max_bounds",
                self.initial_center
            )));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.initial_zoom) {
            return Err(ConfigError::Invalid(format!(
                "initial_zoom {} outside [{}, {}]",
                self.initial_zoom, self.min_zoom, self.max_zoom
            )));
        }
        if self.fly_speed.is_nan()
            || self.fly_speed <= 0.0
            || self.sync_epsilon.is_nan()
            || self.sync_epsilon < 0.0
        {
            return Err(ConfigError::Invalid(
                "fly_speed must be positive and sync_epsilon non-negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn clamp_center(&self, center: LngLat) -> LngLat {
        self.max_bounds.clamp(center)
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
