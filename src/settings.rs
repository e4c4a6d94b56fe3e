//! Runtime settings.
//!
//! Layered with the `config` crate, later layers overriding earlier ones:
//!
//! 1. Built-in defaults ([`Settings::default`])
//! 2. A TOML file: the `--config` path if given, otherwise `aqi.toml` in the
//!    working directory when present
//! 3. `AQI_*` environment variables, `__` separating nested keys
//!    (e.g. `AQI_DEFAULT_CITY=Paris`, `AQI_UPSTREAM_TIMEOUT_MS=2000`)

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

use crate::error::Result;
use crate::models::{Coordinate, PollutantKind};
use crate::sources::PlaceGazetteer;
use crate::utils::constants::{
    DEFAULT_CITY, DEFAULT_HORIZON_HOURS, DEFAULT_LATITUDE, DEFAULT_LONGITUDE,
    DEFAULT_LOOKBACK_HOURS, DEFAULT_SEARCH_RADIUS_M, DEFAULT_UPSTREAM_TIMEOUT_MS,
    SETTINGS_ENV_PREFIX, SETTINGS_FILE,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NamedPlace {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl NamedPlace {
    fn new(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub default_city: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub default_latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub default_longitude: f64,

    #[validate(range(min = 1.0))]
    pub search_radius_m: f64,

    pub default_pollutant: String,

    #[validate(range(min = 1, max = 168))]
    pub default_lookback_hours: u32,

    #[validate(range(min = 1, max = 48))]
    pub default_horizon_hours: u32,

    #[validate(range(min = 1))]
    pub upstream_timeout_ms: u64,

    #[validate(nested)]
    pub places: Vec<NamedPlace>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            default_latitude: DEFAULT_LATITUDE,
            default_longitude: DEFAULT_LONGITUDE,
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            default_pollutant: PollutantKind::default().token().to_string(),
            default_lookback_hours: DEFAULT_LOOKBACK_HOURS,
            default_horizon_hours: DEFAULT_HORIZON_HOURS,
            upstream_timeout_ms: DEFAULT_UPSTREAM_TIMEOUT_MS,
            places: vec![
                NamedPlace::new(DEFAULT_CITY, DEFAULT_LATITUDE, DEFAULT_LONGITUDE),
                NamedPlace::new("New York", 40.7128, -74.0060),
                NamedPlace::new("London", 51.5074, -0.1278),
                NamedPlace::new("Paris", 48.8566, 2.3522),
                NamedPlace::new("Delhi", 28.6139, 77.2090),
                NamedPlace::new("Beijing", 39.9042, 116.4074),
            ],
        }
    }
}

impl Settings {
    /// Load and validate settings. An explicit `path` must exist; the
    /// implicit `aqi.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(SETTINGS_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(SETTINGS_ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn default_center(&self) -> Coordinate {
        Coordinate::new(self.default_latitude, self.default_longitude)
    }

    pub fn default_pollutant(&self) -> PollutantKind {
        PollutantKind::from_token(&self.default_pollutant)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn gazetteer(&self) -> PlaceGazetteer {
        self.places
            .iter()
            .map(|p| (p.name.as_str(), Coordinate::new(p.latitude, p.longitude)))
            .collect()
    }
}
