/// Request defaults
pub const DEFAULT_CITY: &str = "Los Angeles";
pub const DEFAULT_LATITUDE: f64 = 34.0522;
pub const DEFAULT_LONGITUDE: f64 = -118.2437;
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 50_000.0;
pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;
pub const DEFAULT_HORIZON_HOURS: u32 = 6;
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 5_000;

/// Duration bounds
pub const MIN_LOOKBACK_HOURS: u32 = 1;
pub const MAX_LOOKBACK_HOURS: u32 = 168;
pub const MIN_HORIZON_HOURS: u32 = 1;
pub const MAX_HORIZON_HOURS: u32 = 48;

/// Location grid: 4 decimal places, roughly 11 m
pub const COORDINATE_DECIMALS: usize = 4;

/// Forecasting
pub const FORECAST_WINDOW: usize = 12;
pub const DRIFT_WEIGHT: f64 = 0.25;

/// Synthetic series baselines (µg/m³)
pub const BASELINE_PM25: f64 = 22.0;
pub const BASELINE_PM10: f64 = 35.0;
pub const BASELINE_OTHER: f64 = 18.0;
pub const SYNTHETIC_NOISE: f64 = 1.0;

/// Synthetic map markers: (jitter span in degrees, offset from baseline)
pub const SYNTHETIC_MARKERS: [(f64, f64); 2] = [(0.05, 2.0), (0.1, 5.0)];

/// Settings
pub const SETTINGS_FILE: &str = "aqi";
pub const SETTINGS_ENV_PREFIX: &str = "AQI";

/// Observation file extensions
pub const CSV_EXTENSION: &str = "csv";
pub const JSON_EXTENSION: &str = "json";
