use crate::models::PollutantKind;
use crate::utils::constants::{
    DEFAULT_CITY, DEFAULT_HORIZON_HOURS, DEFAULT_LOOKBACK_HOURS, MAX_HORIZON_HOURS,
    MAX_LOOKBACK_HOURS, MIN_HORIZON_HOURS, MIN_LOOKBACK_HOURS,
};

/// Clamp a requested lookback into `[1, 168]` hours.
pub fn clamp_lookback_hours(hours: i64) -> u32 {
    hours.clamp(MIN_LOOKBACK_HOURS as i64, MAX_LOOKBACK_HOURS as i64) as u32
}

/// Clamp a requested forecast horizon into `[1, 48]` hours.
pub fn clamp_horizon_hours(hours: i64) -> u32 {
    hours.clamp(MIN_HORIZON_HOURS as i64, MAX_HORIZON_HOURS as i64) as u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub city: String,
    pub kind: PollutantKind,
    hours: u32,
}

impl ReportRequest {
    pub fn new(city: impl Into<String>, token: &str, hours: i64) -> Self {
        let city = city.into();
        let city = if city.trim().is_empty() {
            DEFAULT_CITY.to_string()
        } else {
            city
        };

        Self {
            city,
            kind: PollutantKind::from_token(token),
            hours: clamp_lookback_hours(hours),
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self::new(DEFAULT_CITY, "pm25", DEFAULT_LOOKBACK_HOURS as i64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub lookback: ReportRequest,
    horizon_hours: u32,
}

impl ForecastRequest {
    pub fn new(lookback: ReportRequest, horizon_hours: i64) -> Self {
        Self {
            lookback,
            horizon_hours: clamp_horizon_hours(horizon_hours),
        }
    }

    pub fn horizon_hours(&self) -> u32 {
        self.horizon_hours
    }
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self::new(ReportRequest::default(), DEFAULT_HORIZON_HOURS as i64)
    }
}
