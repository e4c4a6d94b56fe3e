use crate::error::{AqiError, Result};
use crate::models::{ForecastPoint, SeriesPoint};
use crate::utils::constants::{DRIFT_WEIGHT, FORECAST_WINDOW};
use crate::utils::coordinates::round_tenths;
use chrono::Duration;

/// Moving average of the most recent points plus a damped linear drift.
pub struct TrendForecaster {
    window: usize,
    drift_weight: f64,
}

impl TrendForecaster {
    pub fn new() -> Self {
        Self {
            window: FORECAST_WINDOW,
            drift_weight: DRIFT_WEIGHT,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn with_drift_weight(mut self, drift_weight: f64) -> Self {
        self.drift_weight = drift_weight;
        self
    }

    /// Project `horizon_hours` hourly values past the last point of `series`.
    ///
    /// The horizon is taken as given; a horizon of 0 yields no points.
    /// Projection stops early if a timestamp would overflow the calendar.
    pub fn forecast(
        &self,
        series: &[SeriesPoint],
        horizon_hours: u32,
    ) -> Result<Vec<ForecastPoint>> {
        let last = series.last().ok_or(AqiError::EmptySeries)?;

        let recent = &series[series.len() - self.window.min(series.len())..];
        let recent_average = recent.iter().map(|p| p.value).sum::<f64>() / recent.len() as f64;

        let drift = match series.len() {
            0 | 1 => 0.0,
            n => last.value - series[n - 2].value,
        };

        let forecasts = (1..=horizon_hours)
            .map_while(|h| {
                let time = last.time.checked_add_signed(Duration::hours(h as i64))?;
                let value = (recent_average + h as f64 * self.drift_weight * drift).max(0.0);
                Some(ForecastPoint {
                    time,
                    value: round_tenths(value),
                })
            })
            .collect();

        Ok(forecasts)
    }
}

impl Default for TrendForecaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Short-horizon projection. Fails on an empty series.
pub fn forecast(series: &[SeriesPoint], horizon_hours: u32) -> Result<Vec<ForecastPoint>> {
    TrendForecaster::new().forecast(series, horizon_hours)
}
