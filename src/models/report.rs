use serde::{Deserialize, Serialize};

use crate::models::{
    Coordinate, ForecastPoint, IndexResult, LocationAverage, PollutantKind, SeriesPoint,
};

/// Where the series in a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Measured,
    /// The source failed or timed out.
    FallbackUnavailable,
    /// The source answered but nothing usable survived filtering.
    FallbackEmpty,
}

impl DataOrigin {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, DataOrigin::Measured)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityReport {
    pub city: String,
    pub parameter: PollutantKind,
    pub center: Coordinate,
    pub source: DataOrigin,
    pub series: Vec<SeriesPoint>,
    pub latest: Option<SeriesPoint>,
    pub latest_index: Option<IndexResult>,
    pub locations: Vec<LocationAverage>,
    pub discarded: usize,
}

impl AirQualityReport {
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!(
            "=== {} in {} ===\n",
            self.parameter.display_name(),
            self.city
        ));
        summary.push_str(&format!(
            "Center: {:.4}, {:.4}\n",
            self.center.latitude, self.center.longitude
        ));
        summary.push_str(&format!("Source: {:?}\n", self.source));
        summary.push_str(&format!("Series Points: {}\n", self.series.len()));

        if self.discarded > 0 {
            summary.push_str(&format!("Discarded Observations: {}\n", self.discarded));
        }

        if let (Some(latest), Some(index)) = (&self.latest, &self.latest_index) {
            summary.push_str(&format!(
                "Latest: {:.1} {} at {} -> {}\n",
                latest.value,
                self.parameter.units(),
                latest.time.to_rfc3339(),
                index.summary()
            ));
        }

        summary.push_str(&format!("Locations: {}\n", self.locations.len()));
        for (i, location) in self.locations.iter().take(10).enumerate() {
            summary.push_str(&format!(
                "  {}. ({:.4}, {:.4}) avg={:.1} over {} readings\n",
                i + 1,
                location.latitude,
                location.longitude,
                location.average,
                location.count
            ));
        }

        summary
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    pub city: String,
    pub parameter: PollutantKind,
    pub source: DataOrigin,
    pub forecasts: Vec<ForecastPoint>,
}

impl ForecastReport {
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!(
            "=== {} forecast for {} ({} hours) ===\n",
            self.parameter.display_name(),
            self.city,
            self.forecasts.len()
        ));
        summary.push_str(&format!("Input Source: {:?}\n", self.source));

        for point in &self.forecasts {
            summary.push_str(&format!(
                "  {}  {:.1} {}\n",
                point.time.to_rfc3339(),
                point.value,
                self.parameter.units()
            ));
        }

        summary
    }
}
