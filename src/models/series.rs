use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: DateTime<Utc>,
    pub value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
}

impl SeriesPoint {
    pub fn new(time: DateTime<Utc>, value: f64) -> Self {
        Self {
            time,
            value,
            coordinate: None,
        }
    }

    pub fn with_coordinate(mut self, coordinate: Option<Coordinate>) -> Self {
        self.coordinate = coordinate;
        self
    }
}

/// True when timestamps never decrease. Equal timestamps are allowed.
pub fn is_chronological(series: &[SeriesPoint]) -> bool {
    series.windows(2).all(|w| w[0].time <= w[1].time)
}

/// Mean reading of one ~11 m grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAverage {
    #[serde(rename = "lat")]
    pub latitude: f64,

    #[serde(rename = "lon")]
    pub longitude: f64,

    #[serde(rename = "avg")]
    pub average: f64,

    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}
