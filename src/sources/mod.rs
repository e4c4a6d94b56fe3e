//! Seams for the external collaborators: a place-name resolver and a
//! measurement source. Both may fail or stall; the report processor bounds
//! every call with a timeout and turns any failure into a fallback.

pub mod file_source;
pub mod gazetteer;

pub use file_source::FileMeasurementSource;
pub use gazetteer::PlaceGazetteer;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::error::AqiError;
use crate::models::{Coordinate, Observation, PollutantKind};
use crate::utils::coordinates::haversine_distance;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Upstream returned non-success status {0}")]
    Status(u16),

    #[error("Upstream transport failure: {0}")]
    Transport(String),

    #[error("Upstream did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("Upstream data could not be read: {0}")]
    Read(#[from] AqiError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementQuery {
    pub center: Coordinate,
    pub radius_m: f64,
    pub kind: PollutantKind,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl MeasurementQuery {
    /// The `hours` leading up to `now`.
    pub fn trailing(
        kind: PollutantKind,
        center: Coordinate,
        radius_m: f64,
        hours: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            center,
            radius_m,
            kind,
            from: now - Duration::hours(hours as i64),
            to: now,
        }
    }

    /// Whether an observation falls inside the window and search radius.
    /// Observations without coordinates cannot be placed and are kept.
    pub fn matches(&self, observation: &Observation) -> bool {
        if observation.timestamp < self.from || observation.timestamp > self.to {
            return false;
        }

        match observation.coordinate() {
            Some(coordinate) => {
                let distance_km = haversine_distance(
                    self.center.latitude,
                    self.center.longitude,
                    coordinate.latitude,
                    coordinate.longitude,
                );
                distance_km * 1000.0 <= self.radius_m
            }
            None => true,
        }
    }
}

#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Coordinate for a place name; `Ok(None)` when the name is unknown.
    async fn resolve(&self, place: &str) -> Result<Option<Coordinate>, SourceError>;
}

#[async_trait]
pub trait MeasurementSource: Send + Sync {
    async fn fetch(&self, query: &MeasurementQuery) -> Result<Vec<Observation>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn query() -> MeasurementQuery {
        MeasurementQuery::trailing(
            PollutantKind::Pm25,
            Coordinate::new(34.0522, -118.2437),
            50_000.0,
            24,
            now(),
        )
    }

    #[test]
    fn test_trailing_window() {
        let q = query();
        assert_eq!(q.to, now());
        assert_eq!(q.from, now() - Duration::hours(24));
    }

    #[test]
    fn test_matches_time_window() {
        let q = query();
        assert!(q.matches(&Observation::new(now(), 1.0)));
        assert!(q.matches(&Observation::new(now() - Duration::hours(24), 1.0)));
        assert!(!q.matches(&Observation::new(now() - Duration::hours(25), 1.0)));
        assert!(!q.matches(&Observation::new(now() + Duration::minutes(1), 1.0)));
    }

    #[test]
    fn test_matches_radius() {
        let q = query();
        // Pasadena, ~15 km away
        assert!(q.matches(&Observation::new(now(), 1.0).with_coordinates(34.1478, -118.1445)));
        // San Diego, ~180 km away
        assert!(!q.matches(&Observation::new(now(), 1.0).with_coordinates(32.7157, -117.1611)));
    }
}
