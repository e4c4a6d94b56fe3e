pub mod index;
pub mod observation;
pub mod pollutant;
pub mod report;
pub mod request;
pub mod series;

pub use index::{IndexResult, SeverityTier, TierColor};
pub use observation::{Coordinate, Observation};
pub use pollutant::PollutantKind;
pub use report::{AirQualityReport, DataOrigin, ForecastReport};
pub use request::{clamp_horizon_hours, clamp_lookback_hours, ForecastRequest, ReportRequest};
pub use series::{is_chronological, ForecastPoint, LocationAverage, SeriesPoint};
