use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{
    AirQualityReport, Coordinate, DataOrigin, ForecastReport, ForecastRequest, Observation,
    PollutantKind, ReportRequest,
};
use crate::processors::{
    Aggregation, IndexMapper, SpatialAggregator, SyntheticProfile, SyntheticSeriesGenerator,
    TrendForecaster,
};
use crate::settings::Settings;
use crate::sources::{LocationResolver, MeasurementQuery, MeasurementSource, SourceError};
use crate::utils::constants::{
    DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_SEARCH_RADIUS_M, DEFAULT_UPSTREAM_TIMEOUT_MS,
};

/// Series and locations for one request, real or synthesized.
#[derive(Debug, Clone)]
pub struct SeriesOutcome {
    pub center: Coordinate,
    pub origin: DataOrigin,
    pub aggregation: Aggregation,
}

/// Runs a request end to end: resolve the place, fetch observations,
/// aggregate, fall back to synthetic data when nothing usable arrives,
/// then index or forecast.
///
/// Collaborator failures never reach the caller. Cloning is cheap, so
/// independent requests can run as separate tasks.
#[derive(Clone)]
pub struct ReportProcessor {
    resolver: Arc<dyn LocationResolver>,
    source: Arc<dyn MeasurementSource>,
    default_center: Coordinate,
    search_radius_m: f64,
    upstream_timeout: Duration,
}

impl ReportProcessor {
    pub fn new(resolver: Arc<dyn LocationResolver>, source: Arc<dyn MeasurementSource>) -> Self {
        Self {
            resolver,
            source,
            default_center: Coordinate::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE),
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            upstream_timeout: Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS),
        }
    }

    /// Processor using the settings' gazetteer, default center, radius and
    /// timeout.
    pub fn from_settings(settings: &Settings, source: Arc<dyn MeasurementSource>) -> Self {
        Self::new(Arc::new(settings.gazetteer()), source)
            .with_default_center(settings.default_center())
            .with_search_radius(settings.search_radius_m)
            .with_upstream_timeout(settings.upstream_timeout())
    }

    pub fn with_default_center(mut self, center: Coordinate) -> Self {
        self.default_center = center;
        self
    }

    pub fn with_search_radius(mut self, radius_m: f64) -> Self {
        self.search_radius_m = radius_m;
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Coordinate for `city`, or the default center when the resolver
    /// fails, times out, does not know the name or answers with an
    /// impossible coordinate.
    pub async fn resolve_center(&self, city: &str) -> Coordinate {
        match tokio::time::timeout(self.upstream_timeout, self.resolver.resolve(city)).await {
            Ok(Ok(Some(center))) => match Coordinate::checked(center.latitude, center.longitude) {
                Ok(center) => center,
                Err(e) => {
                    warn!(
                        city,
                        error = %e,
                        "Resolver returned an invalid coordinate; using default center"
                    );
                    self.default_center
                }
            },
            Ok(Ok(None)) => {
                debug!(city, "Place not found; using default center");
                self.default_center
            }
            Ok(Err(e)) => {
                warn!(city, error = %e, "Location resolver failed; using default center");
                self.default_center
            }
            Err(_) => {
                warn!(
                    city,
                    timeout = ?self.upstream_timeout,
                    "Location resolver timed out; using default center"
                );
                self.default_center
            }
        }
    }

    async fn fetch(
        &self,
        query: &MeasurementQuery,
    ) -> std::result::Result<Vec<Observation>, SourceError> {
        match tokio::time::timeout(self.upstream_timeout, self.source.fetch(query)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.upstream_timeout)),
        }
    }

    /// Resolve, fetch and aggregate without falling back.
    async fn acquire(
        &self,
        request: &ReportRequest,
        now: DateTime<Utc>,
    ) -> (Coordinate, std::result::Result<Vec<Observation>, SourceError>) {
        let center = self.resolve_center(&request.city).await;
        let query = MeasurementQuery::trailing(
            request.kind,
            center,
            self.search_radius_m,
            request.hours(),
            now,
        );

        info!(
            city = %request.city,
            parameter = request.kind.token(),
            hours = request.hours(),
            latitude = center.latitude,
            longitude = center.longitude,
            radius_m = self.search_radius_m,
            "Requesting measurements"
        );

        (center, self.fetch(&query).await)
    }

    pub async fn report(&self, request: &ReportRequest) -> AirQualityReport {
        self.report_at(request, Utc::now()).await
    }

    pub async fn report_at(&self, request: &ReportRequest, now: DateTime<Utc>) -> AirQualityReport {
        let (center, fetched) = self.acquire(request, now).await;
        assemble_report(request, center, fetched, now, &mut rand::thread_rng())
    }

    /// Reports for independent requests, each on its own task. Output order
    /// follows input order.
    pub async fn report_many(&self, requests: Vec<ReportRequest>) -> Result<Vec<AirQualityReport>> {
        let now = Utc::now();
        let handles: Vec<JoinHandle<AirQualityReport>> = requests
            .into_iter()
            .map(|request| {
                let processor = self.clone();
                tokio::spawn(async move { processor.report_at(&request, now).await })
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            reports.push(handle.await?);
        }

        Ok(reports)
    }

    pub async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastReport> {
        self.forecast_at(request, Utc::now()).await
    }

    pub async fn forecast_at(
        &self,
        request: &ForecastRequest,
        now: DateTime<Utc>,
    ) -> Result<ForecastReport> {
        let (center, fetched) = self.acquire(&request.lookback, now).await;
        assemble_forecast(request, center, fetched, now, &mut rand::thread_rng())
    }
}

/// Aggregate fetched observations, substituting a synthetic series shaped
/// by `profile` when the fetch failed or produced nothing usable.
pub fn resolve_series<R: Rng + ?Sized>(
    kind: PollutantKind,
    hours: u32,
    center: Coordinate,
    fetched: std::result::Result<Vec<Observation>, SourceError>,
    profile: SyntheticProfile,
    now: DateTime<Utc>,
    rng: &mut R,
) -> SeriesOutcome {
    let (aggregation, origin) = match fetched {
        Ok(observations) => {
            let aggregation = SpatialAggregator::new().aggregate(&observations);
            if aggregation.is_empty() {
                info!(
                    received = observations.len(),
                    discarded = aggregation.discarded,
                    "No usable measurements; using synthetic series"
                );
                (aggregation, DataOrigin::FallbackEmpty)
            } else {
                (aggregation, DataOrigin::Measured)
            }
        }
        Err(e) => {
            warn!(error = %e, "Measurement source unavailable; using synthetic series");
            (Aggregation::default(), DataOrigin::FallbackUnavailable)
        }
    };

    if !origin.is_fallback() {
        return SeriesOutcome {
            center,
            origin,
            aggregation,
        };
    }

    let generator = SyntheticSeriesGenerator::with_profile(profile);
    let fallback = Aggregation {
        series: generator.generate_with_rng(kind, hours, now, rng),
        locations: generator.locations_with_rng(kind, center, rng),
        discarded: aggregation.discarded,
    };

    SeriesOutcome {
        center,
        origin,
        aggregation: fallback,
    }
}

/// Build a report from an already-completed fetch.
pub fn assemble_report<R: Rng + ?Sized>(
    request: &ReportRequest,
    center: Coordinate,
    fetched: std::result::Result<Vec<Observation>, SourceError>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> AirQualityReport {
    let outcome = resolve_series(
        request.kind,
        request.hours(),
        center,
        fetched,
        SyntheticProfile::RECENT,
        now,
        rng,
    );

    let latest = outcome.aggregation.series.last().cloned();
    let latest_index = latest
        .as_ref()
        .map(|point| IndexMapper::new().compute(request.kind, point.value));

    AirQualityReport {
        city: request.city.clone(),
        parameter: request.kind,
        center: outcome.center,
        source: outcome.origin,
        series: outcome.aggregation.series,
        latest,
        latest_index,
        locations: outcome.aggregation.locations,
        discarded: outcome.aggregation.discarded,
    }
}

/// Build a forecast from an already-completed fetch of the lookback window.
pub fn assemble_forecast<R: Rng + ?Sized>(
    request: &ForecastRequest,
    center: Coordinate,
    fetched: std::result::Result<Vec<Observation>, SourceError>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<ForecastReport> {
    let lookback = &request.lookback;
    let outcome = resolve_series(
        lookback.kind,
        lookback.hours(),
        center,
        fetched,
        SyntheticProfile::LOOKBACK,
        now,
        rng,
    );

    let forecasts =
        TrendForecaster::new().forecast(&outcome.aggregation.series, request.horizon_hours())?;

    Ok(ForecastReport {
        city: lookback.city.clone(),
        parameter: lookback.kind,
        source: outcome.origin,
        forecasts,
    })
}
