use aqi_processor::models::{
    Coordinate, DataOrigin, ForecastRequest, Observation, PollutantKind, ReportRequest,
    SeverityTier,
};
use aqi_processor::processors::{ReportProcessor, SyntheticProfile};
use aqi_processor::settings::Settings;
use aqi_processor::sources::{
    FileMeasurementSource, LocationResolver, MeasurementQuery, MeasurementSource, PlaceGazetteer,
    SourceError,
};
use aqi_processor::{aggregate, compute_index, forecast, synthesize};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn los_angeles() -> Coordinate {
    Coordinate::new(34.0522, -118.2437)
}

/// Returns a fixed outcome and remembers every query it was asked.
struct ScriptedSource {
    outcome: Result<Vec<Observation>, u16>,
    delay: Option<Duration>,
    queries: Mutex<Vec<MeasurementQuery>>,
}

impl ScriptedSource {
    fn returning(observations: Vec<Observation>) -> Self {
        Self {
            outcome: Ok(observations),
            delay: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            outcome: Err(status),
            delay: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn stalling(delay: Duration) -> Self {
        Self {
            outcome: Ok(vec![]),
            delay: Some(delay),
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MeasurementSource for ScriptedSource {
    async fn fetch(&self, query: &MeasurementQuery) -> Result<Vec<Observation>, SourceError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Ok(observations) => Ok(observations.clone()),
            Err(status) => Err(SourceError::Status(*status)),
        }
    }
}

struct BrokenResolver;

#[async_trait]
impl LocationResolver for BrokenResolver {
    async fn resolve(&self, _place: &str) -> Result<Option<Coordinate>, SourceError> {
        Err(SourceError::Transport("dns failure".to_string()))
    }
}

/// Knows every place, always at an impossible latitude.
struct ConfusedResolver;

#[async_trait]
impl LocationResolver for ConfusedResolver {
    async fn resolve(&self, _place: &str) -> Result<Option<Coordinate>, SourceError> {
        Ok(Some(Coordinate::new(123.0, 0.0)))
    }
}

fn recent_observations() -> Vec<Observation> {
    let end = Utc::now();
    vec![
        Observation::new(end - ChronoDuration::hours(3), 8.0).with_coordinates(34.05, -118.24),
        Observation::new(end - ChronoDuration::hours(2), 12.0).with_coordinates(34.05, -118.24),
        Observation::new(end - ChronoDuration::hours(1), f64::NAN),
        Observation::new(end, 35.4).with_coordinates(34.10, -118.30),
    ]
}

fn processor_with(source: Arc<dyn MeasurementSource>) -> ReportProcessor {
    ReportProcessor::new(Arc::new(PlaceGazetteer::with_default_city()), source)
}

#[tokio::test]
async fn test_measured_report_end_to_end() {
    let source = Arc::new(ScriptedSource::returning(recent_observations()));
    let processor = processor_with(source.clone());

    let report = processor
        .report(&ReportRequest::new("Los Angeles", "pm25", 24))
        .await;

    assert_eq!(report.source, DataOrigin::Measured);
    assert_eq!(report.center, los_angeles());
    assert_eq!(report.series.len(), 3);
    assert_eq!(report.discarded, 1);
    assert_eq!(report.locations.len(), 2);
    assert_eq!(report.locations[0].average, 10.0);
    assert_eq!(report.locations[0].count, 2);

    let index = report.latest_index.expect("latest index");
    assert_eq!(index.index, 100);
    assert_eq!(index.tier, SeverityTier::Moderate);

    let queries = source.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].kind, PollutantKind::Pm25);
    assert_eq!(queries[0].to - queries[0].from, ChronoDuration::hours(24));
}

#[tokio::test]
async fn test_failing_source_yields_synthetic_report() {
    let processor = processor_with(Arc::new(ScriptedSource::failing(503)));

    let report = processor
        .report(&ReportRequest::new("Los Angeles", "pm10", 12))
        .await;

    assert_eq!(report.source, DataOrigin::FallbackUnavailable);
    assert_eq!(report.series.len(), 12);
    assert_eq!(report.locations.len(), 2);
    assert!(report.series.iter().all(|p| p.value >= 0.0));
    assert!(report.latest_index.is_some());
}

#[tokio::test]
async fn test_stalled_source_times_out_into_fallback() {
    let processor = processor_with(Arc::new(ScriptedSource::stalling(Duration::from_secs(10))))
        .with_upstream_timeout(Duration::from_millis(50));

    let started = std::time::Instant::now();
    let report = processor
        .report(&ReportRequest::new("Los Angeles", "pm25", 6))
        .await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.source, DataOrigin::FallbackUnavailable);
    assert_eq!(report.series.len(), 6);
}

#[tokio::test]
async fn test_empty_results_yield_fallback_empty() {
    let processor = processor_with(Arc::new(ScriptedSource::returning(vec![])));

    let report = processor
        .report(&ReportRequest::new("Los Angeles", "o3", 1000))
        .await;

    assert_eq!(report.source, DataOrigin::FallbackEmpty);
    assert_eq!(report.series.len(), 168);
}

#[tokio::test]
async fn test_unknown_or_unresolvable_city_uses_default_center() {
    let source = Arc::new(ScriptedSource::returning(vec![]));
    let fallback_center = Coordinate::new(51.5074, -0.1278);

    let processor = processor_with(source.clone()).with_default_center(fallback_center);
    let report = processor
        .report(&ReportRequest::new("Atlantis", "pm25", 24))
        .await;
    assert_eq!(report.center, fallback_center);
    assert_eq!(report.city, "Atlantis");

    let broken = ReportProcessor::new(Arc::new(BrokenResolver), source.clone());
    let report = broken.report(&ReportRequest::new("Paris", "pm25", 24)).await;
    assert_eq!(report.center, los_angeles());

    let queries = source.queries.lock().unwrap();
    assert_eq!(queries[0].center, fallback_center);
    assert_eq!(queries[1].center, los_angeles());
}

#[tokio::test]
async fn test_out_of_range_resolved_center_is_replaced() {
    let source = Arc::new(ScriptedSource::returning(vec![]));
    let processor = ReportProcessor::new(Arc::new(ConfusedResolver), source.clone());

    let report = processor
        .report(&ReportRequest::new("Paris", "pm25", 24))
        .await;

    assert_eq!(report.center, los_angeles());
    assert_eq!(source.queries.lock().unwrap()[0].center, los_angeles());
}

#[tokio::test]
async fn test_forecast_with_fallback_input() {
    let processor = processor_with(Arc::new(ScriptedSource::failing(500)));
    let request = ForecastRequest::new(ReportRequest::new("Los Angeles", "pm25", 24), 100);

    let report = processor.forecast(&request).await.unwrap();

    assert_eq!(report.source, DataOrigin::FallbackUnavailable);
    assert_eq!(report.forecasts.len(), 48);
    assert!(report.forecasts.iter().all(|p| p.value >= 0.0));
    for pair in report.forecasts.windows(2) {
        assert_eq!(pair[1].time - pair[0].time, ChronoDuration::hours(1));
    }
}

#[tokio::test]
async fn test_report_many_keeps_request_order() {
    let processor = processor_with(Arc::new(ScriptedSource::returning(recent_observations())));
    let requests = vec![
        ReportRequest::new("Los Angeles", "pm25", 24),
        ReportRequest::new("Nowhere", "no2", 24),
        ReportRequest::new("", "pm10", 24),
    ];

    let reports = processor.report_many(requests).await.unwrap();

    let cities: Vec<&str> = reports.iter().map(|r| r.city.as_str()).collect();
    assert_eq!(cities, vec!["Los Angeles", "Nowhere", "Los Angeles"]);
    assert_eq!(reports[1].parameter, PollutantKind::No2);
    assert_eq!(reports[2].parameter, PollutantKind::Pm10);
}

#[tokio::test]
async fn test_file_backed_processor_from_settings() {
    let dir = TempDir::new().unwrap();
    let end = Utc::now();
    let csv = format!(
        "timestamp,value,latitude,longitude,parameter\n\
         {},20.0,48.8566,2.3522,pm25\n\
         {},30.0,48.8566,2.3522,pm25\n\
         {},99.0,48.8566,2.3522,no2\n",
        (end - ChronoDuration::hours(2)).to_rfc3339(),
        (end - ChronoDuration::hours(1)).to_rfc3339(),
        (end - ChronoDuration::hours(1)).to_rfc3339(),
    );
    std::fs::write(dir.path().join("paris.csv"), csv).unwrap();

    let settings = Settings::default();
    let processor = ReportProcessor::from_settings(
        &settings,
        Arc::new(FileMeasurementSource::new(dir.path())),
    );

    let report = processor
        .report(&ReportRequest::new("paris", "pm25", 24))
        .await;

    assert_eq!(report.source, DataOrigin::Measured);
    assert_eq!(report.center, Coordinate::new(48.8566, 2.3522));
    let values: Vec<f64> = report.series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![20.0, 30.0]);
    assert_eq!(report.locations[0].average, 25.0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["source"], "measured");
    assert_eq!(json["locations"][0]["avg"], 25.0);
    assert_eq!(json["latest_index"]["tier"], "moderate");
    assert_eq!(json["latest_index"]["color"], "yellow");
}

#[test]
fn test_index_is_monotonic_over_the_table_range() {
    for kind in PollutantKind::ALL {
        let mut previous = 0;
        for step in 0..=5000 {
            let c = step as f64 * 0.5;
            let result = compute_index(kind, c);
            assert!(result.index <= 500);
            assert!(
                result.index >= previous,
                "{kind} at {c} dropped to {} from {previous}",
                result.index
            );
            previous = result.index;
        }
    }
}

#[test]
fn test_aggregate_then_forecast() {
    let observations: Vec<Observation> = (0..6)
        .map(|i| {
            Observation::new(now() - ChronoDuration::hours(5 - i), 10.0 + i as f64)
                .with_coordinates(34.05, -118.24)
        })
        .collect();

    let aggregation = aggregate(&observations);
    assert_eq!(aggregation.series.len(), 6);
    assert_eq!(aggregation.locations[0].average, 12.5);

    // avg 12.5, last step 15 - 14 = 1
    let forecasts = forecast(&aggregation.series, 2).unwrap();
    let values: Vec<f64> = forecasts.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![12.8, 13.0]);
    assert_eq!(forecasts[0].time, now() + ChronoDuration::hours(1));
}

#[test]
fn test_synthesized_series_stays_near_baseline() {
    let series = synthesize(PollutantKind::Pm25, 24, now());
    let bound = SyntheticProfile::RECENT.max_deviation();

    assert_eq!(series.len(), 24);
    assert_eq!(series[23].time, now());
    for point in &series {
        assert!(point.value >= 0.0);
        // values are rounded to tenths
        assert!((point.value - 22.0).abs() <= bound + 0.05 + 1e-9);
    }
}
