pub mod breakpoints;
pub mod index_mapper;
pub mod report_processor;
pub mod spatial_aggregator;
pub mod synthetic_generator;
pub mod trend_forecaster;

pub use breakpoints::{table, Breakpoint};
pub use index_mapper::{compute_index, IndexMapper};
pub use report_processor::{
    assemble_forecast, assemble_report, resolve_series, ReportProcessor, SeriesOutcome,
};
pub use spatial_aggregator::{aggregate, Aggregation, SpatialAggregator};
pub use synthetic_generator::{
    baseline, synthesize, SyntheticProfile, SyntheticSeriesGenerator, Waveform,
};
pub use trend_forecaster::{forecast, TrendForecaster};
