use crate::models::{is_chronological, LocationAverage, Observation, SeriesPoint};
use crate::utils::coordinates::grid_key;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub series: Vec<SeriesPoint>,
    pub locations: Vec<LocationAverage>,
    pub discarded: usize,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Running totals for one grid cell. The reported coordinate is the first
/// observation seen in the cell.
#[derive(Debug, Clone)]
struct CellAccumulator {
    latitude: f64,
    longitude: f64,
    sum: f64,
    count: usize,
}

impl CellAccumulator {
    fn average(&self) -> LocationAverage {
        LocationAverage {
            latitude: self.latitude,
            longitude: self.longitude,
            average: self.sum / self.count as f64,
            count: self.count,
        }
    }
}

pub struct SpatialAggregator;

impl SpatialAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Reduce raw observations into a series (input order preserved) and
    /// per-cell location averages (first-seen order).
    pub fn aggregate(&self, observations: &[Observation]) -> Aggregation {
        let mut series = Vec::with_capacity(observations.len());
        let mut cells: Vec<CellAccumulator> = Vec::new();
        let mut cell_index: HashMap<(i64, i64), usize> = HashMap::new();
        let mut discarded = 0;

        for observation in observations {
            if !observation.has_usable_value() {
                discarded += 1;
                continue;
            }

            let coordinate = observation.coordinate();
            series.push(
                SeriesPoint::new(observation.timestamp, observation.value)
                    .with_coordinate(coordinate),
            );

            let Some(coordinate) = coordinate else {
                continue;
            };

            let key = grid_key(coordinate.latitude, coordinate.longitude);
            let slot = *cell_index.entry(key).or_insert_with(|| {
                cells.push(CellAccumulator {
                    latitude: coordinate.latitude,
                    longitude: coordinate.longitude,
                    sum: 0.0,
                    count: 0,
                });
                cells.len() - 1
            });

            let cell = &mut cells[slot];
            cell.sum += observation.value;
            cell.count += 1;
        }

        if !is_chronological(&series) {
            warn!(
                points = series.len(),
                "Observations are not in chronological order; keeping source order"
            );
        }

        let locations: Vec<LocationAverage> = cells.iter().map(CellAccumulator::average).collect();

        debug!(
            points = series.len(),
            locations = locations.len(),
            discarded,
            "Aggregated observations"
        );

        Aggregation {
            series,
            locations,
            discarded,
        }
    }
}

impl Default for SpatialAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Series and location averages for a batch of observations.
pub fn aggregate(observations: &[Observation]) -> Aggregation {
    SpatialAggregator::new().aggregate(observations)
}
