use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::AqiError;
use crate::models::Observation;
use crate::readers::ObservationReader;
use crate::sources::{MeasurementQuery, MeasurementSource, SourceError};

/// Measurement source backed by observation files on disk.
///
/// Each fetch re-reads the files, keeps entries for the query's pollutant,
/// and applies the query's time window and search radius.
#[derive(Debug, Clone)]
pub struct FileMeasurementSource {
    paths: Vec<PathBuf>,
}

impl FileMeasurementSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            paths: vec![path.as_ref().to_path_buf()],
        }
    }

    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl MeasurementSource for FileMeasurementSource {
    async fn fetch(&self, query: &MeasurementQuery) -> Result<Vec<Observation>, SourceError> {
        let paths = self.paths.clone();
        let kind = query.kind;

        let observations = tokio::task::spawn_blocking(move || {
            let reader = ObservationReader::with_pollutant(kind);
            let mut observations = Vec::new();
            for path in &paths {
                observations.extend(reader.read_path(path)?);
            }
            Ok::<_, AqiError>(observations)
        })
        .await
        .map_err(AqiError::from)??;

        let total = observations.len();
        let matching: Vec<Observation> = observations
            .into_iter()
            .filter(|o| query.matches(o))
            .collect();

        debug!(
            total,
            matching = matching.len(),
            kind = %query.kind,
            "Filtered file observations"
        );

        Ok(matching)
    }
}
