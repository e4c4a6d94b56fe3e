use crate::error::{AqiError, Result};
use crate::models::{Observation, PollutantKind};
use crate::utils::constants::{CSV_EXTENSION, JSON_EXTENSION};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One CSV row before validation. Every field is read as text so a single
/// bad cell drops its row rather than the file.
#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    value: String,
    #[serde(default)]
    latitude: Option<String>,
    #[serde(default)]
    longitude: Option<String>,
    #[serde(default)]
    parameter: Option<String>,
}

/// Reads observation files: CSV (`timestamp,value,latitude,longitude[,parameter]`)
/// or OpenAQ-style JSON measurement payloads. Malformed entries are skipped.
pub struct ObservationReader {
    pollutant: Option<PollutantKind>,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self { pollutant: None }
    }

    /// Skip entries that name a different pollutant.
    pub fn with_pollutant(pollutant: PollutantKind) -> Self {
        Self {
            pollutant: Some(pollutant),
        }
    }

    /// Read a single file, or every `.csv`/`.json` file in a directory.
    pub fn read_path(&self, path: &Path) -> Result<Vec<Observation>> {
        if !path.is_dir() {
            return self.read_observations(path);
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| Self::is_observation_file(p))
            .collect();
        files.sort();

        let mut observations = Vec::new();
        for file in files {
            observations.extend(self.read_observations(&file)?);
        }

        Ok(observations)
    }

    /// Read one observation file, choosing the format by extension.
    pub fn read_observations(&self, path: &Path) -> Result<Vec<Observation>> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let observations = match extension.as_deref() {
            Some(CSV_EXTENSION) => self.read_csv(reader)?,
            Some(JSON_EXTENSION) => self.read_json(reader)?,
            _ => {
                return Err(AqiError::InvalidFormat(format!(
                    "Unsupported observation file: {}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), count = observations.len(), "Read observations");
        Ok(observations)
    }

    pub fn read_csv<R: Read>(&self, reader: R) -> Result<Vec<Observation>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut observations = Vec::new();
        let mut skipped = 0usize;

        for row in csv_reader.deserialize::<CsvRow>() {
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };

            match self.parse_csv_row(&row) {
                Some(observation) => observations.push(observation),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "Skipped malformed CSV rows");
        }

        Ok(observations)
    }

    fn parse_csv_row(&self, row: &CsvRow) -> Option<Observation> {
        if !self.accepts(row.parameter.as_deref()) {
            return None;
        }

        let timestamp = parse_timestamp(&row.timestamp)?;
        let value = row.value.parse::<f64>().ok()?;

        let mut observation = Observation::new(timestamp, value);
        observation.latitude = parse_optional_number(row.latitude.as_deref());
        observation.longitude = parse_optional_number(row.longitude.as_deref());

        Some(observation)
    }

    /// Accepts `{"results": [...]}` (OpenAQ v2/v3) or a bare array of
    /// measurements.
    pub fn read_json<R: Read>(&self, reader: R) -> Result<Vec<Observation>> {
        let payload: Value = serde_json::from_reader(reader)?;

        let entries = match &payload {
            Value::Array(entries) => entries.as_slice(),
            Value::Object(map) => match map.get("results") {
                Some(Value::Array(entries)) => entries.as_slice(),
                _ => &[],
            },
            _ => {
                return Err(AqiError::InvalidFormat(
                    "Measurement payload must be an object or an array".to_string(),
                ))
            }
        };

        let observations: Vec<Observation> = entries
            .iter()
            .filter_map(|entry| self.parse_json_entry(entry))
            .collect();

        if observations.len() < entries.len() {
            debug!(
                skipped = entries.len() - observations.len(),
                "Skipped malformed measurements"
            );
        }

        Ok(observations)
    }

    fn parse_json_entry(&self, entry: &Value) -> Option<Observation> {
        let parameter = entry
            .get("parameter")
            .and_then(|p| p.as_str().or_else(|| p.get("name").and_then(Value::as_str)));
        if !self.accepts(parameter) {
            return None;
        }

        // Only JSON numbers count; "12.5" as a string is malformed.
        let value = entry.get("value")?.as_f64()?;

        let utc = entry
            .get("date")
            .or_else(|| entry.get("datetime"))
            .and_then(|d| d.get("utc"))
            .and_then(Value::as_str)?;
        let timestamp = parse_timestamp(utc)?;

        let mut observation = Observation::new(timestamp, value);
        if let Some(coordinates) = entry.get("coordinates") {
            observation.latitude = coordinates.get("latitude").and_then(Value::as_f64);
            observation.longitude = coordinates.get("longitude").and_then(Value::as_f64);
        }

        Some(observation)
    }

    /// Untagged entries always pass. A tagged entry passes only when its tag
    /// names the wanted pollutant; tags outside the known kinds never do.
    fn accepts(&self, parameter: Option<&str>) -> bool {
        let Some(wanted) = self.pollutant else {
            return true;
        };

        match parameter.map(str::trim).filter(|p| !p.is_empty()) {
            Some(token) => PollutantKind::recognize(token) == Some(wanted),
            None => true,
        }
    }

    fn is_observation_file(path: &Path) -> bool {
        path.is_file()
            && matches!(
                path.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase())
                    .as_deref(),
                Some(CSV_EXTENSION) | Some(JSON_EXTENSION)
            )
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// RFC 3339 instants, or naive `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`
/// taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn parse_optional_number(raw: Option<&str>) -> Option<f64> {
    raw.filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T12:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T14:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("not a time"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_read_csv_skips_malformed_rows() -> Result<()> {
        let data = "\
timestamp,value,latitude,longitude
2024-05-01T10:00:00Z,12.5,34.05,-118.24
2024-05-01T11:00:00Z,abc,34.05,-118.24
yesterday,9.0,,
2024-05-01T12:00:00Z,14.0,,
2024-05-01T13:00:00Z,NaN,,
";
        let observations = ObservationReader::new().read_csv(data.as_bytes())?;

        assert_eq!(observations.len(), 3);
        assert_eq!(observations[0].value, 12.5);
        assert_eq!(observations[0].latitude, Some(34.05));
        assert_eq!(observations[1].value, 14.0);
        assert_eq!(observations[1].latitude, None);
        // Parses as a number; the aggregator drops it later
        assert!(observations[2].value.is_nan());

        Ok(())
    }

    #[test]
    fn test_read_csv_filters_by_parameter() -> Result<()> {
        let data = "\
timestamp,value,latitude,longitude,parameter
2024-05-01T10:00:00Z,12.5,,,pm25
2024-05-01T11:00:00Z,40.0,,,no2
2024-05-01T11:30:00Z,900.0,,,so2
2024-05-01T11:45:00Z,800.0,,,CO
2024-05-01T12:00:00Z,13.5,,,
";
        let observations =
            ObservationReader::with_pollutant(PollutantKind::Pm25).read_csv(data.as_bytes())?;

        let values: Vec<f64> = observations.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![12.5, 13.5]);

        Ok(())
    }

    #[test]
    fn test_read_openaq_json() -> Result<()> {
        let data = r#"{
            "meta": {"found": 4},
            "results": [
                {"value": 10.0, "unit": "µg/m³", "parameter": "pm25",
                 "date": {"utc": "2024-05-01T10:00:00Z", "local": "2024-05-01T03:00:00-07:00"},
                 "coordinates": {"latitude": 34.05001, "longitude": -118.24001}},
                {"value": "11.0", "parameter": "pm25",
                 "date": {"utc": "2024-05-01T11:00:00Z"}},
                {"value": 12.0, "parameter": "pm25", "date": {"utc": "garbage"}},
                {"value": 13.0, "parameter": {"name": "pm25"},
                 "datetime": {"utc": "2024-05-01T13:00:00Z"}}
            ]
        }"#;

        let observations = ObservationReader::new().read_json(data.as_bytes())?;

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].value, 10.0);
        assert_eq!(observations[0].latitude, Some(34.05001));
        assert_eq!(observations[1].value, 13.0);
        assert_eq!(observations[1].latitude, None);

        Ok(())
    }

    #[test]
    fn test_read_json_skips_unknown_pollutants() -> Result<()> {
        let data = r#"{"results": [
            {"value": 10.0, "parameter": "pm25", "date": {"utc": "2024-05-01T10:00:00Z"}},
            {"value": 900.0, "parameter": "so2", "date": {"utc": "2024-05-01T10:00:00Z"}},
            {"value": 800.0, "parameter": {"name": "co"}, "date": {"utc": "2024-05-01T10:00:00Z"}},
            {"value": 11.0, "date": {"utc": "2024-05-01T11:00:00Z"}}
        ]}"#;

        let filtered =
            ObservationReader::with_pollutant(PollutantKind::Pm25).read_json(data.as_bytes())?;
        let values: Vec<f64> = filtered.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![10.0, 11.0]);

        // Without a pollutant filter every well-formed entry is kept
        assert_eq!(ObservationReader::new().read_json(data.as_bytes())?.len(), 4);

        Ok(())
    }

    #[test]
    fn test_read_json_without_results() -> Result<()> {
        let observations = ObservationReader::new().read_json(r#"{"meta": {}}"#.as_bytes())?;
        assert!(observations.is_empty());

        assert!(ObservationReader::new().read_json("42".as_bytes()).is_err());
        Ok(())
    }

    #[test]
    fn test_read_path_by_extension() -> Result<()> {
        let mut csv_file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(csv_file, "timestamp,value,latitude,longitude")?;
        writeln!(csv_file, "2024-05-01T10:00:00Z,7.0,,")?;

        let observations = ObservationReader::new().read_path(csv_file.path())?;
        assert_eq!(observations.len(), 1);

        let other = NamedTempFile::new()?;
        assert!(ObservationReader::new().read_path(other.path()).is_err());

        Ok(())
    }

    #[test]
    fn test_read_directory() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(
            dir.path().join("a.csv"),
            "timestamp,value,latitude,longitude\n2024-05-01T10:00:00Z,1.0,,\n",
        )?;
        std::fs::write(
            dir.path().join("b.json"),
            r#"[{"value": 2.0, "date": {"utc": "2024-05-01T11:00:00Z"}}]"#,
        )?;
        std::fs::write(dir.path().join("notes.txt"), "ignored")?;

        let observations = ObservationReader::new().read_path(dir.path())?;
        let values: Vec<f64> = observations.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![1.0, 2.0]);

        Ok(())
    }
}
