use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn, Level};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::models::{ForecastRequest, PollutantKind, ReportRequest};
use crate::processors::{IndexMapper, ReportProcessor};
use crate::settings::Settings;
use crate::sources::FileMeasurementSource;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "Loaded settings");

    match cli.command {
        Commands::Index { pollutant, value } => {
            let kind = pollutant_or_default(pollutant.as_deref(), &settings);
            let result = IndexMapper::new().compute(kind, value);

            println!(
                "{} {:.1} {} -> {}",
                kind.display_name(),
                value,
                kind.units(),
                result.summary()
            );
        }

        Commands::Report {
            city,
            pollutant,
            hours,
            observations,
            json,
        } => {
            let kind = pollutant_or_default(pollutant.as_deref(), &settings);
            let hours = hours.unwrap_or(settings.default_lookback_hours as i64);
            let cities = if city.is_empty() {
                vec![settings.default_city.clone()]
            } else {
                city
            };

            let processor = build_processor(&settings, observations);
            let requests: Vec<ReportRequest> = cities
                .iter()
                .map(|c| ReportRequest::new(c.as_str(), kind.token(), hours))
                .collect();

            info!(requests = requests.len(), "Building reports");
            let reports = processor.report_many(requests).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", report.summary());
                }
            }
        }

        Commands::Forecast {
            city,
            pollutant,
            lookback,
            horizon,
            observations,
            json,
        } => {
            let kind = pollutant_or_default(pollutant.as_deref(), &settings);
            let city = city.unwrap_or_else(|| settings.default_city.clone());
            let lookback = lookback.unwrap_or(settings.default_lookback_hours as i64);
            let horizon = horizon.unwrap_or(settings.default_horizon_hours as i64);

            let processor = build_processor(&settings, observations);
            let request =
                ForecastRequest::new(ReportRequest::new(city, kind.token(), lookback), horizon);
            let report = processor.forecast(&request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.summary());
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    Ok(())
}

fn pollutant_or_default(token: Option<&str>, settings: &Settings) -> PollutantKind {
    match token {
        Some(token) => {
            if PollutantKind::recognize(token).is_none() {
                warn!(token, "Unknown pollutant; using PM2.5");
            }
            PollutantKind::from_token(token)
        }
        None => settings.default_pollutant(),
    }
}

fn build_processor(settings: &Settings, observations: Vec<PathBuf>) -> ReportProcessor {
    let source = Arc::new(FileMeasurementSource::from_paths(observations));
    ReportProcessor::from_settings(settings, source)
}
