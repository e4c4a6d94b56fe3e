use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aqi-processor")]
#[command(about = "Air-quality index, reporting and short-range forecasting")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Settings file [default: ./aqi.toml when present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Map a single concentration to an index value and category
    Index {
        #[arg(
            short,
            long,
            help = "Pollutant token: pm25, pm10, no2 or o3 [default: from settings]"
        )]
        pollutant: Option<String>,

        #[arg(long, allow_negative_numbers = true, help = "Concentration in µg/m³")]
        value: f64,
    },

    /// Build an air-quality report for one or more cities
    Report {
        #[arg(
            short = 'C',
            long,
            help = "City name; repeat for several cities [default: from settings]"
        )]
        city: Vec<String>,

        #[arg(short, long, help = "Pollutant token [default: from settings]")]
        pollutant: Option<String>,

        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Lookback window in hours, clamped to 1..=168 [default: from settings]"
        )]
        hours: Option<i64>,

        #[arg(
            short,
            long,
            required = true,
            help = "Observation file or directory of CSV/JSON files; repeatable"
        )]
        observations: Vec<PathBuf>,

        #[arg(long, default_value = "false", help = "Print JSON instead of a summary")]
        json: bool,
    },

    /// Forecast the next hours from the recent trend
    Forecast {
        #[arg(short = 'C', long, help = "City name [default: from settings]")]
        city: Option<String>,

        #[arg(short, long, help = "Pollutant token [default: from settings]")]
        pollutant: Option<String>,

        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Lookback window in hours, clamped to 1..=168 [default: from settings]"
        )]
        lookback: Option<i64>,

        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Forecast horizon in hours, clamped to 1..=48 [default: from settings]"
        )]
        horizon: Option<i64>,

        #[arg(
            short,
            long,
            required = true,
            help = "Observation file or directory of CSV/JSON files; repeatable"
        )]
        observations: Vec<PathBuf>,

        #[arg(long, default_value = "false", help = "Print JSON instead of a summary")]
        json: bool,
    },
}
