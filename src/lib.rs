pub mod cli;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod sources;
pub mod utils;

pub use error::{AqiError, Result};
pub use processors::{aggregate, compute_index, forecast, synthesize};
