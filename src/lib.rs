pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{engine::ChartEngine, pipeline::ScatterPipeline};
pub use domain::model::{Dataset, DatasetOrigin, OutputFormat, RaceRecord, ScatterPlot};
pub use utils::error::{ChartError, Result};
