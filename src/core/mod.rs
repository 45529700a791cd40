pub mod dataset;
pub mod engine;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod scale;

pub use crate::domain::model::{Dataset, RaceRecord, ScatterPlot};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
