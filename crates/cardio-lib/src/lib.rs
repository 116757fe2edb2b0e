pub mod buffer;
pub mod config;
pub mod detectors;
pub mod generator;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod signal;

pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{BatchReport, EcgPipeline, Summary, Totals};
pub use signal::*;
