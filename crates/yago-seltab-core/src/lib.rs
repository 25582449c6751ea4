pub mod adjacency;
pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod model;
pub mod pipeline;
pub mod ranking;
pub mod selection;

pub use error::{PipelineError, Result};
