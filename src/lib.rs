pub mod cli;
pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod sampling;

pub use config::{ManifestConfig, SampleConfig};
pub use data::{ImageRecord, LabelKey, Manifest, StimulusFile};
pub use error::{ManifestError, Result};
