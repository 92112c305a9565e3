pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{cli::LocalStorage, CliConfig};

pub use crate::core::{etl::PipelineEngine, pipeline::VaccinePipeline};
pub use crate::domain::model::{VaccineCount, VaccineRecord};
pub use crate::utils::error::{PipelineError, Result};
