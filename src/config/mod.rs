#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_path, validate_positive_number, validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_ENDPOINT: &str = "https://disease.sh/v3/covid-19/vaccine/coverage/countries";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "vaccine-pipeline"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Fetches, persists and charts COVID-19 vaccine coverage data")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_API_ENDPOINT))]
    pub api_endpoint: String,

    /// How many days of timeline history the API should return.
    #[cfg_attr(feature = "cli", arg(long, default_value = "1"))]
    pub lastdays: u32,

    #[cfg_attr(feature = "cli", arg(long, default_value = "."))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "vaccine_coverage.csv"))]
    pub csv_file: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "vaccine_coverage.png"))]
    pub chart_file: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "vaccine_pipeline.log"))]
    pub log_file: String,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log CPU/memory stats per phase"))]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn lastdays(&self) -> u32 {
        self.lastdays
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn csv_file(&self) -> &str {
        &self.csv_file
    }

    fn chart_file(&self) -> &str {
        &self.chart_file
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_positive_number("lastdays", self.lastdays as usize, 1)?;
        validate_path("output_path", &self.output_path)?;
        validate_path("log_file", &self.log_file)?;
        validate_file_extensions("csv_file", &[self.csv_file.clone()], &["csv"])?;
        validate_file_extensions("chart_file", &[self.chart_file.clone()], &["png"])?;
        Ok(())
    }
}
