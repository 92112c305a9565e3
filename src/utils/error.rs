use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unexpected response format: {0}")]
    FormatError(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Chart rendering error: {message}")]
    ChartError { message: String },

    #[error("No numeric vaccine counts to plot")]
    EmptyChartError,

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    Storage,
    Chart,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NetworkError(_) | Self::FormatError(_) | Self::UnexpectedError(_) => {
                ErrorCategory::Fetch
            }
            Self::CsvError(_) | Self::IoError(_) => ErrorCategory::Storage,
            Self::ChartError { .. } | Self::EmptyChartError => ErrorCategory::Chart,
            Self::InvalidConfigValueError { .. } | Self::MissingConfigError { .. } => {
                ErrorCategory::Config
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // The run already produced its CSV by the time the chart is
            // found empty; treat as a warning, not a failure.
            Self::EmptyChartError => ErrorSeverity::Low,
            Self::NetworkError(_) | Self::FormatError(_) => ErrorSeverity::High,
            Self::CsvError(_) | Self::IoError(_) | Self::ChartError { .. } => ErrorSeverity::High,
            Self::InvalidConfigValueError { .. } | Self::MissingConfigError { .. } => {
                ErrorSeverity::Medium
            }
            Self::UnexpectedError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::NetworkError(_) => {
                "Check your network connection and that the API endpoint is reachable".to_string()
            }
            Self::FormatError(_) => {
                "The upstream API may have changed its response shape; inspect the raw response"
                    .to_string()
            }
            Self::UnexpectedError(_) => {
                "Re-run with --verbose and report the full log if the failure persists".to_string()
            }
            Self::CsvError(_) | Self::IoError(_) => {
                "Verify the output directory exists and is writable".to_string()
            }
            Self::ChartError { .. } => {
                "The chart could not be rendered; verify the chart output path is writable"
                    .to_string()
            }
            Self::EmptyChartError => {
                "Increase --lastdays or verify the API returned numeric timelines".to_string()
            }
            Self::InvalidConfigValueError { .. } | Self::MissingConfigError { .. } => {
                "Run with --help to see the expected configuration values".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NetworkError(_) => "Could not reach the vaccine coverage API".to_string(),
            Self::FormatError(_) => "The API returned data in an unexpected shape".to_string(),
            Self::UnexpectedError(_) => "An unexpected failure interrupted the pipeline".to_string(),
            Self::CsvError(_) | Self::IoError(_) => "Failed to write the output files".to_string(),
            Self::ChartError { .. } => "Failed to render the coverage chart".to_string(),
            Self::EmptyChartError => "No plottable data; the chart was skipped".to_string(),
            Self::InvalidConfigValueError { field, .. } => {
                format!("Configuration value for '{}' is invalid", field)
            }
            Self::MissingConfigError { field } => {
                format!("Configuration value for '{}' is missing", field)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
