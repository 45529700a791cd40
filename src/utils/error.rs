use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid record #{index}, field '{field}': {reason}")]
    InvalidRecordError {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("Dataset is empty, nothing to plot")]
    EmptyDatasetError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ChartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChartError::ApiError(_) | ChartError::HttpStatusError { .. } => ErrorCategory::Network,
            ChartError::SerializationError(_)
            | ChartError::InvalidRecordError { .. }
            | ChartError::EmptyDatasetError => ErrorCategory::Data,
            ChartError::ConfigValidationError { .. }
            | ChartError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ChartError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常可重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ChartError::ApiError(_) | ChartError::HttpStatusError { .. } => {
                "Check the network connection and the dataset URL, or run with --offline"
            }
            ChartError::IoError(_) => "Check that the output directory is writable",
            ChartError::SerializationError(_) => {
                "Make sure the dataset is a JSON array of race records"
            }
            ChartError::ConfigValidationError { .. } | ChartError::InvalidConfigValueError { .. } => {
                "Review the command line arguments or the TOML configuration file"
            }
            ChartError::InvalidRecordError { .. } => {
                "Fix the offending record; times must be formatted as MM:SS"
            }
            ChartError::EmptyDatasetError => "Provide a dataset with at least one race record",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ChartError::ApiError(_) | ChartError::HttpStatusError { .. } => {
                format!("Could not download the dataset: {}", self)
            }
            ChartError::IoError(e) => format!("Could not write the chart: {}", e),
            ChartError::InvalidRecordError { .. } | ChartError::SerializationError(_) => {
                format!("The dataset is malformed: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
