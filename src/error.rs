use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Required column '{column}' not found in header")]
    MissingColumn { column: String },

    #[error("Line {line}, column '{column}': {message}")]
    InvalidRow {
        line: u64,
        column: String,
        message: String,
    },

    #[error("Temperature validation error: {message}")]
    TemperatureValidation { message: String },

    #[error("Dataset contains no usable rows")]
    EmptyDataset,

    #[error("Town '{0}' is not present in the dataset")]
    UnknownTown(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Date {date} is outside the dataset bounds {min} to {max}")]
    DateOutOfBounds {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}
