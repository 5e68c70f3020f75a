pub mod json_writer;
pub mod text_writer;

pub use json_writer::JsonReportWriter;
pub use text_writer::TextReportWriter;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}
