use crate::utils::parse_date;
use crate::writers::ReportFormat;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-dashboard")]
#[command(about = "Filter per-town daily weather observations and summarize them as charts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Settings file [default: dashboard.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Skip malformed rows instead of failing the load"
    )]
    pub lenient: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the dashboard once for a selection
    Show {
        #[arg(short, long, help = "Input CSV file [default: from settings]")]
        input: Option<PathBuf>,

        #[arg(short, long = "town", help = "Town to include (repeatable, default: all)")]
        towns: Vec<String>,

        #[arg(long, value_parser = parse_date, help = "First date [default: earliest in data]")]
        start: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date, help = "Last date [default: latest in data]")]
        end: Option<NaiveDate>,

        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        #[arg(long, help = "Rows shown in the data table")]
        rows: Option<usize>,

        #[arg(long, help = "Number of histogram bins")]
        bins: Option<usize>,
    },

    /// Display a summary of the dataset
    Info {
        #[arg(short, long, help = "Input CSV file [default: from settings]")]
        input: Option<PathBuf>,

        #[arg(short, long, default_value = "5")]
        sample: usize,
    },

    /// Check the dataset for gaps and implausible values
    Validate {
        #[arg(short, long, help = "Input CSV file [default: from settings]")]
        input: Option<PathBuf>,
    },

    /// Change the selection from stdin and re-render after each change
    Interactive {
        #[arg(short, long, help = "Input CSV file [default: from settings]")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "Reload the table when the file changes")]
        watch: bool,
    },
}
