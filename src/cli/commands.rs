use crate::analyzers::DatasetAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::cli::interactive::{run_interactive, InteractiveDashboard, HELP};
use crate::error::Result;
use crate::models::WeatherTable;
use crate::processors::{DashboardOptions, DashboardPipeline, QualityChecker};
use crate::readers::{CachedLoader, LoadReport, WeatherReader};
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use crate::writers::{JsonReportWriter, ReportFormat, TextReportWriter};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn, Level};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = Settings::load(cli.config.as_deref())?;
    let reader = reader_for(&settings, cli.lenient);

    match cli.command {
        Commands::Show {
            input,
            towns,
            start,
            end,
            format,
            rows,
            bins,
        } => {
            let path = data_path(&settings, input);
            let table = load(&reader, &path, format == ReportFormat::Text)?;

            let towns = if towns.is_empty() { None } else { Some(towns) };
            let selection = table.selection(towns, start, end)?;

            let pipeline = DashboardPipeline::new(dashboard_options(&settings, bins));
            let view = pipeline.run(&table, &selection);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            match format {
                ReportFormat::Text => TextReportWriter::new()
                    .with_table_rows(rows.unwrap_or(settings.table_rows))
                    .write(&view, &mut out)?,
                ReportFormat::Json => JsonReportWriter::new().write_view(&view, &mut out)?,
            }
        }

        Commands::Info { input, sample } => {
            let path = data_path(&settings, input);
            println!("Analyzing weather data: {}", path.display());

            let table = load(&reader, &path, true)?;
            let summary = DatasetAnalyzer::new().analyze(&table);
            println!("\n{}", summary.detailed_summary());

            if sample > 0 {
                println!("\nSample Records (showing {} records):", sample.min(table.len()));
                for (i, record) in table.records().iter().take(sample).enumerate() {
                    println!(
                        "{}. {} on {}: min={}, avg={}, max={}, humidity={}, precip={}, wind={}",
                        i + 1,
                        record.town,
                        record.date,
                        describe(record.min_temp_c, "°C"),
                        describe(record.avg_temp_c, "°C"),
                        describe(record.max_temp_c, "°C"),
                        describe(record.humidity, "%"),
                        describe(record.precipitation_mm, "mm"),
                        describe(record.wind_kph, "km/h"),
                    );
                }
            }
        }

        Commands::Validate { input } => {
            let path = data_path(&settings, input);
            println!("Validating weather data: {}", path.display());

            // Lenient read: every rejected row is listed
            let progress = ProgressReporter::new_spinner("Validating data...", false);
            let (table, load_report) =
                WeatherReader::with_strict_parsing(false).read_table_with_report(&path)?;
            progress.finish_with_message("Validation complete");

            print_rejections(&load_report);

            let checker = QualityChecker::new();
            let report = checker.check(table.records());
            println!("\n{}", checker.generate_summary(&report));

            if report.violations.is_empty() && load_report.rows_rejected == 0 {
                println!("✅ All data passed validation checks");
            } else {
                println!(
                    "⚠️  Found {} rejected rows and {} expectation violations",
                    load_report.rows_rejected,
                    report.violations.len()
                );
            }
        }

        Commands::Interactive { input, watch } => {
            let path = data_path(&settings, input);
            let loader = CachedLoader::new(path, reader);
            let pipeline = DashboardPipeline::new(dashboard_options(&settings, None));

            let dashboard = InteractiveDashboard::new(loader, pipeline)?;
            let writer = TextReportWriter::new().with_table_rows(settings.table_rows);
            let interval = watch.then(|| Duration::from_millis(settings.watch_interval_ms));

            println!("{}\n", HELP);
            run_interactive(dashboard, writer, interval).await?;
        }
    }

    Ok(())
}

/// Strict parsing unless either the settings or `--lenient` relax it
fn reader_for(settings: &Settings, lenient: bool) -> WeatherReader {
    WeatherReader::with_strict_parsing(settings.strict_parsing && !lenient)
}

fn data_path(settings: &Settings, input: Option<PathBuf>) -> PathBuf {
    input.unwrap_or_else(|| settings.data_path.clone())
}

fn dashboard_options(settings: &Settings, bins: Option<usize>) -> DashboardOptions {
    DashboardOptions {
        histogram_bins: bins.unwrap_or(settings.histogram_bins).max(1),
    }
}

fn load(reader: &WeatherReader, path: &Path, show_progress: bool) -> Result<WeatherTable> {
    let progress = ProgressReporter::new_spinner("Loading weather data...", !show_progress);
    let (table, report) = reader.read_table_with_report(path)?;
    progress.finish_and_clear();

    if report.rows_rejected > 0 {
        warn!("{}", report.summary());
        for rejection in &report.rejections {
            debug!(line = rejection.line, column = %rejection.column, "{}", rejection.message);
        }
    }
    Ok(table)
}

fn print_rejections(report: &LoadReport) {
    println!("{}", report.summary());
    for rejection in &report.rejections {
        println!(
            "  line {}, column '{}': {}",
            rejection.line, rejection.column, rejection.message
        );
    }
}

fn describe(value: Option<f64>, units: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v, units),
        None => "n/a".to_string(),
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    if installed.is_err() {
        debug!("Tracing subscriber already installed");
    }
    if let Some(path) = log_file {
        debug!(path = %path.display(), "Logging to file");
    }
    Ok(())
}
