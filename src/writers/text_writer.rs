use crate::analyzers::{CorrelationMatrix, Histogram, LineChart, ScatterChart};
use crate::error::Result;
use crate::models::{NumericColumn, TownAverages, WeatherRecord};
use crate::processors::DashboardView;
use crate::utils::constants::{BAR_CHART_WIDTH, DEFAULT_TABLE_ROWS, REQUIRED_COLUMNS};
use std::fmt::Write as _;
use std::io::Write;

const NO_DATA: &str = "No data for the current selection";
const DASHBOARD_TITLE: &str = "Kenya Weather Dashboard";

/// Renders a dashboard view as a plain-text report
pub struct TextReportWriter {
    table_rows: usize,
    bar_width: usize,
}

impl TextReportWriter {
    pub fn new() -> Self {
        Self {
            table_rows: DEFAULT_TABLE_ROWS,
            bar_width: BAR_CHART_WIDTH,
        }
    }

    pub fn with_table_rows(mut self, rows: usize) -> Self {
        self.table_rows = rows;
        self
    }

    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width.max(1);
        self
    }

    pub fn write<W: Write>(&self, view: &DashboardView, out: &mut W) -> Result<()> {
        out.write_all(self.render(view).as_bytes())?;
        out.flush()?;
        Ok(())
    }

    pub fn render(&self, view: &DashboardView) -> String {
        let mut report = format!("# {}\n\n", DASHBOARD_TITLE);

        report.push_str(&self.render_table(&view.rows, view.row_count));
        report.push_str("\n## Weather Analysis\n");

        report.push_str("\n### Average Temperature by Town\n");
        report.push_str(&self.render_town_averages(&view.town_averages));

        report.push_str("\n### Distribution of Max Temperature\n");
        report.push_str(&self.render_histogram(&view.max_temp_histogram));

        report.push_str("\n### Avg Temperature vs Humidity\n");
        report.push_str(&render_scatter(&view.humidity_scatter));

        report.push_str("\n### Temperature Trends Over Time\n");
        report.push_str(&render_line(&view.temperature_trends));

        report.push_str("\n### Avg Temperature vs Precipitation\n");
        report.push_str(&render_scatter(&view.precipitation_scatter));

        report.push_str("\n### Correlation Heatmap\n");
        report.push_str(&render_correlation(&view.correlation));

        report
    }

    fn render_table(&self, rows: &[WeatherRecord], row_count: usize) -> String {
        let mut out = format!("### Weather Data ({} rows)\n", row_count);
        if rows.is_empty() {
            let _ = writeln!(out, "{}", NO_DATA);
            return out;
        }

        let town_width = rows
            .iter()
            .map(|r| r.town.chars().count())
            .max()
            .unwrap_or(0)
            .max(REQUIRED_COLUMNS[0].len());

        let _ = write!(
            out,
            "{:<width$}  {:<10}",
            REQUIRED_COLUMNS[0],
            REQUIRED_COLUMNS[1],
            width = town_width
        );
        for column in NumericColumn::FILE_ORDER {
            let _ = write!(out, "  {}", column.name());
        }
        out.push('\n');

        let shown = rows.iter().take(self.table_rows);
        for record in shown {
            let _ = write!(
                out,
                "{:<width$}  {:<10}",
                record.town,
                record.date.to_string(),
                width = town_width
            );
            for column in NumericColumn::FILE_ORDER {
                let cell = format_cell(column.value(record));
                let _ = write!(out, "  {:>w$}", cell, w = column.name().len());
            }
            out.push('\n');
        }

        if rows.len() > self.table_rows {
            let _ = writeln!(out, "(showing {} of {} rows)", self.table_rows, row_count);
        }

        out
    }

    fn render_town_averages(&self, averages: &TownAverages) -> String {
        if averages.is_empty() {
            return format!("{}\n", NO_DATA);
        }

        let town_width = averages.towns().map(|t| t.chars().count()).max().unwrap_or(0);
        let scale = averages
            .means()
            .map(|(_, m)| m.abs())
            .fold(0.0_f64, f64::max);

        let mut out = String::new();
        for entry in averages.entries() {
            match entry.mean_avg_temp_c {
                Some(mean) => {
                    let _ = writeln!(
                        out,
                        "{:<width$}  {:<w$}  {:.1}°C",
                        entry.town,
                        bar(mean.abs(), scale, self.bar_width),
                        mean,
                        width = town_width,
                        w = self.bar_width
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "{:<width$}  (no value)",
                        entry.town,
                        width = town_width
                    );
                }
            }
        }
        out
    }

    fn render_histogram(&self, histogram: &Histogram) -> String {
        if histogram.is_empty() {
            return format!("{}\n", NO_DATA);
        }

        let scale = histogram.max_count() as f64;
        let mut out = String::new();
        for (i, bin) in histogram.bins.iter().enumerate() {
            let close = if i + 1 == histogram.bins.len() { ']' } else { ')' };
            let _ = writeln!(
                out,
                "[{:>6.1}, {:>6.1}{}  {:<w$}  {}",
                bin.lower,
                bin.upper,
                close,
                bar(bin.count as f64, scale, self.bar_width),
                bin.count,
                w = self.bar_width
            );
        }

        match histogram.density_peak() {
            Some(peak) => {
                let _ = writeln!(
                    out,
                    "Density (KDE): peak {:.2} at {:.1}{}",
                    peak.y,
                    peak.x,
                    histogram.column.map_or("", |c| c.units())
                );
            }
            None => {
                let _ = writeln!(out, "Density (KDE): not enough variation");
            }
        }
        out
    }
}

impl Default for TextReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn bar(value: f64, scale: f64, width: usize) -> String {
    if scale <= 0.0 {
        return String::new();
    }
    let len = ((value / scale) * width as f64).round() as usize;
    "#".repeat(len.min(width))
}

fn value_span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |span, v| match span {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn render_scatter(chart: &ScatterChart) -> String {
    if chart.is_empty() {
        return format!("{}\n", NO_DATA);
    }

    let mut out = String::new();
    for series in chart.series.iter().filter(|s| !s.points.is_empty()) {
        let x_span = value_span(series.points.iter().map(|p| p.x));
        let y_span = value_span(series.points.iter().map(|p| p.y));
        if let (Some((x_lo, x_hi)), Some((y_lo, y_hi))) = (x_span, y_span) {
            let _ = writeln!(
                out,
                "{}: {} points, {} {:.1}..{:.1}{}, {} {:.1}..{:.1}{}",
                series.town,
                series.points.len(),
                chart.x.name(),
                x_lo,
                x_hi,
                chart.x.units(),
                chart.y.name(),
                y_lo,
                y_hi,
                chart.y.units()
            );
        }
    }
    out
}

fn render_line(chart: &LineChart) -> String {
    if chart.is_empty() {
        return format!("{}\n", NO_DATA);
    }

    let mut out = String::new();
    for series in &chart.series {
        if let (Some(first), Some(last)) = (series.points.first(), series.points.last()) {
            let _ = writeln!(
                out,
                "{}: {} points, {} ({:.1}{}) .. {} ({:.1}{})",
                series.town,
                series.points.len(),
                first.date,
                first.value,
                chart.column.units(),
                last.date,
                last.value,
                chart.column.units()
            );
        }
    }
    out
}

fn render_correlation(matrix: &CorrelationMatrix) -> String {
    if matrix.is_empty() {
        return format!("{}\n", NO_DATA);
    }

    let label_width = matrix
        .columns
        .iter()
        .map(|c| c.name().len())
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<width$}", "", width = label_width);
    for column in &matrix.columns {
        let _ = write!(out, "  {:>w$}", column.name(), w = column.name().len());
    }
    out.push('\n');

    for (row_column, row) in matrix.columns.iter().zip(&matrix.values) {
        let _ = write!(out, "{:<width$}", row_column.name(), width = label_width);
        for (column, value) in matrix.columns.iter().zip(row) {
            let cell = value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));
            let _ = write!(out, "  {:>w$}", cell, w = column.name().len());
        }
        out.push('\n');
    }
    out
}
