use crate::analyzers::{CorrelationMatrix, Histogram, LineChart, ScatterChart};
use crate::models::{NumericColumn, Selection, TownAverages, WeatherRecord, WeatherTable};
use crate::processors::{average_by_town, RecordFilter};
use crate::utils::constants::DEFAULT_HISTOGRAM_BINS;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardOptions {
    pub histogram_bins: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// Everything the dashboard shows for one selection
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub selection: Selection,
    pub row_count: usize,
    pub rows: Vec<WeatherRecord>,
    pub town_averages: TownAverages,
    pub max_temp_histogram: Histogram,
    pub humidity_scatter: ScatterChart,
    pub temperature_trends: LineChart,
    pub precipitation_scatter: ScatterChart,
    pub correlation: CorrelationMatrix,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// Filter, aggregate and build every chart in one synchronous pass
pub struct DashboardPipeline {
    options: DashboardOptions,
}

impl DashboardPipeline {
    pub fn new(options: DashboardOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    pub fn run(&self, table: &WeatherTable, selection: &Selection) -> DashboardView {
        let started = Instant::now();
        let subset = RecordFilter::new(selection.clone()).apply(table.records());

        let view = DashboardView {
            selection: selection.clone(),
            row_count: subset.len(),
            town_averages: average_by_town(subset.iter().copied()),
            max_temp_histogram: Histogram::for_column(
                &subset,
                NumericColumn::MaxTempC,
                self.options.histogram_bins,
            ),
            humidity_scatter: ScatterChart::by_town(
                &subset,
                NumericColumn::AvgTempC,
                NumericColumn::Humidity,
            ),
            temperature_trends: LineChart::by_town(&subset, NumericColumn::AvgTempC),
            precipitation_scatter: ScatterChart::by_town(
                &subset,
                NumericColumn::AvgTempC,
                NumericColumn::PrecipitationMm,
            ),
            correlation: CorrelationMatrix::compute(&subset, &NumericColumn::ALL),
            rows: subset.into_iter().cloned().collect(),
        };

        debug!(
            rows = view.row_count,
            towns = selection.towns.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Dashboard pipeline finished"
        );
        view
    }
}

impl Default for DashboardPipeline {
    fn default() -> Self {
        Self::new(DashboardOptions::default())
    }
}
