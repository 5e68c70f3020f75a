pub mod chart_data;
pub mod dataset_analyzer;

pub use chart_data::{
    pearson, scott_bandwidth, CorrelationMatrix, DensityPoint, Histogram, HistogramBin,
    LineChart, LinePoint, LineSeries, ScatterChart, ScatterPoint, ScatterSeries,
    DENSITY_GRID_POINTS,
};
pub use dataset_analyzer::{DatasetAnalyzer, DatasetSummary, Extreme, TemperatureStats};
