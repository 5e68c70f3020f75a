//! Chart-ready views over a filtered subset. Every view is total: an empty
//! subset produces an empty view rather than an error.

use crate::models::{NumericColumn, WeatherRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Evaluation points of the density overlay
pub const DENSITY_GRID_POINTS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub column: Option<NumericColumn>,
    pub bins: Vec<HistogramBin>,
    pub total: usize,
    /// Gaussian KDE scaled to bin counts; empty when undefined
    pub density: Vec<DensityPoint>,
}

impl Histogram {
    /// Equal-width bins over `[min, max]`; the last bin is closed on the right.
    /// A single distinct value widens the range to `[v - 0.5, v + 0.5]`.
    pub fn from_values(values: &[f64], bin_count: usize) -> Self {
        if values.is_empty() || bin_count == 0 {
            return Self::default();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (mut lo, mut hi) = (min, max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bin_count as f64;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower: lo + width * i as f64,
                upper: if i + 1 == bin_count {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for &value in values {
            let index = (((value - lo) / width) as usize).min(bin_count - 1);
            bins[index].count += 1;
        }

        Self {
            column: None,
            bins,
            total: values.len(),
            density: density_curve(values, min, max, values.len() as f64 * width),
        }
    }

    pub fn for_column(subset: &[&WeatherRecord], column: NumericColumn, bin_count: usize) -> Self {
        let values: Vec<f64> = subset.iter().filter_map(|r| column.value(r)).collect();
        Self {
            column: Some(column),
            ..Self::from_values(&values, bin_count)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Highest point of the density overlay
    pub fn density_peak(&self) -> Option<&DensityPoint> {
        self.density.iter().fold(None, |best, p| match best {
            Some(b) if b.y >= p.y => Some(b),
            _ => Some(p),
        })
    }
}

/// Scott's rule: sample standard deviation times `n^(-1/5)`.
/// `None` for fewer than two values or zero variance.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    if variance <= 0.0 {
        return None;
    }

    Some(variance.sqrt() * n.powf(-0.2))
}

/// Gaussian KDE on an even grid over `[lo, hi]`, multiplied by `scale`
fn density_curve(values: &[f64], lo: f64, hi: f64, scale: f64) -> Vec<DensityPoint> {
    let Some(h) = scott_bandwidth(values) else {
        return Vec::new();
    };

    let n = values.len() as f64;
    let norm = scale / (n * h * (2.0 * std::f64::consts::PI).sqrt());
    let step = (hi - lo) / (DENSITY_GRID_POINTS - 1) as f64;

    (0..DENSITY_GRID_POINTS)
        .map(|i| {
            let x = if i + 1 == DENSITY_GRID_POINTS {
                hi
            } else {
                lo + step * i as f64
            };
            let sum: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum();
            DensityPoint { x, y: norm * sum }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub town: String,
    pub points: Vec<ScatterPoint>,
}

/// Scatter plot data colored by town
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub x: NumericColumn,
    pub y: NumericColumn,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    /// One series per town (alphabetical); rows missing either value are skipped
    pub fn by_town(subset: &[&WeatherRecord], x: NumericColumn, y: NumericColumn) -> Self {
        let mut groups: BTreeMap<&str, Vec<ScatterPoint>> = BTreeMap::new();

        for record in subset {
            if let (Some(xv), Some(yv)) = (x.value(record), y.value(record)) {
                groups
                    .entry(record.town.as_str())
                    .or_default()
                    .push(ScatterPoint { x: xv, y: yv });
            }
        }

        Self {
            x,
            y,
            series: groups
                .into_iter()
                .map(|(town, points)| ScatterSeries {
                    town: town.to_string(),
                    points,
                })
                .collect(),
        }
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub town: String,
    pub points: Vec<LinePoint>,
}

/// A time series per town
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub column: NumericColumn,
    pub series: Vec<LineSeries>,
}

impl LineChart {
    /// Null values are skipped; points are sorted by date, ties keep source order
    pub fn by_town(subset: &[&WeatherRecord], column: NumericColumn) -> Self {
        let mut groups: BTreeMap<&str, Vec<LinePoint>> = BTreeMap::new();

        for record in subset {
            if let Some(value) = column.value(record) {
                groups
                    .entry(record.town.as_str())
                    .or_default()
                    .push(LinePoint {
                        date: record.date,
                        value,
                    });
            }
        }

        let series = groups
            .into_iter()
            .map(|(town, mut points)| {
                points.sort_by_key(|p| p.date);
                LineSeries {
                    town: town.to_string(),
                    points,
                }
            })
            .collect();

        Self { column, series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

/// Pearson correlation over pairwise-complete observations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    /// Row-major; `None` where the correlation is undefined
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn compute(subset: &[&WeatherRecord], columns: &[NumericColumn]) -> Self {
        let values = columns
            .iter()
            .map(|a| {
                columns
                    .iter()
                    .map(|b| {
                        let r = pairwise_pearson(subset, *a, *b);
                        // Exactly one on the diagonal when defined
                        if a == b {
                            r.map(|_| 1.0)
                        } else {
                            r
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            columns: columns.to_vec(),
            values,
        }
    }

    pub fn get(&self, a: NumericColumn, b: NumericColumn) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        self.values[i][j]
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().flatten().all(|v| v.is_none())
    }
}

fn pairwise_pearson(subset: &[&WeatherRecord], a: NumericColumn, b: NumericColumn) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = subset
        .iter()
        .filter_map(|r| Some((a.value(r)?, b.value(r)?)))
        .collect();

    pearson(&pairs)
}

/// `None` for fewer than two pairs or zero variance on either side
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }

    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}
