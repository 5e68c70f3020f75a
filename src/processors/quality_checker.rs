use crate::models::{NumericColumn, WeatherRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub total_records: usize,
    pub complete_records: usize,
    pub records_with_nulls: usize,
    pub null_counts: Vec<(NumericColumn, usize)>,
    pub violations: Vec<QualityViolation>,
    pub town_statistics: BTreeMap<String, TownStatistics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityViolation {
    pub town: String,
    pub date: NaiveDate,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    OutOfExpectedRange,
    TemperatureOrder,
    DuplicateObservation,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TownStatistics {
    pub total_records: usize,
    pub complete_records: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

/// Reports rows that break the dataset's expectations. Nothing is rejected.
pub struct QualityChecker {
    max_listed_violations: usize,
}

impl QualityChecker {
    pub fn new() -> Self {
        Self {
            max_listed_violations: 10,
        }
    }

    pub fn with_max_listed_violations(max_listed_violations: usize) -> Self {
        Self {
            max_listed_violations,
        }
    }

    pub fn check(&self, records: &[WeatherRecord]) -> QualityReport {
        let mut report = QualityReport {
            total_records: records.len(),
            complete_records: 0,
            records_with_nulls: 0,
            null_counts: NumericColumn::ALL.iter().map(|c| (*c, 0)).collect(),
            violations: Vec::new(),
            town_statistics: BTreeMap::new(),
        };

        let mut seen: HashMap<(&str, NaiveDate), usize> = HashMap::new();

        for record in records {
            self.check_record(record, &mut report);

            let occurrences = seen.entry((record.town.as_str(), record.date)).or_insert(0);
            *occurrences += 1;
            if *occurrences == 2 {
                report.violations.push(QualityViolation {
                    town: record.town.clone(),
                    date: record.date,
                    violation_type: ViolationType::DuplicateObservation,
                    details: "more than one observation for this town and date".to_string(),
                });
            }

            let stats = report
                .town_statistics
                .entry(record.town.clone())
                .or_default();
            stats.total_records += 1;
            stats.first_date = Some(stats.first_date.map_or(record.date, |d| d.min(record.date)));
            stats.last_date = Some(stats.last_date.map_or(record.date, |d| d.max(record.date)));

            if let Some(min) = record.min_temp_c {
                stats.min_temp = Some(stats.min_temp.map_or(min, |t| t.min(min)));
            }
            if let Some(max) = record.max_temp_c {
                stats.max_temp = Some(stats.max_temp.map_or(max, |t| t.max(max)));
            }

            if record.is_complete() {
                report.complete_records += 1;
                stats.complete_records += 1;
            } else {
                report.records_with_nulls += 1;
            }
        }

        report
    }

    fn check_record(&self, record: &WeatherRecord, report: &mut QualityReport) {
        for (column, count) in report.null_counts.iter_mut() {
            if column.value(record).is_none() {
                *count += 1;
            }
        }

        if let Err(errors) = record.validate() {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();

            for field in fields {
                report.violations.push(QualityViolation {
                    town: record.town.clone(),
                    date: record.date,
                    violation_type: ViolationType::OutOfExpectedRange,
                    details: format!("{} is outside its expected range", field),
                });
            }
        }

        if let Err(e) = record.validate_relationships() {
            report.violations.push(QualityViolation {
                town: record.town.clone(),
                date: record.date,
                violation_type: ViolationType::TemperatureOrder,
                details: e.to_string(),
            });
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &QualityReport) -> String {
        let percent = |n: usize| {
            if report.total_records == 0 {
                0.0
            } else {
                100.0 * n as f64 / report.total_records as f64
            }
        };

        let mut summary = String::new();

        summary.push_str("=== Data Quality Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Complete Records: {} ({:.1}%)\n",
            report.complete_records,
            percent(report.complete_records)
        ));
        summary.push_str(&format!(
            "Records With Nulls: {} ({:.1}%)\n",
            report.records_with_nulls,
            percent(report.records_with_nulls)
        ));

        summary.push_str("\nNull Values Per Column:\n");
        for (column, count) in &report.null_counts {
            summary.push_str(&format!("  {:<18} {}\n", column.name(), count));
        }

        summary.push_str(&format!("\nTowns: {}\n", report.town_statistics.len()));
        for (town, stats) in &report.town_statistics {
            let span = match (stats.first_date, stats.last_date) {
                (Some(first), Some(last)) => format!("{} to {}", first, last),
                _ => "no dates".to_string(),
            };
            summary.push_str(&format!(
                "  {}: {} records ({} complete), {}\n",
                town, stats.total_records, stats.complete_records, span
            ));
        }

        summary.push_str(&format!(
            "\nExpectation Violations: {}\n",
            report.violations.len()
        ));

        if !report.violations.is_empty() {
            summary.push_str(&format!(
                "\nFirst {} Violations:\n",
                self.max_listed_violations.min(report.violations.len())
            ));
            for (i, violation) in report
                .violations
                .iter()
                .take(self.max_listed_violations)
                .enumerate()
            {
                summary.push_str(&format!(
                    "  {}. {} on {}: {}\n",
                    i + 1,
                    violation.town,
                    violation.date,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for QualityChecker {
    fn default() -> Self {
        Self::new()
    }
}
