use crate::models::{DateRange, WeatherRecord, WeatherTable};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub towns: Vec<String>,
    pub date_range: DateRange,
    pub temperature_stats: TemperatureStats,
    pub complete_records: usize,
}

/// An extreme reading and where it was observed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme {
    pub value: f64,
    pub town: String,
    pub date: NaiveDate,
}

impl Extreme {
    fn describe(&self) -> String {
        format!("{:.1}°C at {} ({})", self.value, self.town, self.date)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemperatureStats {
    pub mean_avg_temp: Option<f64>,
    pub hottest: Option<Extreme>,
    pub coldest: Option<Extreme>,
}

pub struct DatasetAnalyzer;

impl DatasetAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, table: &WeatherTable) -> DatasetSummary {
        let records = table.records();

        let mut temp_sum = 0.0;
        let mut temp_count = 0usize;
        let mut hottest: Option<Extreme> = None;
        let mut coldest: Option<Extreme> = None;
        let mut complete_count = 0;

        for record in records {
            if let Some(avg) = record.avg_temp_c {
                temp_sum += avg;
                temp_count += 1;
            }

            if let Some(max) = record.max_temp_c {
                if hottest.as_ref().map_or(true, |h| max > h.value) {
                    hottest = Some(Self::extreme(record, max));
                }
            }

            if let Some(min) = record.min_temp_c {
                if coldest.as_ref().map_or(true, |c| min < c.value) {
                    coldest = Some(Self::extreme(record, min));
                }
            }

            if record.is_complete() {
                complete_count += 1;
            }
        }

        DatasetSummary {
            total_records: records.len(),
            towns: table.towns().to_vec(),
            date_range: table.date_bounds(),
            temperature_stats: TemperatureStats {
                mean_avg_temp: (temp_count > 0).then(|| temp_sum / temp_count as f64),
                hottest,
                coldest,
            },
            complete_records: complete_count,
        }
    }

    fn extreme(record: &WeatherRecord, value: f64) -> Extreme {
        Extreme {
            value,
            town: record.town.clone(),
            date: record.date,
        }
    }
}

impl Default for DatasetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetSummary {
    pub fn summary(&self) -> String {
        format!(
            "Weather Parameters: Temperature (min/max/avg), Humidity, Precipitation, Wind\n\
            Towns: {} ({})\n\
            Date Range: {} to {} ({} days)\n\
            Records: {} total",
            self.towns.len(),
            self.towns.join(", "),
            self.date_range.start(),
            self.date_range.end(),
            self.date_range.num_days(),
            self.total_records,
        )
    }

    pub fn detailed_summary(&self) -> String {
        let none = || "No valid measurements".to_string();
        let stats = &self.temperature_stats;

        let coldest = stats.coldest.as_ref().map_or_else(none, Extreme::describe);
        let hottest = stats.hottest.as_ref().map_or_else(none, Extreme::describe);
        let average = stats
            .mean_avg_temp
            .map_or_else(none, |t| format!("{:.1}°C", t));

        format!(
            "{}\n\n\
            Extreme Temperatures:\n\
            - Coldest: {}\n\
            - Hottest: {}\n\
            - Average: {}\n\n\
            Data Completeness:\n\
            - Complete records: {}/{} ({:.1}%)",
            self.summary(),
            coldest,
            hottest,
            average,
            self.complete_records,
            self.total_records,
            (self.complete_records as f64 / self.total_records as f64) * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_analyze_table() {
        let table = WeatherTable::new(vec![
            WeatherRecord::builder()
                .town("Garissa")
                .date(ymd(2024, 1, 1))
                .temperatures(24.0, 31.0, 38.5)
                .humidity(40.0)
                .precipitation(0.0)
                .wind(14.0)
                .build()
                .unwrap(),
            WeatherRecord::builder()
                .town("Nyeri")
                .date(ymd(2024, 1, 4))
                .temperatures(8.5, 15.0, 21.0)
                .build()
                .unwrap(),
        ])
        .unwrap();

        let summary = DatasetAnalyzer::new().analyze(&table);

        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.towns, vec!["Garissa", "Nyeri"]);
        assert_eq!(summary.date_range.num_days(), 4);
        assert_eq!(summary.complete_records, 1);
        assert_eq!(summary.temperature_stats.mean_avg_temp, Some(23.0));

        let hottest = summary.temperature_stats.hottest.as_ref().unwrap();
        assert_eq!(hottest.town, "Garissa");
        assert_eq!(hottest.value, 38.5);

        let coldest = summary.temperature_stats.coldest.as_ref().unwrap();
        assert_eq!(coldest.town, "Nyeri");
        assert_eq!(coldest.date, ymd(2024, 1, 4));

        let text = summary.detailed_summary();
        assert!(text.contains("Hottest: 38.5°C at Garissa (2024-01-01)"));
        assert!(text.contains("Complete records: 1/2 (50.0%)"));
    }

    #[test]
    fn test_no_temperatures() {
        let table = WeatherTable::new(vec![WeatherRecord::new(
            "Lamu".to_string(),
            ymd(2024, 1, 1),
        )])
        .unwrap();

        let summary = DatasetAnalyzer::new().analyze(&table);

        assert_eq!(summary.temperature_stats.mean_avg_temp, None);
        assert!(summary
            .detailed_summary()
            .contains("Coldest: No valid measurements"));
    }
}
