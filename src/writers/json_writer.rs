use crate::error::Result;
use crate::processors::DashboardView;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializes dashboard views (or any other report value) as JSON
pub struct JsonReportWriter {
    pretty: bool,
}

impl JsonReportWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn write<T: Serialize, W: Write>(&self, value: &T, out: &mut W) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, value)?;
        } else {
            serde_json::to_writer(&mut *out, value)?;
        }
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }

    pub fn write_view<W: Write>(&self, view: &DashboardView, out: &mut W) -> Result<()> {
        self.write(view, out)
    }

    pub fn write_to_file<T: Serialize>(&self, value: &T, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(value, &mut writer)
    }

    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

impl Default for JsonReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WeatherRecord, WeatherTable};
    use crate::processors::DashboardPipeline;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn view() -> DashboardView {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let table = WeatherTable::new(vec![
            WeatherRecord::builder()
                .town("Kisumu")
                .date(date)
                .temperatures(18.0, 24.5, 31.0)
                .humidity(65.0)
                .build()
                .unwrap(),
            WeatherRecord::builder()
                .town("Eldoret")
                .date(date)
                .avg_temp(17.0)
                .build()
                .unwrap(),
        ])
        .unwrap();
        DashboardPipeline::default().run(&table, &table.default_selection())
    }

    #[test]
    fn test_compact_output_is_single_line() {
        let mut buffer = Vec::new();
        JsonReportWriter::new()
            .with_pretty(false)
            .write_view(&view(), &mut buffer)
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["row_count"], 2);
        assert_eq!(value["town_averages"]["entries"][0]["town"], "Eldoret");
        assert_eq!(value["rows"][1]["humidity"], serde_json::Value::Null);
    }

    #[test]
    fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("view.json");

        JsonReportWriter::new().write_to_file(&view(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["selection"]["towns"].as_array().unwrap().len(), 2);
    }
}
