use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{DashboardError, Result};

/// Numeric observation columns, in correlation heatmap order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    MaxTempC,
    MinTempC,
    AvgTempC,
    Humidity,
    PrecipitationMm,
    WindKph,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 6] = [
        NumericColumn::MaxTempC,
        NumericColumn::MinTempC,
        NumericColumn::AvgTempC,
        NumericColumn::Humidity,
        NumericColumn::PrecipitationMm,
        NumericColumn::WindKph,
    ];

    /// Order of the columns in the data file after `town` and `date`
    pub const FILE_ORDER: [NumericColumn; 6] = [
        NumericColumn::AvgTempC,
        NumericColumn::MaxTempC,
        NumericColumn::MinTempC,
        NumericColumn::Humidity,
        NumericColumn::PrecipitationMm,
        NumericColumn::WindKph,
    ];

    /// CSV header name of the column
    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::MaxTempC => "max_temp_c",
            NumericColumn::MinTempC => "min_temp_c",
            NumericColumn::AvgTempC => "avg_temp_c",
            NumericColumn::Humidity => "humidity",
            NumericColumn::PrecipitationMm => "precipitation_mm",
            NumericColumn::WindKph => "wind_kph",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NumericColumn::MaxTempC => "Max Temperature",
            NumericColumn::MinTempC => "Min Temperature",
            NumericColumn::AvgTempC => "Avg Temperature",
            NumericColumn::Humidity => "Humidity",
            NumericColumn::PrecipitationMm => "Precipitation",
            NumericColumn::WindKph => "Wind Speed",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            NumericColumn::MaxTempC | NumericColumn::MinTempC | NumericColumn::AvgTempC => "°C",
            NumericColumn::Humidity => "%",
            NumericColumn::PrecipitationMm => "mm",
            NumericColumn::WindKph => "km/h",
        }
    }

    pub fn value(&self, record: &WeatherRecord) -> Option<f64> {
        match self {
            NumericColumn::MaxTempC => record.max_temp_c,
            NumericColumn::MinTempC => record.min_temp_c,
            NumericColumn::AvgTempC => record.avg_temp_c,
            NumericColumn::Humidity => record.humidity,
            NumericColumn::PrecipitationMm => record.precipitation_mm,
            NumericColumn::WindKph => record.wind_kph,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WeatherRecord {
    #[validate(length(min = 1))]
    pub town: String,
    pub date: NaiveDate,

    // Temperatures in °C
    pub avg_temp_c: Option<f64>,
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,

    // Percent or ratio depending on the source
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: Option<f64>,

    #[validate(range(min = 0.0))]
    pub precipitation_mm: Option<f64>,

    #[validate(range(min = 0.0))]
    pub wind_kph: Option<f64>,
}

impl WeatherRecord {
    pub fn new(town: String, date: NaiveDate) -> Self {
        Self {
            town,
            date,
            avg_temp_c: None,
            max_temp_c: None,
            min_temp_c: None,
            humidity: None,
            precipitation_mm: None,
            wind_kph: None,
        }
    }

    pub fn builder() -> WeatherRecordBuilder {
        WeatherRecordBuilder::new()
    }

    /// Check min <= avg <= max for whichever temperatures are present
    pub fn validate_relationships(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_temp_c, self.max_temp_c) {
            if min > max {
                return Err(DashboardError::TemperatureValidation {
                    message: format!(
                        "min temperature {} > max temperature {}",
                        min, max
                    ),
                });
            }
        }

        if let (Some(min), Some(avg)) = (self.min_temp_c, self.avg_temp_c) {
            if avg < min {
                return Err(DashboardError::TemperatureValidation {
                    message: format!(
                        "avg temperature {} < min temperature {}",
                        avg, min
                    ),
                });
            }
        }

        if let (Some(avg), Some(max)) = (self.avg_temp_c, self.max_temp_c) {
            if avg > max {
                return Err(DashboardError::TemperatureValidation {
                    message: format!(
                        "avg temperature {} > max temperature {}",
                        avg, max
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn has_null_values(&self) -> bool {
        NumericColumn::ALL.iter().any(|c| c.value(self).is_none())
    }

    pub fn is_complete(&self) -> bool {
        !self.has_null_values()
    }

    pub fn temperature_range(&self) -> Option<f64> {
        match (self.min_temp_c, self.max_temp_c) {
            (Some(min), Some(max)) => Some(max - min),
            _ => None,
        }
    }
}

pub struct WeatherRecordBuilder {
    town: Option<String>,
    date: Option<NaiveDate>,
    avg_temp_c: Option<f64>,
    max_temp_c: Option<f64>,
    min_temp_c: Option<f64>,
    humidity: Option<f64>,
    precipitation_mm: Option<f64>,
    wind_kph: Option<f64>,
}

impl Default for WeatherRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherRecordBuilder {
    pub fn new() -> Self {
        Self {
            town: None,
            date: None,
            avg_temp_c: None,
            max_temp_c: None,
            min_temp_c: None,
            humidity: None,
            precipitation_mm: None,
            wind_kph: None,
        }
    }

    pub fn town(mut self, town: impl Into<String>) -> Self {
        self.town = Some(town.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn avg_temp(mut self, temp: f64) -> Self {
        self.avg_temp_c = Some(temp);
        self
    }

    pub fn max_temp(mut self, temp: f64) -> Self {
        self.max_temp_c = Some(temp);
        self
    }

    pub fn min_temp(mut self, temp: f64) -> Self {
        self.min_temp_c = Some(temp);
        self
    }

    pub fn temperatures(mut self, min: f64, avg: f64, max: f64) -> Self {
        self.min_temp_c = Some(min);
        self.avg_temp_c = Some(avg);
        self.max_temp_c = Some(max);
        self
    }

    pub fn humidity(mut self, humidity: f64) -> Self {
        self.humidity = Some(humidity);
        self
    }

    pub fn precipitation(mut self, precip: f64) -> Self {
        self.precipitation_mm = Some(precip);
        self
    }

    pub fn wind(mut self, speed: f64) -> Self {
        self.wind_kph = Some(speed);
        self
    }

    pub fn build(self) -> Result<WeatherRecord> {
        let town = self
            .town
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DashboardError::MissingData("town".to_string()))?;
        let date = self
            .date
            .ok_or_else(|| DashboardError::MissingData("date".to_string()))?;

        Ok(WeatherRecord {
            town,
            date,
            avg_temp_c: self.avg_temp_c,
            max_temp_c: self.max_temp_c,
            min_temp_c: self.min_temp_c,
            humidity: self.humidity,
            precipitation_mm: self.precipitation_mm,
            wind_kph: self.wind_kph,
        })
    }
}
