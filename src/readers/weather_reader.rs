use crate::error::{DashboardError, Result};
use crate::models::{WeatherRecord, WeatherTable};
use crate::utils::constants::*;
use crate::utils::dates::{parse_date, parse_optional_f64};
use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// A row dropped during a lenient load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRejection {
    pub line: u64,
    pub column: String,
    pub message: String,
}

impl From<RowRejection> for DashboardError {
    fn from(rejection: RowRejection) -> Self {
        DashboardError::InvalidRow {
            line: rejection.line,
            column: rejection.column,
            message: rejection.message,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_rejected: usize,
    pub rejections: Vec<RowRejection>,
}

impl LoadReport {
    pub fn rows_loaded(&self) -> usize {
        self.rows_read - self.rows_rejected
    }

    pub fn summary(&self) -> String {
        format!(
            "Rows read: {}, loaded: {}, rejected: {}",
            self.rows_read,
            self.rows_loaded(),
            self.rows_rejected
        )
    }
}

/// Positions of the required columns within the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    town: usize,
    date: usize,
    avg_temp: usize,
    max_temp: usize,
    min_temp: usize,
    humidity: usize,
    precipitation: usize,
    wind: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DashboardError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(Self {
            town: find(COL_TOWN)?,
            date: find(COL_DATE)?,
            avg_temp: find(COL_AVG_TEMP)?,
            max_temp: find(COL_MAX_TEMP)?,
            min_temp: find(COL_MIN_TEMP)?,
            humidity: find(COL_HUMIDITY)?,
            precipitation: find(COL_PRECIPITATION)?,
            wind: find(COL_WIND)?,
        })
    }
}

pub struct WeatherReader {
    strict: bool,
}

impl WeatherReader {
    pub fn new() -> Self {
        Self { strict: true }
    }

    /// Strict parsing fails the whole load on the first bad row; otherwise
    /// bad rows are dropped and reported
    pub fn with_strict_parsing(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Read a weather CSV file into a table
    pub fn read_table(&self, path: &Path) -> Result<WeatherTable> {
        self.read_table_with_report(path).map(|(table, _)| table)
    }

    pub fn read_table_with_report(&self, path: &Path) -> Result<(WeatherTable, LoadReport)> {
        info!(path = %path.display(), strict = self.strict, "Loading weather data");

        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let (table, report) = self.read_from(reader)?;

        info!(
            rows = table.len(),
            towns = table.towns().len(),
            rejected = report.rows_rejected,
            "Loaded weather data"
        );
        Ok((table, report))
    }

    /// Read CSV content from any reader
    pub fn read_from<R: Read>(&self, reader: R) -> Result<(WeatherTable, LoadReport)> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers)?;
        debug!(?columns, "Resolved CSV columns");

        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for row_result in csv_reader.byte_records() {
            let row = row_result?;
            report.rows_read += 1;

            let parsed =
                decode_row(row, &headers).and_then(|row| self.parse_row(&row, &columns));
            match parsed {
                Ok(record) => records.push(record),
                Err(rejection) if self.strict => return Err(rejection.into()),
                Err(rejection) => {
                    warn!(
                        line = rejection.line,
                        column = %rejection.column,
                        "Rejected row: {}",
                        rejection.message
                    );
                    report.rows_rejected += 1;
                    report.rejections.push(rejection);
                }
            }
        }

        let table = WeatherTable::new(records)?;
        Ok((table, report))
    }

    /// Parse a single data row
    fn parse_row(
        &self,
        row: &StringRecord,
        columns: &ColumnIndex,
    ) -> std::result::Result<WeatherRecord, RowRejection> {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let reject = |column: &str, message: String| RowRejection {
            line,
            column: column.to_string(),
            message,
        };

        let field = |index: usize, column: &str| {
            row.get(index)
                .ok_or_else(|| reject(column, "missing field".to_string()))
        };

        let numeric = |index: usize, column: &str| {
            let value = field(index, column)?;
            parse_optional_f64(value).map_err(|message| reject(column, message))
        };

        let town = field(columns.town, COL_TOWN)?;
        if town.is_empty() {
            return Err(reject(COL_TOWN, "empty town name".to_string()));
        }

        let date_value = field(columns.date, COL_DATE)?;
        let date = parse_date(date_value)
            .map_err(|_| reject(COL_DATE, format!("invalid date '{}'", date_value)))?;

        Ok(WeatherRecord {
            town: town.to_string(),
            date,
            avg_temp_c: numeric(columns.avg_temp, COL_AVG_TEMP)?,
            max_temp_c: numeric(columns.max_temp, COL_MAX_TEMP)?,
            min_temp_c: numeric(columns.min_temp, COL_MIN_TEMP)?,
            humidity: numeric(columns.humidity, COL_HUMIDITY)?,
            precipitation_mm: numeric(columns.precipitation, COL_PRECIPITATION)?,
            wind_kph: numeric(columns.wind, COL_WIND)?,
        })
    }
}

/// Decode a raw row; invalid UTF-8 becomes a rejection naming the column
fn decode_row(
    row: ByteRecord,
    headers: &StringRecord,
) -> std::result::Result<StringRecord, RowRejection> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);

    StringRecord::from_byte_record(row).map_err(|e| {
        let field = e.utf8_error().field();
        RowRejection {
            line,
            column: headers
                .get(field)
                .map(String::from)
                .unwrap_or_else(|| format!("field {}", field)),
            message: "invalid UTF-8".to_string(),
        }
    })
}

impl Default for WeatherReader {
    fn default() -> Self {
        Self::new()
    }
}
