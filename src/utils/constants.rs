/// Required CSV columns
pub const COL_TOWN: &str = "town";
pub const COL_DATE: &str = "date";
pub const COL_AVG_TEMP: &str = "avg_temp_c";
pub const COL_MAX_TEMP: &str = "max_temp_c";
pub const COL_MIN_TEMP: &str = "min_temp_c";
pub const COL_HUMIDITY: &str = "humidity";
pub const COL_PRECIPITATION: &str = "precipitation_mm";
pub const COL_WIND: &str = "wind_kph";

pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_TOWN,
    COL_DATE,
    COL_AVG_TEMP,
    COL_MAX_TEMP,
    COL_MIN_TEMP,
    COL_HUMIDITY,
    COL_PRECIPITATION,
    COL_WIND,
];

/// Accepted date layouts, tried in order
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];
pub const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Cell values read as null
pub const NULL_TOKENS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "None"];

/// Dashboard defaults
pub const DEFAULT_DATA_FILE: &str = "kenya_weather_data.csv";
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";
pub const CONFIG_ENV_PREFIX: &str = "WEATHER_DASHBOARD";
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;
pub const DEFAULT_TABLE_ROWS: usize = 20;
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Width of the ASCII bar charts in the text report
pub const BAR_CHART_WIDTH: usize = 40;
