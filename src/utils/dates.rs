use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{DashboardError, Result};
use crate::utils::constants::{DATETIME_FORMATS, DATE_FORMATS, NULL_TOKENS};

/// Parse a date cell in any of the accepted layouts
///
/// # Examples
/// ```
/// use weather_dashboard::utils::parse_date;
///
/// let date = parse_date("2024-01-15").unwrap();
/// assert_eq!(date.to_string(), "2024-01-15");
/// assert_eq!(parse_date("2024-01-15 06:00:00").unwrap(), date);
/// ```
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    // Surface chrono's error for the primary layout
    NaiveDate::parse_from_str(value, DATE_FORMATS[0]).map_err(DashboardError::from)
}

pub fn is_null_token(value: &str) -> bool {
    NULL_TOKENS.contains(&value.trim())
}

/// Parse a numeric cell; null tokens read as `None`
pub fn parse_optional_f64(value: &str) -> std::result::Result<Option<f64>, String> {
    if is_null_token(value) {
        return Ok(None);
    }

    let value = value.trim();
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err(format!("non-finite number '{}'", value)),
        Err(_) => Err(format!("invalid number '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024/01/15").unwrap(), expected);
        assert_eq!(parse_date("20240115").unwrap(), expected);
        assert_eq!(parse_date(" 2024-01-15 ").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15T23:59:59").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("15/01/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_optional_f64() {
        assert_eq!(parse_optional_f64("21.5"), Ok(Some(21.5)));
        assert_eq!(parse_optional_f64(" -3 "), Ok(Some(-3.0)));
        assert_eq!(parse_optional_f64(""), Ok(None));
        assert_eq!(parse_optional_f64("NaN"), Ok(None));
        assert_eq!(parse_optional_f64("NA"), Ok(None));
        assert!(parse_optional_f64("warm").is_err());
        assert!(parse_optional_f64("inf").is_err());
    }
}
