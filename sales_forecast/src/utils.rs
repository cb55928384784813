//! Utility functions for the sales_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Months, NaiveDate, NaiveDateTime};

/// Date-only layouts accepted in uploaded data and requests
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Date-time layouts whose time part is dropped
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a calendar date, dropping any time-of-day component
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Every calendar day from `start` to `end`, both inclusive
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// First and last day of `month` in `year`
pub fn month_window(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    if !(1..=12).contains(&month) {
        return Err(ForecastError::InvalidRange(format!(
            "Month must be between 1 and 12, got {}",
            month
        )));
    }

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ForecastError::InvalidRange(format!("Year {} is outside the supported calendar", year))
    })?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| {
            ForecastError::InvalidRange(format!(
                "Month {}-{:02} has no representable end date",
                year, month
            ))
        })?;

    Ok((start, end))
}

/// English name of a month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2023-06-15"), Some(ymd(2023, 6, 15)));
        assert_eq!(parse_date(" 2023/06/15 "), Some(ymd(2023, 6, 15)));
        assert_eq!(parse_date("2023-06-15 13:45:00"), Some(ymd(2023, 6, 15)));
        assert_eq!(parse_date("2023-06-15T13:45:00"), Some(ymd(2023, 6, 15)));
        assert_eq!(parse_date("2023-06-15T13:45:00+02:00"), Some(ymd(2023, 6, 15)));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2023-02-30"), None);
    }

    #[test]
    fn test_date_range_inclusive() {
        let days = date_range(ymd(2023, 12, 30), ymd(2024, 1, 2));
        assert_eq!(
            days,
            vec![ymd(2023, 12, 30), ymd(2023, 12, 31), ymd(2024, 1, 1), ymd(2024, 1, 2)]
        );
        assert!(date_range(ymd(2024, 1, 2), ymd(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_month_window() {
        assert_eq!(month_window(2024, 2).unwrap(), (ymd(2024, 2, 1), ymd(2024, 2, 29)));
        assert_eq!(month_window(2023, 2).unwrap(), (ymd(2023, 2, 1), ymd(2023, 2, 28)));
        assert_eq!(month_window(2023, 12).unwrap(), (ymd(2023, 12, 1), ymd(2023, 12, 31)));
        assert!(matches!(month_window(2023, 0), Err(ForecastError::InvalidRange(_))));
        assert!(matches!(month_window(2023, 13), Err(ForecastError::InvalidRange(_))));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(6), "June");
        assert_eq!(month_name(13), "Unknown");
    }
}
