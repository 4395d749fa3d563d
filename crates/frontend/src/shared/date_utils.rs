//! Utilities for date formatting
//!
//! The API sends plain ISO dates (`YYYY-MM-DD`); screens show `DD.MM.YYYY`.

use chrono::NaiveDate;

/// Format ISO date string to DD.MM.YYYY format
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "15.03.2024"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => date_str.to_string(),
    }
}

/// Same as `format_date`, "-" for a missing value
pub fn format_date_opt(date_str: Option<&str>) -> String {
    date_str.map(format_date).unwrap_or_else(|| "-".to_string())
}

/// Today's date in the browser's local time zone
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
