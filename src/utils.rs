use chrono::{Local, NaiveDate};

use crate::errors::AppError;

/// Register dates arrive as user-typed strings, sometimes slash-delimited.
/// Normalizes to canonical `YYYY-MM-DD` or rejects.
pub fn normalize_date(date: &str) -> Result<String, AppError> {
    let dashed = date.trim().replace('/', "-");
    let parsed = NaiveDate::parse_from_str(&dashed, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date: {}", date)))?;
    Ok(parsed.format("%Y-%m-%d").to_string())
}

/// Calendar-day comparison against the server-local date. Expects the
/// canonical form produced by `normalize_date`.
pub fn is_today(normalized_date: &str) -> bool {
    normalized_date == Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_slash_delimited_dates() {
        assert_eq!(normalize_date("2026/08/07").unwrap(), "2026-08-07");
        assert_eq!(normalize_date("2026-08-07").unwrap(), "2026-08-07");
    }

    #[test]
    fn pads_short_components() {
        assert_eq!(normalize_date("2026/8/7").unwrap(), "2026-08-07");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_date(" 2026-01-31 ").unwrap(), "2026-01-31");
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(normalize_date("not-a-date").is_err());
        assert!(normalize_date("2026-13-40").is_err());
        assert!(normalize_date("").is_err());
    }

    #[test]
    fn today_matches_local_clock() {
        let today = Local::now().format("%Y-%m-%d").to_string();
        assert!(is_today(&today));
        assert!(!is_today("1999-01-01"));
    }
}
