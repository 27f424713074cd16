use chrono::{DateTime, Datelike, Local, NaiveDate};

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole years between `birth` and `today`.
///
/// Decrements when today's month/day falls before the birthday, so the day
/// before a first birthday is still age 0. Negative for birth dates in the future.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Parse "YYYY-MM-DD" or an RFC 3339 timestamp (date part kept).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    // "2024-03-01T00:00:00" without offset, as some table exports write it
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Display format: "15/06/2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// File name stamp: "15-06-2024"
pub fn file_stamp(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}
