//! Day-first date parsing for Indonesian exports.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_INDONESIAN_LONG, DATE_YMD};

/// Default pivot for two-digit years: `00..=50` map to the 2000s.
pub const DEFAULT_YEAR_PIVOT: i32 = 50;

/// Day-first date parser.
#[derive(Debug, Clone, Copy)]
pub struct DateParser {
    year_pivot: i32,
}

impl DateParser {
    pub fn new() -> Self {
        Self {
            year_pivot: DEFAULT_YEAR_PIVOT,
        }
    }

    /// Set the two-digit year pivot.
    pub fn with_year_pivot(mut self, pivot: i32) -> Self {
        self.year_pivot = pivot;
        self
    }

    /// Parse a date, reading ambiguous numeric forms as day/month/year.
    ///
    /// Returns `None` for anything that is not a valid calendar date.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(caps) = DATE_DMY.captures(text) {
            let day: u32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let year = self.expand_year(&caps[3])?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }

        if let Some(caps) = DATE_YMD.captures(text) {
            let year: i32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let day: u32 = caps[3].parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }

        if let Some(caps) = DATE_INDONESIAN_LONG.captures(text) {
            let day: u32 = caps[1].parse().ok()?;
            let month = indonesian_month_to_number(&caps[2])?;
            let year: i32 = caps[3].parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }

        None
    }

    fn expand_year(&self, s: &str) -> Option<i32> {
        let year: i32 = s.parse().ok()?;
        if s.len() > 2 {
            Some(year)
        } else if year <= self.year_pivot {
            Some(2000 + year)
        } else {
            Some(1900 + year)
        }
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a date with the default pivot.
pub fn parse_day_first(text: &str) -> Option<NaiveDate> {
    DateParser::new().parse(text)
}

fn indonesian_month_to_number(month: &str) -> Option<u32> {
    let month = month.to_lowercase();
    let number = match month.as_str() {
        "januari" | "jan" => 1,
        "februari" | "feb" | "peb" => 2,
        "maret" | "mar" => 3,
        "april" | "apr" => 4,
        "mei" => 5,
        "juni" | "jun" => 6,
        "juli" | "jul" => 7,
        "agustus" | "agu" | "agt" | "ags" => 8,
        "september" | "sep" | "sept" => 9,
        "oktober" | "okt" => 10,
        "november" | "nov" | "nop" => 11,
        "desember" | "des" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_first_disambiguation() {
        assert_eq!(parse_day_first("03/04/2024"), Some(ymd(2024, 4, 3)));
        assert_eq!(parse_day_first("3-4-2024"), Some(ymd(2024, 4, 3)));
        assert_eq!(parse_day_first("03.04.2024"), Some(ymd(2024, 4, 3)));
    }

    #[test]
    fn test_month_first_is_not_guessed() {
        // 25 is not a month; day-first reading is invalid and there is no fallback
        assert_eq!(parse_day_first("12/25/2024"), None);
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_day_first("2024-04-03"), Some(ymd(2024, 4, 3)));
        assert_eq!(parse_day_first("2024/04/03"), Some(ymd(2024, 4, 3)));
    }

    #[test]
    fn test_time_suffix_is_dropped() {
        assert_eq!(parse_day_first("03/04/2024 00:00:00"), Some(ymd(2024, 4, 3)));
        assert_eq!(parse_day_first("2024-04-03T13:45"), Some(ymd(2024, 4, 3)));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_day_first("15.01.24"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_day_first("15.01.99"), Some(ymd(1999, 1, 15)));

        let parser = DateParser::new().with_year_pivot(10);
        assert_eq!(parser.parse("15.01.24"), Some(ymd(1924, 1, 15)));
    }

    #[test]
    fn test_indonesian_long_format() {
        assert_eq!(parse_day_first("3 Januari 2024"), Some(ymd(2024, 1, 3)));
        assert_eq!(parse_day_first("17 agu 2023"), Some(ymd(2023, 8, 17)));
        assert_eq!(parse_day_first("1-Mei-2024"), Some(ymd(2024, 5, 1)));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_day_first(""), None);
        assert_eq!(parse_day_first("besok"), None);
        assert_eq!(parse_day_first("31/02/2024"), None);
        assert_eq!(parse_day_first("3 Foo 2024"), None);
    }
}
