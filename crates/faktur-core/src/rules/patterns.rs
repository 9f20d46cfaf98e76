//! Common regex patterns for Indonesian purchase exports.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Day-first numeric dates: 03/04/2024, 3-4-24, 03.04.2024, optional time suffix
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})(?:[ T]\d{1,2}:\d{2}(?::\d{2})?)?$"
    ).unwrap();

    // ISO-like dates: 2024-04-03, 2024/04/03, optional time suffix
    pub static ref DATE_YMD: Regex = Regex::new(
        r"^(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})(?:[ T]\d{1,2}:\d{2}(?::\d{2})?)?$"
    ).unwrap();

    // Indonesian long format: "3 Januari 2024", "03 Agu 2024", "3-Mei-2024"
    pub static ref DATE_INDONESIAN_LONG: Regex = Regex::new(
        r"(?i)^(\d{1,2})[\s\-]+([a-z]+)\.?[\s\-]+(\d{4})$"
    ).unwrap();
}
