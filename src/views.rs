//! View-count text normalization
//!
//! Turns display strings such as `"1,234 views"` or `"2.5K views"` into whole
//! view counts. Text that does not look like a view count normalizes to `0`;
//! that is a defined fallback, not an error.

use regex::Regex;
use std::sync::OnceLock;

/// Scale suffixes and the factor each one multiplies the mantissa by
const SCALES: &[(char, f64)] = &[('K', 1_000.0), ('M', 1_000_000.0), ('B', 1_000_000_000.0)];

/// Largest view count the normalizer produces; anything above is treated as overflow
pub const MAX_VIEWS: u64 = i64::MAX as u64;

/// Number, optional scale letter, then "view" or "views"
const VIEW_COUNT_PATTERN: &str = r"(?i)^\s*(\d[\d,.]*)\s*([kmb])?\s*views?\W*$";

fn view_count_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(VIEW_COUNT_PATTERN).expect("view count pattern is valid"))
}

/// Looks up the multiplier for a scale letter (case-insensitive)
fn scale_factor(letter: char) -> Option<f64> {
    let letter = letter.to_ascii_uppercase();
    SCALES
        .iter()
        .find(|(suffix, _)| *suffix == letter)
        .map(|(_, factor)| *factor)
}

/// Parses a view-count string into a whole number of views
///
/// # Rules
///
/// - Scaled (`K`/`M`/`B`): commas are stripped, the rest is read as a decimal
///   mantissa and multiplied by the scale factor, rounded to the nearest view
/// - Unscaled: `,` and `.` are both thousands separators and are stripped, so
///   `"1.234 views"` is 1234, not the 1 a leading-digits integer parse gives
/// - Anything else, including counts above [`MAX_VIEWS`], yields `0`
///
/// # Examples
///
/// ```
/// use playlist_scraper::views::parse_view_count;
///
/// assert_eq!(parse_view_count("1,234 views"), 1234);
/// assert_eq!(parse_view_count("2.5K views"), 2500);
/// assert_eq!(parse_view_count("no data"), 0);
/// ```
pub fn parse_view_count(text: &str) -> u64 {
    let Some(captures) = view_count_regex().captures(text) else {
        return 0;
    };

    let digits = &captures[1];

    match captures
        .get(2)
        .and_then(|m| m.as_str().chars().next())
        .and_then(scale_factor)
    {
        Some(factor) => {
            let mantissa: f64 = match digits.replace(',', "").parse() {
                Ok(value) => value,
                Err(_) => return 0,
            };
            let scaled = (mantissa * factor).round();
            // i64::MAX rounds up to 2^63 as an f64, so the bound is exclusive
            if scaled.is_finite() && scaled >= 0.0 && scaled < MAX_VIEWS as f64 {
                scaled as u64
            } else {
                0
            }
        }
        None => digits
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse::<u64>()
            .ok()
            .filter(|views| *views <= MAX_VIEWS)
            .unwrap_or(0),
    }
}
