//! Auction date normalization
//!
//! Auction feeds carry free-form local timestamps such as
//! `"Wed Sep 03, 3:30pm CEDT CEST"`, sometimes with a stale timezone
//! abbreviation left in front of the authoritative one. Strings are reduced
//! to a single timezone token, parsed, and converted to an absolute UTC
//! instant.

use chrono::format::{parse as parse_items, Parsed, StrftimeItems};
use chrono::{DateTime, Datelike, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Fixed zone used when presenting instants to the operator
pub const DISPLAY_TZ: Tz = chrono_tz::Europe::Warsaw;

/// Timezone abbreviations accepted in auction date strings. Matching is
/// exact-case; inconsistently cased tokens in a feed surface as parse
/// failures rather than being silently corrected.
const TZ_ABBREVIATIONS: &[(&str, Tz)] = &[
    ("CST", chrono_tz::America::Chicago),
    ("CDT", chrono_tz::America::Chicago),
    ("EST", chrono_tz::America::New_York),
    ("EDT", chrono_tz::America::New_York),
    ("CEST", chrono_tz::Europe::Warsaw),
    ("CEDT", chrono_tz::Europe::Warsaw),
];

/// Weekday tokens are informational only and never drive the resolved date
const WEEKDAY_NAMES: &[&str] = &[
    "mon", "monday", "tue", "tues", "tuesday", "wed", "wednesday", "thu", "thur", "thurs",
    "thursday", "fri", "friday", "sat", "saturday", "sun", "sunday",
];

/// Formats tried against the date text once timezone and weekday tokens are
/// removed. Entries without a year default to the current year; the feed
/// omits it.
const DATETIME_FORMATS: &[&str] = &[
    "%b %d, %I:%M%p",
    "%b %d, %I%p",
    "%b %d %Y, %I:%M%p",
    "%b %d, %Y %I:%M%p",
    "%b %d, %Y, %I:%M%p",
    "%b %d, %H:%M",
    "%b %d %Y %H:%M",
    "%m/%d/%Y %I:%M%p",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Error)]
pub enum DateParseError {
    #[error("unknown or missing timezone in auction date: {0:?}")]
    MissingTimezone(String),

    #[error("unrecognized auction date format: {0:?}")]
    UnrecognizedFormat(String),

    #[error("local time does not exist in its timezone: {0:?}")]
    NonexistentLocalTime(String),
}

fn zone_for(token: &str) -> Option<Tz> {
    TZ_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == token)
        .map(|(_, tz)| *tz)
}

/// Collapse duplicate timezone tokens: every recognized abbreviation is
/// removed from the token stream and the last one (in original order) is
/// re-appended at the end. The last token wins; earlier ones are stale.
/// Strings without a recognized token pass through unchanged apart from
/// whitespace collapsing.
pub fn normalize_timezone_tokens(value: &str) -> String {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let last_known = tokens
        .iter()
        .rev()
        .find(|t| zone_for(t).is_some())
        .copied();

    match last_known {
        Some(last) => {
            let mut kept: Vec<&str> = tokens
                .into_iter()
                .filter(|t| zone_for(t).is_none())
                .collect();
            kept.push(last);
            kept.join(" ")
        }
        None => tokens.join(" "),
    }
}

/// Parse a free-form auction date string into an absolute UTC instant.
///
/// Fails when no recognized timezone token is present: a timestamp without
/// a resolvable zone is never silently assumed to be in any default zone.
/// Daylight-saving rules of the resolved zone apply on the parsed calendar
/// date.
pub fn parse_auction_datetime(value: &str) -> Result<DateTime<Utc>, DateParseError> {
    let cleaned = normalize_timezone_tokens(value);

    let (text, tz) = match cleaned.rsplit_once(' ') {
        Some((head, tail)) => match zone_for(tail) {
            Some(tz) => (head.to_string(), tz),
            None => return Err(DateParseError::MissingTimezone(value.to_string())),
        },
        None => return Err(DateParseError::MissingTimezone(value.to_string())),
    };

    let naive = parse_naive_datetime(&text)
        .ok_or_else(|| DateParseError::UnrecognizedFormat(value.to_string()))?;

    let local = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        // DST fall-back duplicates an hour; take the earlier reading
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => return Err(DateParseError::NonexistentLocalTime(value.to_string())),
    };

    Ok(local.with_timezone(&Utc))
}

/// Convert a UTC instant to the fixed display zone. Total: UTC to a fixed
/// zone always resolves.
pub fn to_display_time(utc: DateTime<Utc>) -> DateTime<Tz> {
    utc.with_timezone(&DISPLAY_TZ)
}

fn parse_naive_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = strip_weekday(text);

    for fmt in DATETIME_FORMATS {
        let mut parsed = Parsed::new();
        if parse_items(&mut parsed, &text, StrftimeItems::new(fmt)).is_err() {
            continue;
        }

        let date = match parsed.to_naive_date() {
            Ok(date) => date,
            Err(_) => {
                if parsed.set_year(i64::from(Utc::now().year())).is_err() {
                    continue;
                }
                match parsed.to_naive_date() {
                    Ok(date) => date,
                    Err(_) => continue,
                }
            }
        };

        let time = match parsed.to_naive_time() {
            Ok(time) => time,
            Err(_) => continue,
        };

        return Some(date.and_time(time));
    }

    None
}

fn strip_weekday(text: &str) -> String {
    let trimmed = text.trim();
    if let Some((first, rest)) = trimmed.split_once(char::is_whitespace) {
        let name = first.trim_end_matches(',').to_ascii_lowercase();
        if WEEKDAY_NAMES.contains(&name.as_str()) {
            return rest.trim_start().to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_normalize_keeps_only_last_timezone_token() {
        assert_eq!(
            normalize_timezone_tokens("Wed Sep 03, 3:30pm CEDT CEST"),
            "Wed Sep 03, 3:30pm CEST"
        );
        assert_eq!(
            normalize_timezone_tokens("Wed Sep 03, 3:30pm CST EDT"),
            "Wed Sep 03, 3:30pm EDT"
        );
    }

    #[test]
    fn test_normalize_single_token_unchanged() {
        assert_eq!(
            normalize_timezone_tokens("Wed Sep 03, 3:30pm CST"),
            "Wed Sep 03, 3:30pm CST"
        );
    }

    #[test]
    fn test_normalize_without_tokens_passes_through() {
        assert_eq!(
            normalize_timezone_tokens("Wed Sep 03, 3:30pm"),
            "Wed Sep 03, 3:30pm"
        );
    }

    #[test]
    fn test_last_token_wins() {
        // CEST resolves to Warsaw (UTC+2 on Sep 3), so 3:30pm local is 13:30 UTC
        let dt = parse_auction_datetime("Wed Sep 03, 3:30pm CEDT CEST").unwrap();
        assert_eq!(dt.month(), 9);
        assert_eq!(dt.day(), 3);
        assert_eq!(dt.hour(), 13);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_abbreviation_resolves_zone_with_dst_rules() {
        // The CST token names America/Chicago, which observes CDT (UTC-5)
        // on Sep 3 regardless of what the abbreviation literally says
        let dt = parse_auction_datetime("Wed Sep 03, 3:30pm CST").unwrap();
        assert_eq!(dt.hour(), 20);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_explicit_year_is_honored() {
        let dt = parse_auction_datetime("Sep 03 2024, 3:30pm CEST").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hour(), 13);
    }

    #[test]
    fn test_missing_timezone_fails() {
        let err = parse_auction_datetime("Wed Sep 03, 3:30pm").unwrap_err();
        assert!(matches!(err, DateParseError::MissingTimezone(_)));
    }

    #[test]
    fn test_abbreviation_matching_is_exact_case() {
        // Lowercase tokens are not recognized; this is a known limitation
        // of the feed convention, preserved rather than case-folded
        let err = parse_auction_datetime("Wed Sep 03, 3:30pm cest").unwrap_err();
        assert!(matches!(err, DateParseError::MissingTimezone(_)));
    }

    #[test]
    fn test_unparseable_text_fails() {
        let err = parse_auction_datetime("sometime soon CEST").unwrap_err();
        assert!(matches!(err, DateParseError::UnrecognizedFormat(_)));
    }

    #[test]
    fn test_to_display_time_is_total() {
        let dt = parse_auction_datetime("Wed Sep 03, 3:30pm CEST").unwrap();
        let local = to_display_time(dt);
        assert_eq!(local.hour(), 15);
        assert_eq!(local.minute(), 30);
    }
}
