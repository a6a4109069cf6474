use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Composite heights ("6-8" ⇄ 80 inches)
// ---------------------------------------------------------------------------

/// Why a composite height string could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeightParseError {
    #[error("height is empty")]
    Empty,
    #[error("expected `<feet>-<inches>`, got {0:?}")]
    Shape(String),
    #[error("non-numeric part in height {0:?}")]
    Number(String),
}

/// A height split into its feet and inches components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Height {
    pub feet: u32,
    pub inches: u32,
}

impl Height {
    pub fn total_inches(&self) -> u32 {
        self.feet * 12 + self.inches
    }
}

/// Parse a composite height of the exact form `"<feet>-<inches>"`.
///
/// Each part may carry surrounding whitespace; a leading minus sign always
/// produces an extra dash-separated part and is rejected as a shape error.
pub fn parse_height(composite: &str) -> Result<Height, HeightParseError> {
    if composite.trim().is_empty() {
        return Err(HeightParseError::Empty);
    }
    let parts: Vec<&str> = composite.split('-').collect();
    let [feet, inches] = parts.as_slice() else {
        return Err(HeightParseError::Shape(composite.to_string()));
    };
    let number = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|_| HeightParseError::Number(composite.to_string()))
    };
    let height = Height {
        feet: number(feet)?,
        inches: number(inches)?,
    };
    // Reject values whose total would not fit.
    height
        .feet
        .checked_mul(12)
        .and_then(|f| f.checked_add(height.inches))
        .ok_or_else(|| HeightParseError::Number(composite.to_string()))?;
    Ok(height)
}

/// Total inches for a composite height, or `0` when it cannot be parsed.
///
/// `0` means "unknown", never a real height.
pub fn height_to_inches(composite: &str) -> u32 {
    parse_height(composite)
        .map(|h| h.total_inches())
        .unwrap_or(0)
}

/// Format a number of inches as a composite `"F-I"` height.
/// Non-positive input yields `"0-0"`.
pub fn inches_to_height(inches: i64) -> String {
    if inches <= 0 {
        return "0-0".to_string();
    }
    format!("{}-{}", inches / 12, inches % 12)
}

// ---------------------------------------------------------------------------
// Age from birthday
// ---------------------------------------------------------------------------

/// Displayed in place of an age that could not be computed.
pub const AGE_SENTINEL: &str = "—";

/// Age in whole years, or [`Age::Unknown`] for an unreadable birthday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Age {
    Years(i32),
    Unknown,
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Years(n) => write!(f, "{n}"),
            Age::Unknown => f.write_str(AGE_SENTINEL),
        }
    }
}

impl Serialize for Age {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_birthday(date: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
}

/// Age on `today` of someone born on `birthday`.
pub fn age_on(birthday: &str, today: NaiveDate) -> Age {
    match parse_birthday(birthday) {
        Ok(born) => {
            let not_yet = (today.month(), today.day()) < (born.month(), born.day());
            Age::Years(today.year() - born.year() - i32::from(not_yet))
        }
        Err(_) => Age::Unknown,
    }
}

/// Age as of the current UTC date.
pub fn age_from_birthday(birthday: &str) -> Age {
    age_on(birthday, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn height_to_inches_parses_composite() {
        assert_eq!(height_to_inches("6-8"), 80);
        assert_eq!(height_to_inches("7-0"), 84);
        assert_eq!(height_to_inches(" 6 - 2 "), 74);
    }

    #[test]
    fn height_to_inches_falls_back_to_zero() {
        for bad in ["", "   ", "abc", "6", "6-8-2", "-6-8", "6--8", "6-", "-8", "6-x"] {
            assert_eq!(height_to_inches(bad), 0, "input {bad:?}");
        }
    }

    #[test]
    fn parse_height_reports_cause() {
        assert_eq!(parse_height(""), Err(HeightParseError::Empty));
        assert_eq!(parse_height("6"), Err(HeightParseError::Shape("6".into())));
        assert_eq!(
            parse_height("six-8"),
            Err(HeightParseError::Number("six-8".into()))
        );
        assert_eq!(parse_height("6-8"), Ok(Height { feet: 6, inches: 8 }));
    }

    #[test]
    fn inches_to_height_formats() {
        assert_eq!(inches_to_height(80), "6-8");
        assert_eq!(inches_to_height(84), "7-0");
        assert_eq!(inches_to_height(11), "0-11");
        assert_eq!(inches_to_height(0), "0-0");
        assert_eq!(inches_to_height(-5), "0-0");
    }

    #[test]
    fn canonical_heights_round_trip() {
        for feet in 0..9 {
            for inches in 0..12 {
                let s = format!("{feet}-{inches}");
                assert_eq!(inches_to_height(i64::from(height_to_inches(&s))), s);
            }
        }
    }

    #[test]
    fn non_canonical_height_does_not_round_trip() {
        assert_eq!(height_to_inches("6-14"), 86);
        assert_eq!(inches_to_height(86), "7-2");
    }

    #[test]
    fn age_counts_completed_years() {
        let today = date(2024, 6, 15);
        assert_eq!(age_on("1990-06-15", today), Age::Years(34));
        assert_eq!(age_on("1990-06-16", today), Age::Years(33));
        assert_eq!(age_on("1990-01-01", today), Age::Years(34));
        assert_eq!(age_on("1990-12-31", today), Age::Years(33));
    }

    #[test]
    fn age_from_birthday_uses_current_date() {
        assert!(matches!(age_from_birthday("1990-06-15"), Age::Years(n) if n > 0));
        assert_eq!(age_from_birthday("sometime"), Age::Unknown);
        assert_eq!(age_from_birthday(""), Age::Unknown);
    }

    #[test]
    fn age_sentinel_for_bad_dates() {
        let today = date(2024, 6, 15);
        assert_eq!(age_on("", today), Age::Unknown);
        assert_eq!(age_on("15/06/1990", today), Age::Unknown);
        assert_eq!(age_on("1990-02-30", today), Age::Unknown);
        assert_eq!(Age::Unknown.to_string(), "—");
        assert_eq!(Age::Years(27).to_string(), "27");
    }

    #[test]
    fn parse_birthday_keeps_error() {
        assert!(parse_birthday("not a date").is_err());
        assert_eq!(parse_birthday("1988-03-14").unwrap(), date(1988, 3, 14));
    }
}
