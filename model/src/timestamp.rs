use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// A user-entered date-time, parsed and rendered the way the flow CSV writes timestamps:
/// `YYYY/M/D H:MM`. Month, day, and hour have no leading zeros; minutes always have two digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalTimestamp {
    datetime: NaiveDateTime,
    text: String,
}

/// The input couldn't be understood as a date-time. Never produces a partial match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidTimestamp {
    pub input: String,
}

impl fmt::Display for InvalidTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid date-time {:?}", self.input)
    }
}

impl std::error::Error for InvalidTimestamp {}

// Tried in order. The first is what a datetime-local picker produces.
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

impl CanonicalTimestamp {
    pub fn parse(input: &str) -> Result<Self, InvalidTimestamp> {
        let trimmed = input.trim();
        let invalid = || InvalidTimestamp {
            input: input.to_string(),
        };
        if trimmed.is_empty() {
            return Err(invalid());
        }

        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self::new(datetime));
            }
        }
        // A bare date means midnight
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
                return Ok(Self::new(datetime));
            }
        }
        Err(invalid())
    }

    pub fn new(datetime: NaiveDateTime) -> Self {
        Self {
            text: format!(
                "{}/{}/{} {}:{:02}",
                datetime.year(),
                datetime.month(),
                datetime.day(),
                datetime.hour(),
                datetime.minute()
            ),
            datetime,
        }
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    /// The comparison key for lookups
    pub fn normalized(&self) -> String {
        normalize(&self.text)
    }
}

impl fmt::Display for CanonicalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Strips all whitespace and lower-cases. Both sides of a lookup go through this.
pub fn normalize(timestamp: &str) -> String {
    timestamp
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
