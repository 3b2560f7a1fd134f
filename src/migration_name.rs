use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

const PREFIX: &str = "Migration";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Migration\d{14}$").expect("migration name pattern is valid"));

/// Identifier for one generated migration: `Migration` + `YYYYMMDDHHMMSS`.
///
/// Names only have whole-second resolution, so two runs started within the
/// same second produce the same name. Nothing here guards against that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MigrationName(String);

impl MigrationName {
    /// Name derived from the local wall clock.
    pub fn generate() -> Self {
        Self::at(&Local::now())
    }

    pub fn at<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(format!("{}{}", PREFIX, timestamp.format(TIMESTAMP_FORMAT)))
    }

    /// Parse a previously generated name. Both the shape and the encoded
    /// date and time must be valid.
    pub fn parse(name: &str) -> Option<Self> {
        if !NAME_PATTERN.is_match(name) {
            return None;
        }
        let candidate = Self(name.to_string());
        candidate.timestamp().map(|_| candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The timestamp the name encodes.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.0.strip_prefix(PREFIX)?, TIMESTAMP_FORMAT).ok()
    }
}

impl fmt::Display for MigrationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
