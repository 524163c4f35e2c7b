//! Date handling for dotmailer payloads and query paths.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const DATE_FORMAT: &str = "%Y-%m-%d";
// The space between date and time is sent pre-encoded.
const DATE_TIME_FORMAT: &str = "%Y-%m-%d%%20%H:%M:%S";

/// Render a date for use inside a resource path.
///
/// `round_to_date` keeps only the calendar day (`yyyy-MM-dd`); otherwise the time of
/// day is included as `yyyy-MM-dd%20HH:mm:ss`.
pub fn format_for_path(value: &DateTime<Utc>, round_to_date: bool) -> String {
    let format = if round_to_date {
        DATE_FORMAT
    } else {
        DATE_TIME_FORMAT
    };
    value.format(format).to_string()
}

fn parse_lenient(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Deserialize an optional timestamp, accepting RFC 3339 or a zone-less
/// `yyyy-MM-ddTHH:mm:ss[.fff]` (read as UTC). Unparseable values become `None`.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_lenient))
}
