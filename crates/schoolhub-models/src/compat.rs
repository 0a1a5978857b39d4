//! Lenient deserializers for fields the first browser-only SchoolHub wrote
//! in looser shapes. Serialization always uses the canonical form.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// RFC 3339 timestamps, or bare `YYYY-MM-DD` dates read as midnight UTC.
pub fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{}'", raw)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// A number, a numeric string such as `"3.20"`, or null (read as 0).
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumberOrText::Number(value)) => Ok(value),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(0.0),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a number, got '{}'", text))),
    }
}

/// Free-text fields that were sometimes stored as numbers.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrText::Text(text)) => Some(text),
        Some(NumberOrText::Number(value)) if value.fract() == 0.0 => Some(format!("{:.0}", value)),
        Some(NumberOrText::Number(value)) => Some(value.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "timestamp")]
        at: DateTime<Utc>,
        #[serde(default, deserialize_with = "lenient_f64")]
        score: f64,
        #[serde(default, deserialize_with = "lenient_text")]
        note: Option<String>,
    }

    fn sample(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        let s = sample(r#"{"at": "2024-01-10"}"#);
        assert_eq!((s.at.year(), s.at.month(), s.at.day()), (2024, 1, 10));
        assert_eq!(s.at.hour(), 0);
    }

    #[test]
    fn test_full_timestamp_kept() {
        let s = sample(r#"{"at": "2024-01-05T10:30:00.000Z"}"#);
        assert_eq!(s.at.hour(), 10);
        assert_eq!(s.at.minute(), 30);
    }

    #[test]
    fn test_garbage_date_rejected() {
        assert!(serde_json::from_str::<Sample>(r#"{"at": "last tuesday"}"#).is_err());
    }

    #[test]
    fn test_score_from_string_number_or_null() {
        assert_eq!(sample(r#"{"at": "2024-01-10", "score": "3.20"}"#).score, 3.2);
        assert_eq!(sample(r#"{"at": "2024-01-10", "score": 0}"#).score, 0.0);
        assert_eq!(sample(r#"{"at": "2024-01-10", "score": null}"#).score, 0.0);
        assert_eq!(sample(r#"{"at": "2024-01-10"}"#).score, 0.0);
        assert!(serde_json::from_str::<Sample>(r#"{"at": "2024-01-10", "score": "high"}"#).is_err());
    }

    #[test]
    fn test_note_from_number() {
        assert_eq!(sample(r#"{"at": "2024-01-10", "note": 5}"#).note.as_deref(), Some("5"));
        assert_eq!(sample(r#"{"at": "2024-01-10", "note": "5 years"}"#).note.as_deref(), Some("5 years"));
        assert_eq!(sample(r#"{"at": "2024-01-10", "note": null}"#).note, None);
    }
}
