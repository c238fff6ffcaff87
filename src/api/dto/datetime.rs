//! Lenient timestamp parsing for request bodies.
//!
//! The mobile client sends either full RFC 3339 timestamps or bare
//! `YYYY-MM-DD` dates from its date pickers. Bare dates become midnight UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

pub fn parse(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date '{s}', expected RFC 3339 or YYYY-MM-DD"))
}

/// For `Option<DateTime<Utc>>` fields. Use with `#[serde(default)]`.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| parse(&s))
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// For patch fields: absent = `None`, `null` = `Some(None)`, value = `Some(Some(_))`.
/// Use with `#[serde(default)]`.
pub fn double_optional<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "optional")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "double_optional")]
        patch: Option<Option<DateTime<Utc>>>,
    }

    #[test]
    fn test_accepts_rfc3339_and_bare_dates() {
        assert_eq!(
            parse("2026-03-10T12:00:00.000Z").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
        );
        assert_eq!(
            parse("2026-03-10").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap()
        );
        assert!(parse("10/03/2026").is_err());
    }

    #[test]
    fn test_absent_null_and_value() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        assert!(absent.at.is_none());
        assert!(absent.patch.is_none());

        let null: Body = serde_json::from_str(r#"{"at":null,"patch":null}"#).unwrap();
        assert!(null.at.is_none());
        assert_eq!(null.patch, Some(None));

        let set: Body = serde_json::from_str(r#"{"patch":"2026-03-10"}"#).unwrap();
        assert!(matches!(set.patch, Some(Some(_))));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(serde_json::from_str::<Body>(r#"{"at":"tomorrow"}"#).is_err());
    }
}
