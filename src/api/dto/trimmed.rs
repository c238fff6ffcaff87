//! Whitespace-trimming deserializers for text fields.
//!
//! Trimming happens while deserializing, so `validator` length rules and the
//! database constraints see the same value.

use serde::{Deserialize, Deserializer};

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

/// For `Option<String>` fields. Use with `#[serde(default)]`.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[serde(deserialize_with = "string")]
        name: String,
        #[serde(default, deserialize_with = "optional")]
        label: Option<String>,
    }

    #[test]
    fn test_trims_required_field() {
        let body: Body = serde_json::from_str(r#"{"name":"  Leche \n"}"#).unwrap();
        assert_eq!(body.name, "Leche");
        assert!(body.label.is_none());
    }

    #[test]
    fn test_blank_becomes_empty() {
        let body: Body = serde_json::from_str(r#"{"name":"   ","label":"  "}"#).unwrap();
        assert_eq!(body.name, "");
        assert_eq!(body.label.as_deref(), Some(""));
    }

    #[test]
    fn test_null_optional_is_none() {
        let body: Body = serde_json::from_str(r#"{"name":"Pan","label":null}"#).unwrap();
        assert!(body.label.is_none());
    }
}
