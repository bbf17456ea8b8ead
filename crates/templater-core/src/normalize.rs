//! Derives computed fields (happy-hour URL, localized dates, global constants)
//! from a raw event record.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::config::{DEFAULT_HAPPYHOUR_URL, FileConfig, default_constants};
use crate::error::{Result, TemplaterError};
use crate::lang::Language;
use crate::record::EventRecord;

/// Minute precision, space separated; parseable by [`parse_event_date`].
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Inputs to normalization that do not come from the event itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeSettings {
    /// URL pattern with a `{number}` placeholder.
    pub happyhour_url: String,
    pub constants: BTreeMap<String, String>,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            happyhour_url: DEFAULT_HAPPYHOUR_URL.to_string(),
            constants: default_constants(),
        }
    }
}

impl From<&FileConfig> for NormalizeSettings {
    fn from(config: &FileConfig) -> Self {
        Self {
            happyhour_url: config.happyhour_url.clone(),
            constants: config.constants.clone(),
        }
    }
}

/// Normalizes with the built-in URL pattern and constants.
pub fn normalize(record: &EventRecord) -> Result<EventRecord> {
    normalize_with(record, &NormalizeSettings::default())
}

/// Returns a copy of `record` with every derivable field filled in. Fields
/// supplied by the caller are never removed.
pub fn normalize_with(record: &EventRecord, settings: &NormalizeSettings) -> Result<EventRecord> {
    let mut event = record.clone();

    if event.non_empty("happyhour_url").is_none() {
        let number = event.require("number")?.trim().to_string();
        let url = settings.happyhour_url.replace("{number}", &number);
        debug!(%url, "Derived happy hour URL");
        event.insert("happyhour_url", url);
    }

    let raw_date = event.require("date")?;
    let when = parse_event_date(raw_date)?;

    event.insert("date", when.format(CANONICAL_DATE_FORMAT).to_string());
    for language in Language::BOTH {
        let code = language.code();
        event.insert(format!("month_{code}"), language.month_name(&when));
        event.insert(format!("date_{code}"), language.long_date(&when));
        event.insert(format!("time_{code}"), language.time(&when));
    }

    for (key, value) in &settings.constants {
        event.insert_missing(key, value);
    }

    Ok(event)
}

/// Parses the ISO 8601 flavours accepted in event records. Offsets are
/// dropped: the wall-clock time written by the organizer is what gets shown.
pub fn parse_event_date(raw: &str) -> Result<NaiveDateTime> {
    let text = raw.trim();

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(when) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(when);
        }
    }
    if let Ok(when) = DateTime::parse_from_rfc3339(text) {
        return Ok(when.naive_local());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight);
    }

    Err(TemplaterError::InvalidDate {
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> EventRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn derives_happyhour_url_from_number() {
        let event = normalize(&record(&[("number", "42"), ("date", "2024-03-12T18:30:00")])).unwrap();
        assert_eq!(
            event.get("happyhour_url"),
            Some("https://pymtl-meet.fjnr.ca/mp-42")
        );
    }

    #[test]
    fn keeps_supplied_happyhour_url() {
        let event = normalize(&record(&[
            ("happyhour_url", "https://example.org/party"),
            ("date", "2024-03-12T18:30:00"),
        ]))
        .unwrap();
        assert_eq!(event.get("happyhour_url"), Some("https://example.org/party"));
        assert_eq!(event.get("number"), None);
    }

    #[test]
    fn empty_happyhour_url_is_recomputed() {
        let event = normalize(&record(&[
            ("number", "7"),
            ("happyhour_url", ""),
            ("date", "2024-03-12T18:30:00"),
        ]))
        .unwrap();
        assert_eq!(event.get("happyhour_url"), Some("https://pymtl-meet.fjnr.ca/mp-7"));
    }

    #[test]
    fn missing_number_without_url_fails() {
        let err = normalize(&record(&[("date", "2024-03-12T18:30:00")])).unwrap_err();
        assert!(matches!(err, TemplaterError::MissingField(ref f) if f == "number"));
    }

    #[test]
    fn missing_and_invalid_dates() {
        let err = normalize(&record(&[("number", "1")])).unwrap_err();
        assert!(matches!(err, TemplaterError::MissingField(ref f) if f == "date"));

        let err = normalize(&record(&[("number", "1"), ("date", "next tuesday")])).unwrap_err();
        assert!(matches!(err, TemplaterError::InvalidDate { ref value } if value == "next tuesday"));
    }

    #[test]
    fn derives_localized_strings() {
        let event = normalize(&record(&[("number", "42"), ("date", "2024-03-12T18:30:00")])).unwrap();

        assert_eq!(event.get("date"), Some("2024-03-12 18:30"));
        assert_eq!(event.get("month_fr"), Some("mars"));
        assert_eq!(event.get("month_en"), Some("March"));
        assert_eq!(event.get("date_fr"), Some("12 mars, 2024 à 18:30"));
        assert_eq!(event.get("date_en"), Some("March 12, 2024 at 6:30 pm"));
        assert_eq!(event.get("time_fr"), Some("18:30"));
        assert_eq!(event.get("time_en"), Some("6:30 pm"));
    }

    #[test]
    fn constants_never_overwrite_event_fields() {
        let event = normalize(&record(&[
            ("number", "42"),
            ("date", "2024-03-12T18:30:00"),
            ("org_email", "speakers@example.org"),
        ]))
        .unwrap();

        assert_eq!(event.get("org_email"), Some("speakers@example.org"));
        assert_eq!(
            event.get("calendar_fr"),
            Some(crate::config::DEFAULT_CALENDAR_FR)
        );
    }

    #[test]
    fn never_removes_fields_and_leaves_input_untouched() {
        let raw = record(&[
            ("number", "42"),
            ("date", "2024-03-12T18:30:00"),
            ("bios_en", "Ada"),
        ]);
        let event = normalize(&raw).unwrap();

        for (key, _) in raw.iter() {
            assert!(event.contains(key), "{key} was dropped");
        }
        assert_eq!(raw.get("date"), Some("2024-03-12T18:30:00"));
        assert_eq!(raw.len(), 3);
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let once = normalize(&record(&[("number", "42"), ("date", "2024-11-05T09:05")])).unwrap();
        let twice = normalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn custom_settings_are_applied() {
        let settings = NormalizeSettings {
            happyhour_url: "https://hh.example.org/{number}/join".to_string(),
            constants: BTreeMap::from([("venue".to_string(), "Notman House".to_string())]),
        };
        let event = normalize_with(
            &record(&[("number", "99"), ("date", "2024-03-12")]),
            &settings,
        )
        .unwrap();

        assert_eq!(event.get("happyhour_url"), Some("https://hh.example.org/99/join"));
        assert_eq!(event.get("venue"), Some("Notman House"));
        assert_eq!(event.get("org_email"), None);
        assert_eq!(event.get("date"), Some("2024-03-12 00:00"));
    }

    #[test]
    fn accepted_date_shapes() {
        for raw in [
            "2024-03-12T18:30:00",
            "2024-03-12T18:30:00.250",
            "2024-03-12 18:30:00",
            "2024-03-12T18:30",
            "2024-03-12 18:30",
            "2024-03-12T18:30:00-04:00",
            "2024-03-12T18:30:00Z",
        ] {
            let when = parse_event_date(raw).unwrap();
            assert_eq!(
                when.format(CANONICAL_DATE_FORMAT).to_string(),
                "2024-03-12 18:30",
                "for input {raw}"
            );
        }
    }
}
