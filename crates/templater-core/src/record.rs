//! Flat field-name to string mapping describing one event occurrence, plus the
//! TOML adapter used to read and write it.

use std::collections::BTreeMap;

use toml::{Table, Value};

use crate::error::{Result, TemplaterError};

/// Name of the top-level table holding the event fields in a record document.
pub const EVENT_TABLE: &str = "event";

/// One event, keyed by field name. Iteration order is sorted by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRecord {
    fields: BTreeMap<String, String>,
}

impl EventRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup that distinguishes an absent field from a present one.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns the value when present and non-blank.
    pub fn non_empty(&self, field: &str) -> Option<&str> {
        self.get(field).filter(|value| !value.trim().is_empty())
    }

    /// Like [`EventRecord::non_empty`] but fails with `MissingField`.
    pub fn require(&self, field: &str) -> Result<&str> {
        self.non_empty(field)
            .ok_or_else(|| TemplaterError::missing(field))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Inserts only when `field` is not already present.
    pub fn insert_missing(&mut self, field: &str, value: &str) {
        if !self.fields.contains_key(field) {
            self.fields.insert(field.to_string(), value.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Parses a structured document whose `event` table holds the fields.
    ///
    /// Non-string scalars (integers, floats, booleans, date-times) are kept
    /// in their textual TOML form so that `number = 42` or an unquoted
    /// `date = 2024-03-12T18:30:00` behave like their quoted equivalents.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut document: Table = toml::from_str(text)?;
        let table = match document.remove(EVENT_TABLE) {
            Some(Value::Table(table)) => table,
            Some(other) => {
                return Err(TemplaterError::InvalidRecord(format!(
                    "'{EVENT_TABLE}' must be a table, found {}",
                    other.type_str()
                )));
            }
            None => {
                return Err(TemplaterError::InvalidRecord(format!(
                    "no [{EVENT_TABLE}] table found"
                )));
            }
        };

        let mut record = EventRecord::new();
        for (key, value) in table {
            let text = scalar_to_string(&key, value)?;
            record.insert(key, text);
        }
        Ok(record)
    }

    /// Serializes the record as an `[event]` table, fields sorted by name.
    pub fn to_toml_string(&self) -> Result<String> {
        let event: Table = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        document_with_event(event)
    }
}

impl FromIterator<(String, String)> for EventRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for EventRecord {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

pub(crate) fn document_with_event(event: Table) -> Result<String> {
    let mut document = Table::new();
    document.insert(EVENT_TABLE.to_string(), Value::Table(event));
    Ok(toml::to_string(&document)?)
}

fn scalar_to_string(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text),
        Value::Integer(number) => Ok(number.to_string()),
        Value::Float(number) => Ok(number.to_string()),
        Value::Boolean(flag) => Ok(flag.to_string()),
        Value::Datetime(when) => Ok(when.to_string()),
        other => Err(TemplaterError::InvalidRecord(format!(
            "field '{key}' must be a scalar, found {}",
            other.type_str()
        ))),
    }
}
