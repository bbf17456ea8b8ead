//! Per event type field lists, used to scaffold blank event records.

use std::fmt;
use std::str::FromStr;

use toml::{Table, Value};

use crate::error::{Result, TemplaterError};
use crate::record::document_with_event;

pub const MONTHLY_MEETING_FIELDS: &[&str] = &[
    "number",
    "name_fr",
    "name_en",
    "date",
    "youtube_url",
    "meetup_url",
    "streamyard_url",
    "presentations_fr",
    "presentations_en",
    "bios_fr",
    "bios_en",
];

pub const PROGRAMMING_NIGHT_FIELDS: &[&str] = &[
    "number",
    "date",
    "meetup_url",
    "topics_short_fr",
    "topics_long_fr",
    "topics_short_en",
    "topics_long_en",
];

/// Registered kinds of recurring events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventType {
    #[default]
    MonthlyMeeting,
    ProgrammingNight,
}

impl EventType {
    pub const ALL: [EventType; 2] = [EventType::MonthlyMeeting, EventType::ProgrammingNight];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::MonthlyMeeting => "mm",
            EventType::ProgrammingNight => "prog-night",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(EventType::as_str).collect()
    }

    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            EventType::MonthlyMeeting => MONTHLY_MEETING_FIELDS,
            EventType::ProgrammingNight => PROGRAMMING_NIGHT_FIELDS,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = TemplaterError;

    fn from_str(value: &str) -> Result<Self> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|event_type| event_type.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TemplaterError::UnknownEventType(value.to_string()))
    }
}

/// Field names expected for `event_type`, in scaffold order.
pub fn fields_for(event_type: &str) -> Result<&'static [&'static str]> {
    Ok(event_type.parse::<EventType>()?.fields())
}

/// Blank `[event]` document listing every catalog field with an empty value.
pub fn new_event_scaffold(event_type: EventType) -> Result<String> {
    let event: Table = event_type
        .fields()
        .iter()
        .map(|field| (field.to_string(), Value::String(String::new())))
        .collect();
    document_with_event(event)
}
