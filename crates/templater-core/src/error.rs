use std::io;

use thiserror::Error;

/// Failures surfaced by the templating pipeline. Nothing is retried; callers
/// report the message and abort the run.
#[derive(Debug, Error)]
pub enum TemplaterError {
    #[error("unknown event type '{0}' (expected one of: {known})", known = crate::catalog::EventType::names().join(", "))]
    UnknownEventType(String),
    #[error("missing required field '{0}'")]
    MissingField(String),
    #[error("invalid date '{value}': expected an ISO 8601 date-time such as 2024-03-12T18:30")]
    InvalidDate { value: String },
    #[error(
        "don't know where to find the body of template '{0}'; try a full path or one of the names returned by the list-templates command"
    )]
    TemplateNotFound(String),
    #[error("expected exactly one '{pattern}' template in {dir}, found {found}")]
    AmbiguousOrMissingVariant {
        pattern: String,
        dir: String,
        found: usize,
    },
    #[error("template references undefined field '{0}'")]
    UndefinedPlaceholder(String),
    #[error("invalid event record: {0}")]
    InvalidRecord(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl TemplaterError {
    pub fn missing<T: Into<String>>(field: T) -> Self {
        TemplaterError::MissingField(field.into())
    }
}

pub type Result<T> = std::result::Result<T, TemplaterError>;
