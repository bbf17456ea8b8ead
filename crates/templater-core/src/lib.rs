//! Core library for generating bilingual Montréal-Python event announcements
//! from event records and text templates.

pub mod bilingual;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lang;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod templates;

pub use catalog::{EventType, fields_for, new_event_scaffold};
pub use config::{
    ConfigError, ConfigLoadResult, ConfigSource, FileConfig, config_directory, config_path,
    load_config, load_config_from, resolve_templates_dir, save_config, save_config_to,
};
pub use error::{Result, TemplaterError};
pub use lang::Language;
pub use logging::{LoggingDestination, LoggingError, current_log_path, init_logging};
pub use normalize::{NormalizeSettings, normalize, normalize_with};
pub use pipeline::{IoTargets, expand_template, list_templates, new_event, show_fields};
pub use record::EventRecord;
pub use render::{placeholders, render};
pub use templates::{BILINGUAL_SUFFIX, TemplateStore};
