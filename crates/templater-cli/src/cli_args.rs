use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};
use templater_core::EventType;

/// Generate announcement texts for Montréal-Python events.
#[derive(Parser, Debug, Clone)]
#[command(name = "mtlpy-templater", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args, Default)]
pub struct GlobalArgs {
    /// Read the TOML event record from FILE (stdin when omitted or "-").
    #[arg(short, long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Save output to FILE (stdout when omitted or "-").
    #[arg(short, long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Configuration file to use instead of the default config.toml.
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Directory holding the template files.
    #[arg(long, global = true, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub templates_dir: Option<String>,

    /// Seed for the bilingual language order.
    #[arg(long, global = true, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Also write JSON logs to the config directory.
    #[arg(long, global = true)]
    pub log_file: bool,
}

/// Supported subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List template names, including synthesized bilingual ones.
    ListTemplates,
    /// Print a blank event record for the given event type.
    NewEvent(NewEventArgs),
    /// Print the normalized event record, sorted by field name.
    ShowFields,
    /// Render TEMPLATE with the event record.
    Expand(ExpandArgs),
    /// Write a default config.toml unless one already exists.
    InitConfig,
}

#[derive(Debug, Clone, Args)]
pub struct NewEventArgs {
    /// Event type: mm (monthly meeting) or prog-night.
    #[arg(long = "type", value_name = "TYPE", default_value = "mm", value_parser = parse_event_type)]
    pub event_type: EventType,
}

#[derive(Debug, Clone, Args)]
pub struct ExpandArgs {
    /// Template name, path, or <base>-bilingual.
    #[arg(value_name = "TEMPLATE")]
    pub template: String,
}

fn parse_event_type(value: &str) -> Result<EventType, String> {
    value.parse::<EventType>().map_err(|err| err.to_string())
}
