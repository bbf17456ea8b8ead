//! Command-line front end for the event templater.

pub mod cli_args;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use templater_core::{
    FileConfig, IoTargets, LoggingDestination, NormalizeSettings, TemplateStore, expand_template,
    init_logging, list_templates, load_config, load_config_from, new_event, resolve_templates_dir,
    save_config, save_config_to, show_fields,
};
use tracing::debug;

use cli_args::{Cli, Command};

/// Runs one parsed invocation to completion.
pub fn run(cli: Cli) -> Result<()> {
    let destination = if cli.global.log_file {
        LoggingDestination::FileAndStderr
    } else {
        LoggingDestination::StderrOnly
    };
    if let Err(err) = init_logging(destination) {
        eprintln!("Warning: logging disabled: {err}");
    }

    let load = match cli.global.config.as_deref() {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    for warning in &load.warnings {
        eprintln!("Warning: {warning}");
    }
    let config = load.config;

    let targets = IoTargets {
        input: cli.global.input.clone(),
        output: cli.global.output.clone(),
    };
    let store = TemplateStore::new(resolve_templates_dir(
        cli.global.templates_dir.as_deref(),
        &config,
    ));
    debug!(dir = %store.dir().display(), source = ?load.source, "Templates directory selected");
    let settings = NormalizeSettings::from(&config);

    let output = match cli.command {
        Command::ListTemplates => list_templates(&store).with_context(|| {
            format!("cannot list templates in {}", store.dir().display())
        })?,
        Command::NewEvent(args) => new_event(args.event_type)?,
        Command::ShowFields => {
            let raw = targets.load_event()?;
            show_fields(&raw, &settings)?
        }
        Command::Expand(args) => {
            let raw = targets.load_event()?;
            match cli.global.seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed);
                    expand_template(&raw, &args.template, &store, &settings, &mut rng)?
                }
                None => {
                    let mut rng = rand::rng();
                    expand_template(&raw, &args.template, &store, &settings, &mut rng)?
                }
            }
        }
        Command::InitConfig => {
            let path = match cli.global.config.clone() {
                Some(path) => {
                    save_config_to(&path, &FileConfig::default())?;
                    path
                }
                None => save_config(&FileConfig::default())?,
            };
            println!("Wrote default configuration to {}", path.display());
            return Ok(());
        }
    };

    targets.write_output(&output)?;
    Ok(())
}
