//! One-shot runs: read an event, normalize it, resolve and render a template,
//! write the result.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::info;

use crate::catalog::{EventType, new_event_scaffold};
use crate::error::Result;
use crate::normalize::{NormalizeSettings, normalize_with};
use crate::record::EventRecord;
use crate::render::render;
use crate::templates::TemplateStore;

/// Where the event record comes from and where output goes. `None` or `-`
/// means the standard streams.
#[derive(Debug, Clone, Default)]
pub struct IoTargets {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl IoTargets {
    fn input_path(&self) -> Option<&Path> {
        self.input.as_deref().filter(|path| !is_dash(path))
    }

    fn output_path(&self) -> Option<&Path> {
        self.output.as_deref().filter(|path| !is_dash(path))
    }

    /// Reads the raw event record from the input file or stdin.
    pub fn load_event(&self) -> Result<EventRecord> {
        let text = match self.input_path() {
            Some(path) => fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                io::stdin().lock().read_to_string(&mut buffer)?;
                buffer
            }
        };
        EventRecord::from_toml_str(&text)
    }

    /// Writes `text` to the output file verbatim, or to stdout followed by a newline.
    pub fn write_output(&self, text: &str) -> Result<()> {
        match self.output_path() {
            Some(path) => {
                fs::write(path, text)?;
                info!(path = %path.display(), bytes = text.len(), "Output written");
            }
            None => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{text}")?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

fn is_dash(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Normalizes `raw` and renders the template called `template` against it.
pub fn expand_template<R: Rng + ?Sized>(
    raw: &EventRecord,
    template: &str,
    store: &TemplateStore,
    settings: &NormalizeSettings,
    rng: &mut R,
) -> Result<String> {
    let event = normalize_with(raw, settings)?;
    let body = store.resolve(template, rng)?;
    let rendered = render(&body, &event)?;
    info!(template, fields = event.len(), "Template expanded");
    Ok(rendered)
}

/// The normalized record as an `[event]` document sorted by field name.
pub fn show_fields(raw: &EventRecord, settings: &NormalizeSettings) -> Result<String> {
    let event = normalize_with(raw, settings)?;
    event.to_toml_string()
}

/// Newline separated template names, bilingual entries included.
pub fn list_templates(store: &TemplateStore) -> Result<String> {
    Ok(store.list_available()?.join("\n"))
}

pub fn new_event(event_type: EventType) -> Result<String> {
    new_event_scaffold(event_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::tempdir;

    #[test]
    fn reads_input_file_and_writes_output_file() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("event.toml");
        let output = temp.path().join("out.txt");
        fs::write(&input, "[event]\nnumber = \"5\"\n").unwrap();

        let targets = IoTargets {
            input: Some(input),
            output: Some(output.clone()),
        };
        let event = targets.load_event().unwrap();
        assert_eq!(event.get("number"), Some("5"));

        targets.write_output("rendered").unwrap();
        assert_eq!(fs::read_to_string(output).unwrap(), "rendered");
    }

    #[test]
    fn dash_means_standard_streams() {
        let targets = IoTargets {
            input: Some(PathBuf::from("-")),
            output: Some(PathBuf::from("-")),
        };
        assert!(targets.input_path().is_none());
        assert!(targets.output_path().is_none());
    }

    #[test]
    fn expand_runs_the_whole_chain() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("teaser.txt"), "Event #{number} on {date_fr}").unwrap();
        let store = TemplateStore::new(temp.path());
        let raw: EventRecord = [("number", "42"), ("date", "2024-03-12T18:30:00")]
            .into_iter()
            .collect();

        let text = expand_template(
            &raw,
            "teaser.txt",
            &store,
            &NormalizeSettings::default(),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert!(text.contains("Event #42 on 12 mars, 2024 à 18:30"), "{text}");
    }

    #[test]
    fn show_fields_is_sorted_and_reloadable() {
        let raw: EventRecord = [("number", "42"), ("date", "2024-03-12T18:30:00")]
            .into_iter()
            .collect();
        let settings = NormalizeSettings::default();

        let text = show_fields(&raw, &settings).unwrap();
        assert!(text.find("calendar_en").unwrap() < text.find("date").unwrap());
        assert!(text.find("month_fr").unwrap() < text.find("number").unwrap());

        let again = show_fields(&EventRecord::from_toml_str(&text).unwrap(), &settings).unwrap();
        assert_eq!(text, again);
    }
}
