//! Template lookup: direct paths, names inside the templates directory and
//! synthesized `-bilingual` entries.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::debug;

use crate::bilingual;
use crate::error::{Result, TemplaterError};
use crate::lang::Language;

/// Suffix marking a virtual template composed from a `-fr`/`-en` pair.
pub const BILINGUAL_SUFFIX: &str = "-bilingual";

/// Read-only view over a directory of template files.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the body for `name`, trying in order: `name` as a path, `name`
    /// inside the templates directory, then bilingual composition when `name`
    /// ends with [`BILINGUAL_SUFFIX`]. `rng` is only consulted for the latter.
    pub fn resolve<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Result<String> {
        let direct = Path::new(name);
        if direct.is_file() {
            debug!(path = %direct.display(), "Template resolved as a direct path");
            return Ok(fs::read_to_string(direct)?);
        }

        let in_dir = self.dir.join(name);
        if in_dir.is_file() {
            debug!(path = %in_dir.display(), "Template resolved in templates directory");
            return Ok(fs::read_to_string(in_dir)?);
        }

        if let Some(base) = name.strip_suffix(BILINGUAL_SUFFIX) {
            if !base.is_empty() {
                debug!(base, "Composing bilingual template");
                return bilingual::compose(self, base, rng);
            }
        }

        Err(TemplaterError::TemplateNotFound(name.to_string()))
    }

    /// Every file in the templates directory plus a `<base>-bilingual` entry for
    /// each base with both a `-fr` and an `-en` variant, sorted.
    pub fn list_available(&self) -> Result<Vec<String>> {
        let files = self.file_names()?;
        let mut variants: BTreeMap<&str, BTreeSet<Language>> = BTreeMap::new();

        for file in &files {
            if let Some((base, language)) = split_variant(file) {
                variants.entry(base).or_default().insert(language);
            }
        }

        let mut names: Vec<String> = variants
            .iter()
            .filter(|(_, languages)| languages.len() == Language::BOTH.len())
            .map(|(base, _)| format!("{base}{BILINGUAL_SUFFIX}"))
            .collect();
        names.extend(files.iter().cloned());
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Paths of the files matching `<base>-<lang>.*`.
    pub fn variant_paths(&self, base: &str, language: Language) -> Result<Vec<PathBuf>> {
        let prefix = format!("{base}-{}.", language.code());
        let mut matches: Vec<PathBuf> = self
            .file_names()?
            .into_iter()
            .filter(|file| file.starts_with(&prefix))
            .map(|file| self.dir.join(file))
            .collect();
        matches.sort();
        Ok(matches)
    }

    fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => debug!(name = ?raw, "Skipping template with non UTF-8 name"),
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Splits `invite-fr.txt` into (`invite`, French). The extension is whatever
/// follows the last dot and must be present, as [`TemplateStore::variant_paths`]
/// only matches `<base>-<lang>.*`.
fn split_variant(file: &str) -> Option<(&str, Language)> {
    let stem = match file.rfind('.') {
        Some(0) | None => return None,
        Some(dot) => &file[..dot],
    };
    Language::BOTH.into_iter().find_map(|language| {
        stem.strip_suffix(language.code())
            .and_then(|rest| rest.strip_suffix('-'))
            .map(|base| (base, language))
    })
}
