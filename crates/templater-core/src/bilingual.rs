//! Merges a French and an English template into one document. The language
//! shown first is picked at random; a banner written in the second language
//! tells its readers to scroll down, and a marker opens their section.

use std::fs;
use std::path::PathBuf;

use rand::Rng;
use tracing::debug;

use crate::error::{Result, TemplaterError};
use crate::lang::Language;
use crate::templates::TemplateStore;

/// Uniformly picks `(first, second)` among the two language orders.
pub fn choose_order<R: Rng + ?Sized>(rng: &mut R) -> (Language, Language) {
    let first = if rng.random_bool(0.5) {
        Language::French
    } else {
        Language::English
    };
    (first, first.other())
}

/// Composes the bilingual document for `base` from `<base>-fr.*` and
/// `<base>-en.*`. Each language must match exactly one file.
pub fn compose<R: Rng + ?Sized>(store: &TemplateStore, base: &str, rng: &mut R) -> Result<String> {
    let french = single_variant(store, base, Language::French)?;
    let english = single_variant(store, base, Language::English)?;

    let (first, second) = choose_order(rng);
    debug!(base, %first, %second, "Bilingual order chosen");

    let path_for = |language: Language| match language {
        Language::French => &french,
        Language::English => &english,
    };
    let first_body = fs::read_to_string(path_for(first))?;
    let second_body = fs::read_to_string(path_for(second))?;

    Ok(join_segments(second, &first_body, &second_body))
}

/// Banner, first body, marker, second body; newline separated.
pub fn join_segments(second: Language, first_body: &str, second_body: &str) -> String {
    let banner = format!("-- {} --", second.follows_banner());
    let marker = format!("== {} ==", second.code().to_uppercase());
    [banner.as_str(), first_body, marker.as_str(), second_body].join("\n")
}

fn single_variant(store: &TemplateStore, base: &str, language: Language) -> Result<PathBuf> {
    let mut matches = store.variant_paths(base, language)?;
    if matches.len() == 1 {
        if let Some(path) = matches.pop() {
            return Ok(path);
        }
    }
    Err(TemplaterError::AmbiguousOrMissingVariant {
        pattern: format!("{base}-{}.*", language.code()),
        dir: store.dir().display().to_string(),
        found: matches.len(),
    })
}
