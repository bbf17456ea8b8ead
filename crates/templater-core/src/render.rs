//! Flat `{field}` substitution. No escapes, no nesting, one pass. Any
//! brace-free token between braces names a field, so `{name-fr}` works and a
//! typo such as `{date fr}` is reported instead of shipped.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{Result, TemplaterError};
use crate::record::EventRecord;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern compiles")
});

/// Field names referenced by `body`, in order of first appearance.
pub fn placeholders(body: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for captures in PLACEHOLDER.captures_iter(body) {
        if let Some(name) = captures.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Replaces every `{field}` in `body` with its value from `record`.
/// Substituted values are not scanned again.
pub fn render(body: &str, record: &EventRecord) -> Result<String> {
    if let Some(missing) = placeholders(body)
        .into_iter()
        .find(|name| !record.contains(name))
    {
        return Err(TemplaterError::UndefinedPlaceholder(missing.to_string()));
    }

    let rendered = PLACEHOLDER.replace_all(body, |captures: &Captures<'_>| {
        record.get(&captures[1]).unwrap_or_default().to_string()
    });
    Ok(rendered.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> EventRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn substitutes_every_occurrence() {
        let event = record(&[("a", "x"), ("b", "y")]);
        assert_eq!(render("{a}-{b}", &event).unwrap(), "x-y");
        assert_eq!(render("{a}{a} {b}", &event).unwrap(), "xx y");
    }

    #[test]
    fn undefined_placeholder_fails() {
        let err = render("{a}-{b}", &record(&[("a", "x")])).unwrap_err();
        assert!(matches!(err, TemplaterError::UndefinedPlaceholder(ref f) if f == "b"));
    }

    #[test]
    fn empty_values_are_defined() {
        assert_eq!(render("[{a}]", &record(&[("a", "")])).unwrap(), "[]");
    }

    #[test]
    fn values_are_not_expanded_again() {
        let event = record(&[("a", "{b}"), ("b", "nope")]);
        assert_eq!(render("{a}", &event).unwrap(), "{b}");
    }

    #[test]
    fn any_brace_token_is_a_field_name() {
        let event = record(&[("name-fr", "X"), ("a", "x")]);
        assert_eq!(render("{name-fr} {a} {}", &event).unwrap(), "X x {}");

        let err = render("{name-fr} {date fr}", &event).unwrap_err();
        assert!(matches!(err, TemplaterError::UndefinedPlaceholder(ref f) if f == "date fr"));
    }

    #[test]
    fn lists_placeholders_once_in_order() {
        assert_eq!(
            placeholders("{date_fr} {number} {date_fr} {name_en}"),
            vec!["date_fr", "number", "name_en"]
        );
        assert!(placeholders("plain text").is_empty());
    }
}
