use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_DIR_NAME: &str = "mtlpy-templater";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const CONFIG_PATH_ENV: &str = "MTLPY_TEMPLATER_CONFIG";
pub const TEMPLATES_DIR_ENV: &str = "MTLPY_TEMPLATES_DIR";
pub const DEFAULT_HAPPYHOUR_URL: &str = "https://pymtl-meet.fjnr.ca/mp-{number}";
pub const DEFAULT_ORG_EMAIL: &str = "mtlpyteam@googlegroups.com";
pub const DEFAULT_CALENDAR_FR: &str = "https://montrealpython.org/fr/calendrier/";
pub const DEFAULT_CALENDAR_EN: &str = "https://montrealpython.org/en/calendar/";

/// Result returned by [`load_config`], capturing the source and any non-fatal issues.
#[derive(Debug, Clone)]
pub struct ConfigLoadResult {
    pub config: FileConfig,
    pub warnings: Vec<String>,
    pub source: ConfigSource,
}

/// Indicates where the configuration was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// No usable configuration file; defaults were synthesized.
    Default,
    /// Configuration was read from `config.toml`.
    File,
}

/// Errors that can occur when persisting configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Ser(toml::ser::Error),
    AlreadyExists(PathBuf),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {err}"),
            ConfigError::Ser(err) => write!(f, "TOML serialization error: {err}"),
            ConfigError::AlreadyExists(path) => {
                write!(f, "configuration already exists at {}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Ser(value)
    }
}

/// Disk-backed configuration schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub templates_dir: Option<String>,
    #[serde(default = "FileConfig::default_happyhour_url")]
    pub happyhour_url: String,
    /// Merged into every normalized record without overwriting event fields.
    #[serde(default = "default_constants")]
    pub constants: BTreeMap<String, String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            templates_dir: None,
            happyhour_url: Self::default_happyhour_url(),
            constants: default_constants(),
        }
    }
}

impl FileConfig {
    fn default_happyhour_url() -> String {
        DEFAULT_HAPPYHOUR_URL.to_string()
    }
}

pub fn default_constants() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("org_email".to_string(), DEFAULT_ORG_EMAIL.to_string()),
        ("calendar_fr".to_string(), DEFAULT_CALENDAR_FR.to_string()),
        ("calendar_en".to_string(), DEFAULT_CALENDAR_EN.to_string()),
    ])
}

/// Directory holding `config.toml` and the optional log file.
pub fn config_directory() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Path to `config.toml`, honouring `MTLPY_TEMPLATER_CONFIG`.
pub fn config_path() -> PathBuf {
    match env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => expand_path(&path),
        _ => config_directory().join(CONFIG_FILE_NAME),
    }
}

/// Load the configuration, falling back to defaults.
pub fn load_config() -> ConfigLoadResult {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> ConfigLoadResult {
    let mut warnings = Vec::new();

    if path.exists() {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<FileConfig>(&raw) {
                Ok(cfg) => {
                    let (cfg, mut sanitize_warnings) = sanitize_config(cfg);
                    warnings.append(&mut sanitize_warnings);
                    debug!(path = %path.display(), "Loaded configuration");
                    return ConfigLoadResult {
                        config: cfg,
                        warnings,
                        source: ConfigSource::File,
                    };
                }
                Err(err) => {
                    warnings.push(format!(
                        "Failed to parse {} as TOML: {}. Falling back to defaults.",
                        path.display(),
                        err
                    ));
                }
            },
            Err(err) => {
                warnings.push(format!(
                    "Failed to read {}: {}. Falling back to defaults.",
                    path.display(),
                    err
                ));
            }
        }
    }

    ConfigLoadResult {
        config: FileConfig::default(),
        warnings,
        source: ConfigSource::Default,
    }
}

fn sanitize_config(mut config: FileConfig) -> (FileConfig, Vec<String>) {
    let mut warnings = Vec::new();

    if !config.happyhour_url.contains("{number}") {
        warnings.push(format!(
            "happyhour_url '{}' has no {{number}} placeholder; using {}",
            config.happyhour_url, DEFAULT_HAPPYHOUR_URL
        ));
        config.happyhour_url = DEFAULT_HAPPYHOUR_URL.to_string();
    }

    if config
        .templates_dir
        .as_deref()
        .is_some_and(|dir| dir.trim().is_empty())
    {
        config.templates_dir = None;
    }

    let blank: Vec<String> = config
        .constants
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key.clone())
        .collect();
    for key in blank {
        warnings.push(format!("constant '{key}' is empty and was ignored"));
        config.constants.remove(&key);
    }

    (config, warnings)
}

/// Persist the configuration to `path`, refusing to clobber an existing file.
pub fn save_config_to(path: &Path, config: &FileConfig) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(config)?;
    fs::write(path, serialized)?;
    Ok(())
}

/// Persist the configuration to [`config_path`].
pub fn save_config(config: &FileConfig) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, config)?;
    Ok(path)
}

/// Pick the templates directory: explicit override, then `MTLPY_TEMPLATES_DIR`,
/// then the config file, then `./templates`.
pub fn resolve_templates_dir(cli_override: Option<&str>, config: &FileConfig) -> PathBuf {
    let from_env = env::var(TEMPLATES_DIR_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());
    let chosen = cli_override
        .map(str::to_string)
        .or(from_env)
        .or_else(|| config.templates_dir.clone())
        .unwrap_or_else(|| DEFAULT_TEMPLATES_DIR.to_string());
    expand_path(&chosen)
}

/// Expand `~` and environment variables, keeping the raw text when a variable is unset.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(err) => {
            warn!(path = raw, error = %err, "Could not expand path; using it verbatim");
            PathBuf::from(shellexpand::tilde(raw).as_ref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults_without_warnings() {
        let temp = tempdir().unwrap();
        let result = load_config_from(&temp.path().join("nope.toml"));

        assert_eq!(result.source, ConfigSource::Default);
        assert!(result.warnings.is_empty());
        assert_eq!(result.config, FileConfig::default());
    }

    #[test]
    fn malformed_file_falls_back_with_warning() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "templates_dir = [").unwrap();

        let result = load_config_from(&path);
        assert_eq!(result.source, ConfigSource::Default);
        assert!(
            result.warnings.iter().any(|w| w.contains("Failed to parse")),
            "warnings: {:?}",
            result.warnings
        );
    }

    #[test]
    fn partial_file_keeps_defaults_for_unset_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "templates_dir = \"/srv/templates\"\n").unwrap();

        let result = load_config_from(&path);
        assert_eq!(result.source, ConfigSource::File);
        assert_eq!(result.config.templates_dir.as_deref(), Some("/srv/templates"));
        assert_eq!(result.config.happyhour_url, DEFAULT_HAPPYHOUR_URL);
        assert_eq!(
            result.config.constants.get("org_email").map(String::as_str),
            Some(DEFAULT_ORG_EMAIL)
        );
    }

    #[test]
    fn sanitize_rejects_url_without_number_and_blank_constants() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "happyhour_url = \"https://example.org/hh\"\n[constants]\norg_email = \"\"\nsponsor = \"ACME\"\n",
        )
        .unwrap();

        let result = load_config_from(&path);
        assert_eq!(result.config.happyhour_url, DEFAULT_HAPPYHOUR_URL);
        assert!(!result.config.constants.contains_key("org_email"));
        assert_eq!(
            result.config.constants.get("sponsor").map(String::as_str),
            Some("ACME")
        );
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn save_then_load_round_trips_and_refuses_overwrite() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = FileConfig::default();
        config.templates_dir = Some("~/mtlpy/templates".to_string());

        save_config_to(&path, &config).unwrap();
        assert_eq!(load_config_from(&path).config, config);

        let err = save_config_to(&path, &config).unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists(_)));
    }

    #[test]
    fn explicit_templates_dir_wins() {
        let config = FileConfig {
            templates_dir: Some("/from/config".to_string()),
            ..FileConfig::default()
        };
        assert_eq!(
            resolve_templates_dir(Some("/from/cli"), &config),
            PathBuf::from("/from/cli")
        );
    }
}
