use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::PdNotifyConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "pdnotify.toml",
    "pdnotify.yaml",
    "pdnotify.yml",
    "pdnotify.json",
];

/// Override for the config directory, set via `set_config_dir()`.
static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Set a custom config directory. When set, discovery only looks there.
pub fn set_config_dir(path: PathBuf) {
    *CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|e| e.into_inner()) = Some(path);
}

/// Clear the config directory override, restoring default discovery.
pub fn clear_config_dir() {
    *CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|e| e.into_inner()) = None;
}

fn config_dir_override() -> Option<PathBuf> {
    CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

/// Load host config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<PdNotifyConfig> {
    let value = load_document(path)?;
    Ok(serde_json::from_value(value)?)
}

/// Read any supported document (toml, yaml, json) as a JSON value,
/// with `${VAR}` substitution applied to the raw text.
pub fn load_document(path: &Path) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_document(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./pdnotify.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/pdnotify/pdnotify.{toml,yaml,yml,json}` (user-global)
///
/// Returns `PdNotifyConfig::default()` if nothing is found or loading fails.
pub fn discover_and_load() -> PdNotifyConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return PdNotifyConfig::default();
    };
    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            PdNotifyConfig::default()
        },
    }
}

fn first_existing(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Find the first config file in standard locations.
///
/// When a config dir override is set, only that directory is searched.
fn find_config_file() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return first_existing(&dir);
    }
    first_existing(Path::new(".")).or_else(|| config_dir().and_then(|d| first_existing(&d)))
}

/// Returns the config directory: override, or `~/.config/pdnotify/`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return Some(dir);
    }
    directories::BaseDirs::new().map(|d| d.home_dir().join(".config").join("pdnotify"))
}

fn parse_document(raw: &str, path: &Path) -> anyhow::Result<serde_json::Value> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => {
            let v: toml::Value = toml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value = serde_yaml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::schema::DEFAULT_EVENTS_API_URL, serial_test::serial};

    #[test]
    fn parses_each_format_to_the_same_value() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("c.toml");
        let yaml_path = dir.path().join("c.yaml");
        let json_path = dir.path().join("c.json");
        std::fs::write(&toml_path, "routing_key = \"abc\"\ncustom_incident = false\n").unwrap();
        std::fs::write(&yaml_path, "routing_key: abc\ncustom_incident: false\n").unwrap();
        std::fs::write(&json_path, r#"{"routing_key":"abc","custom_incident":false}"#).unwrap();

        let expected = serde_json::json!({"routing_key": "abc", "custom_incident": false});
        assert_eq!(load_document(&toml_path).unwrap(), expected);
        assert_eq!(load_document(&yaml_path).unwrap(), expected);
        assert_eq!(load_document(&json_path).unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.ini");
        std::fs::write(&path, "a=b").unwrap();
        let err = load_document(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_document(Path::new("/nonexistent/pdnotify.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pdnotify.toml"));
    }

    #[test]
    #[serial]
    fn discovers_config_in_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pdnotify.toml"),
            "[pagerduty]\napi_url = \"http://localhost:9000/enqueue\"\n",
        )
        .unwrap();

        set_config_dir(dir.path().to_path_buf());
        let cfg = discover_and_load();
        clear_config_dir();

        assert_eq!(cfg.pagerduty.api_url, "http://localhost:9000/enqueue");
        assert_eq!(cfg.pagerduty.timeout_secs, 10);
    }

    #[test]
    #[serial]
    fn empty_override_dir_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        set_config_dir(dir.path().to_path_buf());
        let cfg = discover_and_load();
        assert_eq!(config_dir(), Some(dir.path().to_path_buf()));
        clear_config_dir();

        assert_eq!(cfg.pagerduty.api_url, DEFAULT_EVENTS_API_URL);
    }
}
