use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, Settings};

pub const CONFIG_FILE: &str = "modtree.toml";
pub const CONFIG_ENV: &str = "MODTREE_CONFIG";
pub const ADDR_ENV: &str = "MODTREE_ADDR";
pub const STDIN_TIMEOUT_ENV: &str = "MODTREE_STDIN_TIMEOUT_MS";

/// Loads settings from the first config found (explicit path, then
/// `MODTREE_CONFIG`, then `modtree.toml` in `start`) and applies env
/// overrides. No config file at all means defaults.
pub fn resolve_settings(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<Settings, ConfigError> {
    let mut settings = match resolve_config_path(start.as_ref(), config_path)? {
        Some(path) => load_settings(&path)?,
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings, |key| env::var(key).ok())?;
    Ok(settings)
}

pub fn resolve_config_path(
    start: &Path,
    config_path: Option<PathBuf>,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = config_path {
        return require_file(path).map(Some);
    }

    if let Ok(path) = env::var(CONFIG_ENV) {
        return require_file(PathBuf::from(path)).map(Some);
    }

    let candidate = start.join(CONFIG_FILE);
    if candidate.is_file() {
        return Ok(Some(candidate));
    }

    Ok(None)
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup(ADDR_ENV) {
        settings.server.addr = addr;
    }
    if let Some(value) = lookup(STDIN_TIMEOUT_ENV) {
        settings.input.stdin_timeout_ms =
            value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: STDIN_TIMEOUT_ENV,
                value,
            })?;
    }
    Ok(())
}

fn require_file(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConfigError::ConfigNotFound(path))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::config::resolve::{
        apply_env_overrides, load_settings, resolve_config_path, ADDR_ENV, CONFIG_FILE,
        STDIN_TIMEOUT_ENV,
    };
    use crate::config::{ConfigError, Settings};
    use crate::graph::tree::WeightPolicy;

    fn unique_temp_dir(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let pid = std::process::id();
        std::env::temp_dir().join(format!("modtree-{prefix}-{pid}-{nanos}"))
    }

    #[test]
    fn defaults_match_classic_behavior() {
        let settings = Settings::default();
        assert_eq!(settings.input.stdin_timeout_ms, 2000);
        assert_eq!(settings.input.command, vec!["go", "mod", "graph"]);
        assert_eq!(settings.server.addr, ":18888");
        assert!(settings.server.open_browser);
        assert_eq!(settings.tree.weight, WeightPolicy::FanOut);
        assert_eq!(settings.chart.title, "Golang Packages Dependency");
    }

    #[test]
    fn loads_partial_config_file() {
        let root = unique_temp_dir("config-load");
        fs::create_dir_all(&root).expect("create temp dir");
        let path = root.join(CONFIG_FILE);
        fs::write(
            &path,
            "[tree]\nweight = \"legacy\"\nnested = true\n\n[server]\naddr = \"127.0.0.1:9000\"\n",
        )
        .expect("write config");

        let settings = load_settings(&path).expect("load settings");
        assert_eq!(settings.tree.weight, WeightPolicy::Legacy);
        assert!(settings.tree.nested);
        assert_eq!(settings.server.addr, "127.0.0.1:9000");
        assert!(settings.server.open_browser);
        assert_eq!(settings.chart.theme, "macarons");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let root = unique_temp_dir("config-invalid");
        fs::create_dir_all(&root).expect("create temp dir");
        let path = root.join(CONFIG_FILE);
        fs::write(&path, "[tree]\nweight = \"heaviest\"\n").expect("write config");

        let err = load_settings(&path).expect_err("invalid weight");
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let root = unique_temp_dir("config-missing");
        let err = resolve_config_path(&root, Some(root.join("nope.toml")))
            .expect_err("missing explicit config");
        assert!(matches!(err, ConfigError::ConfigNotFound(_)));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(ADDR_ENV, "0.0.0.0:8080"), (STDIN_TIMEOUT_ENV, "250")]);
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, |key| vars.get(key).map(|v| v.to_string()))
            .expect("apply overrides");
        assert_eq!(settings.server.addr, "0.0.0.0:8080");
        assert_eq!(settings.input.stdin_timeout_ms, 250);
    }

    #[test]
    fn invalid_env_timeout_is_rejected() {
        let mut settings = Settings::default();
        let err = apply_env_overrides(&mut settings, |key| {
            (key == STDIN_TIMEOUT_ENV).then(|| "soon".to_string())
        })
        .expect_err("invalid timeout");
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }
}
