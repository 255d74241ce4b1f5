use std::path::PathBuf;

use serde::Deserialize;

use crate::graph::tree::WeightPolicy;

pub const DEFAULT_STDIN_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_ADDR: &str = ":18888";
pub const DEFAULT_TITLE: &str = "Golang Packages Dependency";
pub const DEFAULT_THEME: &str = "macarons";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub tree: TreeSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputSettings {
    #[serde(default = "default_stdin_timeout_ms")]
    pub stdin_timeout_ms: u64,
    /// Fallback command when nothing arrives on stdin.
    #[serde(default = "default_command")]
    pub command: Vec<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            stdin_timeout_ms: default_stdin_timeout_ms(),
            command: default_command(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeSettings {
    #[serde(default)]
    pub weight: WeightPolicy,
    #[serde(default)]
    pub nested: bool,
    #[serde(default)]
    pub root: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Replaces the built-in page template.
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            theme: default_theme(),
            template: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            open_browser: default_open_browser(),
        }
    }
}

fn default_stdin_timeout_ms() -> u64 {
    DEFAULT_STDIN_TIMEOUT_MS
}

fn default_command() -> Vec<String> {
    vec!["go".to_string(), "mod".to_string(), "graph".to_string()]
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_addr() -> String {
    DEFAULT_ADDR.to_string()
}

fn default_open_browser() -> bool {
    true
}
