//! Renders materialized tiles as a self-contained ECharts treemap page.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;

use crate::config::ChartSettings;
use crate::core::module::TreeNode;
use crate::error::{ModtreeError, Result};
use crate::util::template::{render_template, render_template_file};

const TREEMAP_TEMPLATE: &str = include_str!("../../templates/treemap.html");
const ECHARTS_URL: &str = "https://go-echarts.github.io/go-echarts-assets/assets/echarts.min.js";
const THEME_BASE_URL: &str = "https://go-echarts.github.io/go-echarts-assets/assets/themes";
/// Themes ECharts ships with; everything else needs its theme script.
const BUILTIN_THEMES: &[&str] = &["", "light", "dark", "white"];

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub theme: String,
    pub template: Option<PathBuf>,
}

impl From<&ChartSettings> for ChartOptions {
    fn from(settings: &ChartSettings) -> Self {
        Self {
            title: settings.title.clone(),
            theme: settings.theme.clone(),
            template: settings.template.clone(),
        }
    }
}

/// Serializes for inline `<script>` use: `</` is escaped so a module path
/// can never close the script element.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)
        .map_err(|err| ModtreeError::Other(anyhow::Error::new(err)))?;
    Ok(json.replace("</", "<\\/"))
}

pub fn render_html(tiles: &[TreeNode], options: &ChartOptions) -> Result<String> {
    let theme = options.theme.trim();
    let theme_url = if BUILTIN_THEMES.contains(&theme) {
        None
    } else {
        Some(format!("{THEME_BASE_URL}/{theme}.js"))
    };
    let theme_json = if theme.is_empty() {
        "null".to_string()
    } else {
        script_json(theme)?
    };

    let context = json!({
        "title": options.title,
        "title_json": script_json(&options.title)?,
        "theme_json": theme_json,
        "theme_url": theme_url,
        "echarts_url": ECHARTS_URL,
        "data": script_json(tiles)?,
        "tile_count": tiles.len(),
    });
    match &options.template {
        Some(path) => render_template_file(path, &context),
        None => render_template(TREEMAP_TEMPLATE, &context),
    }
}
