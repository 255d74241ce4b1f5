use std::fs;
use std::path::Path;

use crate::error::{ModtreeError, Result};

pub fn render_template(template: &str, context: &serde_json::Value) -> Result<String> {
    let context = tera::Context::from_serialize(context)
        .map_err(|err| ModtreeError::Other(anyhow::Error::new(err)))?;
    tera::Tera::one_off(template, &context, true)
        .map_err(|err| ModtreeError::Other(anyhow::Error::new(err)))
}

pub fn render_template_file(path: &Path, context: &serde_json::Value) -> Result<String> {
    let template = fs::read_to_string(path)?;
    render_template(&template, context)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use serde_json::json;

    use crate::util::template::{render_template, render_template_file};

    #[test]
    fn renders_inline_template_with_escaping() {
        let output = render_template(
            "<h1>{{ title }}</h1>{% for tile in tiles %}{{ tile }} {% endfor %}",
            &json!({
                "title": "deps <main>",
                "tiles": ["cobra", "pflag"],
            }),
        )
        .expect("render template");
        assert_eq!(output, "<h1>deps &lt;main&gt;</h1>cobra pflag ");
    }

    #[test]
    fn renders_template_file() {
        let path = unique_temp_path("template-render");
        fs::write(&path, "{{ count }} modules under {{ root }}").expect("write template file");
        let output = render_template_file(
            &path,
            &json!({
                "count": 42,
                "root": "cobra",
            }),
        )
        .expect("render template file");
        assert_eq!(output, "42 modules under cobra");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn broken_template_is_an_error() {
        assert!(render_template("{% for %}", &json!({})).is_err());
    }

    fn unique_temp_path(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_nanos();
        let pid = std::process::id();
        std::env::temp_dir().join(format!("modtree-{prefix}-{pid}-{nanos}.tera"))
    }
}
