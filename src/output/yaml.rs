use anyhow::{Context, Result};
use serde::Serialize;

pub struct YamlFormatter;

impl YamlFormatter {
    pub fn format<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        let yaml = serde_yaml::to_string(value).context("Failed to serialize result as YAML")?;
        // serde_yaml always ends documents with a newline; println adds another
        Ok(yaml.trim_end().to_string())
    }
}
