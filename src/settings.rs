use crate::report::OutputKind;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Run options read from a YAML file. Command line flags override them.
///
/// ```yaml
/// Parallel: true
/// Output: terse
/// Suites: [ "Parser", "Lexer" ]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct Settings {
    /// Run independent suites on a thread pool instead of one after another.
    pub parallel: bool,
    pub output: OutputKind,
    /// Only run suites whose label is listed here. Empty runs everything.
    pub suites: Vec<String>,
    #[serde(alias = "Colour")]
    pub color: Option<bool>,
    pub verbose: bool,
    pub silent: bool,
}

impl Settings {
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit; treat it as "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Settings = serde_yaml::from_str(content)?;
        for suite in &mut settings.suites {
            *suite = suite.trim().to_string();
        }
        settings.suites.retain(|s| !s.is_empty());
        Ok(settings)
    }
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    Settings::from_yaml(&content)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}
