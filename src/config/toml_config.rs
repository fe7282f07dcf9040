use crate::config::{AirtableConfig, AirtableConfigInput};
use crate::utils::error::{AppError, Result};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

/// Layout of a settings file:
///
/// ```toml
/// [airtable]
/// base_id = "appXXXXXXXXXXXXXX"
/// table_name = "Submissions"
/// api_key = "${AIRTABLE_API_KEY}"
/// ```
#[derive(Debug, Deserialize)]
struct SettingsFile {
    airtable: AirtableConfigInput,
}

impl AirtableConfig {
    /// Loads settings from a TOML file, see `SettingsFile` for the layout.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content, |name| std::env::var(name).ok());

        let settings: SettingsFile =
            toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        Ok(Self::try_from(settings.airtable)?)
    }
}

/// Replaces `${VAR}` placeholders with environment values.
///
/// Unset variables become empty strings, which validation then reports as
/// `required` on the affected field.
pub fn substitute_env_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_VAR_RE
        .replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| {
                tracing::warn!(variable = var_name, "environment variable not set");
                String::new()
            })
        })
        .into_owned()
}
