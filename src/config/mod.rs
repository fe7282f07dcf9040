#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::ValidationError;
use crate::utils::validation::{validate_max_length, validate_non_empty_string, Violations};
use serde::Deserialize;
use std::fmt;

pub const BASE_ID_MAX_LEN: usize = 100;
pub const TABLE_NAME_MAX_LEN: usize = 100;
pub const API_KEY_MAX_LEN: usize = 200;

pub const BASE_ID_ENV: &str = "AIRTABLE_BASE_ID";
pub const TABLE_NAME_ENV: &str = "AIRTABLE_TABLE_NAME";
pub const API_KEY_ENV: &str = "AIRTABLE_API_KEY";

/// Raw Airtable settings before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirtableConfigInput {
    pub base_id: Option<String>,
    pub table_name: Option<String>,
    pub api_key: Option<String>,
}

/// Where the sync collaborator writes records, and the key it uses.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "AirtableConfigInput")]
pub struct AirtableConfig {
    base_id: String,
    table_name: String,
    api_key: String,
}

// api_key stays out of logs
impl fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl AirtableConfig {
    pub fn new(
        base_id: impl Into<String>,
        table_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::try_from(AirtableConfigInput {
            base_id: Some(base_id.into()),
            table_name: Some(table_name.into()),
            api_key: Some(api_key.into()),
        })
    }

    /// Reads `AIRTABLE_BASE_ID`, `AIRTABLE_TABLE_NAME` and `AIRTABLE_API_KEY`.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::try_from(AirtableConfigInput {
            base_id: lookup(BASE_ID_ENV),
            table_name: lookup(TABLE_NAME_ENV),
            api_key: lookup(API_KEY_ENV),
        })
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

fn setting(
    violations: &mut Violations,
    field: &str,
    value: Option<String>,
    max: usize,
) -> Option<String> {
    let value = violations.require(field, value);
    if let Some(value) = &value {
        violations.check(validate_non_empty_string(field, value));
        violations.check(validate_max_length(field, value, max));
    }
    value
}

impl TryFrom<AirtableConfigInput> for AirtableConfig {
    type Error = ValidationError;

    fn try_from(input: AirtableConfigInput) -> Result<Self, Self::Error> {
        let mut violations = Violations::new();

        let base_id = setting(&mut violations, "base_id", input.base_id, BASE_ID_MAX_LEN);
        let table_name = setting(
            &mut violations,
            "table_name",
            input.table_name,
            TABLE_NAME_MAX_LEN,
        );
        let api_key = setting(&mut violations, "api_key", input.api_key, API_KEY_MAX_LEN);

        if let Err(err) = violations.finish() {
            tracing::debug!(schema = "AirtableConfig", violations = err.len(), "rejected input");
            return Err(err);
        }

        Ok(Self {
            base_id: base_id.unwrap_or_default(),
            table_name: table_name.unwrap_or_default(),
            api_key: api_key.unwrap_or_default(),
        })
    }
}
