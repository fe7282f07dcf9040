//! Request and response shapes for the submission API.
//!
//! Input schemas are validated while they are built, from typed arguments or
//! from JSON, and report every failing field at once.

use crate::domain::model::{
    check_airtable_record_id, check_business_details, check_email, check_name, UserSubmission,
};
use crate::domain::patch::Patch;
use crate::utils::error::{FieldViolation, Result, ValidationError, ViolationKind};
use crate::utils::validation::Violations;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accepted syntax for response timestamps.
pub const TIMESTAMP_FORMAT: &str = "ISO-8601 timestamp";

// Offset-less ISO-8601, read as UTC.
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const CREATE_FIELDS: [&str; 3] = ["name", "email", "business_details"];
const UPDATE_FIELDS: [&str; 5] = [
    "name",
    "email",
    "business_details",
    "airtable_record_id",
    "synced_to_airtable",
];

fn json_fields(body: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(ValidationError::single(
            "body",
            ViolationKind::InvalidType { expected: "object" },
        )
        .into()),
    }
}

fn string_field(
    typed: &mut Violations,
    fields: &mut Map<String, Value>,
    field: &str,
) -> Patch<Option<String>> {
    match fields.remove(field) {
        None => Patch::Absent,
        Some(Value::Null) => Patch::Present(None),
        Some(Value::String(value)) => Patch::Present(Some(value)),
        Some(_) => {
            typed.push(field, ViolationKind::InvalidType { expected: "string" });
            Patch::Absent
        }
    }
}

fn bool_field(
    typed: &mut Violations,
    fields: &mut Map<String, Value>,
    field: &str,
) -> Patch<Option<bool>> {
    match fields.remove(field) {
        None => Patch::Absent,
        Some(Value::Null) => Patch::Present(None),
        Some(Value::Bool(value)) => Patch::Present(Some(value)),
        Some(_) => {
            typed.push(field, ViolationKind::InvalidType { expected: "boolean" });
            Patch::Absent
        }
    }
}

/// Merges wrong-type violations with the schema's own, one entry set per
/// field, ordered as `fields` lists them.
///
/// A field with a type violation is not reported again as `required`.
fn with_type_violations<T>(
    fields: &[&str],
    typed: Violations,
    outcome: std::result::Result<T, ValidationError>,
) -> std::result::Result<T, ValidationError> {
    let typed = match typed.finish() {
        Ok(()) => return outcome,
        Err(err) => err,
    };

    let mut merged: Vec<&FieldViolation> = typed.violations().iter().collect();
    if let Err(err) = &outcome {
        merged.extend(
            err.violations()
                .iter()
                .filter(|v| typed.violation_for(&v.field).is_none()),
        );
    }
    merged.sort_by_key(|v| fields.iter().position(|field| *field == v.field));

    let mut violations = Violations::new();
    for violation in merged {
        violations.push(&violation.field, violation.kind.clone());
    }
    violations.finish()?;
    outcome
}

/// Raw creation fields before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub business_details: Option<String>,
}

/// Validated body of a creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CreateInput")]
pub struct UserSubmissionCreate {
    name: String,
    email: String,
    business_details: String,
}

impl UserSubmissionCreate {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        business_details: impl Into<String>,
    ) -> std::result::Result<Self, ValidationError> {
        Self::try_from(CreateInput {
            name: Some(name.into()),
            email: Some(email.into()),
            business_details: Some(business_details.into()),
        })
    }

    /// Parses and validates a JSON request body.
    ///
    /// Malformed JSON is a serialization error; well-formed JSON with bad
    /// fields, wrongly typed ones included, yields the full list of violations.
    pub fn from_json(body: &str) -> Result<Self> {
        let mut fields = json_fields(body)?;
        let mut typed = Violations::new();
        let input = CreateInput {
            name: string_field(&mut typed, &mut fields, "name").present().flatten(),
            email: string_field(&mut typed, &mut fields, "email").present().flatten(),
            business_details: string_field(&mut typed, &mut fields, "business_details")
                .present()
                .flatten(),
        };
        Ok(with_type_violations(
            &CREATE_FIELDS,
            typed,
            Self::try_from(input),
        )?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn business_details(&self) -> &str {
        &self.business_details
    }

    pub(crate) fn into_parts(self) -> (String, String, String) {
        (self.name, self.email, self.business_details)
    }
}

impl TryFrom<CreateInput> for UserSubmissionCreate {
    type Error = ValidationError;

    fn try_from(input: CreateInput) -> std::result::Result<Self, Self::Error> {
        let mut violations = Violations::new();

        let name = violations.require("name", input.name);
        if let Some(name) = &name {
            check_name(&mut violations, name);
        }
        let email = violations.require("email", input.email);
        if let Some(email) = &email {
            check_email(&mut violations, email);
        }
        let business_details = violations.require("business_details", input.business_details);
        if let Some(details) = &business_details {
            check_business_details(&mut violations, details);
        }

        if let Err(err) = violations.finish() {
            tracing::debug!(
                schema = "UserSubmissionCreate",
                violations = err.len(),
                "rejected input"
            );
            return Err(err);
        }

        // every field is Some once no `required` violation was recorded
        Ok(Self {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            business_details: business_details.unwrap_or_default(),
        })
    }
}

/// Raw update fields before validation.
///
/// Doubles as the builder for `UserSubmissionUpdate`. Every field is
/// `Patch<Option<_>>` so an explicit `null` can be told apart from a missing
/// key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInput {
    #[serde(default)]
    pub name: Patch<Option<String>>,
    #[serde(default)]
    pub email: Patch<Option<String>>,
    #[serde(default)]
    pub business_details: Patch<Option<String>>,
    #[serde(default)]
    pub airtable_record_id: Patch<Option<String>>,
    #[serde(default)]
    pub synced_to_airtable: Patch<Option<bool>>,
}

impl UpdateInput {
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Patch::Present(Some(value.into()));
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Patch::Present(Some(value.into()));
        self
    }

    pub fn business_details(mut self, value: impl Into<String>) -> Self {
        self.business_details = Patch::Present(Some(value.into()));
        self
    }

    pub fn airtable_record_id(mut self, value: impl Into<String>) -> Self {
        self.airtable_record_id = Patch::Present(Some(value.into()));
        self
    }

    /// Explicitly sets the foreign id to null.
    pub fn clear_airtable_record_id(mut self) -> Self {
        self.airtable_record_id = Patch::Present(None);
        self
    }

    pub fn synced_to_airtable(mut self, value: bool) -> Self {
        self.synced_to_airtable = Patch::Present(Some(value));
        self
    }

    pub fn build(self) -> std::result::Result<UserSubmissionUpdate, ValidationError> {
        UserSubmissionUpdate::try_from(self)
    }
}

// Non-nullable columns: an explicit null cannot be stored.
fn non_null<T>(violations: &mut Violations, field: &str, patch: Patch<Option<T>>) -> Patch<T> {
    match patch {
        Patch::Absent => Patch::Absent,
        Patch::Present(Some(value)) => Patch::Present(value),
        Patch::Present(None) => {
            violations.push(field, ViolationKind::Required);
            Patch::Absent
        }
    }
}

/// Validated partial update. Absent fields leave the record unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UpdateInput")]
pub struct UserSubmissionUpdate {
    #[serde(skip_serializing_if = "Patch::is_absent")]
    name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    email: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    business_details: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    airtable_record_id: Patch<Option<String>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    synced_to_airtable: Patch<bool>,
}

impl UserSubmissionUpdate {
    pub fn builder() -> UpdateInput {
        UpdateInput::default()
    }

    pub fn from_json(body: &str) -> Result<Self> {
        let mut fields = json_fields(body)?;
        let mut typed = Violations::new();
        let input = UpdateInput {
            name: string_field(&mut typed, &mut fields, "name"),
            email: string_field(&mut typed, &mut fields, "email"),
            business_details: string_field(&mut typed, &mut fields, "business_details"),
            airtable_record_id: string_field(&mut typed, &mut fields, "airtable_record_id"),
            synced_to_airtable: bool_field(&mut typed, &mut fields, "synced_to_airtable"),
        };
        Ok(with_type_violations(
            &UPDATE_FIELDS,
            typed,
            Self::try_from(input),
        )?)
    }

    pub fn name(&self) -> &Patch<String> {
        &self.name
    }

    pub fn email(&self) -> &Patch<String> {
        &self.email
    }

    pub fn business_details(&self) -> &Patch<String> {
        &self.business_details
    }

    pub fn airtable_record_id(&self) -> &Patch<Option<String>> {
        &self.airtable_record_id
    }

    pub fn synced_to_airtable(&self) -> &Patch<bool> {
        &self.synced_to_airtable
    }

    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_absent()
            && self.email.is_absent()
            && self.business_details.is_absent()
            && self.airtable_record_id.is_absent()
            && self.synced_to_airtable.is_absent()
    }
}

impl TryFrom<UpdateInput> for UserSubmissionUpdate {
    type Error = ValidationError;

    fn try_from(input: UpdateInput) -> std::result::Result<Self, Self::Error> {
        let mut violations = Violations::new();

        let name = non_null(&mut violations, "name", input.name);
        if let Patch::Present(name) = &name {
            check_name(&mut violations, name);
        }
        let email = non_null(&mut violations, "email", input.email);
        if let Patch::Present(email) = &email {
            check_email(&mut violations, email);
        }
        let business_details =
            non_null(&mut violations, "business_details", input.business_details);
        if let Patch::Present(details) = &business_details {
            check_business_details(&mut violations, details);
        }
        let airtable_record_id = input.airtable_record_id;
        if let Patch::Present(Some(record_id)) = &airtable_record_id {
            check_airtable_record_id(&mut violations, record_id);
        }
        let synced_to_airtable =
            non_null(&mut violations, "synced_to_airtable", input.synced_to_airtable);

        if let Err(err) = violations.finish() {
            tracing::debug!(
                schema = "UserSubmissionUpdate",
                violations = err.len(),
                "rejected input"
            );
            return Err(err);
        }

        Ok(Self {
            name,
            email,
            business_details,
            airtable_record_id,
            synced_to_airtable,
        })
    }
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    // shortest exact fractional form; parses back to the same instant
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Accepts RFC 3339 as well as offset-less ISO-8601, which is taken as UTC.
fn parse_timestamp(violations: &mut Violations, field: &str, value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, NAIVE_TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
        });

    match parsed {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            violations.push(
                field,
                ViolationKind::Pattern {
                    pattern: TIMESTAMP_FORMAT,
                },
            );
            None
        }
    }
}

/// Outbound shape of a stored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSubmissionResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub business_details: String,
    pub airtable_record_id: Option<String>,
    pub synced_to_airtable: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<&UserSubmission> for UserSubmissionResponse {
    type Error = ValidationError;

    /// Fails with `required` on `id` for a record that was never stored.
    fn try_from(record: &UserSubmission) -> std::result::Result<Self, Self::Error> {
        let id = record
            .id()
            .ok_or_else(|| ValidationError::single("id", ViolationKind::Required))?;

        Ok(Self {
            id,
            name: record.name().to_string(),
            email: record.email().to_string(),
            business_details: record.business_details().to_string(),
            airtable_record_id: record.airtable_record_id().map(str::to_string),
            synced_to_airtable: record.synced_to_airtable(),
            created_at: format_timestamp(record.created_at()),
            updated_at: format_timestamp(record.updated_at()),
        })
    }
}

impl TryFrom<UserSubmissionResponse> for UserSubmission {
    type Error = ValidationError;

    fn try_from(response: UserSubmissionResponse) -> std::result::Result<Self, Self::Error> {
        let mut violations = Violations::new();
        let created_at = parse_timestamp(&mut violations, "created_at", &response.created_at);
        let updated_at = parse_timestamp(&mut violations, "updated_at", &response.updated_at);

        violations.finish()?;

        UserSubmission::restore(
            response.id,
            response.name,
            response.email,
            response.business_details,
            response.airtable_record_id,
            response.synced_to_airtable,
            created_at.unwrap_or_default(),
            updated_at.unwrap_or_default(),
        )
    }
}
