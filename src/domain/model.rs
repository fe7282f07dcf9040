//! Persisted submission record.
//!
//! # Invariants
//! - `id` is assigned once by the store and never changes afterwards.
//! - Text fields respect the column limits below.
//! - `synced_to_airtable == true` should imply `airtable_record_id` is set.
//!   `mark_synced` keeps both in step; a raw update can still break it, see
//!   `UserSubmission::is_sync_consistent`.

use crate::domain::patch::Patch;
use crate::domain::schemas::{UserSubmissionCreate, UserSubmissionUpdate};
use crate::utils::error::ValidationError;
use crate::utils::validation::{
    validate_email, validate_max_length, validate_non_empty_string, Validate, Violations,
};
use chrono::{DateTime, Utc};

pub const TABLE_NAME: &str = "user_submissions";

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 255;
pub const BUSINESS_DETAILS_MAX_LEN: usize = 5000;
pub const AIRTABLE_RECORD_ID_MAX_LEN: usize = 100;

/// Column layout of `user_submissions`, for the migration tooling.
pub const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS user_submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(255) NOT NULL,
    business_details VARCHAR(5000) NOT NULL,
    airtable_record_id VARCHAR(100),
    synced_to_airtable BOOLEAN NOT NULL DEFAULT 0,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
)";

pub(crate) fn check_name(violations: &mut Violations, value: &str) {
    violations.check(validate_max_length("name", value, NAME_MAX_LEN));
}

pub(crate) fn check_email(violations: &mut Violations, value: &str) {
    violations.check(validate_max_length("email", value, EMAIL_MAX_LEN));
    violations.check(validate_email("email", value));
}

pub(crate) fn check_business_details(violations: &mut Violations, value: &str) {
    violations.check(validate_max_length(
        "business_details",
        value,
        BUSINESS_DETAILS_MAX_LEN,
    ));
}

pub(crate) fn check_airtable_record_id(violations: &mut Violations, value: &str) {
    violations.check(validate_max_length(
        "airtable_record_id",
        value,
        AIRTABLE_RECORD_ID_MAX_LEN,
    ));
}

/// A form submission as cached locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSubmission {
    id: Option<i64>,
    name: String,
    email: String,
    business_details: String,
    airtable_record_id: Option<String>,
    synced_to_airtable: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserSubmission {
    /// New unsynced record stamped with the current UTC time.
    pub fn from_create(create: UserSubmissionCreate) -> Self {
        Self::from_create_at(create, Utc::now())
    }

    pub fn from_create_at(create: UserSubmissionCreate, now: DateTime<Utc>) -> Self {
        let (name, email, business_details) = create.into_parts();
        Self {
            id: None,
            name,
            email,
            business_details,
            airtable_record_id: None,
            synced_to_airtable: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a record read back from storage or an API payload.
    ///
    /// Field constraints are checked; the sync invariant is not.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: i64,
        name: String,
        email: String,
        business_details: String,
        airtable_record_id: Option<String>,
        synced_to_airtable: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            id: Some(id),
            name,
            email,
            business_details,
            airtable_record_id,
            synced_to_airtable,
            created_at,
            updated_at,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn id(&self) -> Option<i64> {
        self.id
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

    pub fn airtable_record_id(&self) -> Option<&str> {
        self.airtable_record_id.as_deref()
    }

    pub fn synced_to_airtable(&self) -> bool {
        self.synced_to_airtable
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Sets the identity on first insert. Returns `false` if one was already set.
    pub(crate) fn assign_id(&mut self, id: i64) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(id);
        true
    }

    pub fn apply_update(&mut self, update: &UserSubmissionUpdate) -> bool {
        self.apply_update_at(update, Utc::now())
    }

    /// Copies every present field onto the record.
    ///
    /// Returns whether anything was applied; `updated_at` moves only then.
    pub fn apply_update_at(&mut self, update: &UserSubmissionUpdate, now: DateTime<Utc>) -> bool {
        if update.is_empty() {
            return false;
        }

        if let Patch::Present(name) = update.name() {
            self.name = name.clone();
        }
        if let Patch::Present(email) = update.email() {
            self.email = email.clone();
        }
        if let Patch::Present(details) = update.business_details() {
            self.business_details = details.clone();
        }
        if let Patch::Present(record_id) = update.airtable_record_id() {
            self.airtable_record_id = record_id.clone();
        }
        if let Patch::Present(synced) = update.synced_to_airtable() {
            self.synced_to_airtable = *synced;
        }

        self.updated_at = now;
        true
    }

    pub fn mark_synced(&mut self, airtable_record_id: &str) -> Result<(), ValidationError> {
        self.mark_synced_at(airtable_record_id, Utc::now())
    }

    /// Records a successful sync: sets the foreign id and the flag together.
    pub fn mark_synced_at(
        &mut self,
        airtable_record_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.check(validate_non_empty_string(
            "airtable_record_id",
            airtable_record_id,
        ));
        check_airtable_record_id(&mut violations, airtable_record_id);
        violations.finish()?;

        self.airtable_record_id = Some(airtable_record_id.to_string());
        self.synced_to_airtable = true;
        self.updated_at = now;
        Ok(())
    }

    /// `false` when the record claims to be synced but has no usable foreign id.
    ///
    /// A blank id counts as missing, the same way `mark_synced` rejects it.
    pub fn is_sync_consistent(&self) -> bool {
        !self.synced_to_airtable
            || self
                .airtable_record_id
                .as_deref()
                .is_some_and(|id| !id.trim().is_empty())
    }
}

impl Validate for UserSubmission {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        check_name(&mut violations, &self.name);
        check_email(&mut violations, &self.email);
        check_business_details(&mut violations, &self.business_details);
        if let Some(record_id) = &self.airtable_record_id {
            check_airtable_record_id(&mut violations, record_id);
        }
        violations.finish()
    }
}
