use crate::domain::model::UserSubmission;
use crate::domain::schemas::{UserSubmissionCreate, UserSubmissionUpdate};
use crate::utils::error::Result;

/// Persistence collaborator owning every `UserSubmission`.
///
/// Implementations assign ids on insert and never reuse them. Lookups of an
/// unknown id fail with `AppError::NotFound`.
pub trait SubmissionStore: Send + Sync {
    fn insert(&mut self, create: UserSubmissionCreate) -> Result<UserSubmission>;
    fn get(&self, id: i64) -> Result<UserSubmission>;
    fn update(&mut self, id: i64, update: &UserSubmissionUpdate) -> Result<UserSubmission>;
    fn mark_synced(&mut self, id: i64, airtable_record_id: &str) -> Result<UserSubmission>;
    fn delete(&mut self, id: i64) -> Result<UserSubmission>;
    /// Records still waiting for their first sync, ordered by id.
    fn list_unsynced(&self) -> Result<Vec<UserSubmission>>;
}
