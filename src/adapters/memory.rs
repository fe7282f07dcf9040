use crate::domain::model::UserSubmission;
use crate::domain::ports::SubmissionStore;
use crate::domain::schemas::{UserSubmissionCreate, UserSubmissionUpdate};
use crate::utils::error::{AppError, Result};
use std::collections::BTreeMap;

/// Process-local store keyed by id.
#[derive(Debug, Clone)]
pub struct InMemorySubmissionStore {
    records: BTreeMap<i64, UserSubmission>,
    next_id: i64,
}

impl Default for InMemorySubmissionStore {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record_mut(&mut self, id: i64) -> Result<&mut UserSubmission> {
        self.records.get_mut(&id).ok_or(AppError::NotFound(id))
    }
}

impl SubmissionStore for InMemorySubmissionStore {
    fn insert(&mut self, create: UserSubmissionCreate) -> Result<UserSubmission> {
        let id = self.next_id;
        let mut record = UserSubmission::from_create(create);
        record.assign_id(id);

        self.next_id += 1;
        self.records.insert(id, record.clone());
        tracing::debug!(id, "inserted submission");
        Ok(record)
    }

    fn get(&self, id: i64) -> Result<UserSubmission> {
        self.records.get(&id).cloned().ok_or(AppError::NotFound(id))
    }

    fn update(&mut self, id: i64, update: &UserSubmissionUpdate) -> Result<UserSubmission> {
        let record = self.record_mut(id)?;
        if record.apply_update(update) {
            tracing::debug!(id, "updated submission");
        }
        Ok(record.clone())
    }

    fn mark_synced(&mut self, id: i64, airtable_record_id: &str) -> Result<UserSubmission> {
        let record = self.record_mut(id)?;
        record.mark_synced(airtable_record_id)?;
        tracing::debug!(id, "marked submission as synced");
        Ok(record.clone())
    }

    fn delete(&mut self, id: i64) -> Result<UserSubmission> {
        let removed = self.records.remove(&id).ok_or(AppError::NotFound(id))?;
        tracing::debug!(id, "deleted submission");
        Ok(removed)
    }

    fn list_unsynced(&self) -> Result<Vec<UserSubmission>> {
        Ok(self
            .records
            .values()
            .filter(|record| !record.synced_to_airtable())
            .cloned()
            .collect())
    }
}
