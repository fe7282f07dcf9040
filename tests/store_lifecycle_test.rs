use anyhow::Result;
use std::io::Write;
use submission_cache::{
    AirtableConfig, AppError, InMemorySubmissionStore, SubmissionStore, UserSubmissionCreate,
    UserSubmissionUpdate,
};
use tempfile::NamedTempFile;

fn submission(name: &str, email: &str) -> UserSubmissionCreate {
    UserSubmissionCreate::new(name, email, "Family bakery, two locations").unwrap()
}

#[test]
fn test_submission_lifecycle() -> Result<()> {
    let mut store = InMemorySubmissionStore::new();

    let first = store.insert(submission("Bakery One", "one@bakery.example"))?;
    let second = store.insert(submission("Bakery Two", "two@bakery.example"))?;
    assert!(!first.synced_to_airtable());
    assert_eq!(first.airtable_record_id(), None);

    let pending: Vec<_> = store
        .list_unsynced()?
        .iter()
        .filter_map(|record| record.id())
        .collect();
    assert_eq!(pending, vec![1, 2]);

    let synced = store.mark_synced(1, "recBakeryOne00001")?;
    assert!(synced.synced_to_airtable());
    assert_eq!(synced.airtable_record_id(), Some("recBakeryOne00001"));
    assert!(synced.is_sync_consistent());
    assert!(synced.updated_at() >= first.updated_at());

    let pending = store.list_unsynced()?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id(), second.id());

    let update = UserSubmissionUpdate::builder()
        .name("Bakery Two & Cafe")
        .build()?;
    let renamed = store.update(2, &update)?;
    assert_eq!(renamed.name(), "Bakery Two & Cafe");
    assert_eq!(renamed.email(), "two@bakery.example");
    assert_eq!(renamed.created_at(), second.created_at());

    let removed = store.delete(1)?;
    assert_eq!(removed.id(), Some(1));
    assert!(matches!(store.get(1), Err(AppError::NotFound(1))));
    assert_eq!(store.len(), 1);
    Ok(())
}

#[test]
fn test_noop_update_keeps_timestamp() -> Result<()> {
    let mut store = InMemorySubmissionStore::new();
    let inserted = store.insert(submission("Bakery", "hello@bakery.example"))?;

    let unchanged = store.update(1, &UserSubmissionUpdate::default())?;
    assert_eq!(unchanged, inserted);
    Ok(())
}

#[test]
fn test_airtable_config_from_settings_file() -> Result<()> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(
        br#"
[airtable]
base_id = "appBakery"
table_name = "Form Submissions"
api_key = "patBakeryKey"
"#,
    )?;

    let config = AirtableConfig::from_file(temp_file.path())?;
    assert_eq!(config.base_id(), "appBakery");
    assert_eq!(config.table_name(), "Form Submissions");
    assert_eq!(config.api_key(), "patBakeryKey");
    Ok(())
}

#[test]
fn test_airtable_config_missing_file_is_io_error() {
    let result = AirtableConfig::from_file("/nonexistent/submission-cache/settings.toml");
    assert!(matches!(result, Err(AppError::IoError(_))));
}
