use anyhow::Result;
use chrono::{DateTime, Utc};
use submission_cache::{
    AppError, InMemorySubmissionStore, Patch, SubmissionStore, UserSubmission,
    UserSubmissionCreate, UserSubmissionResponse, UserSubmissionUpdate, ViolationKind,
};

/// A valid creation body keeps its values unchanged.
#[test]
fn test_valid_create_round_trips_values() -> Result<()> {
    let create = UserSubmissionCreate::from_json(
        r#"{
            "name": "Grace Hopper",
            "email": "grace.hopper+cobol@navy.example.mil",
            "business_details": "Compiler consulting for fleet logistics"
        }"#,
    )?;

    assert_eq!(create.name(), "Grace Hopper");
    assert_eq!(create.email(), "grace.hopper+cobol@navy.example.mil");
    assert_eq!(
        create.business_details(),
        "Compiler consulting for fleet logistics"
    );

    let json = serde_json::to_value(&create)?;
    assert_eq!(json["name"], "Grace Hopper");
    let decoded: UserSubmissionCreate = serde_json::from_value(json)?;
    assert_eq!(decoded, create);
    Ok(())
}

#[test]
fn test_create_at_exact_limits_succeeds() {
    let name = "n".repeat(100);
    let details = "d".repeat(5000);
    let email = format!("{}@example.com", "e".repeat(243));
    assert_eq!(email.chars().count(), 255);

    let create = UserSubmissionCreate::new(name.clone(), email, details.clone()).unwrap();
    assert_eq!(create.name(), name);
    assert_eq!(create.business_details(), details);
}

#[test]
fn test_business_details_over_limit_fails() {
    let err = UserSubmissionCreate::new("Shop", "shop@example.com", "d".repeat(5001)).unwrap_err();

    assert_eq!(err.len(), 1);
    assert_eq!(
        err.violation_for("business_details"),
        Some(&ViolationKind::MaxLength {
            max: 5000,
            actual: 5001
        })
    );
}

#[test]
fn test_malformed_emails_fail_pattern() {
    for email in ["not-an-email", "a@b", "missing-at.example.com", "two@@example.com"] {
        let err = UserSubmissionCreate::new("Shop", email, "details").unwrap_err();
        assert!(err.has("email", "pattern"), "{email} should be rejected");
    }
}

#[test]
fn test_every_bad_field_is_reported() {
    let body = serde_json::json!({
        "name": "n".repeat(101),
        "email": "nope",
    })
    .to_string();

    match UserSubmissionCreate::from_json(&body) {
        Err(AppError::Validation(err)) => {
            assert_eq!(err.len(), 3);
            assert!(err.has("name", "max_length"));
            assert!(err.has("email", "pattern"));
            assert!(err.has("business_details", "required"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_deserialize_validates_create() {
    let value = serde_json::json!({
        "name": "Shop",
        "email": "a@b",
        "business_details": "details"
    });

    let err = serde_json::from_value::<UserSubmissionCreate>(value).unwrap_err();
    assert!(err.to_string().contains("email (pattern)"), "unexpected error: {err}");
}

#[test]
fn test_malformed_json_is_serialization_error() {
    let result = UserSubmissionCreate::from_json("{\"name\": ");
    assert!(matches!(result, Err(AppError::SerializationError(_))));
}

#[test]
fn test_empty_update_is_valid() -> Result<()> {
    let update = UserSubmissionUpdate::from_json("{}")?;

    assert!(update.is_empty());
    assert!(update.name().is_absent());
    assert!(update.email().is_absent());
    assert!(update.business_details().is_absent());
    assert!(update.airtable_record_id().is_absent());
    assert!(update.synced_to_airtable().is_absent());
    assert_eq!(update, UserSubmissionUpdate::default());
    assert_eq!(serde_json::to_value(&update)?, serde_json::json!({}));
    Ok(())
}

#[test]
fn test_update_checks_present_fields() {
    let err = UserSubmissionUpdate::builder()
        .email("a@b")
        .airtable_record_id("r".repeat(101))
        .build()
        .unwrap_err();

    assert_eq!(err.len(), 2);
    assert!(err.has("email", "pattern"));
    assert!(err.has("airtable_record_id", "max_length"));
}

#[test]
fn test_update_serializes_only_present_fields() -> Result<()> {
    let update = UserSubmissionUpdate::builder()
        .name("Renamed Shop")
        .clear_airtable_record_id()
        .build()?;

    assert_eq!(update.name(), &Patch::Present("Renamed Shop".to_string()));
    assert_eq!(
        serde_json::to_value(&update)?,
        serde_json::json!({"name": "Renamed Shop", "airtable_record_id": null})
    );
    Ok(())
}

#[test]
fn test_update_clearing_record_id_applies_null() -> Result<()> {
    let mut store = InMemorySubmissionStore::new();
    let inserted = store.insert(UserSubmissionCreate::new(
        "Shop",
        "shop@example.com",
        "details",
    )?)?;
    let id = inserted.id().unwrap();
    store.mark_synced(id, "recSynced001")?;

    let update = UserSubmissionUpdate::from_json(r#"{"airtable_record_id": null}"#)?;
    let updated = store.update(id, &update)?;

    assert_eq!(updated.airtable_record_id(), None);
    // the flag is left as it was; only the foreign id changed
    assert!(updated.synced_to_airtable());
    assert!(!updated.is_sync_consistent());
    Ok(())
}

#[test]
fn test_response_requires_id() {
    let record = UserSubmission::from_create(
        UserSubmissionCreate::new("Shop", "shop@example.com", "details").unwrap(),
    );

    let err = UserSubmissionResponse::try_from(&record).unwrap_err();
    assert!(err.has("id", "required"));
}

#[test]
fn test_response_timestamps_are_iso8601() -> Result<()> {
    let mut store = InMemorySubmissionStore::new();
    let record = store.insert(UserSubmissionCreate::new(
        "Shop",
        "shop@example.com",
        "details",
    )?)?;

    let response = UserSubmissionResponse::try_from(&record)?;
    let json = serde_json::to_value(&response)?;

    assert_eq!(json["id"], 1);
    assert_eq!(json["synced_to_airtable"], false);
    assert!(json["airtable_record_id"].is_null());

    let created_at = json["created_at"].as_str().unwrap();
    let updated_at = json["updated_at"].as_str().unwrap();
    assert!(created_at.ends_with('Z'));
    assert_eq!(
        DateTime::parse_from_rfc3339(created_at)?.with_timezone(&Utc),
        record.created_at()
    );
    assert_eq!(
        DateTime::parse_from_rfc3339(updated_at)?.with_timezone(&Utc),
        record.updated_at()
    );

    let restored = UserSubmission::try_from(response)?;
    assert_eq!(restored, record);
    Ok(())
}

#[test]
fn test_synced_with_blank_record_id_is_flagged() -> Result<()> {
    let mut store = InMemorySubmissionStore::new();
    store.insert(UserSubmissionCreate::new(
        "Shop",
        "shop@example.com",
        "details",
    )?)?;

    let update =
        UserSubmissionUpdate::from_json(r#"{"synced_to_airtable": true, "airtable_record_id": ""}"#)?;
    let updated = store.update(1, &update)?;

    assert!(updated.synced_to_airtable());
    assert_eq!(updated.airtable_record_id(), Some(""));
    assert!(!updated.is_sync_consistent());
    Ok(())
}
