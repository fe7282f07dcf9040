use crate::utils::error::{FieldViolation, ValidationError, ViolationKind};
use regex::Regex;
use std::sync::LazyLock;

/// Local part, `@`, a hostname label, then at least one `.`-separated label.
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"));

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub fn validate_max_length(field_name: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::single(
            field_name,
            ViolationKind::MaxLength { max, actual },
        ));
    }
    Ok(())
}

/// Syntax check only; no DNS or mailbox lookup.
pub fn validate_email(field_name: &str, value: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::single(
            field_name,
            ViolationKind::Pattern {
                pattern: EMAIL_PATTERN,
            },
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::single(field_name, ViolationKind::Required));
    }
    Ok(())
}

/// Accumulates violations across fields so callers report all of them at once.
#[derive(Debug, Default)]
pub struct Violations {
    items: Vec<FieldViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field_name: &str, kind: ViolationKind) {
        self.items.push(FieldViolation::new(field_name, kind));
    }

    /// Folds the outcome of a single-field check into the collection.
    pub fn check(&mut self, outcome: Result<(), ValidationError>) {
        if let Err(err) = outcome {
            self.items.extend(err.violations().iter().cloned());
        }
    }

    /// Takes a mandatory value, recording `required` when it is missing.
    pub fn require<T>(&mut self, field_name: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(field_name, ViolationKind::Required);
        }
        value
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.items))
        }
    }
}
