use std::fmt;
use thiserror::Error;

/// Which constraint a field broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Field missing, null, or blank where a value is mandatory.
    Required,
    /// Character count above the inclusive upper bound (`FieldTooLong`).
    MaxLength { max: usize, actual: usize },
    /// Value does not match the expected syntax (`InvalidFormat`).
    Pattern { pattern: &'static str },
    /// JSON value of the wrong type, e.g. a number where text is expected.
    InvalidType { expected: &'static str },
}

impl ViolationKind {
    /// Constraint name as exposed to API clients.
    pub fn constraint(&self) -> &'static str {
        match self {
            ViolationKind::Required => "required",
            ViolationKind::MaxLength { .. } => "max_length",
            ViolationKind::Pattern { .. } => "pattern",
            ViolationKind::InvalidType { .. } => "type",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Required => write!(f, "field is required"),
            ViolationKind::MaxLength { max, actual } => {
                write!(f, "at most {} characters allowed, got {}", max, actual)
            }
            ViolationKind::Pattern { pattern } => write!(f, "does not match {}", pattern),
            ViolationKind::InvalidType { expected } => write!(f, "expected a {}", expected),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.field, self.kind.constraint(), self.kind)
    }
}

/// Every field that failed while constructing a schema value.
///
/// Never empty: a construction attempt either yields a valid instance or one
/// of these with at least one entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation error: {}", join_violations(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub(crate) fn new(violations: Vec<FieldViolation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    pub fn single(field: impl Into<String>, kind: ViolationKind) -> Self {
        Self::new(vec![FieldViolation::new(field, kind)])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// First violation reported for `field`, if any.
    pub fn violation_for(&self, field: &str) -> Option<&ViolationKind> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| &v.kind)
    }

    /// Whether `field` broke the constraint named `constraint`.
    pub fn has(&self, field: &str, constraint: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.kind.constraint() == constraint)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Submission not found: {0}")]
    NotFound(i64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl AppError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_every_violation() {
        let err = ValidationError::new(vec![
            FieldViolation::new("name", ViolationKind::Required),
            FieldViolation::new(
                "email",
                ViolationKind::MaxLength {
                    max: 255,
                    actual: 300,
                },
            ),
        ]);

        let message = err.to_string();
        assert!(message.contains("name (required)"));
        assert!(message.contains("email (max_length): at most 255 characters allowed, got 300"));
    }

    #[test]
    fn test_lookup_by_field_and_constraint() {
        let err = ValidationError::single(
            "email",
            ViolationKind::Pattern {
                pattern: "email address",
            },
        );

        assert!(err.has("email", "pattern"));
        assert!(!err.has("email", "required"));
        assert!(err.violation_for("name").is_none());
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn test_app_error_wraps_validation() {
        let err: AppError = ValidationError::single("id", ViolationKind::Required).into();
        assert!(err.is_validation());
        assert!(!AppError::NotFound(7).is_validation());
        assert_eq!(AppError::NotFound(7).to_string(), "Submission not found: 7");
    }
}
