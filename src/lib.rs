pub mod adapters;
pub mod config;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::InMemorySubmissionStore;
pub use config::AirtableConfig;
pub use domain::ports::SubmissionStore;
pub use domain::{
    Patch, UserSubmission, UserSubmissionCreate, UserSubmissionResponse, UserSubmissionUpdate,
};
pub use utils::error::{AppError, FieldViolation, Result, ValidationError, ViolationKind};
