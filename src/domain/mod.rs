// Domain layer: submission record, request/response schemas and the storage port.

pub mod model;
pub mod patch;
pub mod ports;
pub mod schemas;

pub use model::UserSubmission;
pub use patch::Patch;
pub use schemas::{UserSubmissionCreate, UserSubmissionResponse, UserSubmissionUpdate};
