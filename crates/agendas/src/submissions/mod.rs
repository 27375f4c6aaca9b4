//! Call-for-papers submissions.

mod aggregate;
mod commands;
mod error;
mod events;
mod handlers;
mod messages;
mod repository;
mod status;

pub use aggregate::{MAX_LEVEL, MIN_LEVEL, Submission};
pub use commands::{ApproveSubmission, CreateSubmission, RejectSubmission};
pub use error::SubmissionError;
pub use events::{SubmissionAdded, SubmissionApproved, SubmissionRejected};
pub use handlers::{ApproveSubmissionHandler, CreateSubmissionHandler, RejectSubmissionHandler};
pub use messages::{SubmissionApprovedMessage, SubmissionRejectedMessage, map_submission_events};
pub use repository::{InMemorySubmissionRepository, SubmissionRepository};
pub use status::SubmissionStatus;
