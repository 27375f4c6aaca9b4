//! Submission invariant violations.

use common::AggregateId;
use messaging::AppError;
use thiserror::Error;

use super::SubmissionStatus;

/// Errors raised by the [`Submission`](super::Submission) aggregate.
///
/// Every variant names the submission it was raised for. A failed
/// operation leaves the aggregate exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("submission {id} defines an empty title")]
    EmptyTitle { id: AggregateId },

    #[error("submission {id} defines an empty description")]
    EmptyDescription { id: AggregateId },

    #[error("submission {id} defines invalid level {level}, expected 1 to 6")]
    InvalidLevel { id: AggregateId, level: u8 },

    #[error("submission {id} has no speakers")]
    MissingSpeakers { id: AggregateId },

    #[error("submission {id} cannot move from {current} to {attempted}")]
    InvalidStatusTransition {
        id: AggregateId,
        attempted: SubmissionStatus,
        current: SubmissionStatus,
    },
}

impl SubmissionError {
    /// Returns the submission the error was raised for.
    pub fn submission_id(&self) -> AggregateId {
        match self {
            SubmissionError::EmptyTitle { id }
            | SubmissionError::EmptyDescription { id }
            | SubmissionError::InvalidLevel { id, .. }
            | SubmissionError::MissingSpeakers { id }
            | SubmissionError::InvalidStatusTransition { id, .. } => *id,
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(error: SubmissionError) -> Self {
        AppError::validation(error)
    }
}
