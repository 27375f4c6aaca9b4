//! Submission review state machine.

use serde::{Deserialize, Serialize};

/// The review status of a submission.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Approved ◄─┐ (re-approve)
///           │               │
///           └──► Rejected ◄─┘ (re-reject)
/// ```
/// `Approved` and `Rejected` never move back to `Pending` or into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SubmissionStatus {
    /// Awaiting a review decision.
    #[default]
    Pending,

    /// Accepted onto the agenda.
    Approved,

    /// Turned down.
    Rejected,
}

impl SubmissionStatus {
    /// Returns true if the submission can be approved in this status.
    pub fn can_approve(&self) -> bool {
        matches!(self, SubmissionStatus::Pending | SubmissionStatus::Approved)
    }

    /// Returns true if the submission can be rejected in this status.
    pub fn can_reject(&self) -> bool {
        matches!(self, SubmissionStatus::Pending | SubmissionStatus::Rejected)
    }

    /// Returns true if a review decision has been made.
    pub fn is_decided(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_go_either_way() {
        let status = SubmissionStatus::Pending;
        assert!(status.can_approve());
        assert!(status.can_reject());
        assert!(!status.is_decided());
    }

    #[test]
    fn decisions_are_final() {
        assert!(SubmissionStatus::Approved.can_approve());
        assert!(!SubmissionStatus::Approved.can_reject());
        assert!(SubmissionStatus::Rejected.can_reject());
        assert!(!SubmissionStatus::Rejected.can_approve());
        assert!(SubmissionStatus::Approved.is_decided());
    }

    #[test]
    fn default_is_pending() {
        assert_eq!(SubmissionStatus::default(), SubmissionStatus::Pending);
        assert_eq!(SubmissionStatus::Rejected.to_string(), "Rejected");
    }
}
