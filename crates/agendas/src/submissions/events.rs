//! Submission domain events.

use chrono::{DateTime, Utc};
use common::{AggregateId, ConferenceId, SpeakerId};
use kernel::DomainEvent;
use serde::{Deserialize, Serialize};

/// A submission was created and is awaiting review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionAdded {
    pub submission_id: AggregateId,
    pub conference_id: ConferenceId,
    pub title: String,
    pub level: u8,
    pub speakers: Vec<SpeakerId>,
    pub occurred_at: DateTime<Utc>,
}

/// A submission was accepted onto the agenda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionApproved {
    pub submission_id: AggregateId,
    pub occurred_at: DateTime<Utc>,
}

impl SubmissionApproved {
    pub fn new(submission_id: AggregateId) -> Self {
        Self {
            submission_id,
            occurred_at: Utc::now(),
        }
    }
}

/// A submission was turned down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRejected {
    pub submission_id: AggregateId,
    pub occurred_at: DateTime<Utc>,
}

impl SubmissionRejected {
    pub fn new(submission_id: AggregateId) -> Self {
        Self {
            submission_id,
            occurred_at: Utc::now(),
        }
    }
}

impl DomainEvent for SubmissionAdded {
    fn event_type(&self) -> &'static str {
        "SubmissionAdded"
    }

    fn aggregate_id(&self) -> AggregateId {
        self.submission_id
    }
}

impl DomainEvent for SubmissionApproved {
    fn event_type(&self) -> &'static str {
        "SubmissionApproved"
    }

    fn aggregate_id(&self) -> AggregateId {
        self.submission_id
    }
}

impl DomainEvent for SubmissionRejected {
    fn event_type(&self) -> &'static str {
        "SubmissionRejected"
    }

    fn aggregate_id(&self) -> AggregateId {
        self.submission_id
    }
}
