//! Integration messages published for submissions.

use common::AggregateId;
use messaging::{IntegrationEvent, MessageMapperBuilder};
use serde::{Deserialize, Serialize};

use super::{SubmissionApproved, SubmissionRejected};

/// Published when a submission has been approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionApprovedMessage {
    pub submission_id: AggregateId,
}

/// Published when a submission has been rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRejectedMessage {
    pub submission_id: AggregateId,
}

impl IntegrationEvent for SubmissionApprovedMessage {
    fn message_type(&self) -> &'static str {
        "agendas.submission_approved"
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl IntegrationEvent for SubmissionRejectedMessage {
    fn message_type(&self) -> &'static str {
        "agendas.submission_rejected"
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Adds the submission mappings to `builder`.
///
/// `SubmissionAdded` stays internal to the module and has no mapping.
pub fn map_submission_events(builder: MessageMapperBuilder) -> MessageMapperBuilder {
    builder
        .map::<SubmissionApproved, _, _>(|event| SubmissionApprovedMessage {
            submission_id: event.submission_id,
        })
        .map::<SubmissionRejected, _, _>(|event| SubmissionRejectedMessage {
            submission_id: event.submission_id,
        })
}
