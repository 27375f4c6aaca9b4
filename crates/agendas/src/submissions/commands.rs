//! Submission commands.

use common::{AggregateId, ConferenceId, SpeakerId};
use messaging::Command;

/// Command to submit a talk for review.
#[derive(Debug, Clone)]
pub struct CreateSubmission {
    /// The submission ID to create.
    pub submission_id: AggregateId,

    pub conference_id: ConferenceId,
    pub title: String,
    pub description: String,
    pub level: u8,
    pub tags: Vec<String>,

    /// Speakers presenting the talk. Each must already be registered.
    pub speaker_ids: Vec<SpeakerId>,
}

impl CreateSubmission {
    /// Creates a CreateSubmission command with a generated submission ID.
    pub fn new(
        conference_id: ConferenceId,
        title: impl Into<String>,
        description: impl Into<String>,
        level: u8,
        speaker_ids: Vec<SpeakerId>,
    ) -> Self {
        Self {
            submission_id: AggregateId::new(),
            conference_id,
            title: title.into(),
            description: description.into(),
            level,
            tags: Vec::new(),
            speaker_ids,
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl Command for CreateSubmission {
    type Output = AggregateId;
}

/// Command to accept a submission onto the agenda.
#[derive(Debug, Clone, Copy)]
pub struct ApproveSubmission {
    pub submission_id: AggregateId,
}

impl ApproveSubmission {
    pub fn new(submission_id: AggregateId) -> Self {
        Self { submission_id }
    }
}

impl Command for ApproveSubmission {
    type Output = ();
}

/// Command to turn a submission down.
#[derive(Debug, Clone, Copy)]
pub struct RejectSubmission {
    pub submission_id: AggregateId,
}

impl RejectSubmission {
    pub fn new(submission_id: AggregateId) -> Self {
        Self { submission_id }
    }
}

impl Command for RejectSubmission {
    type Output = ();
}
