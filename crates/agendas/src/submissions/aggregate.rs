//! Submission aggregate implementation.

use common::{AggregateId, ConferenceId, SpeakerId};
use kernel::{Aggregate, AggregateRoot};

use super::{
    SubmissionAdded, SubmissionApproved, SubmissionError, SubmissionRejected, SubmissionStatus,
};

/// Lowest accepted talk level.
pub const MIN_LEVEL: u8 = 1;

/// Highest accepted talk level.
pub const MAX_LEVEL: u8 = 6;

/// A talk proposal for a conference, reviewed into the agenda or out of it.
///
/// Every mutation validates before touching any field, so a rejected call
/// leaves the submission as it was.
#[derive(Debug, Clone)]
pub struct Submission {
    root: AggregateRoot,
    conference_id: ConferenceId,
    title: String,
    description: String,
    level: u8,
    status: SubmissionStatus,
    tags: Vec<String>,
    speakers: Vec<SpeakerId>,
}

impl Aggregate for Submission {
    fn aggregate_type() -> &'static str {
        "Submission"
    }

    fn root(&self) -> &AggregateRoot {
        &self.root
    }

    fn root_mut(&mut self) -> &mut AggregateRoot {
        &mut self.root
    }
}

// Query methods
impl Submission {
    pub fn conference_id(&self) -> ConferenceId {
        self.conference_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn speakers(&self) -> &[SpeakerId] {
        &self.speakers
    }
}

// Command methods
impl Submission {
    /// Creates a pending submission.
    ///
    /// Runs every field through its validating setter, then records a single
    /// [`SubmissionAdded`]. The new submission is at version 1.
    pub fn create(
        id: AggregateId,
        conference_id: ConferenceId,
        title: impl Into<String>,
        description: impl Into<String>,
        level: u8,
        tags: Vec<String>,
        speakers: Vec<SpeakerId>,
    ) -> Result<Self, SubmissionError> {
        let mut submission = Self {
            root: AggregateRoot::new(id),
            conference_id,
            title: String::new(),
            description: String::new(),
            level: MIN_LEVEL,
            status: SubmissionStatus::Pending,
            tags,
            speakers: Vec::new(),
        };

        submission.change_title(title)?;
        submission.change_description(description)?;
        submission.change_level(level)?;
        submission.change_speakers(speakers)?;

        submission.root.clear_events();
        let added = SubmissionAdded {
            submission_id: id,
            conference_id,
            title: submission.title.clone(),
            level: submission.level,
            speakers: submission.speakers.clone(),
            occurred_at: chrono::Utc::now(),
        };
        submission.root.add_event(added);

        Ok(submission)
    }

    pub fn change_title(&mut self, title: impl Into<String>) -> Result<(), SubmissionError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(SubmissionError::EmptyTitle { id: self.id() });
        }

        self.title = title;
        self.root.increment_version();
        Ok(())
    }

    pub fn change_description(
        &mut self,
        description: impl Into<String>,
    ) -> Result<(), SubmissionError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(SubmissionError::EmptyDescription { id: self.id() });
        }

        self.description = description;
        self.root.increment_version();
        Ok(())
    }

    pub fn change_level(&mut self, level: u8) -> Result<(), SubmissionError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(SubmissionError::InvalidLevel {
                id: self.id(),
                level,
            });
        }

        self.level = level;
        self.root.increment_version();
        Ok(())
    }

    pub fn change_speakers(&mut self, speakers: Vec<SpeakerId>) -> Result<(), SubmissionError> {
        if speakers.is_empty() {
            return Err(SubmissionError::MissingSpeakers { id: self.id() });
        }

        self.speakers = speakers;
        self.root.increment_version();
        Ok(())
    }

    /// Accepts the submission. Approving an approved submission records the
    /// decision again.
    pub fn approve(&mut self) -> Result<(), SubmissionError> {
        if !self.status.can_approve() {
            return Err(self.invalid_transition(SubmissionStatus::Approved));
        }

        self.status = SubmissionStatus::Approved;
        self.root.add_event(SubmissionApproved::new(self.id()));
        Ok(())
    }

    /// Turns the submission down. Rejecting a rejected submission records the
    /// decision again.
    pub fn reject(&mut self) -> Result<(), SubmissionError> {
        if !self.status.can_reject() {
            return Err(self.invalid_transition(SubmissionStatus::Rejected));
        }

        self.status = SubmissionStatus::Rejected;
        self.root.add_event(SubmissionRejected::new(self.id()));
        Ok(())
    }

    fn invalid_transition(&self, attempted: SubmissionStatus) -> SubmissionError {
        SubmissionError::InvalidStatusTransition {
            id: self.id(),
            attempted,
            current: self.status,
        }
    }
}
