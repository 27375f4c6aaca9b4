//! Command handlers for submissions.
//!
//! Each handler loads or creates the aggregate, invokes one domain
//! operation, persists the result and only then propagates the drained
//! events. A failure at any step returns immediately; earlier steps are not
//! undone.

use std::sync::Arc;

use async_trait::async_trait;
use common::{AggregateId, SpeakerId};
use kernel::Aggregate;
use messaging::{AppError, CommandHandler, DispatchContext, EventPropagator, Result};

use crate::speakers::SpeakerRepository;

use super::{
    ApproveSubmission, CreateSubmission, RejectSubmission, Submission, SubmissionError,
    SubmissionRepository,
};

/// Handles [`CreateSubmission`].
pub struct CreateSubmissionHandler {
    submissions: Arc<dyn SubmissionRepository>,
    speakers: Arc<dyn SpeakerRepository>,
    propagator: EventPropagator,
}

impl CreateSubmissionHandler {
    pub fn new(
        submissions: Arc<dyn SubmissionRepository>,
        speakers: Arc<dyn SpeakerRepository>,
        propagator: EventPropagator,
    ) -> Self {
        Self {
            submissions,
            speakers,
            propagator,
        }
    }

    async fn ensure_speakers_exist(&self, speaker_ids: &[SpeakerId]) -> Result<()> {
        let known = self.speakers.browse(speaker_ids).await?;
        match speaker_ids
            .iter()
            .find(|id| !known.iter().any(|speaker| speaker.speaker_id() == **id))
        {
            Some(missing) => Err(AppError::not_found("Speaker", missing)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CommandHandler<CreateSubmission> for CreateSubmissionHandler {
    async fn handle(
        &self,
        ctx: &DispatchContext,
        command: CreateSubmission,
    ) -> Result<AggregateId> {
        self.ensure_speakers_exist(&command.speaker_ids).await?;

        let mut submission = Submission::create(
            command.submission_id,
            command.conference_id,
            command.title,
            command.description,
            command.level,
            command.tags,
            command.speaker_ids,
        )?;

        self.submissions.add(&submission).await?;
        tracing::info!(
            submission_id = %submission.id(),
            conference_id = %submission.conference_id(),
            "submission created"
        );

        self.propagator
            .propagate(ctx, submission.take_events())
            .await?;
        Ok(submission.id())
    }
}

/// Handles [`ApproveSubmission`].
pub struct ApproveSubmissionHandler {
    submissions: Arc<dyn SubmissionRepository>,
    propagator: EventPropagator,
}

impl ApproveSubmissionHandler {
    pub fn new(submissions: Arc<dyn SubmissionRepository>, propagator: EventPropagator) -> Self {
        Self {
            submissions,
            propagator,
        }
    }
}

#[async_trait]
impl CommandHandler<ApproveSubmission> for ApproveSubmissionHandler {
    async fn handle(&self, ctx: &DispatchContext, command: ApproveSubmission) -> Result<()> {
        decide(
            &*self.submissions,
            &self.propagator,
            ctx,
            command.submission_id,
            Submission::approve,
        )
        .await
    }
}

/// Handles [`RejectSubmission`].
pub struct RejectSubmissionHandler {
    submissions: Arc<dyn SubmissionRepository>,
    propagator: EventPropagator,
}

impl RejectSubmissionHandler {
    pub fn new(submissions: Arc<dyn SubmissionRepository>, propagator: EventPropagator) -> Self {
        Self {
            submissions,
            propagator,
        }
    }
}

#[async_trait]
impl CommandHandler<RejectSubmission> for RejectSubmissionHandler {
    async fn handle(&self, ctx: &DispatchContext, command: RejectSubmission) -> Result<()> {
        decide(
            &*self.submissions,
            &self.propagator,
            ctx,
            command.submission_id,
            Submission::reject,
        )
        .await
    }
}

// Load, apply the review decision, persist against the loaded version, propagate.
async fn decide(
    submissions: &dyn SubmissionRepository,
    propagator: &EventPropagator,
    ctx: &DispatchContext,
    submission_id: AggregateId,
    decision: fn(&mut Submission) -> std::result::Result<(), SubmissionError>,
) -> Result<()> {
    let mut submission = submissions
        .get(submission_id)
        .await?
        .ok_or_else(|| AppError::not_found(Submission::aggregate_type(), submission_id))?;

    let expected = submission.version();
    decision(&mut submission)?;

    submissions.update(&submission, expected).await?;
    tracing::info!(
        submission_id = %submission_id,
        status = %submission.status(),
        version = %submission.version(),
        "submission reviewed"
    );

    propagator.propagate(ctx, submission.take_events()).await
}
