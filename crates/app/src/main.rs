//! Conference backend entry point.
//!
//! Runs one submission through review, schedules it on an agenda track
//! against the in-memory adapters and logs the integration messages produced.

use agendas::agenda_tracks::{AddAgendaSlot, AssignAgendaItem, CreateAgendaTrack};
use agendas::submissions::{ApproveSubmission, CreateSubmission};
use agendas::{Speaker, SpeakerRepository};
use chrono::{Duration, Utc};
use app::{App, Config};
use common::{ConferenceId, SpeakerId};
use messaging::{AppError, DispatchContext};

#[tokio::main]
async fn main() -> app::Result<()> {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    app::telemetry::init_tracing(&config)?;

    // 2. Wire the application
    let app = App::build(&config)?;
    let mut messages = app.broker().subscribe();

    // 3. Register a speaker
    let speaker = Speaker::create(SpeakerId::new(), "Jane Doe").map_err(AppError::from)?;
    app.speakers().add(&speaker).await?;

    // 4. Submit a talk and approve it
    let ctx = DispatchContext::new().with_user("program-committee");
    let conference_id = ConferenceId::new();
    let submission_id = app
        .dispatcher()
        .send_with_result(
            &ctx,
            CreateSubmission::new(
                conference_id,
                "Fearless concurrency in production",
                "Lessons from running async Rust services",
                3,
                vec![speaker.speaker_id()],
            )
            .with_tags(["rust", "async"]),
        )
        .await?;
    tracing::info!(%submission_id, "submission created");

    app.dispatcher()
        .send(&ctx, ApproveSubmission::new(submission_id))
        .await?;

    // 5. Open a track and schedule the approved talk
    let track_id = app
        .dispatcher()
        .send_with_result(&ctx, CreateAgendaTrack::new(conference_id, "Main hall"))
        .await?;
    let from = Utc::now() + Duration::days(30);
    let slot_id = app
        .dispatcher()
        .send_with_result(
            &ctx,
            AddAgendaSlot::regular(track_id, from, from + Duration::minutes(45))
                .with_participants_limit(200),
        )
        .await?;
    app.dispatcher()
        .send(
            &ctx,
            AssignAgendaItem {
                track_id,
                slot_id,
                agenda_item_id: submission_id,
            },
        )
        .await?;
    tracing::info!(%track_id, %slot_id, "talk scheduled");

    // 6. Report what went out
    while let Ok(message) = messages.try_recv() {
        tracing::info!(
            message_type = %message.message_type,
            payload = %message.payload,
            "integration message received"
        );
    }
    tracing::info!(
        agenda_items = app.agenda_items().len().await,
        agenda_tracks = app.agenda_tracks().len().await,
        "review finished"
    );

    Ok(())
}
