//! Identity and versioning primitives shared by every module.

mod types;
mod version;

pub use types::{AgendaSlotId, AggregateId, ConferenceId, SpeakerId};
pub use version::Version;
