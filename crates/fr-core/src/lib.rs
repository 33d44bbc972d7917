//! Core engine for flight telemetry replay
//!
//! This crate interprets a loaded telemetry table (channel roles, flight
//! phases, attitude) and owns the scrub cursor that keeps every view on the
//! same row.

pub mod attitude;
pub mod channels;
pub mod config;
pub mod error;
pub mod events;
pub mod phases;
pub mod playback;
pub mod session;
pub mod summary;
pub mod sync;

// Re-export commonly used types
pub use attitude::{AngleUnit, AttitudeSample, AttitudeSolver, BodyAxis};
pub use channels::{ChannelClassifier, ChannelMap, ChannelRole, RuleSet};
pub use config::EngineConfig;
pub use error::{Result, TelemetryError};
pub use events::EventBus;
pub use phases::{vertical_rate, FlightPhase, PhaseDetector, PhaseMap, PhaseMarker};
pub use playback::{FrameSource, PlaybackState, ScrubState, ScrubTimeline};
pub use session::{LoadReport, TelemetrySession};
pub use summary::FlightSummary;
pub use sync::{
    subscriber_from_fn, CursorSubscriber, CursorUpdate, PublishReport, SubscriptionId, SyncBus,
    ViewError,
};
