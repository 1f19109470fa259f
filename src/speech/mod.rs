//! # Speech Capture
//!
//! Two-state machine around a speech-to-text engine.
//!
//! ```text
//!            StartRequested                 StopRequested / permission denied
//!   Idle ─────────────────────► Recording ─────────────────────────────────► Idle
//!                                 │    ▲
//!                 segment ended / │    │ Resume (immediately, or after 1s
//!                 engine error    └────┘ for network errors)
//! ```
//!
//! `transition` is pure: it returns the next state plus one `SpeechEffect`
//! for the adapter to carry out (start or stop the engine, rewrite the input,
//! show a notice). Engine plumbing lives in [`engine`].

pub mod engine;

use std::fmt;
use std::time::Duration;

pub use engine::{CommandEngine, SpeechEngine};

pub const NETWORK_RETRY_DELAY: Duration = Duration::from_millis(1000);

pub const PERMISSION_NOTICE: &str = "Please allow microphone access to use speech recognition.";
pub const UNSUPPORTED_NOTICE: &str =
    "Speech recognition is not supported here. Set speech.command in ~/.jarvis/config.toml.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechState {
    #[default]
    Idle,
    Recording,
}

impl SpeechState {
    pub fn is_recording(self) -> bool {
        matches!(self, SpeechState::Recording)
    }
}

/// Failure reported by the engine for one listening segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    Network,
    NotAllowed,
    ServiceNotAllowed,
    Other(String),
}

impl SpeechError {
    /// Map an engine error code (`network`, `not-allowed`, ...) to a variant.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "network" => SpeechError::Network,
            "not-allowed" => SpeechError::NotAllowed,
            "service-not-allowed" => SpeechError::ServiceNotAllowed,
            other => SpeechError::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechError::Network => write!(f, "network"),
            SpeechError::NotAllowed => write!(f, "not-allowed"),
            SpeechError::ServiceNotAllowed => write!(f, "service-not-allowed"),
            SpeechError::Other(code) => write!(f, "{code}"),
        }
    }
}

impl std::error::Error for SpeechError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    StartRequested,
    StopRequested,
    /// Latest transcript for the current segment (interim or final).
    Transcript(String),
    SegmentEnded,
    Failed(SpeechError),
    /// No engine is configured or the engine binary is missing.
    Unavailable,
    /// A delayed restart has come due. Carries the recording session that
    /// scheduled it so the adapter can drop restarts from an earlier session.
    ResumeDue(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEffect {
    None,
    /// Clear the input and start listening.
    Begin,
    /// Start another segment, keeping the input as is.
    Resume,
    ResumeAfter(Duration),
    /// Release the engine.
    Stop,
    ReplaceInput(String),
    Notify(&'static str),
    StopWithNotice(&'static str),
}

pub fn transition(state: SpeechState, event: SpeechEvent) -> (SpeechState, SpeechEffect) {
    use SpeechEffect as Fx;
    use SpeechState::{Idle, Recording};

    match (state, event) {
        (Idle, SpeechEvent::StartRequested) => (Recording, Fx::Begin),
        (Recording, SpeechEvent::StartRequested) => (Recording, Fx::None),

        (Recording, SpeechEvent::StopRequested) => (Idle, Fx::Stop),
        (Idle, SpeechEvent::StopRequested) => (Idle, Fx::None),

        (Recording, SpeechEvent::Transcript(text)) => (Recording, Fx::ReplaceInput(text)),
        (Recording, SpeechEvent::SegmentEnded) => (Recording, Fx::Resume),
        (Recording, SpeechEvent::ResumeDue(_)) => (Recording, Fx::Resume),

        (Recording, SpeechEvent::Failed(SpeechError::Network)) => {
            (Recording, Fx::ResumeAfter(NETWORK_RETRY_DELAY))
        }
        (
            Recording,
            SpeechEvent::Failed(SpeechError::NotAllowed | SpeechError::ServiceNotAllowed),
        ) => (Idle, Fx::StopWithNotice(PERMISSION_NOTICE)),
        (Recording, SpeechEvent::Failed(SpeechError::Other(_))) => (Recording, Fx::Resume),

        (_, SpeechEvent::Unavailable) => (Idle, Fx::Notify(UNSUPPORTED_NOTICE)),

        // Late events from an engine that was already stopped.
        (
            Idle,
            SpeechEvent::Transcript(_)
            | SpeechEvent::SegmentEnded
            | SpeechEvent::ResumeDue(_)
            | SpeechEvent::Failed(_),
        ) => (Idle, Fx::None),
    }
}
