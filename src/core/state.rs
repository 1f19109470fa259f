//! # Application State
//!
//! Core business state for J.A.R.V.I.S. Domain logic only; presentation
//! state (scroll offsets, input text, animation) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn CompletionProvider>  // proxy or direct upstream
//! ├── conversation: Conversation             // turns sent with every request
//! ├── transcript: Vec<TranscriptEntry>       // what the chat view shows
//! ├── request: RequestState                  // Idle | InFlight | Cooling
//! ├── attachments: Vec<PendingAttachment>    // staged images
//! ├── history: Vec<String>                   // sidebar previews, newest first
//! ├── speech: SpeechState                    // Idle | Recording
//! ├── status_message: String                 // status bar text
//! └── notice: Option<String>                 // one-off notice (speech, attachments)
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use std::sync::Arc;

use crate::core::attachment::PendingAttachment;
use crate::core::conversation::Conversation;
use crate::inference::CompletionProvider;
use crate::render::RenderedMessage;
use crate::speech::SpeechState;

/// Sidebar previews keep this many characters before the ellipsis.
pub const HISTORY_PREVIEW_CHARS: usize = 25;

pub const APOLOGY_TEXT: &str = "Sorry, something went wrong.";

/// The one request slot. A send is only accepted from `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    /// Waiting for the upstream reply.
    InFlight,
    /// The apology is on screen; the slot frees when it is dismissed.
    Cooling,
}

impl RequestState {
    pub fn is_busy(&self) -> bool {
        !matches!(self, RequestState::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Message(RenderedMessage),
    /// Placeholder shown while a request is in flight.
    Thinking,
    /// Shown in place of the placeholder after a failed request.
    Apology,
}

pub struct App {
    pub provider: Arc<dyn CompletionProvider>,
    pub conversation: Conversation,
    pub transcript: Vec<TranscriptEntry>,
    pub request: RequestState,
    pub attachments: Vec<PendingAttachment>,
    pub history: Vec<String>,
    pub speech: SpeechState,
    pub status_message: String,
    pub notice: Option<String>,
}

impl App {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            conversation: Conversation::new(),
            transcript: Vec::new(),
            request: RequestState::Idle,
            attachments: Vec::new(),
            history: Vec::new(),
            speech: SpeechState::Idle,
            status_message: String::from("Online"),
            notice: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.request.is_busy()
    }

    /// True once anything besides the landing page should be shown.
    pub fn has_messages(&self) -> bool {
        !self.transcript.is_empty()
    }

    pub fn rendered_messages(&self) -> impl Iterator<Item = &RenderedMessage> {
        self.transcript.iter().filter_map(|entry| match entry {
            TranscriptEntry::Message(m) => Some(m),
            TranscriptEntry::Thinking | TranscriptEntry::Apology => None,
        })
    }
}

/// Sidebar label for a sent message: the first 25 characters plus `...`
/// when longer, otherwise the message unchanged.
pub fn history_preview(text: &str) -> String {
    if text.chars().count() > HISTORY_PREVIEW_CHARS {
        let head: String = text.chars().take(HISTORY_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
