//! # Actions
//!
//! Everything that can happen in J.A.R.V.I.S. becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The upstream answers? That's `Action::ReplyReceived(response)`.
//!
//! `update()` applies an action to the state and returns an [`Effect`]: the
//! one piece of I/O the adapter must perform next (spawn the request, arm
//! the apology timer, drive the speech engine). No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use std::time::Duration;

use log::{debug, error, info, warn};

use crate::core::attachment::PendingAttachment;
use crate::core::conversation::{Part, Role, Turn};
use crate::core::state::{App, RequestState, TranscriptEntry, history_preview};
use crate::inference::{GenerateRequest, GenerateResponse};
use crate::render::{MessageBody, render};
use crate::speech::{SpeechEffect, SpeechEvent, transition};

/// How long the apology stays up before the request slot frees.
pub const APOLOGY_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Send the input text together with any staged attachments.
    Submit(String),
    ReplyReceived(GenerateResponse),
    RequestFailed(String),
    DismissApology,
    NewChat,
    AttachImage(PendingAttachment),
    AttachFailed(String),
    DismissNotice,
    Speech(SpeechEvent),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    SpawnRequest(GenerateRequest),
    /// Send `Action::DismissApology` after the delay.
    ScheduleDismiss(Duration),
    Speech(SpeechEffect),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, &text),
        Action::ReplyReceived(response) => {
            if app.request != RequestState::InFlight {
                warn!("Reply arrived with no request in flight, dropping it");
                return Effect::None;
            }
            remove_entries(app, |e| matches!(e, TranscriptEntry::Thinking));

            let text = response.reply_text();
            info!("Reply received ({} chars)", text.len());
            let rendered = render(&MessageBody::text(text.as_str()), Role::Assistant);
            app.transcript.push(TranscriptEntry::Message(rendered));
            app.conversation.push(Turn::assistant(text));
            app.request = RequestState::Idle;
            app.status_message = String::from("Online");
            Effect::None
        }
        Action::RequestFailed(reason) => {
            if app.request != RequestState::InFlight {
                warn!("Failure reported with no request in flight: {}", reason);
                return Effect::None;
            }
            error!("Request failed: {}", reason);
            for entry in app.transcript.iter_mut() {
                if *entry == TranscriptEntry::Thinking {
                    *entry = TranscriptEntry::Apology;
                }
            }
            app.request = RequestState::Cooling;
            Effect::ScheduleDismiss(APOLOGY_DURATION)
        }
        Action::DismissApology => {
            if app.request == RequestState::Cooling {
                remove_entries(app, |e| matches!(e, TranscriptEntry::Apology));
                app.request = RequestState::Idle;
            }
            Effect::None
        }
        Action::NewChat => {
            if app.is_busy() {
                app.status_message = String::from("Still waiting on the last reply");
                return Effect::None;
            }
            info!(
                "New chat (dropping {} turns, {} staged attachments)",
                app.conversation.len(),
                app.attachments.len()
            );
            app.conversation.clear();
            app.transcript.clear();
            app.attachments.clear();
            app.history.clear();
            app.notice = None;
            app.status_message = String::from("Online");
            Effect::None
        }
        Action::AttachImage(attachment) => {
            debug!(
                "Staged {} attachment ({} base64 bytes)",
                attachment.mime_type,
                attachment.data.len()
            );
            app.attachments.push(attachment);
            app.status_message = match app.attachments.len() {
                1 => String::from("1 image attached"),
                n => format!("{n} images attached"),
            };
            Effect::None
        }
        Action::AttachFailed(reason) => {
            warn!("Attachment rejected: {}", reason);
            app.notice = Some(format!("Failed to process image: {reason}"));
            Effect::None
        }
        Action::DismissNotice => {
            app.notice = None;
            Effect::None
        }
        Action::Speech(event) => {
            if event == SpeechEvent::StartRequested && app.is_busy() {
                return Effect::None;
            }
            let (next, effect) = transition(app.speech, event);
            if next != app.speech {
                debug!("Speech {:?} -> {:?}", app.speech, next);
            }
            app.speech = next;
            match effect {
                SpeechEffect::None => Effect::None,
                SpeechEffect::Notify(notice) | SpeechEffect::StopWithNotice(notice) => {
                    app.notice = Some(notice.to_string());
                    Effect::Speech(effect)
                }
                other => Effect::Speech(other),
            }
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: &str) -> Effect {
    let text = text.trim();
    if text.is_empty() && app.attachments.is_empty() {
        return Effect::None;
    }
    if app.is_busy() {
        debug!("Submit ignored: request slot is {:?}", app.request);
        return Effect::None;
    }

    let attachments = std::mem::take(&mut app.attachments);
    let mut parts = vec![Part::text(text)];
    parts.extend(attachments.iter().map(PendingAttachment::to_part));

    let body = MessageBody::with_images(
        text,
        attachments.iter().map(PendingAttachment::data_url).collect(),
    );
    app.transcript
        .push(TranscriptEntry::Message(render(&body, Role::User)));
    app.conversation.push(Turn::user(parts));
    if !text.is_empty() {
        app.history.insert(0, history_preview(text));
    }
    app.transcript.push(TranscriptEntry::Thinking);
    app.request = RequestState::InFlight;
    app.notice = None;

    info!(
        "Submitting turn {} ({} chars, {} images)",
        app.conversation.len(),
        text.len(),
        attachments.len()
    );
    Effect::SpawnRequest(GenerateRequest::new(app.conversation.turns().to_vec()))
}

fn remove_entries(app: &mut App, pred: impl Fn(&TranscriptEntry) -> bool) {
    app.transcript.retain(|entry| !pred(entry));
}
