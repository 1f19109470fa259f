//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values and carries out the
//! `Effect`s the reducer returns: spawning the request, timing the apology,
//! running speech segments.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (request in flight, input resize pending): draws every
//!   ~80ms so the thinking placeholder pulses and debounced resizes land.
//! - **Idle**: sleeps up to 500ms, only redraws on events, background
//!   actions, or the greeting refresh.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

pub mod clipboard;
mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::attachment::{PendingAttachment, image_path_from_paste};
use crate::core::config::ResolvedConfig;
use crate::core::export;
use crate::core::greeting::{Greeting, REFRESH_INTERVAL};
use crate::core::state::{App, RequestState, TranscriptEntry};
use crate::inference::{
    CompletionProvider, GeminiProvider, GenerateRequest, ProviderError, ProxyProvider,
};
use crate::speech::engine::ListenError;
use crate::speech::{CommandEngine, SpeechEffect, SpeechEngine, SpeechEvent};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigate messages with arrow keys, `y` copies. Typing auto-switches to Input.
    Cursor,
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub input_mode: InputMode,
    pub pulse_value: f32,
    pub greeting: Greeting,
    greeting_at: Instant,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            input_mode: InputMode::Input, // User expects to type immediately
            pulse_value: 0.0,
            greeting: Greeting::now(),
            greeting_at: Instant::now(),
        }
    }

    /// Pick a fresh greeting once the refresh interval has passed.
    fn refresh_greeting(&mut self, now: Instant) -> bool {
        if now.duration_since(self.greeting_at) < REFRESH_INTERVAL {
            return false;
        }
        self.greeting = Greeting::now();
        self.greeting_at = now;
        true
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; ignored where unsupported.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the provider named by the resolved config.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn CompletionProvider> {
    match config.provider.as_str() {
        "gemini" => {
            if config.gemini_api_key.is_empty() {
                warn!("Direct provider selected but GEMINI_API_KEY is empty");
            }
            Arc::new(GeminiProvider::new(
                config.gemini_api_key.clone(),
                config.gemini_api_url.clone(),
            ))
        }
        "proxy" => Arc::new(ProxyProvider::new(config.proxy_url.clone())),
        other => {
            warn!("Unknown provider '{}', falling back to proxy", other);
            Arc::new(ProxyProvider::new(config.proxy_url.clone()))
        }
    }
}

fn build_speech_engine(config: &ResolvedConfig) -> Option<Arc<dyn SpeechEngine>> {
    config.speech.as_ref().map(|s| {
        info!("Speech engine: {}", s.program);
        Arc::new(CommandEngine::new(
            s.program.clone(),
            s.args.clone(),
            s.language.clone(),
        )) as Arc<dyn SpeechEngine>
    })
}

/// Background work the loop owns.
struct Tasks {
    tx: mpsc::Sender<Action>,
    speech_engine: Option<Arc<dyn SpeechEngine>>,
    speech_segment: Option<JoinHandle<()>>,
    /// Bumped whenever recording starts or stops.
    speech_session: u64,
}

impl Tasks {
    fn stop_speech(&mut self) {
        if let Some(handle) = self.speech_segment.take() {
            handle.abort();
        }
    }

    fn start_speech_segment(&mut self) {
        self.stop_speech();
        let Some(engine) = self.speech_engine.clone() else {
            send(&self.tx, Action::Speech(SpeechEvent::Unavailable));
            return;
        };
        self.speech_segment = Some(spawn_listen(engine, self.tx.clone()));
    }
}

fn send(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to send action: receiver dropped");
    }
}

/// Dispatch an action and carry out its effect. Returns true on quit.
fn dispatch(app: &mut App, tui: &mut TuiState, tasks: &mut Tasks, action: Action) -> bool {
    if let Action::Speech(SpeechEvent::ResumeDue(session)) = action
        && session != tasks.speech_session
    {
        debug!("Dropping restart from speech session {}", session);
        return false;
    }
    let new_chat = matches!(action, Action::NewChat);
    let effect = update(app, action);
    if new_chat && !app.has_messages() {
        tui.message_list.reset();
    }
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::SpawnRequest(request) => {
            tui.message_list.scroll_to_bottom();
            spawn_request(app.provider.clone(), request, tasks.tx.clone());
        }
        Effect::ScheduleDismiss(delay) => {
            spawn_timer(delay, Action::DismissApology, tasks.tx.clone());
        }
        Effect::Speech(effect) => run_speech_effect(tui, tasks, effect),
    }
    false
}

fn run_speech_effect(tui: &mut TuiState, tasks: &mut Tasks, effect: SpeechEffect) {
    match effect {
        SpeechEffect::None | SpeechEffect::Notify(_) => {}
        SpeechEffect::Begin => {
            tui.input_box.clear();
            tasks.speech_session += 1;
            tasks.start_speech_segment();
        }
        SpeechEffect::Resume => tasks.start_speech_segment(),
        SpeechEffect::ResumeAfter(delay) => {
            let due = Action::Speech(SpeechEvent::ResumeDue(tasks.speech_session));
            spawn_timer(delay, due, tasks.tx.clone());
        }
        SpeechEffect::Stop | SpeechEffect::StopWithNotice(_) => {
            tasks.speech_session += 1;
            tasks.stop_speech();
        }
        SpeechEffect::ReplaceInput(text) => tui.input_box.set_text(text),
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config);
    info!("Using provider: {}", provider.name());
    let mut app = App::new(provider);
    let mut tui = TuiState::new();

    let (tx, rx) = mpsc::channel();
    let mut tasks = Tasks {
        tx,
        speech_engine: build_speech_engine(&config),
        speech_segment: None,
        speech_session: 0,
    };

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        let now = Instant::now();

        // Sync InputBox props with App/TUI state
        tui.input_box.disabled = app.is_busy();
        tui.input_box.attachments = app.attachments.len();
        tui.input_box.recording = app.speech.is_recording();
        tui.input_box.dimmed = matches!(tui.input_mode, InputMode::Cursor);

        if tui.input_box.tick(now) || tui.refresh_greeting(now) {
            needs_redraw = true;
        }

        let animating =
            app.request == RequestState::InFlight || tui.input_box.resize_pending();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let frame_area = terminal.get_frame().area();
            if handle_event(&mut app, &mut tui, &mut tasks, event, frame_area) {
                break 'main;
            }
        }

        // Actions from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", summarize(&action));
            if dispatch(&mut app, &mut tui, &mut tasks, action) {
                break 'main;
            }
        }
    }

    tasks.stop_speech();
    ratatui::restore();
    Ok(())
}

/// Route one terminal event. Returns true on quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    tasks: &mut Tasks,
    event: TuiEvent,
    frame_area: ratatui::layout::Rect,
) -> bool {
    match event {
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => return dispatch(app, tui, tasks, Action::Quit),
        TuiEvent::NewChat => {
            tui.input_box.clear();
            tui.input_mode = InputMode::Input;
            return dispatch(app, tui, tasks, Action::NewChat);
        }
        TuiEvent::ToggleSpeech => {
            let speech = if app.speech.is_recording() {
                SpeechEvent::StopRequested
            } else {
                SpeechEvent::StartRequested
            };
            return dispatch(app, tui, tasks, Action::Speech(speech));
        }
        TuiEvent::PasteImage => {
            let action = match clipboard::read_image_attachment() {
                Ok(attachment) => Action::AttachImage(attachment),
                Err(e) => Action::AttachFailed(e.to_string()),
            };
            return dispatch(app, tui, tasks, action);
        }
        TuiEvent::Export => {
            app.notice = Some(match export::export_current(app) {
                Ok(Some(path)) => format!("Transcript saved to {}", path.display()),
                Ok(None) => "Nothing to export yet".to_string(),
                Err(e) => {
                    warn!("Transcript export failed: {}", e);
                    format!("Export failed: {e}")
                }
            });
            return false;
        }
        TuiEvent::MouseMove(column, row) | TuiEvent::MouseClick(column, row) => {
            let input_height = tui.input_box.calculate_height();
            let hit = ui::hit_test_message(column, row, frame_area, input_height, tui);
            if hit.is_some() || matches!(event, TuiEvent::MouseMove(..)) {
                tui.message_list.selected_index = hit;
            }
            return false;
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            return false;
        }
        _ => {}
    }

    match tui.input_mode {
        InputMode::Input => {
            if matches!(event, TuiEvent::Escape) {
                tui.input_mode = InputMode::Cursor;
                tui.message_list.selected_index = app.transcript.len().checked_sub(1);
                return false;
            }
            if let TuiEvent::Paste(text) = &event
                && let Some(path) = image_path_from_paste(text)
            {
                let action = match PendingAttachment::from_path(&path) {
                    Ok(attachment) => {
                        info!("Attached image from {}", path.display());
                        Action::AttachImage(attachment)
                    }
                    Err(e) => Action::AttachFailed(e.to_string()),
                };
                return dispatch(app, tui, tasks, action);
            }
            if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                return dispatch(app, tui, tasks, Action::Submit(text));
            }
        }
        InputMode::Cursor => match event {
            TuiEvent::Escape => {
                if app.notice.is_some() {
                    return dispatch(app, tui, tasks, Action::DismissNotice);
                }
            }
            TuiEvent::InputChar('y') => copy_selected(app, tui),
            // Typing auto-switches to Input mode and forwards the event
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                tui.input_mode = InputMode::Input;
                tui.message_list.selected_index = None;
                tui.input_box.handle_event(&event);
            }
            TuiEvent::Submit => {
                tui.input_mode = InputMode::Input;
                tui.message_list.selected_index = None;
            }
            TuiEvent::CursorUp => {
                let len = app.transcript.len();
                if len > 0 {
                    let idx = tui
                        .message_list
                        .selected_index
                        .map_or(len - 1, |i| i.saturating_sub(1));
                    tui.message_list.selected_index = Some(idx);
                    tui.message_list.scroll_to_selected();
                }
            }
            TuiEvent::CursorDown => {
                if let Some(idx) = tui.message_list.selected_index
                    && idx + 1 < app.transcript.len()
                {
                    tui.message_list.selected_index = Some(idx + 1);
                    tui.message_list.scroll_to_selected();
                }
            }
            TuiEvent::CursorEnd => tui.message_list.scroll_to_bottom(),
            _ => {}
        },
    }
    false
}

/// Copy the selected message's code blocks, or its text when it has none.
fn copy_selected(app: &mut App, tui: &TuiState) {
    let Some(TranscriptEntry::Message(message)) = tui
        .message_list
        .selected_index
        .and_then(|i| app.transcript.get(i))
    else {
        return;
    };
    let code = message.copyable_code();
    let text = if code.is_empty() {
        message.source_text()
    } else {
        code.join("\n\n")
    };
    match clipboard::copy_text(&text) {
        Ok(()) => {
            app.status_message = if code.is_empty() {
                "Copied message".to_string()
            } else {
                "Copied code".to_string()
            };
        }
        Err(e) => {
            warn!("Clipboard copy failed: {}", e);
            app.notice = Some(format!("Copy failed: {e}"));
        }
    }
}

/// Log-friendly label; replies and attachments can be megabytes.
fn summarize(action: &Action) -> String {
    match action {
        Action::ReplyReceived(response) => {
            format!("ReplyReceived({} candidates)", response.candidates.len())
        }
        Action::AttachImage(a) => format!("AttachImage({}, {} bytes)", a.mime_type, a.data.len()),
        other => format!("{other:?}"),
    }
}

fn spawn_timer(delay: Duration, action: Action, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        send(&tx, action);
    });
}

fn spawn_request(
    provider: Arc<dyn CompletionProvider>,
    request: GenerateRequest,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "Spawning request via {} ({} turns)",
        provider.name(),
        request.contents.len()
    );
    tokio::spawn(async move {
        let started = Instant::now();
        let action = match provider.generate(&request).await {
            Ok(response) => {
                info!("Reply received in {}ms", started.elapsed().as_millis());
                Action::ReplyReceived(response)
            }
            Err(e) => {
                log_provider_error(&e);
                Action::RequestFailed(e.to_string())
            }
        };
        send(&tx, action);
    });
}

fn log_provider_error(e: &ProviderError) {
    match e {
        ProviderError::Config(_) => warn!("Request not sent: {}", e),
        _ => warn!("Request failed: {}", e),
    }
}

/// Run one listening segment, forwarding transcripts as they arrive and
/// reporting how the segment ended.
fn spawn_listen(engine: Arc<dyn SpeechEngine>, tx: mpsc::Sender<Action>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (transcript_tx, mut transcript_rx) = tokio::sync::mpsc::channel::<String>(16);
        let forward_tx = tx.clone();
        let forward = tokio::spawn(async move {
            while let Some(text) = transcript_rx.recv().await {
                send(&forward_tx, Action::Speech(SpeechEvent::Transcript(text)));
            }
        });

        let result = engine.listen(transcript_tx).await;
        // Deliver every transcript before the end-of-segment event.
        let _ = forward.await;

        let event = match result {
            Ok(()) => SpeechEvent::SegmentEnded,
            Err(ListenError::Unavailable(msg)) => {
                warn!("Speech engine {} unavailable: {}", engine.name(), msg);
                SpeechEvent::Unavailable
            }
            Err(ListenError::Engine(e)) => SpeechEvent::Failed(e),
        };
        send(&tx, Action::Speech(event));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedProvider, test_app};

    fn tasks() -> (Tasks, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        (
            Tasks {
                tx,
                speech_engine: None,
                speech_segment: None,
                speech_session: 0,
            },
            rx,
        )
    }

    #[test]
    fn build_provider_picks_by_name() {
        let mut config = crate::core::config::resolve_with(
            &Default::default(),
            None,
            None,
            |_| None,
        );
        assert_eq!(build_provider(&config).name(), "proxy");
        config.provider = "gemini".into();
        assert_eq!(build_provider(&config).name(), "gemini");
        config.provider = "bogus".into();
        assert_eq!(build_provider(&config).name(), "proxy");
    }

    #[test]
    fn escape_enters_cursor_mode_on_last_entry() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (mut tasks, _rx) = tasks();
        app.transcript.push(TranscriptEntry::Apology);

        let area = ratatui::layout::Rect::new(0, 0, 80, 24);
        handle_event(&mut app, &mut tui, &mut tasks, TuiEvent::Escape, area);
        assert_eq!(tui.input_mode, InputMode::Cursor);
        assert_eq!(tui.message_list.selected_index, Some(0));

        handle_event(&mut app, &mut tui, &mut tasks, TuiEvent::InputChar('h'), area);
        assert_eq!(tui.input_mode, InputMode::Input);
        assert_eq!(tui.input_box.text(), "h");
    }

    #[test]
    fn speech_without_engine_reports_unavailable() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (mut tasks, rx) = tasks();
        tui.input_box.set_text("draft".into());

        let area = ratatui::layout::Rect::new(0, 0, 80, 24);
        handle_event(&mut app, &mut tui, &mut tasks, TuiEvent::ToggleSpeech, area);
        assert!(app.speech.is_recording());
        assert!(tui.input_box.text().is_empty());

        let action = rx.try_recv().unwrap();
        assert_eq!(action, Action::Speech(SpeechEvent::Unavailable));
        dispatch(&mut app, &mut tui, &mut tasks, action);
        assert!(!app.speech.is_recording());
        assert!(app.notice.is_some());
    }

    #[test]
    fn transcripts_replace_the_input() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (mut tasks, _rx) = tasks();
        app.speech = crate::speech::SpeechState::Recording;

        dispatch(
            &mut app,
            &mut tui,
            &mut tasks,
            Action::Speech(SpeechEvent::Transcript("open the pod bay doors".into())),
        );
        assert_eq!(tui.input_box.text(), "open the pod bay doors");
    }

    #[tokio::test]
    async fn submit_round_trip_through_background_request() {
        let provider = Arc::new(ScriptedProvider::replying("At your service."));
        let mut app = App::new(provider.clone());
        let mut tui = TuiState::new();
        let (mut tasks, rx) = tasks();

        dispatch(&mut app, &mut tui, &mut tasks, Action::Submit("hello".into()));
        assert_eq!(app.request, RequestState::InFlight);

        let action = tokio::task::spawn_blocking(move || {
            rx.recv_timeout(Duration::from_secs(5))
        })
        .await
        .unwrap()
        .unwrap();
        dispatch(&mut app, &mut tui, &mut tasks, action);

        assert_eq!(app.request, RequestState::Idle);
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(provider.requests().len(), 1);
    }

    async fn next_action(rx: &mpsc::Receiver<Action>) -> Action {
        loop {
            if let Ok(action) = rx.try_recv() {
                return action;
            }
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_request_frees_the_slot_after_the_apology() {
        let provider = Arc::new(ScriptedProvider::failing("connection refused"));
        let mut app = App::new(provider);
        let mut tui = TuiState::new();
        let (mut tasks, rx) = tasks();

        dispatch(&mut app, &mut tui, &mut tasks, Action::Submit("hello".into()));
        let action = next_action(&rx).await;
        assert!(matches!(action, Action::RequestFailed(_)));
        dispatch(&mut app, &mut tui, &mut tasks, action);
        assert_eq!(app.request, RequestState::Cooling);
        assert_eq!(app.transcript.last(), Some(&TranscriptEntry::Apology));

        // Let the dismissal timer register before moving the clock.
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(2_900)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(app.is_busy());

        tokio::time::advance(Duration::from_millis(200)).await;
        let action = next_action(&rx).await;
        assert_eq!(action, Action::DismissApology);
        dispatch(&mut app, &mut tui, &mut tasks, action);

        assert_eq!(app.request, RequestState::Idle);
        assert!(!app.is_busy());
        assert_eq!(app.conversation.len(), 1);
        assert!(!app.transcript.contains(&TranscriptEntry::Apology));
    }

    #[test]
    fn restart_from_an_earlier_session_is_dropped() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (mut tasks, rx) = tasks();

        dispatch(&mut app, &mut tui, &mut tasks, Action::Speech(SpeechEvent::StartRequested));
        let stale_session = tasks.speech_session;
        assert_eq!(rx.try_recv(), Ok(Action::Speech(SpeechEvent::Unavailable)));
        app.speech = crate::speech::SpeechState::Recording;

        // Stop and start again before the old restart comes due.
        dispatch(&mut app, &mut tui, &mut tasks, Action::Speech(SpeechEvent::StopRequested));
        dispatch(&mut app, &mut tui, &mut tasks, Action::Speech(SpeechEvent::StartRequested));
        let _ = rx.try_recv();
        assert!(app.speech.is_recording());
        assert_ne!(tasks.speech_session, stale_session);

        dispatch(
            &mut app,
            &mut tui,
            &mut tasks,
            Action::Speech(SpeechEvent::ResumeDue(stale_session)),
        );
        assert!(rx.try_recv().is_err());

        let current = tasks.speech_session;
        dispatch(
            &mut app,
            &mut tui,
            &mut tasks,
            Action::Speech(SpeechEvent::ResumeDue(current)),
        );
        assert_eq!(rx.try_recv(), Ok(Action::Speech(SpeechEvent::Unavailable)));
    }

    #[test]
    fn new_chat_resets_the_list() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (mut tasks, _rx) = tasks();
        tui.message_list.layout.heights = vec![3, 3];
        tui.message_list.stick_to_bottom = false;

        let area = ratatui::layout::Rect::new(0, 0, 80, 24);
        handle_event(&mut app, &mut tui, &mut tasks, TuiEvent::NewChat, area);
        assert!(tui.message_list.layout.heights.is_empty());
        assert!(tui.message_list.stick_to_bottom);
    }
}
