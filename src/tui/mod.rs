//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Phases
//!
//! 1. **Startup**: greeting typed out, then the backend health check runs in
//!    a background task until the backend answers (skipped with
//!    `--skip-health-check`).
//! 2. **Chat**: the conversation loop. Improvement requests run as tokio
//!    tasks and report back as `Action`s over a channel.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (request in flight, reply being revealed, copy badge
//!   showing): draws every ~30ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;

use crate::client::{
    HealthChecker, HealthPolicy, HealthStatus, HttpImprovementClient, ImproveRequest,
};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::store::Role;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ErrorBoundary, InputBox, InputEvent, MessageListState, StartupScreen, Typewriter,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// How long the "copied" badge stays on a message.
const COPY_FEEDBACK: Duration = Duration::from_secs(2);
const ANIMATION_FRAME: Duration = Duration::from_millis(30);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
    /// Navigate messages with arrow keys. Typing auto-switches to Input.
    Cursor,
    /// Editing the selected user message in place. Enter saves, Esc cancels.
    Edit,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub input_mode: InputMode,
    pub typewriter: Typewriter,
    pub boundary: ErrorBoundary,
    // Animation state
    pub pulse_value: f32,
    pub spinner_frame: usize,
    /// (store revision, loading) as of the last sync
    last_seen: (u64, bool),
}

impl TuiState {
    pub fn new(typing_interval: Duration) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            input_mode: InputMode::Input, // User expects to type immediately
            typewriter: Typewriter::new(typing_interval),
            boundary: ErrorBoundary::new(),
            pulse_value: 0.0,
            spinner_frame: 0,
            last_seen: (0, false),
        }
    }

    /// Follow the store: re-pin to the bottom whenever the conversation or
    /// the in-flight flag changed, and drop view state for removed messages.
    pub fn sync_with(&mut self, app: &App) {
        let observed = (app.store.revision(), app.is_loading());
        if observed == self.last_seen {
            return;
        }
        self.last_seen = observed;
        self.message_list.scroll_to_bottom();
        self.message_list.retain(app.store.messages());
        self.typewriter.retain(app.store.messages());
        if self.input_mode == InputMode::Edit
            && !self
                .message_list
                .selected_index
                .and_then(|i| app.store.get(i))
                .is_some_and(|m| self.message_list.is_editing(m.id))
        {
            self.input_mode = InputMode::Cursor;
        }
    }

    fn is_animating(&self, app: &App, now: Instant) -> bool {
        // A tripped boundary never draws the list again, so nothing there can advance
        if self.boundary.has_error() {
            return false;
        }
        app.is_loading()
            || self.typewriter.is_animating(app.store.messages(), now)
            || self.message_list.has_pending_feedback(now)
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol allows Shift+Enter detection; terminals
        // without support ignore it
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
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
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

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let client = Arc::new(HttpImprovementClient::new(
        &config.base_url,
        &config.improve_path,
        config.auth_token.clone(),
        config.request_timeout,
    ));
    info!("Using improvement endpoint {}", client.endpoint());
    let mut app = App::new(client, backend_label(&config.base_url));
    let mut tui = TuiState::new(config.typing_interval);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let ready = if config.skip_health_check {
        info!("Health check skipped");
        Ok(true)
    } else {
        run_startup(&mut terminal, &config)
    };
    let result = match ready {
        Ok(true) => run_chat(&mut terminal, &mut app, &mut tui),
        Ok(false) => {
            info!("Quit during startup");
            Ok(())
        }
        Err(e) => Err(e),
    };

    ratatui::restore();
    result
}

/// Host and port of the backend, for the title bar.
fn backend_label(base_url: &str) -> String {
    base_url
        .split_once("://")
        .map_or(base_url, |(_, rest)| rest)
        .trim_end_matches('/')
        .to_string()
}

enum StartupEvent {
    Status(HealthStatus),
    Ready,
}

/// Startup screen loop. Returns `false` if the user quit before the backend came up.
fn run_startup(terminal: &mut DefaultTerminal, config: &ResolvedConfig) -> std::io::Result<bool> {
    let mut screen = StartupScreen::new(Instant::now());
    let (tx, rx) = mpsc::channel();
    let mut health_task: Option<tokio::task::JoinHandle<()>> = None;

    loop {
        let now = Instant::now();
        terminal.draw(|f| screen.render_at(f, f.area(), now))?;

        if health_task.is_none() && screen.typing_done(now) {
            let checker = HealthChecker::new(&config.base_url, &config.health_path, HealthPolicy::default());
            info!("Waiting for backend at {}", checker.url());
            let tx = tx.clone();
            health_task = Some(tokio::spawn(async move {
                let status_tx = tx.clone();
                let attempts = checker
                    .wait_until_ready(|status| {
                        status_tx.send(StartupEvent::Status(status)).ok();
                    })
                    .await;
                debug!("Backend ready after {} attempt(s)", attempts);
                tx.send(StartupEvent::Ready).ok();
            }));
        }

        for event in poll_event_timeout(ANIMATION_FRAME)
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if event == TuiEvent::ForceQuit {
                if let Some(task) = health_task.take() {
                    task.abort();
                }
                return Ok(false);
            }
        }

        while let Ok(startup_event) = rx.try_recv() {
            match startup_event {
                StartupEvent::Status(status) => screen.set_status(status),
                StartupEvent::Ready => return Ok(true),
            }
        }
    }
}

fn run_chat(terminal: &mut DefaultTerminal, app: &mut App, tui: &mut TuiState) -> std::io::Result<()> {
    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let now = Instant::now();
        tui.sync_with(app);
        let animating = tui.is_animating(app, now);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            tui.spinner_frame = (elapsed * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, app, tui, now))?;
            needs_redraw = false;
        }

        let timeout = if animating { ANIMATION_FRAME } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let frame_area: Rect = terminal.get_frame().area();
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match handle_event(app, tui, event, frame_area, Instant::now()) {
                Effect::None => {}
                Effect::SpawnRequest(request) => spawn_request(app, request, tx.clone()),
                Effect::Quit => should_quit = true,
            }
        }
        if should_quit {
            break;
        }

        // Responses from background requests
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if let Effect::SpawnRequest(request) = update(app, action) {
                spawn_request(app, request, tx.clone());
            }
        }
    }

    info!("Chat closed with {} message(s)", app.store.len());
    Ok(())
}

/// Route one terminal event according to the current input mode.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    frame_area: Rect,
    now: Instant,
) -> Effect {
    match event {
        TuiEvent::Resize => return Effect::None,
        // Ctrl+C always quits regardless of mode
        TuiEvent::ForceQuit => return update(app, Action::Quit),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            return Effect::None;
        }
        TuiEvent::MouseClick(_col, row) => {
            if tui.input_mode != InputMode::Edit {
                let input_height = tui.input_box.calculate_height(frame_area.width);
                let hit = ui::hit_test_message(
                    row,
                    frame_area,
                    tui.message_list.scroll_state.offset().y,
                    &tui.message_list.layout.prefix_heights,
                    input_height,
                )
                .filter(|&i| i < app.store.len());
                if let Some(idx) = hit {
                    tui.message_list.selected_index = Some(idx);
                    tui.input_mode = InputMode::Cursor;
                }
            }
            return Effect::None;
        }
        _ => {}
    }

    match tui.input_mode {
        InputMode::Input => handle_input_mode(app, tui, event),
        InputMode::Cursor => handle_cursor_mode(app, tui, event, now),
        InputMode::Edit => handle_edit_mode(app, tui, event),
    }
}

fn handle_input_mode(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    if event == TuiEvent::Escape {
        // Select the newest message when entering Cursor mode
        if let Some(last) = app.store.len().checked_sub(1) {
            tui.input_mode = InputMode::Cursor;
            tui.message_list.selected_index = Some(last);
            tui.message_list.scroll_to_selected();
        }
        return Effect::None;
    }

    // Events are handled in batches between draws, so refresh the prop here too
    tui.input_box.disabled = app.is_loading();
    match tui.input_box.handle_event(&event) {
        Some(InputEvent::Submit(text)) => update(app, Action::Submit(text)),
        Some(InputEvent::ContentChanged) | None => Effect::None,
    }
}

fn handle_cursor_mode(app: &mut App, tui: &mut TuiState, event: TuiEvent, now: Instant) -> Effect {
    let selected = tui
        .message_list
        .selected_index
        .filter(|&i| i < app.store.len());

    match event {
        TuiEvent::CursorUp => {
            if let Some(last) = app.store.len().checked_sub(1) {
                let idx = selected.map_or(last, |i| i.saturating_sub(1));
                tui.message_list.selected_index = Some(idx);
                tui.message_list.scroll_to_selected();
            }
        }
        TuiEvent::CursorDown => {
            if let Some(i) = selected
                && i + 1 < app.store.len()
            {
                tui.message_list.selected_index = Some(i + 1);
                tui.message_list.scroll_to_selected();
            }
        }
        TuiEvent::InputChar('c') => {
            if let Some(message) = selected.and_then(|i| app.store.get(i)) {
                match copy_to_clipboard(&message.text) {
                    Ok(()) => {
                        debug!("Copied message {} ({} bytes)", message.id.get(), message.text.len());
                        tui.message_list.mark_copied(message.id, now + COPY_FEEDBACK);
                    }
                    Err(e) => {
                        warn!("Clipboard copy failed: {}", e);
                        app.status_message = String::from("Copy failed");
                    }
                }
            }
        }
        TuiEvent::InputChar('e') => {
            if let Some(message) = selected.and_then(|i| app.store.get(i))
                && message.role == Role::User
            {
                if app.is_loading() {
                    app.status_message = String::from("Wait for the current improvement to finish");
                } else {
                    tui.message_list.start_edit(message);
                    tui.input_mode = InputMode::Edit;
                }
            }
        }
        TuiEvent::InputChar('x') => {
            if let Some(i) = selected {
                return update(app, Action::TruncateAfter(i));
            }
        }
        TuiEvent::Escape => {}
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
        _ => {}
    }
    Effect::None
}

fn handle_edit_mode(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    let Some((index, id)) = tui
        .message_list
        .selected_index
        .and_then(|i| app.store.get(i).map(|m| (i, m.id)))
    else {
        tui.input_mode = InputMode::Cursor;
        return Effect::None;
    };

    match event {
        TuiEvent::Submit => {
            tui.input_mode = InputMode::Cursor;
            match tui.message_list.finish_edit(id) {
                Some(new_text) => update(app, Action::EditSave { index, new_text }),
                None => Effect::None,
            }
        }
        TuiEvent::Escape => {
            tui.message_list.finish_edit(id);
            tui.input_mode = InputMode::Cursor;
            Effect::None
        }
        other => {
            if let Some(buffer) = tui.message_list.edit_buffer_mut(id) {
                buffer.apply(&other);
            }
            Effect::None
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())
}

fn spawn_request(app: &App, request: ImproveRequest, tx: mpsc::Sender<Action>) {
    info!(
        "Spawning improvement request via {} (intent={:?})",
        app.client.name(),
        request.wire_intent()
    );
    let client = app.client.clone();

    tokio::spawn(async move {
        let started = Instant::now();
        let action = match client.improve(&request).await {
            Ok(improved) => Action::ImprovementSucceeded(improved),
            Err(e) => Action::ImprovementFailed(e),
        };
        debug!("Improvement request finished in {}ms", started.elapsed().as_millis());
        if tx.send(action).is_err() {
            warn!("Failed to deliver improvement result: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ImproveError, ImprovedPrompt};
    use crate::core::action::TOO_SHORT_MESSAGE;
    use crate::test_support::test_app;
    use crate::tui::components::ViewError;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };

    fn send(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
        let effect = handle_event(app, tui, event, AREA, Instant::now());
        tui.sync_with(app);
        effect
    }

    fn type_text(app: &mut App, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            send(app, tui, TuiEvent::InputChar(c));
        }
    }

    /// App with one finished exchange: [user, ai]
    fn conversation() -> (App, TuiState) {
        let mut app = test_app();
        let mut tui = TuiState::new(Duration::ZERO);
        type_text(&mut app, &mut tui, "make this better");
        send(&mut app, &mut tui, TuiEvent::Submit);
        update(
            &mut app,
            Action::ImprovementSucceeded(ImprovedPrompt {
                improved_text: "Make this clearer.".into(),
            }),
        );
        tui.sync_with(&app);
        (app, tui)
    }

    #[test]
    fn test_enter_submits_input() {
        let mut app = test_app();
        let mut tui = TuiState::new(Duration::ZERO);
        type_text(&mut app, &mut tui, "make this better");
        let effect = send(&mut app, &mut tui, TuiEvent::Submit);
        assert!(matches!(effect, Effect::SpawnRequest(_)));
        assert_eq!(app.store.len(), 1);
        assert!(tui.input_box.text().is_empty());
    }

    #[test]
    fn test_escape_enters_cursor_mode_on_last_message() {
        let (mut app, mut tui) = conversation();
        send(&mut app, &mut tui, TuiEvent::Escape);
        assert_eq!(tui.input_mode, InputMode::Cursor);
        assert_eq!(tui.message_list.selected_index, Some(1));

        send(&mut app, &mut tui, TuiEvent::CursorUp);
        assert_eq!(tui.message_list.selected_index, Some(0));
        send(&mut app, &mut tui, TuiEvent::CursorUp);
        assert_eq!(tui.message_list.selected_index, Some(0));
    }

    #[test]
    fn test_escape_with_empty_conversation_stays_in_input() {
        let mut app = test_app();
        let mut tui = TuiState::new(Duration::ZERO);
        send(&mut app, &mut tui, TuiEvent::Escape);
        assert_eq!(tui.input_mode, InputMode::Input);
    }

    #[test]
    fn test_edit_save_regenerates_without_intent() {
        let (mut app, mut tui) = conversation();
        send(&mut app, &mut tui, TuiEvent::Escape);
        send(&mut app, &mut tui, TuiEvent::CursorUp);
        send(&mut app, &mut tui, TuiEvent::InputChar('e'));
        assert_eq!(tui.input_mode, InputMode::Edit);

        send(&mut app, &mut tui, TuiEvent::InputChar('!'));
        let effect = send(&mut app, &mut tui, TuiEvent::Submit);
        match effect {
            Effect::SpawnRequest(req) => {
                assert_eq!(req.prompt, "make this better!");
                assert_eq!(req.intent, None);
            }
            other => panic!("Expected SpawnRequest, got {:?}", other),
        }
        assert_eq!(tui.input_mode, InputMode::Cursor);
        // Stale reply removed while regenerating
        assert_eq!(app.store.len(), 1);
        assert!(app.is_loading());
    }

    #[test]
    fn test_edit_escape_discards() {
        let (mut app, mut tui) = conversation();
        send(&mut app, &mut tui, TuiEvent::Escape);
        send(&mut app, &mut tui, TuiEvent::CursorUp);
        send(&mut app, &mut tui, TuiEvent::InputChar('e'));
        send(&mut app, &mut tui, TuiEvent::Backspace);
        let effect = send(&mut app, &mut tui, TuiEvent::Escape);
        assert_eq!(effect, Effect::None);
        assert_eq!(tui.input_mode, InputMode::Cursor);
        assert_eq!(app.store.messages()[0].text, "make this better");
        assert!(!tui.message_list.is_editing(app.store.messages()[0].id));
    }

    #[test]
    fn test_unchanged_edit_sends_nothing() {
        let (mut app, mut tui) = conversation();
        send(&mut app, &mut tui, TuiEvent::Escape);
        send(&mut app, &mut tui, TuiEvent::CursorUp);
        send(&mut app, &mut tui, TuiEvent::InputChar('e'));
        let effect = send(&mut app, &mut tui, TuiEvent::Submit);
        assert_eq!(effect, Effect::None);
        assert_eq!(app.store.len(), 2);
    }

    #[test]
    fn test_ai_messages_are_not_editable() {
        let (mut app, mut tui) = conversation();
        send(&mut app, &mut tui, TuiEvent::Escape);
        send(&mut app, &mut tui, TuiEvent::InputChar('e'));
        assert_eq!(tui.input_mode, InputMode::Cursor);
    }

    #[test]
    fn test_truncate_after_selected() {
        let (mut app, mut tui) = conversation();
        send(&mut app, &mut tui, TuiEvent::Escape);
        send(&mut app, &mut tui, TuiEvent::CursorUp);
        send(&mut app, &mut tui, TuiEvent::InputChar('x'));
        assert_eq!(app.store.len(), 1);
        assert_eq!(tui.message_list.selected_index, Some(0));
    }

    #[test]
    fn test_typing_in_cursor_mode_returns_to_input() {
        let (mut app, mut tui) = conversation();
        send(&mut app, &mut tui, TuiEvent::Escape);
        send(&mut app, &mut tui, TuiEvent::InputChar('h'));
        assert_eq!(tui.input_mode, InputMode::Input);
        assert_eq!(tui.input_box.text(), "h");
        assert_eq!(tui.message_list.selected_index, None);
    }

    #[test]
    fn test_sync_repins_on_new_content() {
        let (app, mut tui) = conversation();
        tui.message_list.stick_to_bottom = false;
        tui.sync_with(&app);
        assert!(!tui.message_list.stick_to_bottom, "no change, no re-pin");

        let mut app = app;
        update(&mut app, Action::Submit("another prompt here".into()));
        tui.sync_with(&app);
        assert!(tui.message_list.stick_to_bottom);
    }

    #[test]
    fn test_blank_edit_is_sent_and_gets_too_short_reply() {
        let (mut app, mut tui) = conversation();
        send(&mut app, &mut tui, TuiEvent::Escape);
        send(&mut app, &mut tui, TuiEvent::CursorUp);
        send(&mut app, &mut tui, TuiEvent::InputChar('e'));
        for _ in 0.."make this better".len() {
            send(&mut app, &mut tui, TuiEvent::Backspace);
        }
        let effect = send(&mut app, &mut tui, TuiEvent::Submit);
        match effect {
            Effect::SpawnRequest(req) => {
                assert_eq!(req.prompt, "");
                assert_eq!(req.intent, None);
            }
            other => panic!("Expected SpawnRequest, got {:?}", other),
        }
        assert_eq!(app.store.messages()[0].text, "");

        update(
            &mut app,
            Action::ImprovementFailed(ImproveError::Validation { message: None }),
        );
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.store.messages()[1].text, TOO_SHORT_MESSAGE);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_second_submit_in_same_batch_keeps_buffer() {
        let mut app = test_app();
        let mut tui = TuiState::new(Duration::ZERO);
        // No draw or sync between events, like one drained batch in run_chat
        fn batch(app: &mut App, tui: &mut TuiState, text: &str) -> Effect {
            let now = Instant::now();
            for c in text.chars() {
                handle_event(app, tui, TuiEvent::InputChar(c), AREA, now);
            }
            handle_event(app, tui, TuiEvent::Submit, AREA, now)
        }
        let first = batch(&mut app, &mut tui, "first prompt here");
        let second = batch(&mut app, &mut tui, "second prompt here");

        assert!(matches!(first, Effect::SpawnRequest(_)));
        assert_eq!(second, Effect::None);
        assert!(app.is_loading());
        assert_eq!(app.store.len(), 1);
        assert_eq!(tui.input_box.text(), "second prompt here");
    }

    #[test]
    fn test_tripped_boundary_stops_animation_redraws() {
        let (app, mut tui) = conversation();
        let now = Instant::now();
        // The reply was never drawn, so its reveal is still pending
        assert!(tui.is_animating(&app, now));

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|f| {
                tui.boundary.render(f, f.area(), |_, _| {
                    Err(ViewError::LayoutOutOfSync { rows: 2, cached: 1 })
                })
            })
            .unwrap();
        assert!(tui.boundary.has_error());
        assert!(!tui.is_animating(&app, now));
    }

    #[test]
    fn test_force_quit() {
        let mut app = test_app();
        let mut tui = TuiState::new(Duration::ZERO);
        assert_eq!(send(&mut app, &mut tui, TuiEvent::ForceQuit), Effect::Quit);
    }

    #[test]
    fn test_backend_label_strips_scheme() {
        assert_eq!(backend_label("http://localhost:5000"), "localhost:5000");
        assert_eq!(backend_label("https://api.example.com/"), "api.example.com");
        assert_eq!(backend_label("localhost:5000"), "localhost:5000");
    }
}
