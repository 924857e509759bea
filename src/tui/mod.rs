//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, the event loop and the
//! navigator; translates crossterm events into [`event::TuiEvent`]s and
//! background results into [`message::Message`]s.
//!
//! ```text
//!            ┌──────────── poll ────────────┐
//!            ▼                              │
//!   crossterm Event ─► TuiEvent ─► Navigator::handle_event ─► Vec<Effect>
//!                                                                 │
//!   mpsc::Receiver<Message> ◄─── tokio task ◄─── tasks::spawn ◄───┘
//!            │
//!            └─► message::update ─► Vec<Effect> ─► tasks::spawn ...
//! ```
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop only redraws after an input event, a
//! background message, a status message expiring, or a resize. Between
//! those it sleeps in `poll` for up to 250ms.

mod component;
pub mod components;
pub mod event;
pub mod message;
pub mod navigator;
pub mod tasks;
mod ui;
pub mod view;
pub mod views;

use log::{debug, info};
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::state::App;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::navigator::Navigator;
use crate::tui::tasks::{TaskContext, spawn_all};
use crate::tui::views::dashboard::Dashboard;

const POLL_TIMEOUT: Duration = Duration::from_millis(250);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Disambiguated escape codes let a bare Esc through without the
        // usual delay; terminals without the protocol ignore the request.
        execute!(
            stdout(),
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, Hide);
        info!("Terminal modes restored");
    }
}

/// Map a terminal resize to the size views actually draw into.
fn body_resize(event: TuiEvent) -> TuiEvent {
    match event {
        TuiEvent::Resize(width, height) => {
            let body = ui::body_area(ratatui::layout::Rect::new(0, 0, width, height));
            TuiEvent::Resize(body.width, body.height)
        }
        other => other,
    }
}

pub fn run(mut app: App) -> std::io::Result<()> {
    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let (tx, rx) = mpsc::channel();
    let tasks = TaskContext {
        resolver: app.resolver.clone(),
        refresh_timeout: app.config.refresh_timeout,
        tx,
    };

    let mut nav = Navigator::new(Box::new(Dashboard::new()), app.config.max_back_stack);
    let effects = nav.start(&mut app);
    spawn_all(effects, &tasks);

    let size = terminal.size()?;
    nav.handle_event(&mut app, &body_resize(TuiEvent::Resize(size.width, size.height)));

    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw(f, &app, &mut nav))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let first_event = poll_event_timeout(POLL_TIMEOUT);
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            let effects = nav.handle_event(&mut app, &body_resize(event));
            spawn_all(effects, &tasks);
            if nav.should_quit() {
                break;
            }
        }
        if nav.should_quit() {
            break;
        }

        while let Ok(message) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", message);
            let effects = message::update(&mut nav, &mut app, message);
            spawn_all(effects, &tasks);
        }

        if app.status.expire(Instant::now()) {
            needs_redraw = true;
        }
    }

    info!("Exiting");
    ratatui::restore();
    Ok(())
}
