//! Main event loop
//!
//! Polls the terminal for keys and the deadline scheduler for due ticks,
//! turns both into intents and re-renders only when something changed.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use super::keys::intent_for_key;
use super::prompter::TerminalPrompter;
use super::views::{render_screen, Screen};
use super::Tui;
use crate::app::{App, Effect, Intent};
use crate::scheduler::DeadlineScheduler;

/// Longest wait between loop iterations when no tick is due
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Run the application until it asks to quit
pub fn run(app: &mut App, tui: &mut Tui) -> Result<()> {
    let mut scheduler = DeadlineScheduler::new();

    // Always render on first frame
    let mut needs_render = true;

    loop {
        if needs_render {
            let screen = Screen::capture(app);
            tui.draw(|frame| render_screen(frame, &screen))?;
            needs_render = false;
        }

        for handle in scheduler.poll_due(Instant::now()) {
            let intent = Intent::Tick(handle);
            if app.completes_phase(handle) && app.config().rings_bell() {
                tui.bell();
            }
            dispatch(app, tui, &mut scheduler, intent);
            needs_render = true;
        }

        let timeout = scheduler
            .time_until_next(Instant::now())
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(intent) = intent_for_key(key) {
                        dispatch(app, tui, &mut scheduler, intent);
                    }
                    needs_render = true;
                }
                Event::Resize(_, _) => needs_render = true,
                _ => {}
            }
        }

        if app.state().should_quit {
            break;
        }
    }

    tracing::info!("Leaving event loop");
    Ok(())
}

/// Apply one intent, with dialogs drawn over the screen as it was before
fn dispatch(app: &mut App, tui: &mut Tui, scheduler: &mut DeadlineScheduler, intent: Intent) {
    tracing::trace!("Dispatching {}", intent.name());
    let backdrop = Screen::capture(app);
    let mut prompter = TerminalPrompter::new(tui, &backdrop);
    match app.dispatch(intent, scheduler, &mut prompter) {
        Effect::PhaseComplete(done) => {
            tracing::debug!(
                "{} finished, next phase {}",
                done.finished,
                if done.started_next { "started" } else { "waiting" }
            );
        }
        Effect::Quit => tracing::debug!("Quit requested"),
        Effect::None => {}
    }
}
