//! Terminal setup and the main event loop.
//!
//! Terminal input and completion events from spawned tasks are merged with
//! `tokio::select!` and applied to the session one at a time, in arrival
//! order.

use std::io::{self, Stdout};
use std::ops::ControlFlow;
use std::panic;
use std::time::Duration;

use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::{
    sync::mpsc,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::dao::ResourceClient;
use crate::session::{Effect, Event, Session};
use crate::tasks::Dispatcher;
use crate::ui::{events, views};

/// Redraw interval; keeps the reveal countdown current.
const TICK: Duration = Duration::from_secs(1);

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Owns the terminal in raw mode on the alternate screen.
///
/// The terminal is restored on drop and from the panic hook.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            error!(
                "panic: {panic_info}\n{}",
                std::backtrace::Backtrace::force_capture()
            );
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        info!("terminal initialised");
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore_terminal().and_then(|_| self.terminal.show_cursor()) {
            error!("failed to restore terminal: {e}");
        }
    }
}

/// Runs `session` until it asks to quit or the input stream ends.
pub async fn run<C>(
    guard: &mut TerminalGuard,
    client: C,
    session: Session,
    initial: Vec<Effect>,
) -> io::Result<()>
where
    C: ResourceClient + Clone + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut dispatcher = Dispatcher::new(client, tx);
    let mut input = EventStream::new();
    let mut tick = time::interval(TICK);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut session = session;
    if apply(&mut dispatcher, initial).is_break() {
        return Ok(());
    }

    loop {
        guard
            .terminal
            .draw(|f| views::draw(f, &session, Instant::now()))?;

        let event = tokio::select! {
            maybe = input.next() => match maybe {
                Some(Ok(term_event)) => {
                    if events::is_resize(&term_event) {
                        guard.terminal.autoresize()?;
                    }
                    match events::to_key(&term_event) {
                        Some(key) => Event::Key(key),
                        None => continue,
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "terminal input error");
                    continue;
                }
                None => {
                    debug!("terminal input closed");
                    break;
                }
            },
            Some(event) = rx.recv() => event,
            _ = tick.tick() => continue,
        };

        let (next, effects) = session.update(event);
        session = next;
        if apply(&mut dispatcher, effects).is_break() {
            info!("quit requested");
            break;
        }
    }

    Ok(())
}

fn apply<C>(dispatcher: &mut Dispatcher<C>, effects: Vec<Effect>) -> ControlFlow<()>
where
    C: ResourceClient + Clone + 'static,
{
    for effect in effects {
        debug!(?effect, "dispatch");
        dispatcher.dispatch(effect)?;
    }
    ControlFlow::Continue(())
}
