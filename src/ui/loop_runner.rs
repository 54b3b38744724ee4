//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, scroll notifications from the viewport, feed
//! events from background loads, and a periodic tick.

use crate::app::App;
use crate::feed::FeedEvent;
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::input::{handle_input, handle_mouse};
use super::render::{reel_area_height, render};

/// Tick period: throttle trailing edge, flash expiry, spinner.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Result of handling a key press event.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex:
/// - **Terminal input**: keys, mouse wheel and resizes from crossterm's event stream
/// - **Scroll notifications**: viewport metrics from the feed's subscription
/// - **Feed events**: lazy-load completions via the `FeedEvent` channel
/// - **Periodic tick**: 100ms timer for throttling, flashes and status expiry
///
/// Installs a panic hook that restores terminal state before unwinding, so
/// the terminal is not left in raw mode on panic.
pub async fn run(app: &mut App, mut event_rx: mpsc::Receiver<FeedEvent>) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();

    let (_, rows) = crossterm::terminal::size().context("Failed to query terminal size")?;
    app.resize(reel_area_height(rows));
    let mut scroll_rx = app.mount()?;

    let mut tick_interval = tokio::time::interval(TICK_INTERVAL);

    // On non-Unix platforms these become pending futures that never complete
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        // Drain queued notifications before waiting on input so that rapid
        // key repeat cannot starve scroll handling or batch completion.
        while let Ok(metrics) = scroll_rx.try_recv() {
            app.on_viewport(metrics);
        }
        while let Ok(event) = event_rx.try_recv() {
            app.handle_feed_event(event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.needs_redraw = true;
                        if let Action::Quit = handle_input(app, key.code, key.modifiers) {
                            break;
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => handle_mouse(app, mouse),
                    Some(Ok(Event::Resize(_, rows))) => app.resize(reel_area_height(rows)),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Terminal event error");
                    }
                    None => {
                        tracing::info!("Terminal event stream closed");
                        break;
                    }
                }
            }

            Some(metrics) = scroll_rx.recv() => {
                app.on_viewport(metrics);
            }

            Some(event) = event_rx.recv() => {
                app.handle_feed_event(event);
            }

            _ = tick_interval.tick() => {
                app.on_tick();
            }
        }
    }

    app.unmount();
    restore_terminal(terminal)?;
    Ok(())
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}
