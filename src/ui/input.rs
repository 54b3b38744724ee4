//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry; the help overlay, when
//! open, captures input in its own context.

use crate::app::App;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crossterm::event::{KeyCode, KeyModifiers, MouseEvent, MouseEventKind};

use super::Action;

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: i64 = 3;

/// Main input dispatch function.
pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    if app.show_help {
        return handle_help_input(app, code, modifiers);
    }

    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global)
    else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::ScrollDown => app.viewport.scroll_by(1),
        KbAction::ScrollUp => app.viewport.scroll_by(-1),
        KbAction::NextReel => app.viewport.next_item(),
        KbAction::PrevReel => app.viewport.prev_item(),
        KbAction::Top => app.viewport.to_top(),
        KbAction::Bottom => app.viewport.to_bottom(),
        KbAction::Like => app.like_active(),
        KbAction::ToggleMute => app.mute_active(),
        KbAction::Share => app.share_active(),
        KbAction::OpenSource => app.open_active(),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::CloseHelp => {}
    }
    Action::Continue
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: scroll the table, close, or quit.
fn handle_help_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Help)
    {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::CloseHelp) => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        Some(KbAction::ScrollDown) => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        Some(KbAction::ScrollUp) => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Mouse wheel scrolls the feed; everything else is ignored.
pub(super) fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.show_help {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.viewport.scroll_by(WHEEL_STEP),
        MouseEventKind::ScrollUp => app.viewport.scroll_by(-WHEEL_STEP),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VideoEntry;
    use crate::config::Config;
    use crate::feed::{FeedEvent, ViewportMetrics};
    use crate::platform::{Clipboard, HeadlessBackend, ShareError, Sharer};
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use url::Url;

    struct NullClipboard;

    impl Clipboard for NullClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), ShareError> {
            Ok(())
        }
    }

    fn app() -> (
        App,
        mpsc::UnboundedReceiver<ViewportMetrics>,
        mpsc::Receiver<FeedEvent>,
    ) {
        let entries = Arc::new(
            (0..5)
                .map(|i| VideoEntry {
                    id: format!("r{}", i),
                    src: Url::parse(&format!("https://cdn.example.com/{}.mp4", i)).unwrap(),
                    tags: vec![],
                })
                .collect(),
        );
        let (tx, rx) = mpsc::channel(4);
        let mut app = App::new(
            entries,
            &Config::default(),
            Box::new(HeadlessBackend),
            Sharer::new(None, Box::new(NullClipboard)),
            tx,
        )
        .unwrap();
        app.resize(10);
        let scroll = app.mount().unwrap();
        (app, scroll, rx)
    }

    fn press(app: &mut App, c: char) -> Action {
        handle_input(app, KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut app, _s, _rx) = app();
        assert!(matches!(press(&mut app, 'q'), Action::Quit));
    }

    #[tokio::test]
    async fn test_scroll_keys_move_viewport() {
        let (mut app, mut scroll, _rx) = app();
        press(&mut app, 'j');
        assert_eq!(scroll.try_recv().unwrap().scroll_top, 1);
        press(&mut app, ' ');
        assert_eq!(scroll.try_recv().unwrap().scroll_top, 10);
        press(&mut app, 'G');
        assert_eq!(scroll.try_recv().unwrap().scroll_top, 20);
        press(&mut app, 'g');
        assert_eq!(scroll.try_recv().unwrap().scroll_top, 0);
    }

    #[tokio::test]
    async fn test_help_captures_keys() {
        let (mut app, mut scroll, _rx) = app();
        press(&mut app, '?');
        assert!(app.show_help);

        press(&mut app, 'j');
        assert_eq!(app.help_scroll_offset, 1);
        assert!(scroll.try_recv().is_err());

        // Like is swallowed while help is open
        press(&mut app, 'l');
        assert!(!app.is_liked("r0"));

        handle_input(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.show_help);
        assert_eq!(app.help_scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_like_key() {
        let (mut app, _s, _rx) = app();
        press(&mut app, 'l');
        assert!(app.is_liked("r0"));
    }

    #[tokio::test]
    async fn test_mouse_wheel_scrolls() {
        let (mut app, mut scroll, _rx) = app();
        handle_mouse(
            &mut app,
            MouseEvent {
                kind: MouseEventKind::ScrollDown,
                column: 0,
                row: 0,
                modifiers: KeyModifiers::NONE,
            },
        );
        assert_eq!(scroll.try_recv().unwrap().scroll_top, 3);
    }
}
