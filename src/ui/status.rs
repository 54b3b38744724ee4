use crate::app::App;
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Actions advertised in the status bar, with their short labels.
const HINTS: [(Action, &str); 7] = [
    (Action::NextReel, "next"),
    (Action::Like, "like"),
    (Action::ToggleMute, "mute"),
    (Action::Share, "share"),
    (Action::OpenSource, "open"),
    (Action::ShowHelp, "help"),
    (Action::Quit, "quit"),
];

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        Cow::Owned(key_hints(app))
    };

    let state = app.feed.state();
    let position = match app.feed.active_index() {
        Some(idx) => format!(" {}/{} ", idx + 1, app.feed.total()),
        None => " 0/0 ".to_string(),
    };
    let mute = if state.muted { "muted " } else { "" };
    let right = format!("{}{}", mute, position);

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(right.chars().count() as u16),
        ])
        .split(area);

    f.render_widget(Paragraph::new(text).style(style), chunks[0]);
    f.render_widget(Paragraph::new(right).style(style), chunks[1]);
}

/// "[Space]next [l]like ..." built from the live bindings so overrides show.
fn key_hints(app: &App) -> String {
    HINTS
        .iter()
        .filter_map(|(action, label)| {
            app.keybindings
                .key_hint(Context::Global, *action)
                .map(|key| format!("[{}]{}", key, label))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
