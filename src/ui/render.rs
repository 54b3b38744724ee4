//! Render functions for the TUI.
//!
//! The reel area is a window onto a vertical stack of full-height cards.
//! Each card is drawn into a scratch buffer and copied row by row, so a card
//! half scrolled out of view is clipped instead of squashed.

use crate::app::{App, SPINNER_FRAMES};
use crate::feed::ViewportProvider;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use tokio::time::Instant;

use super::reel_card::{self, CardView};
use super::{help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 30;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Rows reserved below the reel area.
const STATUS_ROWS: u16 = 1;

const SPINNER: [char; SPINNER_FRAMES] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Height of the reel area for a terminal with `rows` rows.
pub(super) fn reel_area_height(rows: u16) -> u16 {
    rows.saturating_sub(STATUS_ROWS)
}

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(STATUS_ROWS)])
        .split(area);

    render_reels(f, app, chunks[0]);
    if app.feed.state().loading {
        render_loading(f, app, chunks[0]);
    }
    status::render(f, app, chunks[1]);

    if app.show_help {
        help::render(f, app);
    }
}

/// Draw every card that intersects the reel area.
fn render_reels(f: &mut Frame, app: &App, area: Rect) {
    if app.reels.is_empty() {
        let empty = Paragraph::new("No reels in catalog")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        let mid = Rect {
            y: area.y + area.height / 2,
            height: 1,
            ..area
        };
        f.render_widget(empty, mid);
        return;
    }

    let metrics = app.viewport.metrics();
    let height = metrics.viewport_height.min(u32::from(area.height));
    if height == 0 {
        return;
    }
    let scroll_top = i64::from(metrics.scroll_top);
    let card_h = i64::from(height);
    let now = Instant::now();
    let active = app.feed.active_index();
    let state = app.feed.state();
    let entries = app.feed.loaded_entries();

    for (idx, (reel, entry)) in app.reels.iter().zip(entries).enumerate() {
        let top = idx as i64 * card_h - scroll_top;
        if top >= card_h || top + card_h <= 0 {
            continue;
        }

        let card_area = Rect::new(0, 0, area.width, height as u16);
        let mut scratch = Buffer::empty(card_area);
        let view = CardView {
            label: format!("{} id: {}", app.label_prefix, entry.id),
            entry,
            active: active == Some(idx),
            playing: reel.is_playing(),
            muted: state.muted,
            liked: app.is_liked(&entry.id),
            like_flash: reel.like_flash_active(now),
            mute_flash: reel.mute_flash_active(now),
        };
        reel_card::render(&mut scratch, card_area, &view);

        blit_rows(f.buffer_mut(), &scratch, area, top);
    }
}

/// Copy `src` into `area` of `dst` with its first row at `offset` rows from
/// the top of `area`. Rows outside `area` are dropped.
fn blit_rows(dst: &mut Buffer, src: &Buffer, area: Rect, offset: i64) {
    for sy in 0..src.area.height {
        let dy = offset + i64::from(sy);
        if dy < 0 || dy >= i64::from(area.height) {
            continue;
        }
        let y = area.y + dy as u16;
        for x in 0..src.area.width.min(area.width) {
            dst[(area.x + x, y)] = src[(x, sy)].clone();
        }
    }
}

/// "Loading more reels..." banner along the bottom of the reel area.
fn render_loading(f: &mut Frame, app: &App, area: Rect) {
    if area.height < 3 {
        return;
    }
    let text = format!(
        " {} Loading more reels... ",
        SPINNER[app.spinner_frame % SPINNER_FRAMES]
    );
    let width = (text.chars().count() as u16).min(area.width);
    let banner = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height - 2,
        width,
        height: 1,
    };
    f.render_widget(Clear, banner);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))),
        banner,
    );
}
