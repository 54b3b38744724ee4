//! One full-height reel card.

use crate::catalog::VideoEntry;
use crate::util::truncate_to_width;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Everything a card shows. Built fresh every frame.
pub(super) struct CardView<'a> {
    pub label: String,
    pub entry: &'a VideoEntry,
    pub active: bool,
    pub playing: bool,
    pub muted: bool,
    pub liked: bool,
    pub like_flash: bool,
    pub mute_flash: bool,
}

pub(super) fn render(buf: &mut Buffer, area: Rect, view: &CardView<'_>) {
    let border = if view.active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            format!(" {} ", view.label),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.width == 0 || inner.height == 0 {
        return;
    }
    let width = inner.width as usize;

    let state = if view.playing {
        Span::styled("▶ Playing", Style::default().fg(Color::Green))
    } else {
        Span::styled("⏸ Paused", Style::default().fg(Color::DarkGray))
    };
    let src = view.entry.src.as_str();
    let tags = view.entry.tags.join(" ");

    let mut lines = vec![
        Line::from(state),
        Line::from(Span::styled(
            truncate_to_width(src, width).into_owned(),
            Style::default().fg(Color::Gray),
        )),
    ];

    // Push the controls to the bottom of the card
    let controls = controls_line(view);
    let body_rows = inner.height as usize;
    let fixed = lines.len() + 2;
    lines.extend(std::iter::repeat(Line::from("")).take(body_rows.saturating_sub(fixed)));
    if !tags.is_empty() {
        lines.push(Line::from(Span::styled(
            truncate_to_width(&tags, width).into_owned(),
            Style::default().fg(Color::Cyan),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(controls);

    Paragraph::new(lines).render(inner, buf);

    if view.like_flash || view.mute_flash {
        render_flash(buf, inner, view);
    }
}

fn controls_line(view: &CardView<'_>) -> Line<'static> {
    let like = if view.liked {
        Span::styled(
            "[l] ♥ Liked",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw("[l] ♡ Like")
    };
    let mute = if view.muted {
        Span::raw("[m] Unmute")
    } else {
        Span::raw("[m] Mute")
    };
    Line::from(vec![
        like,
        Span::raw("  "),
        mute,
        Span::raw("  "),
        Span::raw("[s] Share"),
    ])
}

/// Large centered feedback after a like or mute click.
fn render_flash(buf: &mut Buffer, inner: Rect, view: &CardView<'_>) {
    let (text, style) = if view.like_flash {
        if view.liked {
            ("♥  LIKED", Style::default().fg(Color::Red))
        } else {
            ("♡  UNLIKED", Style::default().fg(Color::White))
        }
    } else if view.muted {
        ("MUTED", Style::default().fg(Color::White))
    } else {
        ("SOUND ON", Style::default().fg(Color::Green))
    };

    let width = 16u16.min(inner.width);
    let height = 3u16.min(inner.height);
    let area = Rect {
        x: inner.x + (inner.width - width) / 2,
        y: inner.y + (inner.height - height) / 2,
        width,
        height,
    };
    Clear.render(area, buf);
    Paragraph::new(Span::styled(text, style.add_modifier(Modifier::BOLD)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(style))
        .render(area, buf);
}
