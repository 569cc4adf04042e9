//! The picker's three visual pieces: drop zone, selection summary and submit button.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::{theme, Regions};
use crate::picker::{format_file_size, FileHandle};

/// Rounded corners with dashed edges
const DASHED: border::Set = border::Set {
    top_left: "╭",
    top_right: "╮",
    bottom_left: "╰",
    bottom_right: "╯",
    vertical_left: "╎",
    vertical_right: "╎",
    horizontal_top: "╌",
    horizontal_bottom: "╌",
};

pub const REMOVE_LABEL: &str = " ✕ Remove ";

/// Empty-state drop target. Only colors react to drag-active.
pub fn draw_drop_zone(f: &mut Frame, area: Rect, drag_active: bool, max_file_size_mb: u64) {
    let t = theme();
    let (border_color, bg, icon_color) = if drag_active {
        (t.border_active, t.zone_bg_active, t.border_active)
    } else {
        (t.border, t.zone_bg, t.icon_idle)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(DASHED)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(bg));

    let body = vec![
        Line::from(Span::styled("󰕒", Style::default().fg(icon_color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            "Drop files here or click to browse",
            Style::default().fg(t.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("CSV or JSON (max {}MB)", max_file_size_mb),
            Style::default().fg(t.text_dim),
        )),
    ];

    // Center vertically inside the border
    let pad = area.height.saturating_sub(2).saturating_sub(body.len() as u16) / 2;
    let mut lines = vec![Line::from(""); pad as usize];
    lines.extend(body);

    let zone = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);

    f.render_widget(zone, area);
}

/// Compact summary of the selected file with its remove control
pub fn draw_summary(f: &mut Frame, regions: &Regions, file: &FileHandle) {
    let t = theme();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(t.border))
        .style(Style::default().bg(t.zone_bg));

    let summary = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" 󰈙  ", Style::default().fg(t.accent)),
            Span::styled(file.name.as_str(), Style::default().fg(t.text).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw("     "),
            Span::styled(format_file_size(file.size), Style::default().fg(t.text_dim)),
        ]),
    ])
    .block(block);

    f.render_widget(summary, regions.summary);

    let remove = Paragraph::new(Span::styled(REMOVE_LABEL, Style::default().fg(t.danger)))
        .style(Style::default().bg(t.zone_bg));
    f.render_widget(remove, regions.remove);
}

pub fn draw_submit_button(f: &mut Frame, area: Rect, enabled: bool) {
    let t = theme();
    let (color, modifier) = if enabled {
        (t.accent, Modifier::BOLD)
    } else {
        (t.disabled, Modifier::DIM)
    };

    let button = Paragraph::new(Line::from(Span::styled(
        "Upload and Process",
        Style::default().fg(color).add_modifier(modifier),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color)),
    );

    f.render_widget(button, area);
}
