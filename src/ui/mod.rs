mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::picker::Selection;
use crate::theme::Theme;
use components::REMOVE_LABEL;

// Theme is picked from config once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme used for all drawing. Later calls are ignored.
pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

/// Widest the picker column gets on large terminals
const MAX_WIDTH: u16 = 80;
const SUMMARY_HEIGHT: u16 = 4;

/// Screen areas shared by drawing and mouse hit testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub info: Rect,
    pub header: Rect,
    pub zone: Rect,
    pub summary: Rect,
    pub remove: Rect,
    pub submit: Rect,
    pub footer: Rect,
}

pub fn regions(area: Rect) -> Regions {
    let width = area.width.min(MAX_WIDTH);
    let column = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Length(4), // Title and description
            Constraint::Min(6),    // Drop zone / summary
            Constraint::Length(3), // Submit button
            Constraint::Length(1), // Footer
        ])
        .split(column);

    let zone = chunks[2];
    let summary = Rect {
        height: zone.height.min(SUMMARY_HEIGHT),
        ..zone
    };

    // Remove control sits on the file name line, inside the right border
    let remove_width = (REMOVE_LABEL.chars().count() as u16).min(summary.width.saturating_sub(2));
    let remove = Rect {
        x: summary.right().saturating_sub(remove_width + 1),
        y: (summary.y + 1).min(summary.bottom().saturating_sub(1)),
        width: remove_width,
        height: 1,
    };

    Regions {
        info: chunks[0],
        header: chunks[1],
        zone,
        summary,
        remove,
        submit: chunks[3],
        footer: chunks[4],
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let regions = regions(f.area());

    draw_info_line(f, app, regions.info);
    draw_header(f, regions.header);

    match app.picker.selection() {
        Selection::Selected(file) => components::draw_summary(f, &regions, file),
        Selection::Empty => components::draw_drop_zone(
            f,
            regions.zone,
            app.picker.drag_active(),
            app.config.max_file_size_mb,
        ),
    }

    components::draw_submit_button(f, regions.submit, app.picker.can_submit());
    draw_footer(f, app, regions.footer);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Browser => draw_file_browser(f, app),
        Popup::Help => draw_help_popup(f),
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let t = theme();
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Upload and harmonize your city data",
            Style::default().fg(t.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Upload any data or document of your city's activity (e.g., from a local provider) to be harmonized into the required GPC emission inventory format.",
            Style::default().fg(t.text_dim),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(header, area);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let t = theme();

    // Priority: status message > drag hint > ready
    let line = if let Some(ref msg) = app.status_message {
        Line::from(vec![
            Span::styled("󰅚 ", Style::default().fg(t.danger)),
            Span::styled(msg.as_str(), Style::default().fg(t.danger)),
        ])
    } else if app.picker.drag_active() {
        Line::from(Span::styled("󰕒 Dragging over drop zone", Style::default().fg(t.border_active)))
    } else if let Some(file) = app.picker.selected() {
        Line::from(vec![
            Span::styled("󰄬 ", Style::default().fg(t.accent)),
            Span::styled(format!("{} ready", file.mime_type), Style::default().fg(t.text_dim)),
        ])
    } else {
        Line::from(Span::styled("Drop a file onto the terminal or press b to browse", Style::default().fg(t.text_dim)))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let hints: Vec<(&str, &str)> = if app.picker.can_submit() {
        vec![
            ("Enter", "Upload"),
            ("d", "Remove"),
            ("h", "Help"),
            ("q", "Quit"),
        ]
    } else {
        vec![
            ("b", "Browse"),
            ("Drop", "Select"),
            ("h", "Help"),
            ("q", "Quit"),
        ]
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 40 { 2 } else { hints.len() };

    let mut hint_spans: Vec<Span> = Vec::new();
    for (i, (key, action)) in hints.iter().take(max_hints).enumerate() {
        if i > 0 {
            hint_spans.push(Span::styled(" │ ", Style::default().fg(t.text_dim)));
        }
        hint_spans.push(Span::styled(*key, Style::default().fg(t.accent)));
        hint_spans.push(Span::styled(format!(" {}", action), Style::default().fg(t.text_dim)));
    }

    let footer = Paragraph::new(Line::from(hint_spans))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn draw_file_browser(f: &mut Frame, app: &App) {
    let Some(browser) = app.browser.as_ref() else {
        return;
    };
    let t = theme();

    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 90 } else { 70 },
        if area.height < 30 { 85 } else { 70 },
        area
    );

    f.render_widget(Clear, popup_area);

    let title = if browser.show_all {
        " 󰈔 Select a file (all files) "
    } else {
        " 󰈔 Select a file (.csv, .json) "
    };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(t.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.accent));

    f.render_widget(block, popup_area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(popup_area);

    let path_str = browser.path.to_string_lossy();
    let path_display = Paragraph::new(Line::from(vec![
        Span::styled("󰉋 ", Style::default().fg(t.accent)),
        Span::styled(path_str.as_ref(), Style::default().fg(t.text)),
    ]))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(t.border)));
    f.render_widget(path_display, inner[0]);

    let rows: Vec<Row> = if browser.entries.is_empty() {
        vec![Row::new(vec![
            Span::styled("  Nothing to show in this directory", Style::default().fg(t.text_dim)),
        ])]
    } else {
        browser.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let icon = if entry.is_dir { "󰉋" } else { "󰈔" };
                let icon_color = if entry.is_dir { t.border_active } else { t.accent };

                let row_style = if i == browser.selected {
                    Style::default().bg(t.bg_selected).fg(t.text)
                } else {
                    Style::default()
                };

                Row::new(vec![
                    Span::styled(format!("  {} ", icon), Style::default().fg(icon_color)),
                    Span::styled(entry.name.as_str(), Style::default().fg(t.text)),
                ])
                .style(row_style)
            })
            .collect()
    };

    let widths = [Constraint::Length(5), Constraint::Percentage(90)];
    let table = Table::new(rows, widths);
    f.render_widget(table, inner[1]);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("j/k", Style::default().fg(t.accent)),
        Span::raw(" nav │ "),
        Span::styled("Enter", Style::default().fg(t.accent)),
        Span::raw(" select │ "),
        Span::styled("Backspace", Style::default().fg(t.accent)),
        Span::raw(" up │ "),
        Span::styled("a", Style::default().fg(t.accent)),
        Span::raw(" all files │ "),
        Span::styled("Esc", Style::default().fg(t.accent)),
        Span::raw(" cancel"),
    ]))
    .alignment(Alignment::Center)
    .style(Style::default().fg(t.text_dim));
    f.render_widget(hint, inner[2]);
}

fn draw_help_popup(f: &mut Frame) {
    let t = theme();
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 30 { 95 } else { 75 },
        area
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(t.accent).add_modifier(Modifier::BOLD)))
    };
    let binding = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(t.accent)),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        section("═══ Selecting a file ═══"),
        binding("  drop      ", "Drag a file from your file manager onto the terminal"),
        binding("  b / click ", "Browse for a file"),
        Line::from("            Drops accept CSV or JSON only; browsing accepts any file"),
        Line::from(""),
        section("═══ Selected file ═══"),
        binding("  Enter/s   ", "Upload and process"),
        binding("  d/x/Del   ", "Remove the file"),
        Line::from(""),
        section("═══ Browser ═══"),
        binding("  j/k ↑/↓   ", "Move"),
        binding("  Enter     ", "Open directory / choose file"),
        binding("  Backspace ", "Parent directory"),
        binding("  ~         ", "Home directory"),
        binding("  a         ", "Toggle all files / .csv and .json only"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(t.text_dim)),
            Span::styled("h", Style::default().fg(t.accent)),
            Span::styled("/", Style::default().fg(t.text_dim)),
            Span::styled("?", Style::default().fg(t.accent)),
            Span::styled("/", Style::default().fg(t.text_dim)),
            Span::styled("Esc", Style::default().fg(t.accent)),
            Span::styled(" to close", Style::default().fg(t.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" 󰋖 dropzone Help ", Style::default().fg(t.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
