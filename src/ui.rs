//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! The layout is a three-row split: the tab bar, the current screen and a
//! one-line status bar. Images can't be drawn in a terminal, so a photo is
//! shown as its URL inside the card where the picture would go.

use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, PaneView, Tab};
use crate::feed::{PhotoRecord, SourceMetadata};

/// Words of the APOD explanation shown before "Show more".
const SUMMARY_WORDS: usize = 25;

/// Draw the complete UI for one frame.
pub fn draw(app: &App, frame: &mut Frame) {
    let [tabs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_tabs(app, frame, tabs_area);
    draw_screen(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|t| Line::from(format!(" {} {} ", t.index() + 1, t.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" NASA "))
        .select(app.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        );

    frame.render_widget(tabs, area);
}

fn draw_screen(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", heading(app.tab)))
        .borders(Borders::ALL);

    let text = match &app.pane(app.tab).view {
        PaneView::Idle | PaneView::Loading => centered(loading_message(app.tab), Color::Gray),
        PaneView::Empty => centered(failure_message(app.tab), Color::Red),
        PaneView::Failed(detail) => {
            let mut text = centered(failure_message(app.tab), Color::Red);
            text.push_line(Line::styled(detail.clone(), Style::default().fg(Color::DarkGray)));
            text
        }
        PaneView::Photo(record) => match app.tab {
            Tab::Apod => apod_text(app, record),
            Tab::Earth => earth_text(record),
            Tab::Mars => mars_text(record),
        },
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let keys = match app.tab {
        Tab::Apod => "  ←/→: day  space: more/less  r: reload  tab: switch  q: quit",
        Tab::Earth | Tab::Mars => "  r: new photo  tab: switch  q: quit",
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw(keys),
    ]));
    frame.render_widget(status, area);
}

// -- screen content -----------------------------------------------------------

pub fn heading(tab: Tab) -> &'static str {
    match tab {
        Tab::Apod => "Astronomy Picture of the Day",
        Tab::Earth => "Earth Satellite Photo",
        Tab::Mars => "Mars Rover Photo",
    }
}

pub fn loading_message(tab: Tab) -> &'static str {
    match tab {
        Tab::Apod => "Unveiling today's cosmic wonder...",
        Tab::Earth => "Connecting to Earth satellite...",
        Tab::Mars => "Receiving signals from Mars...",
    }
}

/// Shown for both a failed fetch and an empty one.
pub fn failure_message(tab: Tab) -> &'static str {
    match tab {
        Tab::Apod => "Failed to load data. Please check your connection.",
        Tab::Earth => "Failed to fetch Earth image. Try again later.",
        Tab::Mars => "Failed to fetch a Mars image. Try again later.",
    }
}

/// The first `words` words of `text`, with "..." appended.
pub fn summarize(text: &str, words: usize) -> String {
    let mut short = text.split_whitespace().take(words).collect::<Vec<_>>().join(" ");
    short.push_str("...");
    short
}

/// `2024-01-15` as `January 15, 2024`; anything unparseable is returned as is.
pub fn long_date(iso: &str) -> String {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| iso.to_string())
}

fn centered(message: &str, color: Color) -> Text<'_> {
    Text::from(vec![
        Line::raw(""),
        Line::styled(message, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

fn image_lines(record: &PhotoRecord) -> Vec<Line<'static>> {
    if record.is_image() {
        vec![
            Line::styled("[ image ]", Style::default().fg(Color::DarkGray)),
            Line::styled(
                record.image_url.clone(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]
    } else {
        vec![
            Line::styled("Video not supported.", Style::default().fg(Color::Gray)),
            Line::styled("Visit NASA APOD to view.", Style::default().fg(Color::Gray)),
        ]
    }
}

fn apod_text(app: &App, record: &PhotoRecord) -> Text<'static> {
    let (title, explanation) = match &record.source {
        SourceMetadata::Apod {
            title, explanation, ..
        } => (title.clone(), explanation.clone()),
        _ => (record.caption.clone().unwrap_or_default(), String::new()),
    };

    let next_style = if app.is_on_today() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };

    let mut lines = vec![
        Line::styled(long_date(&record.date), Style::default().fg(Color::LightBlue)),
        Line::from(vec![
            Span::styled("◀", Style::default().fg(Color::White)),
            Span::raw("        "),
            Span::styled("▶", next_style),
        ]),
        Line::raw(""),
    ];
    lines.extend(image_lines(record));
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        title,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));

    let body = if app.show_full {
        explanation
    } else {
        summarize(&explanation, SUMMARY_WORDS)
    };
    lines.push(Line::styled(body, Style::default().fg(Color::Gray)));
    lines.push(Line::styled(
        if app.show_full { "Show less" } else { "Show more" },
        Style::default().fg(Color::LightBlue),
    ));

    Text::from(lines)
}

fn earth_text(record: &PhotoRecord) -> Text<'static> {
    let mut lines = vec![Line::raw("")];
    lines.extend(image_lines(record));
    lines.push(Line::raw(""));
    if let Some(caption) = &record.caption {
        lines.push(Line::styled(
            caption.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::styled(
        format!("Earth date: {}", record.date),
        Style::default().fg(Color::LightBlue),
    ));
    if let SourceMetadata::Earth { identifier } = &record.source {
        lines.push(Line::styled(
            format!("Identifier: {identifier}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("[ r ] Refresh Photo", Style::default().fg(Color::LightBlue)));
    Text::from(lines)
}

fn mars_text(record: &PhotoRecord) -> Text<'static> {
    let mut lines = vec![Line::raw("")];
    lines.extend(image_lines(record));
    lines.push(Line::raw(""));
    if let SourceMetadata::Mars { camera, rover, sol } = &record.source {
        lines.push(Line::styled(
            camera.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled(
            format!("Rover: {rover} | Sol: {sol} | Earth: {}", record.date),
            Style::default().fg(Color::Gray),
        ));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("[ r ] Refresh Photo", Style::default().fg(Color::Red)));
    Text::from(lines)
}
