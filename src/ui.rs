// ui.rs
use crate::app::{Activity, App};
use crate::message::{Message, Role};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TYPING_CURSOR: &str = "▌";
const JUMP_INDICATOR: &str = " ↓ more (End) ";

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0]);
    draw_messages(frame, app, chunks[1]);
    draw_input(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let hint = "Ctrl+L Clear Chat · Esc Quit";
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(hint.width() as u16)])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "AI Agent UI",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(title, columns[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        columns[1],
    );
}

fn draw_messages(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Messages");
    let inner = block.inner(area);

    let lines: Vec<Line> = app
        .state
        .ordered_messages()
        .into_iter()
        .filter(|msg| is_visible(msg))
        .enumerate()
        .flat_map(|(i, msg)| {
            let separator = (i > 0).then(Line::default);
            separator
                .into_iter()
                .chain(message_lines(msg, inner.width as usize))
        })
        .collect();

    let content_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    app.scroll.update_dimensions(content_height, inner.height);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.scroll.offset(), 0));
    frame.render_widget(paragraph, area);

    let indicator_width = JUMP_INDICATOR.width() as u16;
    if app.scroll.show_jump_indicator(!app.state.is_empty())
        && inner.width >= indicator_width
        && inner.height > 0
    {
        let indicator_area = Rect {
            x: inner.right() - indicator_width,
            y: inner.bottom() - 1,
            width: indicator_width,
            height: 1,
        };
        let indicator = Paragraph::new(Span::styled(
            JUMP_INDICATOR,
            Style::default().fg(Color::Black).bg(Color::Gray),
        ));
        frame.render_widget(indicator, indicator_area);
    }
}

/// An assistant reply that failed before any text arrived leaves an empty,
/// finished message behind; there is nothing to show for it.
fn is_visible(msg: &Message) -> bool {
    !(msg.role == Role::Assistant && msg.content.is_empty() && !msg.is_loading)
}

fn label_style(msg: &Message) -> Style {
    let color = match (msg.role, msg.agent_name.as_deref()) {
        (Role::User, _) => Color::Cyan,
        (Role::Assistant, Some("System Error")) => Color::Red,
        (Role::Assistant, _) => Color::Green,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Label line followed by the wrapped content of one message.
fn message_lines(msg: &Message, width: usize) -> Vec<Line<'static>> {
    let time = msg.created_at.with_timezone(&Local).format("%H:%M");
    let mut lines = vec![Line::from(vec![
        Span::styled(msg.label().to_string(), label_style(msg)),
        Span::styled(format!(" {}", time), Style::default().fg(Color::DarkGray)),
    ])];

    let body = if msg.is_loading && msg.content.is_empty() {
        "…".to_string()
    } else if msg.is_loading {
        format!("{}{}", msg.content, TYPING_CURSOR)
    } else {
        msg.content.clone()
    };

    let style = if msg.agent_name.as_deref() == Some("System Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    for source_line in body.split('\n') {
        for row in wrap_line(source_line, width) {
            lines.push(Line::from(Span::styled(row, style)));
        }
    }
    lines
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![line.to_string()];
    }
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_inclusive(' ') {
        let word_width = word.width();
        let bare_width = word.trim_end_matches(' ').width();

        if !current.is_empty() && current_width + bare_width > width {
            rows.push(current.trim_end().to_string());
            current.clear();
            current_width = 0;
        }

        if bare_width > width {
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current.is_empty() && ch == ' ' {
                    continue;
                }
                if !current.is_empty() && current_width + ch_width > width {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        } else {
            current.push_str(word);
            current_width += word_width;
        }
    }
    rows.push(current.trim_end().to_string());
    rows
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.state.is_loading() {
        "Message (waiting…)"
    } else {
        "Message (Enter to send)"
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);

    let cursor_width = u16::try_from(app.input.cursor_width()).unwrap_or(u16::MAX);
    let h_scroll = cursor_width.saturating_sub(inner.width.saturating_sub(1));
    let style = if app.state.is_loading() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let input = Paragraph::new(Span::styled(app.input.value().to_string(), style))
        .block(block)
        .scroll((0, h_scroll));
    frame.render_widget(input, area);

    if inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position((inner.x + (cursor_width - h_scroll), inner.y));
    }
}

fn status_text(activity: Activity) -> (&'static str, Color) {
    match activity {
        Activity::Ready => ("Ready", Color::Green),
        Activity::Waiting => ("Waiting for response…", Color::Yellow),
        Activity::Typing => ("Typing…", Color::Yellow),
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (status, color) = status_text(app.activity());
    let mut spans = vec![
        Span::raw("Status: "),
        Span::styled(status, Style::default().fg(color)),
        Span::styled(
            format!("  {}", app.client.endpoint()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!("  {}", notice),
            Style::default().fg(Color::Red),
        ));
    }

    let status_bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_bar, area);
}
