use chatrelay_core::Role;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(app: &mut App, frame: &mut Frame) {
    let [header_area, chat_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    render_header(app, frame, header_area);
    render_messages(app, frame, chat_area);
    render_input(app, frame, input_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " chatrelay ",
            Style::default().fg(Color::Black).bg(Color::Blue),
        ),
        Span::styled(
            format!(" {} ", app.relay_url),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_messages(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2);
    let bubble_width = (inner_width * 3 / 4).max(1);

    let user_style = Style::default().fg(Color::White).bg(Color::Blue);
    let assistant_style = Style::default().fg(Color::Gray).bg(Color::Black);

    let mut lines: Vec<Line> = Vec::new();
    for message in app.conversation.messages() {
        let (style, alignment) = match message.role {
            Role::User => (user_style, Alignment::Right),
            Role::Assistant => (assistant_style, Alignment::Left),
        };
        for row in wrap_text(&message.content, bubble_width) {
            lines.push(
                Line::from(Span::styled(format!(" {row} "), style)).alignment(alignment),
            );
        }
        lines.push(Line::default());
    }

    if app.conversation.is_loading() {
        let dots = "●".repeat(app.animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(
            format!(" {dots:<3} "),
            assistant_style.add_modifier(Modifier::ITALIC),
        )));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Type your message...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Follow the latest message unless the user scrolled back.
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_top = total.saturating_sub(inner_height);
    app.scroll_back = app.scroll_back.min(max_top);
    let top = max_top - app.scroll_back;

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((top, 0));
    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let border = if app.can_send() {
        Color::Blue
    } else {
        Color::DarkGray
    };
    let title = if app.conversation.is_loading() {
        " Waiting for reply (Esc to quit) "
    } else {
        " Message (Enter to send, Esc to quit) "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);

    // Keep the cursor visible by scrolling the input horizontally.
    let inner_width = area.width.saturating_sub(2) as usize;
    let offset = if inner_width == 0 {
        0
    } else {
        (app.cursor + 1).saturating_sub(inner_width)
    };
    let visible: String = app.input.chars().skip(offset).take(inner_width).collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);

    let cursor_x = (app.cursor - offset) as u16;
    frame.set_cursor_position((area.x + 1 + cursor_x, area.y + 1));
}

/// Greedy word wrap to `width` chars; words longer than a line are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.lines() {
        let mut row = String::new();
        let mut row_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if row_len > 0 {
                    rows.push(std::mem::take(&mut row));
                    row_len = 0;
                }
                let rest = word.split_off(width);
                rows.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if row_len == 0 {
                word.len()
            } else {
                row_len + 1 + word.len()
            };
            if needed > width {
                rows.push(std::mem::take(&mut row));
                row_len = 0;
            }
            if row_len > 0 {
                row.push(' ');
                row_len += 1;
            }
            row.extend(word.iter());
            row_len += word.len();
        }
        rows.push(row);
    }

    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}
