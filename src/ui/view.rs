//! Drawing for each [`State`].

use super::app::{State, MENU_CHOICES, SPINNER};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use ratatui::Frame;

const ACCENT: Color = Color::Rgb(0x7D, 0x56, 0xF4);
const HELP: Color = Color::Rgb(0x62, 0x62, 0x62);

pub fn draw(frame: &mut Frame, state: &State) {
    let [header, _, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let (title, help) = match state {
        State::Menu { .. } => (
            "Video Summariser",
            "↑/↓ to navigate • Enter to select • q to quit",
        ),
        State::UrlInput { .. } => ("Enter URL", "Enter to submit • Esc to go back • Ctrl+C to quit"),
        State::Processing { .. } => ("Processing", "q to quit"),
        State::ResultDisplay { .. } => (
            "Summary Results",
            "↑/↓ PgUp/PgDn to scroll • r or Esc for menu • q to quit",
        ),
        State::Exit => return,
    };

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {} ", title),
            Style::default().fg(Color::Rgb(0xFA, 0xFA, 0xFA)).bg(ACCENT),
        )),
        header,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(HELP))),
        footer,
    );

    match state {
        State::Menu { cursor } => draw_menu(frame, body, *cursor),
        State::UrlInput { input } => draw_input(frame, body, input),
        State::Processing { url, frame: tick } => {
            let lines = vec![
                Line::from(format!("Processing your request... {}", SPINNER[*tick])),
                Line::default(),
                Line::styled(url.as_str(), Style::default().fg(HELP)),
            ];
            frame.render_widget(Paragraph::new(lines), body);
        }
        State::ResultDisplay {
            rendered, scroll, ..
        } => {
            let viewport = Paragraph::new(rendered.clone())
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::Indexed(62))),
                )
                .wrap(Wrap { trim: false })
                .scroll((*scroll, 0));
            frame.render_widget(viewport, body);
        }
        State::Exit => {}
    }
}

fn draw_menu(frame: &mut Frame, area: Rect, cursor: usize) {
    let mut lines = vec![Line::from("Select an option:"), Line::default()];
    lines.extend(MENU_CHOICES.iter().enumerate().map(|(i, choice)| {
        if i == cursor {
            Line::styled(
                format!("▶ {}", choice),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )
        } else {
            Line::from(format!("  {}", choice))
        }
    }));
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_input(frame: &mut Frame, area: Rect, input: &str) {
    let [label, field] =
        Layout::vertical([Constraint::Length(2), Constraint::Length(3)]).areas(area);

    frame.render_widget(Paragraph::new("Enter a video URL:"), label);

    let content = if input.is_empty() {
        Line::styled("https://www.youtube.com/watch?v=...", Style::default().fg(HELP))
    } else {
        Line::from(vec![
            Span::raw(input.to_string()),
            Span::styled("▏", Style::default().fg(ACCENT)),
        ])
    };
    frame.render_widget(
        Paragraph::new(content).block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT)),
        ),
        field,
    );
}
