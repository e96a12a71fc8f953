//! Terminal front-end state machine.
//!
//! [`transition`] is pure: it consumes the current [`State`] and an
//! [`Event`] and returns the next state plus an [`Effect`] for the run loop
//! to perform. Drawing and I/O live in `view` and the run loop.

use crate::agent::AgentError;
use crate::render;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Wrap};

/// Entries of the main menu, in display order
pub const MENU_CHOICES: [&str; 2] = ["Summarise a video", "Exit"];

pub const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Lines moved by PageUp / PageDown
const PAGE: u16 = 10;

/// Longest URL accepted by the input field, in characters
pub const URL_CHAR_LIMIT: usize = 256;

/// Inner size of the summary pane, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    /// Summary pane inside a terminal of `width` x `height`.
    ///
    /// Header, gap and footer take three rows; the border takes one cell on
    /// each side.
    pub fn for_terminal(width: u16, height: u16) -> Self {
        Self {
            width: width.saturating_sub(2),
            height: height.saturating_sub(5),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::for_terminal(80, 24)
    }
}

/// Largest scroll offset that still fills the viewport with wrapped rows
pub fn max_scroll(rendered: &Text<'static>, viewport: Viewport) -> u16 {
    if viewport.width == 0 {
        return 0;
    }
    let rows = Paragraph::new(rendered.clone())
        .wrap(Wrap { trim: false })
        .line_count(viewport.width);
    let max = rows.saturating_sub(usize::from(viewport.height));
    u16::try_from(max).unwrap_or(u16::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Menu {
        cursor: usize,
    },
    UrlInput {
        input: String,
    },
    Processing {
        url: String,
        frame: usize,
    },
    ResultDisplay {
        /// Markdown summary, or `Error: ...` when generation failed
        content: String,
        rendered: Text<'static>,
        scroll: u16,
    },
    Exit,
}

impl Default for State {
    fn default() -> Self {
        State::Menu { cursor: 0 }
    }
}

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Periodic timer, drives the spinner
    Tick,
    /// The in-flight summary call finished
    Completed(Result<String, AgentError>),
    /// The terminal changed size
    Resize,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Noop,
    /// Start summarising this URL without blocking the event loop
    Summarize(String),
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn is_quit(key: &KeyEvent) -> bool {
    is_ctrl_c(key) || key.code == KeyCode::Char('q')
}

/// Advance the state machine by one event.
///
/// `viewport` is the current size of the summary pane; scroll offsets are
/// bounded by the wrapped row count at that size.
pub fn transition(state: State, event: Event, viewport: Viewport) -> (State, Effect) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Press => (state, Effect::Noop),
        Event::Key(key) => on_key(state, key, viewport),
        Event::Tick => match state {
            State::Processing { url, frame } => (
                State::Processing {
                    url,
                    frame: (frame + 1) % SPINNER.len(),
                },
                Effect::Noop,
            ),
            other => (other, Effect::Noop),
        },
        Event::Completed(result) => match state {
            State::Processing { .. } => (result_display(result), Effect::Noop),
            // Nothing is in flight outside Processing; drop stale completions.
            other => (other, Effect::Noop),
        },
        Event::Resize => match state {
            State::ResultDisplay {
                content,
                rendered,
                scroll,
            } => {
                let scroll = scroll.min(max_scroll(&rendered, viewport));
                (
                    State::ResultDisplay {
                        content,
                        rendered,
                        scroll,
                    },
                    Effect::Noop,
                )
            }
            other => (other, Effect::Noop),
        },
    }
}

fn result_display(result: Result<String, AgentError>) -> State {
    let content = match result {
        Ok(text) => text,
        Err(e) => format!("Error: {}", e),
    };
    let rendered = render::markdown_to_text(&content);
    State::ResultDisplay {
        content,
        rendered,
        scroll: 0,
    }
}

fn on_key(state: State, key: KeyEvent, viewport: Viewport) -> (State, Effect) {
    // URLs may contain 'q', so only Ctrl+C exits while typing.
    if matches!(state, State::UrlInput { .. }) {
        if is_ctrl_c(&key) {
            return (State::Exit, Effect::Noop);
        }
    } else if is_quit(&key) {
        return (State::Exit, Effect::Noop);
    }

    match state {
        State::Menu { cursor } => match key.code {
            KeyCode::Up | KeyCode::Char('k') => (
                State::Menu {
                    cursor: cursor.saturating_sub(1),
                },
                Effect::Noop,
            ),
            KeyCode::Down | KeyCode::Char('j') => (
                State::Menu {
                    cursor: (cursor + 1).min(MENU_CHOICES.len() - 1),
                },
                Effect::Noop,
            ),
            KeyCode::Enter if cursor == 0 => (
                State::UrlInput {
                    input: String::new(),
                },
                Effect::Noop,
            ),
            KeyCode::Enter => (State::Exit, Effect::Noop),
            _ => (State::Menu { cursor }, Effect::Noop),
        },
        State::UrlInput { mut input } => match key.code {
            KeyCode::Esc => (State::default(), Effect::Noop),
            KeyCode::Enter => {
                let url = input.trim().to_string();
                if url.is_empty() {
                    (State::UrlInput { input }, Effect::Noop)
                } else {
                    (
                        State::Processing {
                            url: url.clone(),
                            frame: 0,
                        },
                        Effect::Summarize(url),
                    )
                }
            }
            KeyCode::Backspace => {
                input.pop();
                (State::UrlInput { input }, Effect::Noop)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if input.chars().count() < URL_CHAR_LIMIT {
                    input.push(c);
                }
                (State::UrlInput { input }, Effect::Noop)
            }
            _ => (State::UrlInput { input }, Effect::Noop),
        },
        State::ResultDisplay {
            content,
            rendered,
            scroll,
        } => {
            let last = max_scroll(&rendered, viewport);
            let scroll = match key.code {
                KeyCode::Char('r') | KeyCode::Esc => return (State::default(), Effect::Noop),
                KeyCode::Up | KeyCode::Char('k') => scroll.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => scroll.saturating_add(1),
                KeyCode::PageUp => scroll.saturating_sub(PAGE),
                KeyCode::PageDown | KeyCode::Char(' ') => scroll.saturating_add(PAGE),
                KeyCode::Home | KeyCode::Char('g') => 0,
                KeyCode::End | KeyCode::Char('G') => last,
                _ => scroll,
            };
            (
                State::ResultDisplay {
                    content,
                    rendered,
                    scroll: scroll.min(last),
                },
                Effect::Noop,
            )
        }
        other => (other, Effect::Noop),
    }
}
