//! TUI front-end using ratatui.
//!
//! The event loop multiplexes terminal input, a spinner tick, and completion
//! of the in-flight summary call, feeding each into [`app::transition`].

pub mod app;
pub mod view;

use crate::agent::{AgentError, Summarizer};
use app::{Effect, Event, State, Viewport};
use crossterm::event::{Event as TermEvent, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Run the interactive UI until the user quits
pub async fn run(summarizer: Summarizer) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, summarizer).await;
    ratatui::restore();
    result
}

async fn event_loop(terminal: &mut DefaultTerminal, summarizer: Summarizer) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut input = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);
    let mut state = State::default();
    let size = terminal.size()?;
    let mut viewport = Viewport::for_terminal(size.width, size.height);

    loop {
        terminal.draw(|frame| view::draw(frame, &state))?;

        let event = tokio::select! {
            next = input.next() => match next {
                Some(Ok(TermEvent::Key(key))) => Event::Key(key),
                Some(Ok(TermEvent::Resize(width, height))) => {
                    viewport = Viewport::for_terminal(width, height);
                    Event::Resize
                }
                // Focus, mouse and paste events only need a redraw
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(result) = rx.recv() => Event::Completed(result),
            _ = ticker.tick() => Event::Tick,
        };

        let (next, effect) = app::transition(state, event, viewport);
        state = next;

        if let Effect::Summarize(url) = effect {
            spawn_summary(summarizer.clone(), url, tx.clone());
        }

        if state == State::Exit {
            break;
        }
    }

    Ok(())
}

/// Summarise `url` off the event loop and report the outcome on `tx`
fn spawn_summary(
    summarizer: Summarizer,
    url: String,
    tx: UnboundedSender<Result<String, AgentError>>,
) -> JoinHandle<()> {
    debug!(%url, "spawning summary request");
    tokio::spawn(async move {
        let result = summarizer.summarize(&url).await;
        // The receiver is gone only if the UI already exited.
        let _ = tx.send(result);
    })
}
