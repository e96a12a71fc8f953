//! Markdown rendering for the two front-ends.
//!
//! HTML for the browser (GFM extensions, hard line wraps, XHTML-style void
//! tags) and styled ratatui [`Text`] for the terminal.

use pulldown_cmark::{html, Event, Options, Parser};
use ratatui::text::{Line, Span, Text};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write HTML: {0}")]
    Html(#[from] std::fmt::Error),
}

fn gfm_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Convert markdown to an HTML fragment.
///
/// Soft breaks become `<br />` and raw HTML in the input is escaped rather
/// than passed through.
pub fn markdown_to_html(markdown: &str) -> Result<String, RenderError> {
    let parser = Parser::new_ext(markdown, gfm_options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::write_html_fmt(&mut out, parser)?;
    Ok(out)
}

/// Like [`markdown_to_html`], falling back to the escaped source on failure
pub fn markdown_to_html_or_raw(markdown: &str) -> String {
    html_or_raw(markdown, markdown_to_html(markdown))
}

fn html_or_raw(markdown: &str, rendered: Result<String, RenderError>) -> String {
    match rendered {
        Ok(html) => html,
        Err(e) => {
            warn!("markdown rendering failed, showing raw text: {}", e);
            format!("<pre>{}</pre>", escape_html(markdown))
        }
    }
}

/// Escape text for HTML content or a quoted attribute value
pub fn escape_html(input: &str) -> String {
    html_escape::encode_quoted_attribute(input).into_owned()
}

/// Convert markdown into styled lines for a terminal viewport.
///
/// The parsed `Text` borrows from `markdown`, so spans are copied out to
/// let the result outlive the source string.
pub fn markdown_to_text(markdown: &str) -> Text<'static> {
    let parsed = tui_markdown::from_str(markdown);

    let mut lines: Vec<Line<'static>> = parsed.lines.into_iter().map(owned_line).collect();
    while lines.last().is_some_and(|l| l.spans.iter().all(|s| s.content.trim().is_empty())) {
        lines.pop();
    }

    let mut text = Text::from(lines).style(parsed.style);
    text.alignment = parsed.alignment;
    text
}

fn owned_line(line: Line<'_>) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans
        .into_iter()
        .map(|span| Span::styled(span.content.into_owned(), span.style))
        .collect();
    let mut owned = Line::from(spans).style(line.style);
    owned.alignment = line.alignment;
    owned
}
