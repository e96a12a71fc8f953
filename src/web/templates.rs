//! HTML pages for the web front-end.

use crate::render::escape_html;

/// Model choices offered on the form; the empty value means "configured default"
pub const MODEL_CHOICES: [(&str, &str); 4] = [
    ("", "Default"),
    ("gemini-2.5-pro", "Gemini 2.5 Pro"),
    ("gemini-2.5-flash", "Gemini 2.5 Flash"),
    ("gemini-2.0-flash", "Gemini 2.0 Flash"),
];

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css" />
<script src="/static/reader.js" defer="defer"></script>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}

/// The URL input form
pub fn index(model: &str, api_version: &str) -> String {
    let options: String = MODEL_CHOICES
        .iter()
        .map(|(value, label)| format!(r#"<option value="{}">{}</option>"#, value, label))
        .collect::<Vec<_>>()
        .join("\n        ");

    let body = format!(
        r#"<main class="container">
  <h1>Video Summariser</h1>
  <form method="post" action="/summarize" class="summarize-form">
    <label for="url">Video URL</label>
    <input id="url" name="url" type="url" required="required" placeholder="https://www.youtube.com/watch?v=..." />
    <label for="model">Model</label>
    <select id="model" name="model">
        {options}
    </select>
    <button type="submit">Summarise</button>
  </form>
  <footer>Default model <code>{model}</code> · API <code>{api_version}</code></footer>
</main>"#,
        options = options,
        model = escape_html(model),
        api_version = escape_html(api_version),
    );
    layout("Video Summariser", &body)
}

/// A rendered summary, or an inline error, wrapped with the reader controls
pub fn summary_page(source: &str, content_html: &str) -> String {
    let body = format!(
        r#"<div id="reading-progress" class="reading-progress"></div>
<main class="container">
  <nav class="reader-controls">
    <a href="/">&larr; New summary</a>
    <span class="spacer"></span>
    <button type="button" id="bionic-toggle" aria-pressed="false">Enable Bionic Reading</button>
    <button type="button" data-font-step="-1" aria-label="Smaller text">A&minus;</button>
    <button type="button" data-font-step="1" aria-label="Larger text">A+</button>
  </nav>
  <p class="reading-stats">
    <span id="word-count"></span>
    <span id="reading-time"></span>
    <span id="progress-percent"></span>
    <span id="time-remaining"></span>
  </p>
  <p class="source">{source}</p>
  <article id="summary" class="summary">
{content}
  </article>
</main>"#,
        source = escape_html(source),
        content = content_html,
    );
    layout("Summary", &body)
}

/// Inline error block shown in place of a summary
pub fn error_block(url: &str, model: &str, message: &str) -> String {
    format!(
        r#"<div class="error"><p>Error generating summary for URL: {} using model {}</p><pre>{}</pre></div>"#,
        escape_html(url),
        escape_html(model),
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lists_models_and_escapes_info() {
        let page = index("<m>", "v1beta");
        assert!(page.contains(r#"<option value="gemini-2.5-flash">"#));
        assert!(page.contains("&lt;m&gt;"));
        assert!(page.contains(r#"action="/summarize""#));
    }

    #[test]
    fn summary_page_has_reader_controls_and_stats() {
        let page = summary_page("https://youtu.be/<x>", "<p>hi</p>");
        assert!(page.contains(r#"<article id="summary" class="summary">"#));
        assert!(page.contains("<p>hi</p>"));
        assert!(page.contains("https://youtu.be/&lt;x&gt;"));
        assert!(page.contains(r#"id="bionic-toggle""#));
        assert!(page.contains(r#"data-font-step="1""#));
        for id in ["word-count", "reading-time", "progress-percent", "time-remaining"] {
            assert!(page.contains(&format!(r#"<span id="{}">"#, id)), "missing {}", id);
        }
    }

    #[test]
    fn error_block_escapes_message() {
        let block = error_block("https://x", "m", "<oops>");
        assert!(block.contains("&lt;oops&gt;"));
        assert!(!block.contains("<oops>"));
    }
}
