use crate::agent::validate_model;
use crate::render;
use crate::web::templates;
use crate::web::AppState;
use axum::{
    extract::{Form, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const SAMPLE_SUMMARY: &str = r#"# Building Reliable Systems: Talk Overview

## Summary

The speaker walks through how small teams keep production services **boring**:
clear ownership, fast rollbacks, and observability that answers questions
instead of producing noise.

## Key Sections

1. **Ownership** (02:10) - every service has exactly one on-call rotation
2. **Deployments** (11:45) - ship small, roll back in under a minute
3. **Observability** (24:30) - structured logs first, dashboards second

| Practice | Effort | Payoff |
|---|---|---|
| Feature flags | Low | High |
| Canary deploys | Medium | High |

## Critique

- Strong on process, light on ~~tooling~~ concrete tooling choices
- The incident case study is the most valuable part

> Reliability is a feature, and it is prioritised like one.

## Further Reading

- [Site Reliability Engineering](https://sre.google/books/)
- [The Twelve-Factor App](https://12factor.net/)
"#;

#[derive(Debug, Deserialize)]
pub struct SummarizeForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub model: String,
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let (model, api_version) = state.summarizer.model_info();
    Html(templates::index(model, api_version))
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SummarizeForm>,
) -> Response {
    let url = form.url.trim();
    if url.is_empty() {
        return (StatusCode::BAD_REQUEST, "URL is required").into_response();
    }

    let model = match form.model.trim() {
        "" => state.summarizer.config().agent.model.clone(),
        m => m.to_string(),
    };
    if let Err(e) = validate_model(&model) {
        warn!(%url, "rejected model: {}", e);
        return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
    }
    info!(%url, %model, "summarize request");

    let content = match state.summarizer.summarize_with_model(url, &model).await {
        Ok(markdown) => render::markdown_to_html_or_raw(&markdown),
        Err(e) => {
            warn!(%url, %model, "summarize failed: {}", e);
            templates::error_block(url, &model, &e.to_string())
        }
    };

    Html(templates::summary_page(url, &content)).into_response()
}

/// Sample document through the same pipeline, for checking page styling
pub async fn test_summary() -> Html<String> {
    let content = render::markdown_to_html_or_raw(SAMPLE_SUMMARY);
    Html(templates::summary_page("sample summary", &content))
}

pub async fn health() -> &'static str {
    "OK"
}

/// Content type for a static file, with an explicit fallback for scripts
pub fn mime_type_for(path: &FsPath) -> String {
    if let Some(mime) = mime_guess::from_path(path).first() {
        return mime.to_string();
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

/// Resolve `requested` under `root`, refusing anything that escapes it
fn resolve_static(root: &FsPath, requested: &str) -> Option<PathBuf> {
    let relative = FsPath::new(requested);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

pub async fn static_file(State(state): State<Arc<AppState>>, Path(path): Path<String>) -> Response {
    let Some(full_path) = resolve_static(&state.static_dir, &path) else {
        warn!(%path, "rejected static path");
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&full_path).await {
        Ok(bytes) => {
            let mime = mime_type_for(&full_path);
            debug!(path = %full_path.display(), %mime, "serving static file");
            ([(header::CONTENT_TYPE, mime)], bytes).into_response()
        }
        Err(e) => {
            debug!(path = %full_path.display(), "static file unavailable: {}", e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
