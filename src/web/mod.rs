//! Web front-end built on axum.
//!
//! Stateless handlers over a shared [`AppState`]; generation failures are
//! rendered inline with a 200, malformed requests get 4xx statuses.

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod state;
pub mod templates;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/summarize", post(handlers::summarize))
        .route("/test-summary", get(handlers::test_summary))
        .route("/health", get(handlers::health))
        .route("/static/*path", get(handlers::static_file))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve on all interfaces at `port` until Ctrl+C
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let static_dir = state.static_dir.clone();
    let app = create_app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, static_dir = %static_dir.display(), "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tests::FakeProvider;
    use crate::agent::Summarizer;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use std::io::Write;
    use tower::ServiceExt;

    fn app_with(provider: Arc<FakeProvider>, static_dir: &std::path::Path) -> Router {
        let mut config = Config::default();
        config.server.static_dir = static_dir.to_path_buf();
        create_app(AppState::new(Summarizer::with_provider(config, provider)))
    }

    fn form(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/summarize")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = app_with(FakeProvider::ok(""), std::path::Path::new("static"));
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn index_renders_form() {
        let app = app_with(FakeProvider::ok(""), std::path::Path::new("static"));
        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(r#"name="url""#));
    }

    #[tokio::test]
    async fn empty_url_is_rejected_without_calling_provider() {
        let provider = FakeProvider::ok("unused");
        for body in ["url=", "url=+++&model=gemini-2.5-pro", "model=x"] {
            let app = app_with(provider.clone(), std::path::Path::new("static"));
            let response = app.oneshot(form(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn summary_is_rendered_as_html() {
        let provider = FakeProvider::ok("# Heading\n\n- point");
        let app = app_with(provider.clone(), std::path::Path::new("static"));

        let response = app
            .oneshot(form("url=https%3A%2F%2Fyoutu.be%2Fabc&model=gemini-2.5-flash"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("<h1>Heading</h1>"), "{}", html);
        assert!(html.contains("<li>point</li>"));

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].url, "https://youtu.be/abc");
        assert_eq!(calls[0].model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn generation_failure_is_rendered_inline() {
        let app = app_with(FakeProvider::failing("quota <exceeded>"), std::path::Path::new("static"));

        let response = app
            .oneshot(form("url=https%3A%2F%2Fyoutu.be%2Fabc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Error generating summary for URL: https://youtu.be/abc"));
        assert!(html.contains("quota &lt;exceeded&gt;"));
    }

    #[tokio::test]
    async fn path_like_model_is_rejected_without_calling_provider() {
        let provider = FakeProvider::ok("unused");
        for body in [
            "url=https%3A%2F%2Fyoutu.be%2Fabc&model=..%2F..%2Fv1beta%2Ffiles%23",
            "url=https%3A%2F%2Fyoutu.be%2Fabc&model=gemini%3Fkey%3Dx",
        ] {
            let app = app_with(provider.clone(), std::path::Path::new("static"));
            let response = app.oneshot(form(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
            assert!(body_text(response).await.contains("invalid model identifier"));
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn non_form_body_is_a_client_error() {
        let provider = FakeProvider::ok("unused");
        let app = app_with(provider.clone(), std::path::Path::new("static"));
        let request = Request::builder()
            .method("POST")
            .uri("/summarize")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"url":"https://youtu.be/abc"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(
            response.status().is_client_error(),
            "status {}",
            response.status()
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn summary_page_carries_reader_controls() {
        let app = app_with(FakeProvider::ok("one two three"), std::path::Path::new("static"));
        let response = app
            .oneshot(form("url=https%3A%2F%2Fyoutu.be%2Fabc"))
            .await
            .unwrap();

        let html = body_text(response).await;
        for id in [
            r#"id="bionic-toggle""#,
            r#"id="word-count""#,
            r#"id="reading-time""#,
            r#"id="progress-percent""#,
            r#"id="time-remaining""#,
        ] {
            assert!(html.contains(id), "missing {}", id);
        }
    }

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        let app = app_with(FakeProvider::ok(""), std::path::Path::new("static"));
        let response = app.oneshot(get("/summarize")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_summary_page_renders_sample() {
        let app = app_with(FakeProvider::ok(""), std::path::Path::new("static"));
        let response = app.oneshot(get("/test-summary")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<h2>Further Reading</h2>"));
    }

    #[tokio::test]
    async fn static_files_are_served_with_mime_types() {
        let dir = tempfile::tempdir().unwrap();
        let mut css = std::fs::File::create(dir.path().join("style.css")).unwrap();
        writeln!(css, "body {{ margin: 0; }}").unwrap();

        let app = app_with(FakeProvider::ok(""), dir.path());
        let response = app.clone().oneshot(get("/static/style.css")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

        let missing = app.clone().oneshot(get("/static/missing.js")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let escaped = app.oneshot(get("/static/../Cargo.toml")).await.unwrap();
        assert_eq!(escaped.status(), StatusCode::NOT_FOUND);
    }
}
