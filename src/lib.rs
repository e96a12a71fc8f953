//! # Vidsumma
//!
//! Summarise online videos with Gemini, from a TUI or a small web page.
//!
//! ## Features
//!
//! - **One façade**: every front-end goes through [`Summarizer`]
//! - **Swappable provider**: the Gemini client sits behind [`GenerationProvider`]
//! - **Two presentations**: ratatui terminal UI and an axum web server

pub mod agent;
pub mod config;
pub mod gemini;
pub mod render;
pub mod summary;
pub mod ui;
pub mod web;

pub use agent::{AgentError, Summarizer};
pub use config::Config;
pub use gemini::{GeminiClient, GenerationProvider};
pub use summary::{Summary, SummaryRequest};
