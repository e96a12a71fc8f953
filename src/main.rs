//! Vidsumma CLI - video summarisation with Gemini
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;
use vidsumma::{ui, web, AgentError, Config, Summarizer};

#[derive(Parser)]
#[command(name = "vidsumma")]
#[command(author, version, about = "Summarise videos with Gemini from a TUI or a web page", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a video URL from standard input and print its summary
    Prompt,
    /// Summarise a video by URL
    Summarise {
        /// URL of the video
        url: String,
        /// Model to use instead of the configured one
        #[arg(long)]
        model: Option<String>,
    },
    /// Start the web front-end
    Serve {
        /// Listen port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show the effective model and API version
    Info,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Prompt) => {
            init_tracing("vidsumma=warn");
            let config = Config::load()?;

            println!("Paste a video URL to summarise:");
            io::stdout().flush()?;
            let mut url = String::new();
            io::stdin().lock().read_line(&mut url)?;

            let text = exit_on_error(summarise(config, url.trim(), None).await);
            println!("{}", "Generated content:".bold());
            println!("{}", text);
        }
        Some(Commands::Summarise { url, model }) => {
            init_tracing("vidsumma=warn");
            let config = Config::load()?;
            let text = exit_on_error(summarise(config, &url, model.as_deref()).await);
            println!("{}", text);
        }
        Some(Commands::Serve { port }) => {
            init_tracing("vidsumma=info,tower_http=info");
            let config = Config::load()?;
            let port = port.unwrap_or(config.server.port);
            let summarizer = Summarizer::from_config(config)?;
            web::serve(web::AppState::new(summarizer), port).await?;
        }
        Some(Commands::Info) => {
            init_tracing("vidsumma=warn");
            let config = Config::load()?;
            println!("Model:       {}", config.agent.model.cyan());
            println!("API version: {}", config.agent.api_version.cyan());
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "vidsumma", &mut io::stdout());
        }
        None => {
            // Default: Launch the TUI. No log subscriber, stderr would corrupt the screen.
            let config = Config::load()?;
            ui::run(Summarizer::from_config(config)?).await?;
        }
    }

    Ok(())
}

async fn summarise(config: Config, url: &str, model: Option<&str>) -> Result<String, AgentError> {
    let summarizer = Summarizer::from_config(config)?;
    match model {
        Some(model) => summarizer.summarize_with_model(url, model).await,
        None => summarizer.summarize(url).await,
    }
}

/// Print generation failures the way scripts expect and exit with status 1
fn exit_on_error(result: Result<String, AgentError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{} {}", "Error generating content:".red(), e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
