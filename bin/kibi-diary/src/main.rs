// SPDX-License-Identifier: AGPL-3.0-only
// Minimal bootstrap; all runtime logic & handlers reside in library modules.
use anyhow::Result;
use clap::{Parser, Subcommand};
use glyph::EmotionScores;
use kibi_diary::config::ServiceConfig;
use kibi_diary::http::routes::build_router;
use kibi_diary::state::AppState;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[command(name = "kibi-diary", about = "Kibi emotion diary runtime")]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the HTTP service.
    Serve,
    /// Compose one icon and print the SVG to stdout.
    Icon {
        /// JSON file holding an eight-field emotion score record; built-in
        /// demo scores are used when omitted.
        #[arg(long)]
        scores: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u32>,
        #[arg(long, default_value_t = 100)]
        width: u32,
        #[arg(long, default_value_t = 100)]
        height: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();
    let cli = Cli::parse();
    match cli.cmd.unwrap_or(Command::Serve) {
        Command::Serve => run_server().await,
        Command::Icon {
            scores,
            seed,
            width,
            height,
        } => render_icon_once(scores, seed, width, height),
    }
}

async fn run_server() -> Result<()> {
    let config = ServiceConfig::from_env()?;
    let state = AppState::shared(config.clone());
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "kibi diary service listening");
    axum::serve(listener, router).await?;
    Ok(())
}

fn render_icon_once(
    scores_path: Option<PathBuf>,
    seed: Option<u32>,
    width: u32,
    height: u32,
) -> Result<()> {
    let scores: EmotionScores = match scores_path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(&path)?)?,
        None => EmotionScores {
            joy: 0.8,
            trust: 0.4,
            surprise: 0.3,
            anticipation: 0.6,
            ..EmotionScores::default()
        },
    };
    let icon = glyph::generate_icon(&scores, seed)?;
    println!("{}", glyph::render_svg(&icon, width, height));
    Ok(())
}
