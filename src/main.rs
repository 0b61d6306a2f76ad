use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod client;
mod config;
mod entry;
mod error;
mod export;
mod generator;
mod image;
mod prompts;
mod session;
mod store;
mod ui;
mod version;

#[cfg(test)]
mod tests;

use cli::{CliHandler, RaritySelection};
use prompts::PromptProfile;
use version::CURRENT_VERSION;

#[derive(Parser)]
#[command(
    name = "brainrot",
    about = "Brainrot Dex - generate and collect AI-made meme characters",
    long_about = "Brainrot Dex - generate, collect and export AI-made brainrot meme characters

OVERVIEW:
  Each pack asks the Gemini API for a handful of brand-new meme characters
  (name, lore, visual prompt) and then draws card art for every one of them.
  Characters can also get an isometric 3D reference sheet on demand.

SETUP:
  export BRAINROT_API_KEY=<your Gemini API key>   # GEMINI_API_KEY also works

QUICK START:
  brainrot generate                     # One pack with the configured size
  brainrot generate -n 5 -r legendary   # Five legendary characters
  brainrot generate --sheets -o ./out   # Add 3D sheets and save every image
  brainrot session                      # Interactive dex for this session
  brainrot config show                  # Show current settings",
    version = CURRENT_VERSION,
    author = "Brainrot Dex Team",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one pack of characters
    #[command(aliases = &["gen"])]
    Generate(GenerateArgs),

    /// Interactive session: generate, enrich, export and clear
    #[command(aliases = &["play"])]
    Session(SessionArgs),

    /// Show configuration and API key status
    #[command(aliases = &["st"])]
    Status,

    /// Configure settings
    #[command(aliases = &["cfg"])]
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Number of characters in the pack
    #[arg(short = 'n', long = "count")]
    pub count: Option<usize>,

    /// Rarity tier stamped on the pack, or "random"
    #[arg(short, long)]
    pub rarity: Option<RaritySelection>,

    #[arg(short, long, value_enum)]
    pub profile: Option<PromptProfile>,

    /// Also generate a 3D model sheet for every new character
    #[arg(long)]
    pub sheets: bool,

    /// Directory to save images into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print entries as JSON instead of cards
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SessionArgs {
    #[arg(short, long, value_enum)]
    pub profile: Option<PromptProfile>,

    /// Rarity selection to start with, or "random"
    #[arg(short, long)]
    pub rarity: Option<RaritySelection>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    SetTextModel { model: String },
    SetImageModel { model: String },
    SetTemperature { value: f32 },
    SetBatchSize { size: usize },
    SetTimeout { seconds: u64 },
    SetProfile {
        #[arg(value_enum)]
        profile: PromptProfile,
    },
    SetOutputDir { path: PathBuf },
    Reset,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(format!("brainrot={}", log_level))
        .with_writer(std::io::stderr);
    subscriber.init();

    let mut handler = CliHandler::with_config_path(cli.config);

    if let Err(e) = handler.execute(cli.command).await {
        tracing::debug!(code = %e.code(), retryable = e.is_retryable(), "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
