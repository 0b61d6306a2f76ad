use brainrot_protocol::{ParseRarityError, Rarity};
use rand::Rng;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

use crate::client::GeminiClient;
use crate::config::{default_config_path, Config, ConfigService};
use crate::error::{BrainrotError, Result};
use crate::export::save_collection;
use crate::generator::{pack_message, BatchOutcome, BatchRequest, EnrichOutcome, Generator};
use crate::session::Session;
use crate::store::CollectionStore;
use crate::ui::{create_spinner, UI};
use crate::version::format_version_info;
use crate::{Commands, ConfigArgs, GenerateArgs, SessionArgs};

/// How the rarity of the next batch is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaritySelection {
    Fixed(Rarity),
    Random,
}

impl RaritySelection {
    /// Concrete tier for one batch
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Rarity {
        match self {
            RaritySelection::Fixed(rarity) => *rarity,
            RaritySelection::Random => Rarity::roll(rng),
        }
    }
}

impl FromStr for RaritySelection {
    type Err = ParseRarityError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("random") {
            Ok(RaritySelection::Random)
        } else {
            s.parse().map(RaritySelection::Fixed)
        }
    }
}

impl fmt::Display for RaritySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaritySelection::Fixed(rarity) => write!(f, "{}", rarity),
            RaritySelection::Random => f.write_str("Random"),
        }
    }
}

/// CLI handler for processing commands
pub struct CliHandler {
    config_path: Option<PathBuf>,
    ui: UI,
}

impl CliHandler {
    /// Create a new CLI handler with a custom config path
    pub fn with_config_path(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            ui: UI::new(),
        }
    }

    /// Load configuration using the handler's config path
    async fn load_config(&self) -> Result<Config> {
        if let Some(path) = &self.config_path {
            Config::load_from(path).await
        } else {
            Config::load().await
        }
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Generate(args) => self.handle_generate(args).await,
            Commands::Session(args) => self.handle_session(args).await,
            Commands::Status => self.handle_status().await,
            Commands::Config(args) => self.handle_config(args).await,
        }
    }

    /// Handle generate command: one batch, optional sheets, print, export
    async fn handle_generate(&mut self, args: GenerateArgs) -> Result<()> {
        let config = self.load_config().await?;
        let profile = args.profile.unwrap_or(config.profile);
        let size = args.count.unwrap_or(config.batch_size);
        let rarity = args.rarity.map(|s| s.resolve(&mut rand::thread_rng()));
        let request = BatchRequest::new(size, rarity)?;

        let client = GeminiClient::new(config.clone())?;
        let generator = Generator::new(client, &config, profile);
        let store = CollectionStore::new();

        let spinner = create_spinner(&pack_message(&request));
        let outcome = generator.generate_batch(&store, request).await;
        spinner.finish_and_clear();

        match outcome {
            BatchOutcome::Committed { added, degraded } => {
                if degraded > 0 {
                    self.ui.warning(&format!(
                        "{} of {} images could not be generated",
                        degraded, added
                    ));
                }
            }
            BatchOutcome::Failed { message } => {
                return Err(BrainrotError::no_concepts(message));
            }
            BatchOutcome::Busy => {
                return Err(BrainrotError::internal("a batch is already in flight"));
            }
        }

        if args.sheets {
            let ids: Vec<Uuid> = store.snapshot().entries.iter().map(|e| e.id()).collect();
            let spinner = create_spinner(&format!("Drawing {} 3D sheets...", ids.len()));
            let outcomes = generator.enrich_many(&store, &ids).await;
            spinner.finish_and_clear();

            let failed = outcomes
                .iter()
                .filter(|o| **o != EnrichOutcome::Attached)
                .count();
            if failed > 0 {
                self.ui
                    .warning(&format!("{} 3D sheets could not be generated", failed));
            }
        }

        let state = store.snapshot();
        if args.json {
            println!("{}", serde_json::to_string_pretty(&state.entries)?);
        } else {
            self.ui.collection(&state);
        }

        if let Some(dir) = args.output {
            self.ui.blank_line();
            let written = save_collection(&state.entries, &dir).await?;
            self.ui.success(&format!(
                "Saved {} images to {}",
                written.len(),
                dir.display()
            ));
        }

        Ok(())
    }

    /// Handle session command
    async fn handle_session(&mut self, args: SessionArgs) -> Result<()> {
        let config = self.load_config().await?;
        let profile = args.profile.unwrap_or(config.profile);
        let client = GeminiClient::new(config.clone())?;
        let generator = Generator::new(client, &config, profile);

        let mut session = Session::new(generator, config.batch_size, config.output_dir.clone());
        session.set_rarity(args.rarity);
        session.run().await
    }

    /// Handle status command
    async fn handle_status(&mut self) -> Result<()> {
        let config = self.load_config().await?;

        self.ui.card(
            "Status",
            vec![
                ("Version", format_version_info()),
                ("API key", self.ui.format_api_key_status(config.has_api_key())),
                ("Endpoint", config.base_url.clone()),
                ("Text model", config.text_model.clone()),
                ("Image model", config.image_model.clone()),
                ("Profile", config.profile.to_string()),
                ("Pack size", config.batch_size.to_string()),
            ],
        );

        if !config.has_api_key() {
            self.ui
                .warning("Set BRAINROT_API_KEY (or GEMINI_API_KEY) before generating.");
        }
        Ok(())
    }

    /// Handle config command
    async fn handle_config(&mut self, args: ConfigArgs) -> Result<()> {
        let path = self
            .config_path
            .clone()
            .unwrap_or_else(default_config_path);
        let config = Config::load_for_edit(&path);
        let mut service = ConfigService::with_config_path(config, path);
        service.handle_config(args).await
    }
}
