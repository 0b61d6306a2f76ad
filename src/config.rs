//! Configuration management for the brainrot CLI
//!
//! Settings are layered: built-in defaults, then the JSON settings file, then
//! `BRAINROT_*` environment variables. The API key is read from the
//! environment (or a hand-edited settings file) and never written back.

use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;
use validator::Validate;

use crate::error::{BrainrotError, Result};
use crate::prompts::PromptProfile;
use crate::ui::UI;
use crate::{ConfigArgs, ConfigCommand};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_BATCH_SIZE: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variables consulted for the API key after `BRAINROT_API_KEY`
const API_KEY_FALLBACK_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[validate(url(message = "Base URL must be a valid absolute URL"))]
    pub base_url: String,
    #[validate(length(min = 1, message = "Text model cannot be empty"))]
    pub text_model: String,
    #[validate(length(min = 1, message = "Image model cannot be empty"))]
    pub image_model: String,
    /// Overrides the profile's sampling temperature when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 2.0, message = "Temperature must be between 0.0 and 2.0"))]
    pub temperature: Option<f32>,
    #[validate(range(min = 1, max = 8, message = "Batch size must be between 1 and 8"))]
    pub batch_size: usize,
    #[validate(range(min = 1, message = "Timeout must be at least one second"))]
    pub timeout: u64,
    pub use_proxy: bool,
    pub profile: PromptProfile,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            temperature: None,
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: DEFAULT_TIMEOUT_SECS,
            use_proxy: true,
            profile: PromptProfile::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load from the default settings file location
    pub async fn load() -> Result<Self> {
        Self::load_from(&default_config_path()).await
    }

    /// Load from an explicit settings file, falling back to defaults when it
    /// does not exist yet
    pub async fn load_from(config_path: &Path) -> Result<Self> {
        let config = Self::from_file_and_env(Some(config_path))?.with_env_api_key();
        config.validate()?;
        Ok(config)
    }

    /// Load for the `config` subcommands. Values are not validated so a bad
    /// file can still be repaired; an unreadable file falls back to defaults.
    pub fn load_for_edit(config_path: &Path) -> Self {
        let config = match Self::from_file_and_env(Some(config_path)) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "unreadable settings file, using defaults");
                Self::default()
            }
        };
        config.with_env_api_key()
    }

    fn with_env_api_key(mut self) -> Self {
        if self.api_key.as_deref().map_or(true, str::is_empty) {
            self.api_key = api_key_from_env();
        }
        self
    }

    pub fn from_file_and_env(config_file: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("text_model", defaults.text_model)?
            .set_default("image_model", defaults.image_model)?
            .set_default("batch_size", defaults.batch_size as u64)?
            .set_default("timeout", defaults.timeout)?
            .set_default("use_proxy", defaults.use_proxy)?
            .set_default("profile", defaults.profile.as_str())?
            .set_default(
                "output_dir",
                defaults.output_dir.to_string_lossy().to_string(),
            )?;

        if let Some(path) = config_file {
            if path.exists() {
                builder = builder.add_source(File::from(path).format(FileFormat::Json));
            }
        }
        builder = builder.add_source(Environment::with_prefix("BRAINROT").try_parsing(true));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub async fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    /// API key, or a missing-config error naming the variables to set
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                BrainrotError::missing_config(
                    "No API key found. Set BRAINROT_API_KEY (or GEMINI_API_KEY).",
                )
            })
    }

    pub fn has_api_key(&self) -> bool {
        self.require_api_key().is_ok()
    }

    /// Full generateContent URL for a model
    pub fn endpoint_url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Sampling temperature for structured text generation
    pub fn temperature_for(&self, profile: PromptProfile) -> f32 {
        self.temperature
            .unwrap_or_else(|| profile.default_temperature())
    }
}

fn api_key_from_env() -> Option<String> {
    API_KEY_FALLBACK_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
}

pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brainrot-dex")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

pub fn default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brainrot-dex")
}

/// Handles `brainrot config ...`
pub struct ConfigService {
    config: Config,
    config_path: PathBuf,
    ui: UI,
}

impl ConfigService {
    pub fn with_config_path(config: Config, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            ui: UI::new(),
        }
    }

    pub async fn handle_config(&mut self, args: ConfigArgs) -> Result<()> {
        match args.command {
            ConfigCommand::Show => {
                self.show();
                return Ok(());
            }
            ConfigCommand::SetTextModel { model } => {
                self.config.text_model = model;
            }
            ConfigCommand::SetImageModel { model } => {
                self.config.image_model = model;
            }
            ConfigCommand::SetTemperature { value } => {
                self.config.temperature = Some(value);
            }
            ConfigCommand::SetBatchSize { size } => {
                self.config.batch_size = size;
            }
            ConfigCommand::SetTimeout { seconds } => {
                self.config.timeout = seconds;
            }
            ConfigCommand::SetProfile { profile } => {
                self.config.profile = profile;
            }
            ConfigCommand::SetOutputDir { path } => {
                self.config.output_dir = path;
            }
            ConfigCommand::Reset => {
                let api_key = self.config.api_key.take();
                self.config = Config {
                    api_key,
                    ..Config::default()
                };
            }
        }

        self.config.validate()?;
        self.config.save(&self.config_path).await?;
        self.ui
            .success(&format!("Configuration saved to {}", self.config_path.display()));
        Ok(())
    }

    fn show(&self) {
        let temperature = match self.config.temperature {
            Some(t) => format!("{:.2}", t),
            None => format!(
                "{:.2} (profile default)",
                self.config.profile.default_temperature()
            ),
        };

        self.ui.card(
            "Configuration",
            vec![
                ("File", self.config_path.display().to_string()),
                ("Endpoint", self.config.base_url.clone()),
                ("Text model", self.config.text_model.clone()),
                ("Image model", self.config.image_model.clone()),
                ("Profile", self.config.profile.to_string()),
                ("Temperature", temperature),
                ("Batch size", self.config.batch_size.to_string()),
                ("Timeout", format!("{}s", self.config.timeout)),
                ("Output dir", self.config.output_dir.display().to_string()),
                ("API key", self.ui.format_api_key_status(self.config.has_api_key())),
            ],
        );
    }
}
