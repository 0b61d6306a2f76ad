//! Interactive dex session
//!
//! Keeps one in-memory collection alive for as long as the loop runs.
//! Nothing is persisted; exporting images is the only way to keep them.

use brainrot_protocol::Rarity;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::cli::RaritySelection;
use crate::client::GenerativeClient;
use crate::error::Result;
use crate::export::save_collection;
use crate::generator::{pack_message, BatchOutcome, BatchRequest, EnrichOutcome, Generator};
use crate::store::CollectionStore;
use crate::ui::{create_spinner, UI};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Generate,
    ModelSheet,
    Show,
    Export,
    ChooseRarity,
    Clear,
    Quit,
}

const ACTIONS: [Action; 7] = [
    Action::Generate,
    Action::ModelSheet,
    Action::Show,
    Action::Export,
    Action::ChooseRarity,
    Action::Clear,
    Action::Quit,
];

pub struct Session<C: GenerativeClient> {
    generator: Generator<C>,
    store: CollectionStore,
    ui: UI,
    batch_size: usize,
    rarity: Option<RaritySelection>,
    output_dir: PathBuf,
}

impl<C: GenerativeClient> Session<C> {
    pub fn new(generator: Generator<C>, batch_size: usize, output_dir: PathBuf) -> Self {
        Self {
            generator,
            store: CollectionStore::new(),
            ui: UI::new(),
            batch_size,
            rarity: None,
            output_dir,
        }
    }

    pub fn set_rarity(&mut self, rarity: Option<RaritySelection>) {
        self.rarity = rarity;
    }

    /// Menu loop; returns when the user quits
    pub async fn run(&mut self) -> Result<()> {
        let theme = ColorfulTheme::default();
        self.ui.header(&format!(
            "Brainrot Dex ({} profile)",
            self.generator.profile()
        ));

        loop {
            let labels: Vec<String> = ACTIONS.iter().map(|a| self.label(*a)).collect();
            let choice = Select::with_theme(&theme)
                .with_prompt("What now?")
                .items(&labels)
                .default(0)
                .interact()?;

            match ACTIONS[choice] {
                Action::Generate => {
                    self.generate_pack().await?;
                }
                Action::ModelSheet => self.pick_and_enrich(&theme).await?,
                Action::Show => self.ui.collection(&self.store.snapshot()),
                Action::Export => {
                    let dir: String = Input::with_theme(&theme)
                        .with_prompt("Export directory")
                        .default(self.output_dir.display().to_string())
                        .interact_text()?;
                    self.export(Path::new(&dir)).await?;
                }
                Action::ChooseRarity => self.choose_rarity(&theme)?,
                Action::Clear => {
                    let confirmed = Confirm::with_theme(&theme)
                        .with_prompt("Delete the whole collection? This cannot be undone")
                        .default(false)
                        .interact()?;
                    if confirmed {
                        self.store.clear();
                        self.ui.success("Collection cleared");
                    } else {
                        self.ui.info("Nothing was deleted");
                    }
                }
                Action::Quit => break,
            }
            self.ui.separator();
        }

        Ok(())
    }

    fn label(&self, action: Action) -> String {
        match action {
            Action::Generate => format!("Generate pack (x{})", self.batch_size),
            Action::ModelSheet => "Generate 3D model sheet".to_string(),
            Action::Show => format!("Show collection ({})", self.store.snapshot().len()),
            Action::Export => "Export images".to_string(),
            Action::ChooseRarity => format!("Rarity: {}", self.rarity_label()),
            Action::Clear => "Clear collection".to_string(),
            Action::Quit => "Quit".to_string(),
        }
    }

    fn rarity_label(&self) -> String {
        self.rarity
            .map(|r| r.to_string())
            .unwrap_or_else(|| "None".to_string())
    }

    /// Generate one pack and print the new cards
    async fn generate_pack(&self) -> Result<BatchOutcome> {
        let rarity = self.rarity.map(|s| s.resolve(&mut rand::thread_rng()));
        let request = BatchRequest::new(self.batch_size, rarity)?;

        let spinner = create_spinner(&pack_message(&request));
        let outcome = self.generator.generate_batch(&self.store, request).await;
        spinner.finish_and_clear();

        match &outcome {
            BatchOutcome::Committed { added, degraded } => {
                let snapshot = self.store.snapshot();
                for entry in snapshot.entries.iter().take(*added) {
                    self.ui.entry_card(entry);
                }
                if *degraded > 0 {
                    self.ui
                        .warning(&format!("{} images could not be generated", degraded));
                }
            }
            BatchOutcome::Failed { message } => self.ui.error(message),
            BatchOutcome::Busy => self.ui.info("A pack is already being generated"),
        }

        Ok(outcome)
    }

    async fn pick_and_enrich(&self, theme: &ColorfulTheme) -> Result<()> {
        let snapshot = self.store.snapshot();
        if snapshot.is_empty() {
            self.ui.info("Generate a pack first");
            return Ok(());
        }

        let labels: Vec<String> = snapshot
            .entries
            .iter()
            .map(|e| format!("#{}  {}", e.short_id(), e.name()))
            .collect();
        let choice = Select::with_theme(theme)
            .with_prompt("Which character?")
            .items(&labels)
            .default(0)
            .interact()?;

        self.enrich(snapshot.entries[choice].id()).await;
        Ok(())
    }

    async fn enrich(&self, id: Uuid) -> EnrichOutcome {
        let spinner = create_spinner("Drawing 3D model sheet...");
        let outcome = self.generator.enrich_with_model_sheet(&self.store, id).await;
        spinner.finish_and_clear();

        match outcome {
            EnrichOutcome::Attached => {
                if let Some(entry) = self.store.snapshot().find(id) {
                    self.ui.entry_card(entry);
                }
            }
            EnrichOutcome::Failed => self.ui.error("The 3D sheet could not be generated"),
            EnrichOutcome::NotFound => self.ui.warning("That character is gone"),
            EnrichOutcome::Busy => self.ui.info("That sheet is already being generated"),
        }
        outcome
    }

    async fn export(&self, dir: &Path) -> Result<usize> {
        let snapshot = self.store.snapshot();
        let written = save_collection(&snapshot.entries, dir).await?;
        if written.is_empty() {
            self.ui.info("No images to export");
        } else {
            self.ui.success(&format!(
                "Saved {} images to {}",
                written.len(),
                dir.display()
            ));
        }
        Ok(written.len())
    }

    fn choose_rarity(&mut self, theme: &ColorfulTheme) -> Result<()> {
        let options = rarity_options();
        let labels: Vec<String> = options
            .iter()
            .map(|o| o.map(|r| r.to_string()).unwrap_or_else(|| "None".to_string()))
            .collect();
        let current = options.iter().position(|o| *o == self.rarity).unwrap_or(0);

        let choice = Select::with_theme(theme)
            .with_prompt("Rarity for the next packs")
            .items(&labels)
            .default(current)
            .interact()?;

        self.rarity = options[choice];
        Ok(())
    }
}

/// None, Random, then every tier from Common to Mythic
fn rarity_options() -> Vec<Option<RaritySelection>> {
    let mut options = vec![None, Some(RaritySelection::Random)];
    options.extend(
        Rarity::ALL
            .iter()
            .map(|r| Some(RaritySelection::Fixed(*r))),
    );
    options
}
