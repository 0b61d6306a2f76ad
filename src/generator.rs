//! Batch generation and model-sheet enrichment
//!
//! [`Generator`] drives the generative service and writes the results into a
//! [`CollectionStore`]. Its public operations never return errors: a failed
//! concept request becomes the session's error message, a failed image
//! becomes an empty image on its entry, and a failed model sheet just clears
//! the entry's loading flag.

use brainrot_protocol::api::{GenerateContentRequest, GenerationConfig};
use brainrot_protocol::{Concept, Rarity};
use futures_util::future::join_all;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::client::GenerativeClient;
use crate::config::Config;
use crate::entry::{Entry, EntryPatch};
use crate::error::{BrainrotError, Result};
use crate::image::{extract_inline_image, InlineImage};
use crate::prompts::{model_sheet_prompt, PromptProfile, CONCEPT_SYSTEM_PROMPT};
use crate::store::CollectionStore;

/// Message placed in the session error slot when a whole batch fails
pub const BATCH_FAILURE_MESSAGE: &str = "Algo explotó en la fábrica de memes. Intenta de nuevo.";

/// A validated batch request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct BatchRequest {
    #[validate(range(min = 1, max = 8, message = "Batch size must be between 1 and 8"))]
    size: usize,
    rarity: Option<Rarity>,
}

impl BatchRequest {
    pub fn new(size: usize, rarity: Option<Rarity>) -> Result<Self> {
        let request = Self { size, rarity };
        request.validate()?;
        Ok(request)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rarity(&self) -> Option<Rarity> {
        self.rarity
    }
}

/// Spinner text for a batch in flight
pub fn pack_message(request: &BatchRequest) -> String {
    match request.rarity() {
        Some(rarity) => format!("Cooking x{} {}...", request.size(), rarity),
        None => format!("Cooking x{}...", request.size()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Batch prepended; `degraded` entries have no image
    Committed { added: usize, degraded: usize },
    /// Nothing was added; the session error slot holds `message`
    Failed { message: String },
    /// Another batch is still in flight
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichOutcome {
    Attached,
    Failed,
    NotFound,
    /// A sheet for this entry is already being generated
    Busy,
}

pub struct Generator<C: GenerativeClient> {
    client: C,
    profile: PromptProfile,
    text_model: String,
    image_model: String,
    temperature: f32,
}

impl<C: GenerativeClient> Generator<C> {
    pub fn new(client: C, config: &Config, profile: PromptProfile) -> Self {
        Self {
            client,
            profile,
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            temperature: config.temperature_for(profile),
        }
    }

    pub fn profile(&self) -> PromptProfile {
        self.profile
    }

    /// Generate one batch and prepend it to the collection
    pub async fn generate_batch(
        &self,
        store: &CollectionStore,
        request: BatchRequest,
    ) -> BatchOutcome {
        if !store.begin_batch() {
            debug!("batch requested while another is in flight");
            return BatchOutcome::Busy;
        }

        let concepts = match self.request_concepts(request).await {
            Ok(concepts) => concepts,
            Err(e) => {
                error!(error = %e, retryable = e.is_retryable(), "concept generation failed");
                store.fail_batch(BATCH_FAILURE_MESSAGE);
                return BatchOutcome::Failed {
                    message: BATCH_FAILURE_MESSAGE.to_string(),
                };
            }
        };

        let images = join_all(
            concepts
                .iter()
                .map(|concept| self.render_card(concept, request.rarity)),
        )
        .await;

        let entries: Vec<Entry> = concepts
            .into_iter()
            .zip(images)
            .map(|(concept, image)| Entry::from_concept(concept, image, request.rarity))
            .collect();

        let added = entries.len();
        let degraded = entries.iter().filter(|e| !e.has_image()).count();
        store.prepend_batch(entries);

        info!(added, degraded, rarity = ?request.rarity, "batch committed");
        BatchOutcome::Committed { added, degraded }
    }

    /// Generate the 3D reference sheet for one entry
    pub async fn enrich_with_model_sheet(&self, store: &CollectionStore, id: Uuid) -> EnrichOutcome {
        let visual_prompt = {
            let snapshot = store.snapshot();
            match snapshot.find(id) {
                None => return EnrichOutcome::NotFound,
                Some(entry) if entry.is_model_loading() => return EnrichOutcome::Busy,
                Some(entry) => entry.visual_prompt().to_string(),
            }
        };

        store.patch_entry(id, EntryPatch::loading());

        match self.render_image(&model_sheet_prompt(&visual_prompt)).await {
            Ok(image) => {
                store.patch_entry(id, EntryPatch::sheet_attached(image.to_data_uri()));
                info!(%id, "model sheet attached");
                EnrichOutcome::Attached
            }
            Err(e) => {
                warn!(%id, error = %e, "model sheet generation failed");
                store.patch_entry(id, EntryPatch::sheet_failed());
                EnrichOutcome::Failed
            }
        }
    }

    /// Enrich several entries concurrently, returning outcomes in input order
    pub async fn enrich_many(&self, store: &CollectionStore, ids: &[Uuid]) -> Vec<EnrichOutcome> {
        join_all(ids.iter().map(|id| self.enrich_with_model_sheet(store, *id))).await
    }

    async fn request_concepts(&self, request: BatchRequest) -> Result<Vec<Concept>> {
        let generation = GenerateContentRequest::from_prompt(
            self.profile.concept_prompt(request.size, request.rarity),
        )
        .with_system_instruction(CONCEPT_SYSTEM_PROMPT)
        .with_generation_config(GenerationConfig::structured_json(
            Concept::batch_schema(),
            self.temperature,
        ));

        debug!(
            model = %self.text_model,
            size = request.size,
            temperature = self.temperature,
            "requesting concepts"
        );
        let response = self
            .client
            .generate_content(&self.text_model, &generation)
            .await?;

        if let Some(reason) = response.block_reason() {
            return Err(BrainrotError::prompt_blocked(reason));
        }

        let text = response
            .text()
            .ok_or_else(|| BrainrotError::no_concepts("response contained no text"))?;
        let mut concepts = parse_concepts(&text)?;

        if concepts.is_empty() {
            return Err(BrainrotError::no_concepts("model returned an empty list"));
        }
        if concepts.len() > request.size {
            debug!(
                returned = concepts.len(),
                requested = request.size,
                "dropping surplus concepts"
            );
            concepts.truncate(request.size);
        }

        Ok(concepts)
    }

    /// Card art for one concept; failures degrade to `None`
    async fn render_card(&self, concept: &Concept, rarity: Option<Rarity>) -> Option<String> {
        let prompt = self.profile.image_prompt(&concept.visual_prompt, rarity);
        match self.render_image(&prompt).await {
            Ok(image) => Some(image.to_data_uri()),
            Err(e) => {
                warn!(name = %concept.name, error = %e, "image generation failed, keeping entry without image");
                None
            }
        }
    }

    async fn render_image(&self, prompt: &str) -> Result<InlineImage> {
        let request = GenerateContentRequest::from_prompt(prompt);
        let response = self
            .client
            .generate_content(&self.image_model, &request)
            .await?;

        extract_inline_image(&response).ok_or_else(|| {
            BrainrotError::no_image(format!(
                "no inline image in response{}",
                response
                    .block_reason()
                    .map(|r| format!(" (blocked: {})", r))
                    .unwrap_or_default()
            ))
        })
    }
}

/// Parse the model's JSON array, tolerating a surrounding markdown fence
pub fn parse_concepts(text: &str) -> Result<Vec<Concept>> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str::<Vec<Concept>>(body)
        .map_err(|e| BrainrotError::no_concepts(format!("unparsable concept list: {}", e)))
}
