//! Prompt templates for concept, image and model-sheet generation
//!
//! A [`PromptProfile`] picks the wording of every request the generator
//! sends. The orchestration itself does not change between profiles.

use brainrot_protocol::Rarity;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// System instruction shared by every concept request
pub const CONCEPT_SYSTEM_PROMPT: &str = "You are the chief meme scientist of a brainrot laboratory. \
You invent original, chaotic internet characters in the spirit of Skibidi Toilet or Tralalero Tralala, \
never copies of existing ones. Names and lore are written in Spanish/Spanglish with Gen Z slang; \
visual prompts are written in English and describe a single character clearly enough to be drawn.";

/// Image prompt for the on-demand 3D reference sheet
pub const MODEL_SHEET_TEMPLATE: &str = "3D character model reference sheet, isometric technical reference, \
front, side and back views of the same character, T-pose, clean topology-friendly shapes, \
flat neutral-gray background, even studio lighting, no text, no labels: ";

/// Which iteration of the app a batch is generated for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PromptProfile {
    /// Plain pokedex cards
    Classic,
    /// Rarity-aware collectible cards
    #[default]
    Collectible,
    /// Game-ready UEFN / Fortnite style assets
    Uefn,
}

impl PromptProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptProfile::Classic => "classic",
            PromptProfile::Collectible => "collectible",
            PromptProfile::Uefn => "uefn",
        }
    }

    pub fn default_temperature(&self) -> f32 {
        match self {
            PromptProfile::Classic => 1.3,
            PromptProfile::Collectible => 1.4,
            PromptProfile::Uefn => 1.5,
        }
    }

    /// Whether rarity guidance is woven into the prompts
    pub fn uses_rarity(&self) -> bool {
        !matches!(self, PromptProfile::Classic)
    }

    /// User prompt asking for `count` concepts
    pub fn concept_prompt(&self, count: usize, rarity: Option<Rarity>) -> String {
        let mut prompt = match self {
            PromptProfile::Classic => format!(
                "Invent {} completely NEW, distinct, and viral 'brainrot' meme characters. \
                 They must be chaotic, weird, and fit for current internet culture \
                 (like Skibidi, Rizz, etc but NEW). \
                 Output names and lore in Spanish/Spanglish, visualPrompt in English.",
                count
            ),
            PromptProfile::Collectible => format!(
                "Invent {} completely NEW, distinct, and viral 'brainrot' meme characters \
                 for a collectible card game. Each one needs a punchy name, two or three \
                 sentences of lore, and a visual description that reads well as card art. \
                 Output names and lore in Spanish/Spanglish, visualPrompt in English.",
                count
            ),
            PromptProfile::Uefn => format!(
                "Invent {} completely NEW, distinct, and viral 'brainrot' meme characters \
                 designed as playable skins for a Fortnite Creative (UEFN) island. \
                 Describe silhouettes, materials and colors a 3D artist could model. \
                 Output names and lore in Spanish/Spanglish, visualPrompt in English.",
                count
            ),
        };

        if let Some(rarity) = rarity.filter(|_| self.uses_rarity()) {
            prompt.push_str(&format!(
                "\nRarity tier: {}. {}",
                rarity,
                rarity.complexity()
            ));
        }

        prompt
    }

    /// Image prompt for one concept's card art
    pub fn image_prompt(&self, visual_prompt: &str, rarity: Option<Rarity>) -> String {
        let style = match self {
            PromptProfile::Classic => {
                "A high quality, 3d render, surreal meme art style, absurd masterpiece".to_string()
            }
            PromptProfile::Collectible => match rarity {
                Some(rarity) => format!(
                    "A high quality, 3d render, surreal meme art style, collectible card art, \
                     {} tier with a {} aura",
                    rarity.as_str().to_lowercase(),
                    rarity_aura(rarity)
                ),
                None => "A high quality, 3d render, surreal meme art style, collectible card art"
                    .to_string(),
            },
            PromptProfile::Uefn => match rarity {
                Some(rarity) => format!(
                    "Fortnite-style stylized 3D character render, game-ready asset, \
                     vibrant cel-shaded materials, {} rarity with a {} glow, full body, \
                     dynamic pose",
                    rarity.as_str().to_lowercase(),
                    rarity_aura(rarity)
                ),
                None => "Fortnite-style stylized 3D character render, game-ready asset, \
                         vibrant cel-shaded materials, full body, dynamic pose"
                    .to_string(),
            },
        };

        format!("{}: {}", style, visual_prompt)
    }
}

impl fmt::Display for PromptProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompt for the isometric reference sheet of an existing character
pub fn model_sheet_prompt(visual_prompt: &str) -> String {
    format!("{}{}", MODEL_SHEET_TEMPLATE, visual_prompt)
}

fn rarity_aura(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "gray",
        Rarity::Uncommon => "green",
        Rarity::Rare => "blue",
        Rarity::Epic => "purple",
        Rarity::Legendary => "golden",
        Rarity::Mythic => "iridescent rainbow",
    }
}
