//! Concept data structures
//!
//! A concept is the text-only output of the structured generation step:
//! one invented character before any image is attached.

use serde::{Deserialize, Serialize};

use crate::api::Schema;

/// Raw character concept as returned by the text model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub name: String,
    pub lore: String,
    pub visual_prompt: String,
}

impl Concept {
    /// Schema the text model must follow: an array of concepts
    pub fn batch_schema() -> Schema {
        Schema::array(Schema::object([
            (
                "name",
                Schema::string(
                    "The name of the brainrot character/meme. Catchy, absurd, original.",
                ),
            ),
            (
                "lore",
                Schema::string(
                    "Short, funny, nonsensical description. Use Gen Z slang (Spanish/Spanglish).",
                ),
            ),
            (
                "visualPrompt",
                Schema::string("Detailed visual description for image generation (English)."),
            ),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_concept_uses_wire_names() {
        let concept: Concept = serde_json::from_value(json!({
            "name": "Tralalero Mostacho",
            "lore": "Vive en un microondas, no cap.",
            "visualPrompt": "a shark wearing a moustache inside a microwave"
        }))
        .unwrap();

        assert_eq!(concept.visual_prompt, "a shark wearing a moustache inside a microwave");
    }

    #[test]
    fn test_concept_missing_field_rejected() {
        let result = serde_json::from_value::<Concept>(json!({
            "name": "Half", "lore": "no prompt"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_batch_schema_requires_all_fields() {
        let schema = Concept::batch_schema();
        let items = schema.items.unwrap();
        assert_eq!(items.required, vec!["name", "lore", "visualPrompt"]);
    }
}
