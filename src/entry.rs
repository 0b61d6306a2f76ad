//! Collection entries
//!
//! An [`Entry`] is a concept promoted into the collection. Its identity and
//! card fields are fixed at creation; the only later change allowed is the
//! model-sheet state, applied through an [`EntryPatch`].

use brainrot_protocol::{Concept, Rarity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    id: Uuid,
    name: String,
    lore: String,
    visual_prompt: String,
    /// Data URI of the card art, empty when generation failed
    image_url: String,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rarity: Option<Rarity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_sheet_url: Option<String>,
    is_model_loading: bool,
}

impl Entry {
    /// Promote a concept, assigning a fresh id and the current time
    pub fn from_concept(concept: Concept, image_url: Option<String>, rarity: Option<Rarity>) -> Self {
        Self::with_identity(concept, image_url, rarity, Uuid::new_v4(), Utc::now())
    }

    pub fn with_identity(
        concept: Concept,
        image_url: Option<String>,
        rarity: Option<Rarity>,
        id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: concept.name,
            lore: concept.lore,
            visual_prompt: concept.visual_prompt,
            image_url: image_url.unwrap_or_default(),
            timestamp,
            rarity,
            model_sheet_url: None,
            is_model_loading: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Short id shown on cards, e.g. `#3f2a`
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..4].to_string()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lore(&self) -> &str {
        &self.lore
    }

    pub fn visual_prompt(&self) -> &str {
        &self.visual_prompt
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn rarity(&self) -> Option<Rarity> {
        self.rarity
    }

    pub fn model_sheet_url(&self) -> Option<&str> {
        self.model_sheet_url.as_deref()
    }

    pub fn is_model_loading(&self) -> bool {
        self.is_model_loading
    }

    /// Copy of this entry with the patch applied
    pub fn patched(&self, patch: &EntryPatch) -> Self {
        let mut next = self.clone();
        if let Some(url) = &patch.model_sheet_url {
            next.model_sheet_url = Some(url.clone());
        }
        if let Some(loading) = patch.is_model_loading {
            next.is_model_loading = loading;
        }
        next
    }
}

/// The mutable subset of an entry. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub model_sheet_url: Option<String>,
    pub is_model_loading: Option<bool>,
}

impl EntryPatch {
    pub fn loading() -> Self {
        Self {
            model_sheet_url: None,
            is_model_loading: Some(true),
        }
    }

    pub fn sheet_attached(url: impl Into<String>) -> Self {
        Self {
            model_sheet_url: Some(url.into()),
            is_model_loading: Some(false),
        }
    }

    pub fn sheet_failed() -> Self {
        Self {
            model_sheet_url: None,
            is_model_loading: Some(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::concept;

    #[test]
    fn test_from_concept_copies_fields() {
        let entry = Entry::from_concept(concept("Skibidi Jr"), None, Some(Rarity::Rare));
        assert_eq!(entry.name(), "Skibidi Jr");
        assert_eq!(entry.visual_prompt(), "visual of Skibidi Jr");
        assert_eq!(entry.image_url(), "");
        assert!(!entry.has_image());
        assert_eq!(entry.rarity(), Some(Rarity::Rare));
        assert!(entry.model_sheet_url().is_none());
        assert!(!entry.is_model_loading());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Entry::from_concept(concept("A"), None, None);
        let b = Entry::from_concept(concept("A"), None, None);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.short_id().len(), 4);
    }

    #[test]
    fn test_patch_only_touches_sheet_state() {
        let entry = Entry::from_concept(
            concept("Bombardino"),
            Some("data:image/png;base64,AAAA".to_string()),
            None,
        );

        let loading = entry.patched(&EntryPatch::loading());
        assert!(loading.is_model_loading());
        assert_eq!(loading.image_url(), entry.image_url());
        assert_eq!(loading.id(), entry.id());

        let done = loading.patched(&EntryPatch::sheet_attached("data:image/png;base64,BBBB"));
        assert!(!done.is_model_loading());
        assert_eq!(done.model_sheet_url(), Some("data:image/png;base64,BBBB"));
        assert_eq!(done.name(), entry.name());
        assert_eq!(done.timestamp(), entry.timestamp());

        let failed = loading.patched(&EntryPatch::sheet_failed());
        assert!(!failed.is_model_loading());
        assert!(failed.model_sheet_url().is_none());
    }

    #[test]
    fn test_serializes_with_camel_case_names() {
        let entry = Entry::from_concept(concept("Tung"), None, Some(Rarity::Epic));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["visualPrompt"], "visual of Tung");
        assert_eq!(value["imageUrl"], "");
        assert_eq!(value["rarity"], "Epic");
        assert_eq!(value["isModelLoading"], false);
        assert!(value.get("modelSheetUrl").is_none());
    }
}
