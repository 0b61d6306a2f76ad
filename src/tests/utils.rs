//! Test utilities and helpers for unit tests
//!
//! This module provides common testing utilities including:
//! - Temporary directories and files
//! - Concept and entry fixtures
//! - Canned generateContent responses

#[cfg(test)]
pub mod test_helpers {
    use brainrot_protocol::api::{Candidate, Content, GenerateContentResponse, Part};
    use brainrot_protocol::Concept;
    use std::path::PathBuf;
    use tempfile::TempDir;

    use crate::config::{Config, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
    use crate::entry::Entry;

    pub const TEXT_MODEL: &str = DEFAULT_TEXT_MODEL;
    pub const IMAGE_MODEL: &str = DEFAULT_IMAGE_MODEL;

    /// Create a temporary directory for testing
    pub fn create_temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp dir")
    }

    /// Create a temporary file with content
    pub fn create_temp_file_with_content(dir: &TempDir, filename: &str, content: &[u8]) -> PathBuf {
        let file_path = dir.path().join(filename);
        std::fs::write(&file_path, content).expect("Failed to write temp file");
        file_path
    }

    /// Default configuration with a dummy API key
    pub fn test_config() -> Config {
        Config {
            api_key: Some("test-key".to_string()),
            ..Config::default()
        }
    }

    /// Concept whose lore and visual prompt are derived from its name
    pub fn concept(name: &str) -> Concept {
        Concept {
            name: name.to_string(),
            lore: format!("lore of {}", name),
            visual_prompt: format!("visual of {}", name),
        }
    }

    /// Entry with a small PNG data URI and no rarity
    pub fn entry(name: &str) -> Entry {
        Entry::from_concept(
            concept(name),
            Some("data:image/png;base64,aGVsbG8=".to_string()),
            None,
        )
    }

    /// Response whose first candidate holds the given parts
    pub fn response_with_parts(parts: Vec<Part>) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts,
                }),
                finish_reason: Some("STOP".to_string()),
                index: Some(0),
            }],
            ..Default::default()
        }
    }

    pub fn text_response(text: &str) -> GenerateContentResponse {
        response_with_parts(vec![Part::text(text)])
    }

    /// Structured-output response listing the concepts as JSON
    pub fn concepts_response(concepts: &[Concept]) -> GenerateContentResponse {
        let json = serde_json::to_string(concepts).expect("Failed to serialize concepts");
        text_response(&json)
    }

    /// Image response with a leading text part, like the real image model sends
    pub fn image_response(mime_type: &str, data: &str) -> GenerateContentResponse {
        response_with_parts(vec![
            Part::text("Here is your image"),
            Part::inline(mime_type, data),
        ])
    }
}
