//! Inline image payloads
//!
//! Image models answer with base64 data inside a content part. This module
//! finds that part and converts between the payload, `data:` URIs and raw
//! bytes for export.

use base64::Engine;
use brainrot_protocol::api::GenerateContentResponse;

use crate::error::{BrainrotError, Result};

/// MIME type assumed when the service omits one
const FALLBACK_MIME_TYPE: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 payload, as received
    pub data: String,
}

impl InlineImage {
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Split a `data:<mime>;base64,<payload>` URI
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| BrainrotError::invalid_data_uri("missing 'data:' scheme"))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| BrainrotError::invalid_data_uri("missing ',' separator"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| BrainrotError::invalid_data_uri("payload is not base64"))?;

        Ok(Self {
            mime_type: if mime_type.is_empty() {
                FALLBACK_MIME_TYPE.to_string()
            } else {
                mime_type.to_string()
            },
            data: data.to_string(),
        })
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(base64::engine::general_purpose::STANDARD.decode(self.data.trim())?)
    }

    /// File extension matching the MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

/// First inline image in the first candidate, scanning parts in order.
/// Parts without data are skipped; no image at all is `None`.
pub fn extract_inline_image(response: &GenerateContentResponse) -> Option<InlineImage> {
    response.first_candidate_parts().iter().find_map(|part| {
        let blob = part.inline_data.as_ref()?;
        let data = blob.data.as_deref().filter(|d| !d.is_empty())?;
        let mime_type = blob
            .mime_type
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_MIME_TYPE);

        Some(InlineImage {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::*;
    use serde_json::json;

    #[test]
    fn test_extracts_first_inline_part() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here is your meme" },
                { "inlineData": { "mimeType": "image/jpeg", "data": "Zmlyc3Q=" } },
                { "inlineData": { "mimeType": "image/png", "data": "c2Vjb25k" } }
            ]}}]
        }))
        .unwrap();

        let image = extract_inline_image(&response).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.to_data_uri(), "data:image/jpeg;base64,Zmlyc3Q=");
    }

    #[test]
    fn test_text_only_response_has_no_image() {
        let response = text_response("I can't draw that");
        assert!(extract_inline_image(&response).is_none());
    }

    #[test]
    fn test_empty_response_has_no_image() {
        assert!(extract_inline_image(&GenerateContentResponse::default()).is_none());
    }

    #[test]
    fn test_skips_inline_part_without_data() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png" } },
                { "inlineData": { "mimeType": "image/png", "data": "" } },
                { "inlineData": { "data": "b2s=" } }
            ]}}]
        }))
        .unwrap();

        let image = extract_inline_image(&response).unwrap();
        assert_eq!(image.data, "b2s=");
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_data_uri_parse_and_decode() {
        let image = InlineImage::from_data_uri("data:image/webp;base64,aGVsbG8=").unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.extension(), "webp");
        assert_eq!(image.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_data_uri_rejects_malformed_input() {
        assert!(InlineImage::from_data_uri("").is_err());
        assert!(InlineImage::from_data_uri("https://example.com/a.png").is_err());
        assert!(InlineImage::from_data_uri("data:image/png,raw").is_err());

        let bad_payload = InlineImage::from_data_uri("data:image/png;base64,@@@").unwrap();
        assert!(bad_payload.decode().is_err());
    }
}
