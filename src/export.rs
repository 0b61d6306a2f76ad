//! Writing entry images to disk

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::entry::Entry;
use crate::error::{BrainrotError, Result};
use crate::image::InlineImage;

/// Save the card art and, if present, the model sheet of one entry.
/// Returns the written paths; an entry without images writes nothing.
pub async fn save_entry_images(entry: &Entry, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let stem = format!("{}-{}", slugify(entry.name()), &entry.id().simple().to_string()[..8]);

    if entry.has_image() {
        written.push(write_data_uri(entry.image_url(), dir, &stem).await?);
    }
    if let Some(sheet) = entry.model_sheet_url() {
        written.push(write_data_uri(sheet, dir, &format!("{}-sheet", stem)).await?);
    }

    Ok(written)
}

/// Save every entry, newest first
pub async fn save_collection(entries: &[Entry], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for entry in entries {
        written.extend(save_entry_images(entry, dir).await?);
    }
    Ok(written)
}

async fn write_data_uri(uri: &str, dir: &Path, stem: &str) -> Result<PathBuf> {
    let image = InlineImage::from_data_uri(uri)?;
    let bytes = image.decode()?;

    fs::create_dir_all(dir)
        .await
        .map_err(|e| BrainrotError::io_from_error(format!("Creating {}", dir.display()), e))?;

    let path = dir.join(format!("{}.{}", stem, image.extension()));
    fs::write(&path, &bytes)
        .await
        .map_err(|e| BrainrotError::io_from_error(format!("Writing {}", path.display()), e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "image saved");
    Ok(path)
}

/// Lowercase ASCII file-name stem; accents and symbols collapse to '-'
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }

    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "brainrot".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryPatch;
    use crate::tests::utils::test_helpers::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Tralalero Tralalá"), "tralalero-tralal");
        assert_eq!(slugify("  Bombardiro -- Crocodilo!! "), "bombardiro-crocodilo");
        assert_eq!(slugify("¿¡!?"), "brainrot");
    }

    #[tokio::test]
    async fn test_save_entry_writes_card_and_sheet() {
        let dir = create_temp_dir();
        let base = entry("Tung Sahur");
        let enriched = base.patched(&EntryPatch::sheet_attached("data:image/jpeg;base64,c2hlZXQ="));

        let paths = save_entry_images(&enriched, dir.path()).await.unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].extension().unwrap() == "png");
        assert!(paths[1].to_string_lossy().ends_with("-sheet.jpg"));
        assert_eq!(std::fs::read(&paths[0]).unwrap(), b"hello");
        assert_eq!(std::fs::read(&paths[1]).unwrap(), b"sheet");
    }

    #[tokio::test]
    async fn test_entry_without_image_is_skipped() {
        let dir = create_temp_dir();
        let no_image = crate::entry::Entry::from_concept(concept("Ghost"), None, None);

        let paths = save_entry_images(&no_image, &dir.path().join("out")).await.unwrap();

        assert!(paths.is_empty());
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_save_collection_creates_directory() {
        let dir = create_temp_dir();
        let out = dir.path().join("nested").join("pack");

        let paths = save_collection(&[entry("A"), entry("B")], &out).await.unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.starts_with(&out)));
    }

    #[tokio::test]
    async fn test_corrupt_data_uri_is_an_error() {
        let dir = create_temp_dir();
        let broken = crate::entry::Entry::from_concept(
            concept("Broken"),
            Some("data:image/png;base64,***".to_string()),
            None,
        );

        let err = save_entry_images(&broken, dir.path()).await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidDataUri);
    }
}
