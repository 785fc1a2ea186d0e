//! In-memory media gallery of the home page.
//!
//! Items only reference local object URLs; nothing is uploaded or persisted,
//! so the gallery is gone as soon as its owner is dropped.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Maps a MIME type; only `image/*` and `video/*` are accepted.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence.starts_with("video/") {
            Some(Self::Video)
        } else if essence.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub title: String,
    pub description: String,
}

impl MediaItem {
    pub fn new(
        url: impl Into<String>,
        content_type: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, GalleryError> {
        let kind = MediaKind::from_content_type(content_type)
            .ok_or_else(|| GalleryError::UnsupportedMediaType(content_type.to_string()))?;
        Ok(Self {
            url: url.into(),
            kind,
            title: title.into(),
            description: description.into(),
        })
    }
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum GalleryError {
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("no media item at index {index} (len {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered list of media items, oldest first.
#[derive(Debug, Default, Clone)]
pub struct Gallery {
    items: Vec<MediaItem>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append and return the new item's index.
    pub fn add(&mut self, item: MediaItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Swap the item at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, item: MediaItem) -> Result<MediaItem, GalleryError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(GalleryError::OutOfRange { index, len })?;
        Ok(std::mem::replace(slot, item))
    }

    /// Remove the item at `index`; later items shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<MediaItem, GalleryError> {
        if index >= self.items.len() {
            return Err(GalleryError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
