use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Typed values supplied by an external metadata reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Content creation time in epoch seconds (EXIF `DateTimeOriginal` and friends).
    pub content_created_at: Option<f64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub audio_artist: Option<String>,
    pub audio_album: Option<String>,
    pub audio_title: Option<String>,
    pub audio_year: Option<String>,
    pub extra_tags: BTreeMap<String, String>,
}

impl Metadata {
    pub fn merge_missing_from(&mut self, fallback: &Metadata) {
        if self.content_created_at.is_none() {
            self.content_created_at = fallback.content_created_at;
        }
        if self.width.is_none() {
            self.width = fallback.width;
        }
        if self.height.is_none() {
            self.height = fallback.height;
        }
        if self.audio_artist.is_none() {
            self.audio_artist = fallback.audio_artist.clone();
        }
        if self.audio_album.is_none() {
            self.audio_album = fallback.audio_album.clone();
        }
        if self.audio_title.is_none() {
            self.audio_title = fallback.audio_title.clone();
        }
        if self.audio_year.is_none() {
            self.audio_year = fallback.audio_year.clone();
        }
        for (key, value) in &fallback.extra_tags {
            self.extra_tags
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Width and height, only when both are known.
    pub fn dimensions(&self) -> Option<(i64, i64)> {
        Some((self.width?, self.height?))
    }
}

/// Source of [`Metadata`] for a path.
///
/// Implementations must not fail: a reader that cannot extract anything
/// returns `None` or a partially filled value.
pub trait MetadataProvider: Sync {
    fn metadata_for(&self, path: &Path) -> Option<Metadata>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataProvider for NoMetadata {
    fn metadata_for(&self, _path: &Path) -> Option<Metadata> {
        None
    }
}

/// Metadata prepared ahead of time, keyed by absolute path.
#[derive(Debug, Clone, Default)]
pub struct MetadataMap {
    entries: HashMap<PathBuf, Metadata>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, metadata: Metadata) {
        self.entries.insert(path.into(), metadata);
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read metadata file: {}", path.display()))?;
        let entries = serde_json::from_str::<HashMap<PathBuf, Metadata>>(&raw)
            .with_context(|| format!("cannot parse metadata file: {}", path.display()))?;
        Ok(Self { entries })
    }
}

impl MetadataProvider for MetadataMap {
    fn metadata_for(&self, path: &Path) -> Option<Metadata> {
        self.entries.get(path).cloned()
    }
}

/// Asks every provider in order; earlier providers win, later ones only
/// fill fields that are still missing.
#[derive(Default)]
pub struct ChainedMetadataProvider {
    providers: Vec<Box<dyn MetadataProvider>>,
}

impl ChainedMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl MetadataProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl MetadataProvider for ChainedMetadataProvider {
    fn metadata_for(&self, path: &Path) -> Option<Metadata> {
        let mut merged: Option<Metadata> = None;
        for provider in &self.providers {
            let Some(found) = provider.metadata_for(path) else {
                continue;
            };
            match merged.as_mut() {
                Some(current) => current.merge_missing_from(&found),
                None => merged = Some(found),
            }
        }
        merged
    }
}
