use crate::error::RenameError;
use crate::metadata::{Metadata, MetadataProvider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// One file (or folder) of a batch together with its rename plan.
///
/// Identity fields are fixed at discovery time. The planned name and
/// extension only change through [`FileRecord::with_plan`], which returns a
/// new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    pub is_folder: bool,
    pub original_name: String,
    /// Includes the leading dot; empty when the file has none.
    pub extension: String,
    pub size_bytes: u64,
    pub fs_created_at: Option<f64>,
    pub fs_modified_at: Option<f64>,
    pub metadata: Option<Metadata>,
    planned_name: String,
    planned_extension: String,
}

/// Change proposed by one stage. `None` keeps the current planned value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanDelta {
    pub name: Option<String>,
    pub extension: Option<String>,
}

impl PlanDelta {
    pub fn keep() -> Self {
        Self::default()
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            extension: None,
        }
    }

    pub fn extension(extension: impl Into<String>) -> Self {
        Self {
            name: None,
            extension: Some(extension.into()),
        }
    }

    pub fn is_keep(&self) -> bool {
        self.name.is_none() && self.extension.is_none()
    }
}

impl FileRecord {
    pub fn new(
        absolute_path: impl Into<PathBuf>,
        original_name: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        let original_name = original_name.into();
        let extension = extension.into();
        Self {
            absolute_path: absolute_path.into(),
            is_folder: false,
            planned_name: original_name.clone(),
            planned_extension: extension.clone(),
            original_name,
            extension,
            size_bytes: 0,
            fs_created_at: None,
            fs_modified_at: None,
            metadata: None,
        }
    }

    /// Builds a record from a path on disk.
    pub fn from_path(path: &Path, provider: &dyn MetadataProvider) -> Result<Self, RenameError> {
        let fs_meta = fs::metadata(path).map_err(|_| RenameError::NotFound(path.to_path_buf()))?;
        let absolute_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::path::absolute(path).map_err(|_| RenameError::NotFound(path.to_path_buf()))?
        };

        let is_folder = fs_meta.is_dir();
        let full_name = absolute_path
            .file_name()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_default();
        let (original_name, extension) = if is_folder {
            (full_name, String::new())
        } else {
            split_name(&full_name)
        };

        let mut record = Self::new(absolute_path, original_name, extension);
        record.is_folder = is_folder;
        record.size_bytes = fs_meta.len();
        record.fs_created_at = fs_meta.created().ok().and_then(epoch_seconds);
        record.fs_modified_at = fs_meta.modified().ok().and_then(epoch_seconds);
        record.metadata = provider.metadata_for(&record.absolute_path);
        Ok(record)
    }

    pub fn planned_name(&self) -> &str {
        &self.planned_name
    }

    pub fn planned_extension(&self) -> &str {
        &self.planned_extension
    }

    pub fn with_plan(mut self, delta: PlanDelta) -> Self {
        if let Some(name) = delta.name {
            self.planned_name = name;
        }
        if let Some(extension) = delta.extension {
            self.planned_extension = extension;
        }
        self
    }

    pub fn is_name_changed(&self) -> bool {
        self.planned_name != self.original_name || self.planned_extension != self.extension
    }

    pub fn is_valid(&self) -> bool {
        !self.planned_name.trim().is_empty()
    }

    pub fn original_file_name(&self) -> String {
        format!("{}{}", self.original_name, self.extension)
    }

    /// Name the record will carry on disk after the batch is applied.
    pub fn effective_name(&self) -> String {
        if self.is_name_changed() {
            self.planned_file_name()
        } else {
            self.original_file_name()
        }
    }

    /// Planned name plus planned extension; folders never carry an extension.
    pub fn planned_file_name(&self) -> String {
        if self.is_folder {
            self.planned_name.clone()
        } else {
            format!("{}{}", self.planned_name, self.planned_extension)
        }
    }
}

/// Splits `photo.tar.gz` into `("photo.tar", ".gz")`. Leading-dot names such
/// as `.profile` have no extension.
pub fn split_name(file_name: &str) -> (String, String) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < file_name.len() => (
            file_name[..pos].to_string(),
            file_name[pos..].to_string(),
        ),
        _ => (file_name.to_string(), String::new()),
    }
}

fn epoch_seconds(time: SystemTime) -> Option<f64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs_f64())
}
